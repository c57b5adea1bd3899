// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::cell::RefCell;
use std::sync::mpsc::{self, Receiver, Sender};

use rusqlite::{Connection, params, params_from_iter};
use serde_json::Value;

use super::{ChangeEvent, ChangeKind, Clause, DataService, Filter, Record, Table, new_id};
use crate::db::init_schema;
use crate::error::{Error, Result};

/// Local mirror of the remote tables, backed by one SQLite connection.
///
/// Every write is published to the subscribers of the touched table.
pub struct SqliteService {
    conn: Connection,
    subscribers: RefCell<Vec<(Table, Sender<ChangeEvent>)>>,
}

impl SqliteService {
    pub fn new(conn: Connection) -> Result<Self> {
        init_schema(&conn)?;
        Ok(SqliteService {
            conn,
            subscribers: RefCell::new(Vec::new()),
        })
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::new(Connection::open_in_memory()?)
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    fn publish(&self, table: Table, kind: ChangeKind, record: Value) {
        let event = ChangeEvent {
            table,
            kind,
            record,
        };
        // Receivers that were dropped are forgotten.
        self.subscribers
            .borrow_mut()
            .retain(|(t, tx)| *t != table || tx.send(event.clone()).is_ok());
    }

    fn where_clause(filter: &Filter) -> Result<(String, Vec<String>)> {
        filter.validate()?;
        let mut sql = String::from(" WHERE 1=1");
        let mut values = Vec::new();
        for clause in filter.clauses() {
            match clause {
                Clause::Eq(col, v) if col == "id" => {
                    sql.push_str(" AND id=?");
                    values.push(v.clone());
                }
                Clause::Eq(col, v) => {
                    sql.push_str(&format!(" AND json_extract(body, '$.{col}')=?"));
                    values.push(v.clone());
                }
                Clause::Contains(col, v) => {
                    sql.push_str(&format!(
                        " AND EXISTS (SELECT 1 FROM json_each(body, '$.{col}') WHERE json_each.value=?)"
                    ));
                    values.push(v.clone());
                }
            }
        }
        Ok((sql, values))
    }

    fn select_bodies(&self, table: Table, filter: &Filter) -> Result<Vec<Value>> {
        let (where_sql, values) = Self::where_clause(filter)?;
        let sql = format!("SELECT body FROM {}{} ORDER BY rowid", table, where_sql);
        let mut stmt = self.conn.prepare_cached(&sql)?;
        let rows = stmt.query_map(params_from_iter(values.iter()), |r| r.get::<_, String>(0))?;
        let mut out = Vec::new();
        for row in rows {
            out.push(serde_json::from_str(&row?)?);
        }
        Ok(out)
    }
}

impl DataService for SqliteService {
    fn select<T: Record>(&self, filter: &Filter) -> Result<Vec<T>> {
        tracing::debug!(table = %T::TABLE, ?filter, "select");
        self.select_bodies(T::TABLE, filter)?
            .into_iter()
            .map(|v| serde_json::from_value(v).map_err(Error::from))
            .collect()
    }

    fn insert<T: Record>(&self, record: &T) -> Result<T> {
        let mut stored = record.clone();
        if stored.id().is_empty() {
            stored.set_id(new_id());
        }
        let body = serde_json::to_value(&stored)?;
        self.conn.execute(
            &format!("INSERT INTO {}(id, body) VALUES (?1, ?2)", T::TABLE),
            params![stored.id(), body.to_string()],
        )?;
        tracing::debug!(table = %T::TABLE, id = stored.id(), "insert");
        self.publish(T::TABLE, ChangeKind::Insert, body);
        Ok(stored)
    }

    fn update<T: Record>(&self, record: &T) -> Result<T> {
        let body = serde_json::to_value(record)?;
        let changed = self.conn.execute(
            &format!("UPDATE {} SET body=?1 WHERE id=?2", T::TABLE),
            params![body.to_string(), record.id()],
        )?;
        if changed == 0 {
            return Err(Error::not_found(T::TABLE, record.id()));
        }
        tracing::debug!(table = %T::TABLE, id = record.id(), "update");
        self.publish(T::TABLE, ChangeKind::Update, body);
        Ok(record.clone())
    }

    fn delete(&self, table: Table, filter: &Filter) -> Result<usize> {
        if filter.is_empty() {
            return Err(Error::validation("filter", "refusing to delete every row"));
        }
        let removed = self.select_bodies(table, filter)?;
        let (where_sql, values) = Self::where_clause(filter)?;
        let count = self.conn.execute(
            &format!("DELETE FROM {}{}", table, where_sql),
            params_from_iter(values.iter()),
        )?;
        tracing::debug!(%table, count, "delete");
        for body in removed {
            self.publish(table, ChangeKind::Delete, body);
        }
        Ok(count)
    }

    fn subscribe(&self, table: Table) -> Result<Receiver<ChangeEvent>> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.borrow_mut().push((table, tx));
        Ok(rx)
    }
}
