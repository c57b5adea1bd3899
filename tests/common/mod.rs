// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

#![allow(dead_code)]

use std::cell::Cell;
use std::sync::mpsc::Receiver;

use chrono::NaiveDate;
use fintrack::backend::{ChangeEvent, DataService, Filter, Record, SqliteService, Table};
use fintrack::models::{Account, AccountKind};
use fintrack::store::{FinanceStore, NewAccount};
use fintrack::{Error, Result};
use rust_decimal::Decimal;

pub const USER: &str = "user-1";

pub fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

pub fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

pub fn open_account<S: DataService>(
    store: &mut FinanceStore<'_, S>,
    name: &str,
    currency: &str,
    balance: &str,
) -> Account {
    store
        .create_account(NewAccount::new(
            name,
            AccountKind::Checking,
            currency,
            dec(balance),
        ))
        .unwrap()
}

fn unavailable() -> Error {
    Error::Remote {
        status: 503,
        body: "service unavailable".into(),
    }
}

/// SQLite-backed service that fails chosen writes on demand.
pub struct FlakyService {
    pub inner: SqliteService,
    /// Fail the insert into this table after letting `n` more through.
    fail_insert: Cell<Option<(Table, usize)>>,
    fail_update: Cell<Option<Table>>,
    fail_deletes: Cell<bool>,
}

impl FlakyService {
    pub fn new() -> Self {
        FlakyService {
            inner: SqliteService::open_in_memory().unwrap(),
            fail_insert: Cell::new(None),
            fail_update: Cell::new(None),
            fail_deletes: Cell::new(false),
        }
    }

    pub fn fail_insert_after(&self, table: Table, successes: usize) {
        self.fail_insert.set(Some((table, successes)));
    }

    pub fn fail_updates_of(&self, table: Table) {
        self.fail_update.set(Some(table));
    }

    pub fn fail_deletes(&self) {
        self.fail_deletes.set(true);
    }
}

impl DataService for FlakyService {
    fn select<T: Record>(&self, filter: &Filter) -> Result<Vec<T>> {
        self.inner.select(filter)
    }

    fn insert<T: Record>(&self, record: &T) -> Result<T> {
        if let Some((table, left)) = self.fail_insert.get() {
            if table == T::TABLE {
                if left == 0 {
                    self.fail_insert.set(None);
                    return Err(unavailable());
                }
                self.fail_insert.set(Some((table, left - 1)));
            }
        }
        self.inner.insert(record)
    }

    fn update<T: Record>(&self, record: &T) -> Result<T> {
        if self.fail_update.get() == Some(T::TABLE) {
            return Err(unavailable());
        }
        self.inner.update(record)
    }

    fn delete(&self, table: Table, filter: &Filter) -> Result<usize> {
        if self.fail_deletes.get() {
            return Err(unavailable());
        }
        self.inner.delete(table, filter)
    }

    fn subscribe(&self, table: Table) -> Result<Receiver<ChangeEvent>> {
        self.inner.subscribe(table)
    }
}
