// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Data-access layer: typed CRUD over the named tables of the data service.

use std::fmt;
use std::sync::mpsc::Receiver;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::{Error, Result};

pub mod rest;
pub mod sqlite;

pub use rest::RestService;
pub use sqlite::SqliteService;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    Accounts,
    Transactions,
    Categories,
    Purchases,
    PurchaseCategories,
    Notifications,
    DpsTransfers,
    SavingsGoals,
    Profiles,
}

impl Table {
    pub const ALL: [Table; 9] = [
        Table::Accounts,
        Table::Transactions,
        Table::Categories,
        Table::Purchases,
        Table::PurchaseCategories,
        Table::Notifications,
        Table::DpsTransfers,
        Table::SavingsGoals,
        Table::Profiles,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Table::Accounts => "accounts",
            Table::Transactions => "transactions",
            Table::Categories => "categories",
            Table::Purchases => "purchases",
            Table::PurchaseCategories => "purchase_categories",
            Table::Notifications => "notifications",
            Table::DpsTransfers => "dps_transfers",
            Table::SavingsGoals => "savings_goals",
            Table::Profiles => "profiles",
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A row type stored in one table of the data service.
pub trait Record: Serialize + DeserializeOwned + Clone {
    const TABLE: Table;

    fn id(&self) -> &str;

    fn set_id(&mut self, id: String);
}

static COLUMN_NAME: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-z_][a-z0-9_]*$").unwrap());

#[derive(Debug, Clone, PartialEq)]
pub enum Clause {
    /// Column equals the value, compared as text.
    Eq(String, String),
    /// Array column contains the value.
    Contains(String, String),
}

impl Clause {
    pub fn column(&self) -> &str {
        match self {
            Clause::Eq(c, _) | Clause::Contains(c, _) => c,
        }
    }
}

/// Conjunction of column conditions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    clauses: Vec<Clause>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn by_id(id: &str) -> Self {
        Self::new().eq("id", id)
    }

    pub fn eq(mut self, column: &str, value: impl Into<String>) -> Self {
        self.clauses.push(Clause::Eq(column.to_string(), value.into()));
        self
    }

    pub fn contains(mut self, column: &str, value: impl Into<String>) -> Self {
        self.clauses
            .push(Clause::Contains(column.to_string(), value.into()));
        self
    }

    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Reject column names that could not be a plain identifier.
    pub(crate) fn validate(&self) -> Result<()> {
        for clause in &self.clauses {
            if !COLUMN_NAME.is_match(clause.column()) {
                return Err(Error::validation(
                    "filter column",
                    format!("'{}' is not a column name", clause.column()),
                ));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Insert,
    Update,
    Delete,
}

/// A row change pushed to subscribers of a table.
///
/// For deletes `record` holds the row as it was before removal.
#[derive(Debug, Clone, PartialEq)]
pub struct ChangeEvent {
    pub table: Table,
    pub kind: ChangeKind,
    pub record: serde_json::Value,
}

/// Typed request/response access to the tables of the data service.
pub trait DataService {
    fn select<T: Record>(&self, filter: &Filter) -> Result<Vec<T>>;

    /// Store a new row. An empty id is replaced by a generated one; the
    /// stored row is returned.
    fn insert<T: Record>(&self, record: &T) -> Result<T>;

    /// Replace the row with the same id.
    fn update<T: Record>(&self, record: &T) -> Result<T>;

    /// Delete every row matching a non-empty filter, returning the count.
    fn delete(&self, table: Table, filter: &Filter) -> Result<usize>;

    fn subscribe(&self, _table: Table) -> Result<Receiver<ChangeEvent>> {
        Err(Error::SubscriptionUnsupported)
    }

    fn get<T: Record>(&self, id: &str) -> Result<T> {
        self.select::<T>(&Filter::by_id(id))?
            .into_iter()
            .next()
            .ok_or_else(|| Error::not_found(T::TABLE, id))
    }
}

pub(crate) fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_rejects_injected_columns() {
        assert!(Filter::new().eq("user_id", "u").validate().is_ok());
        assert!(Filter::new().eq("id) OR 1=1 --", "x").validate().is_err());
        assert!(Filter::new().contains("Tags", "x").validate().is_err());
    }
}
