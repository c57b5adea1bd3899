// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Errors raised by the data services and the client-side stores.

use rust_decimal::Decimal;

use crate::backend::Table;

/// The errors that may occur while reading or mutating finance data.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No record with the given id exists in the table.
    #[error("no record '{id}' in {table}")]
    NotFound { table: Table, id: String },

    /// No account with the given name exists for the current user.
    #[error("account '{0}' not found")]
    AccountNameNotFound(String),

    /// A field failed validation before anything was written.
    #[error("invalid {field}: {reason}")]
    Validation { field: &'static str, reason: String },

    /// Money amounts handed to a mutation must be strictly positive.
    #[error("amount must be greater than zero, got {0}")]
    NonPositiveAmount(Decimal),

    /// Exchange rates must be strictly positive.
    #[error("exchange rate must be greater than zero, got {0}")]
    InvalidExchangeRate(Decimal),

    /// The source and destination of a transfer are the same account.
    #[error("cannot transfer from an account to itself")]
    SameAccount,

    /// The source account does not hold enough money for the transfer.
    #[error("insufficient funds in '{account}': balance {balance}, requested {requested}")]
    InsufficientFunds {
        account: String,
        balance: Decimal,
        requested: Decimal,
    },

    /// The account has no DPS configuration.
    #[error("account '{0}' is not enrolled in DPS")]
    DpsNotEnrolled(String),

    /// The DPS configuration does not point at a savings account.
    #[error("account '{0}' has no linked DPS savings account")]
    DpsMissingSavingsAccount(String),

    /// Custom-amount DPS transfers need an explicit amount.
    #[error("DPS on '{0}' uses a custom amount, pass one explicitly")]
    DpsAmountRequired(String),

    /// The account is the DPS savings target of another account.
    #[error("account '{account}' is the DPS savings account of '{linked_from}'")]
    AccountLinked { account: String, linked_from: String },

    /// A multi-step write failed after earlier steps were already stored.
    #[error("{operation} failed part-way, {compensation}: {source}")]
    PartialWrite {
        operation: &'static str,
        compensation: Compensation,
        source: Box<Error>,
    },

    /// The data service cannot push change events.
    #[error("change subscriptions are not supported by this data service")]
    SubscriptionUnsupported,

    /// The remote service answered with a non-success status.
    #[error("remote service returned {status}: {body}")]
    Remote { status: u16, body: String },

    #[error("SQL error: {0}")]
    Sql(#[from] rusqlite::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Outcome of undoing the earlier steps of a failed multi-step write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compensation {
    /// Every earlier write was removed again.
    Succeeded,
    /// Some earlier write could not be removed and is still stored.
    Failed,
}

impl std::fmt::Display for Compensation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Compensation::Succeeded => write!(f, "earlier writes were rolled back"),
            Compensation::Failed => write!(f, "earlier writes could not be rolled back"),
        }
    }
}

impl Error {
    pub(crate) fn not_found(table: Table, id: impl Into<String>) -> Self {
        Error::NotFound {
            table,
            id: id.into(),
        }
    }

    pub(crate) fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        Error::Validation {
            field,
            reason: reason.into(),
        }
    }
}
