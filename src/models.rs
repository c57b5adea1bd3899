// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::backend::{Record, Table};
use crate::error::{Error, Result};
use crate::recurrence::Recurrence;

static CURRENCY_CODE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Z]{3}$").unwrap());

/// Normalise and validate an ISO-4217 style currency code.
pub fn parse_currency(s: &str) -> Result<String> {
    let code = s.trim().to_uppercase();
    if CURRENCY_CODE.is_match(&code) {
        Ok(code)
    } else {
        Err(Error::validation(
            "currency",
            format!("'{}' is not a three letter currency code", s.trim()),
        ))
    }
}

macro_rules! text_enum {
    ($name:ident, $field:literal { $($variant:ident => $text:literal),+ $(,)? }) => {
        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self> {
                match s.trim().to_lowercase().as_str() {
                    $($text => Ok($name::$variant),)+
                    other => Err(Error::validation(
                        $field,
                        format!(
                            "'{}' is not one of: {}",
                            other,
                            [$($text),+].join(", ")
                        ),
                    )),
                }
            }
        }
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountKind {
    Checking,
    Savings,
    Credit,
    Investment,
    Cash,
}

text_enum!(AccountKind, "account type" {
    Checking => "checking",
    Savings => "savings",
    Credit => "credit",
    Investment => "investment",
    Cash => "cash",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DpsType {
    Monthly,
    Flexible,
}

text_enum!(DpsType, "DPS type" {
    Monthly => "monthly",
    Flexible => "flexible",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DpsAmountType {
    Fixed,
    Custom,
}

text_enum!(DpsAmountType, "DPS amount type" {
    Fixed => "fixed",
    Custom => "custom",
});

/// Recurring-deposit settings of an account enrolled in DPS.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DpsConfig {
    pub dps_type: DpsType,
    pub amount_type: DpsAmountType,
    pub fixed_amount: Option<Decimal>,
    pub savings_account_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    #[serde(default)]
    pub id: String,
    pub user_id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: AccountKind,
    pub currency: String,
    pub initial_balance: Decimal,
    /// Ledger balance: `initial_balance` plus income minus expense.
    pub calculated_balance: Decimal,
    pub is_active: bool,
    #[serde(default)]
    pub dps: Option<DpsConfig>,
    /// Negative values are a percentage of what is left after saving,
    /// non-negative values a fixed amount.
    #[serde(default)]
    pub donation_preference: Option<Decimal>,
}

impl Account {
    pub fn dps_savings_account_id(&self) -> Option<&str> {
        self.dps
            .as_ref()
            .and_then(|d| d.savings_account_id.as_deref())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Income,
    Expense,
}

text_enum!(TransactionType, "transaction type" {
    Income => "income",
    Expense => "expense",
});

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    #[serde(default)]
    pub id: String,
    pub user_id: String,
    pub account_id: String,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    /// Always positive; `kind` carries the direction.
    pub amount: Decimal,
    pub category: String,
    #[serde(default)]
    pub description: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Negative values are a percentage of `amount`, non-negative values a
    /// fixed amount.
    #[serde(default)]
    pub saving_amount: Option<Decimal>,
    #[serde(default)]
    pub recurrence: Option<Recurrence>,
}

impl Transaction {
    /// Signed effect of this transaction on its account balance.
    pub fn signed_amount(&self) -> Decimal {
        match self.kind {
            TransactionType::Income => self.amount,
            TransactionType::Expense => -self.amount,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub user_id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub color: String,
    pub icon: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PurchaseStatus {
    Planned,
    Purchased,
    Cancelled,
}

text_enum!(PurchaseStatus, "purchase status" {
    Planned => "planned",
    Purchased => "purchased",
    Cancelled => "cancelled",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

text_enum!(Priority, "priority" {
    Low => "low",
    Medium => "medium",
    High => "high",
});

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchaseCategory {
    #[serde(default)]
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub color: String,
    pub monthly_budget: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Purchase {
    #[serde(default)]
    pub id: String,
    pub user_id: String,
    pub item_name: String,
    pub price: Decimal,
    #[serde(default)]
    pub category_id: Option<String>,
    pub status: PurchaseStatus,
    pub priority: Priority,
    pub purchase_date: NaiveDate,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Info,
    Success,
    Warning,
    Error,
}

text_enum!(NotificationKind, "notification type" {
    Info => "info",
    Success => "success",
    Warning => "warning",
    Error => "error",
});

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    #[serde(default)]
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub message: String,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavingsGoal {
    #[serde(default)]
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub target_amount: Decimal,
    pub current_amount: Decimal,
    pub source_account_id: String,
    pub savings_account_id: String,
    #[serde(default)]
    pub target_date: Option<NaiveDate>,
}

impl SavingsGoal {
    /// Progress towards the target in percent, capped at 100.
    pub fn progress_percent(&self) -> Decimal {
        if self.target_amount <= Decimal::ZERO {
            return Decimal::ONE_HUNDRED;
        }
        let pct = self.current_amount / self.target_amount * Decimal::ONE_HUNDRED;
        pct.clamp(Decimal::ZERO, Decimal::ONE_HUNDRED)
    }

    pub fn remaining(&self) -> Decimal {
        (self.target_amount - self.current_amount).max(Decimal::ZERO)
    }
}

/// History row written for every DPS transfer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DpsTransfer {
    #[serde(default)]
    pub id: String,
    pub user_id: String,
    pub from_account_id: String,
    pub to_account_id: String,
    pub amount: Decimal,
    pub date: NaiveDate,
    pub transfer_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: String,
    #[serde(default)]
    pub full_name: Option<String>,
    pub default_currency: String,
}

macro_rules! record {
    ($ty:ty, $table:expr) => {
        impl Record for $ty {
            const TABLE: Table = $table;

            fn id(&self) -> &str {
                &self.id
            }

            fn set_id(&mut self, id: String) {
                self.id = id;
            }
        }
    };
}

record!(Account, Table::Accounts);
record!(Transaction, Table::Transactions);
record!(Category, Table::Categories);
record!(PurchaseCategory, Table::PurchaseCategories);
record!(Purchase, Table::Purchases);
record!(Notification, Table::Notifications);
record!(SavingsGoal, Table::SavingsGoals);
record!(DpsTransfer, Table::DpsTransfers);
record!(Profile, Table::Profiles);
