// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::{Account, Transaction, TransactionType};
use crate::tags;
use crate::utils::same_month;

/// Dashboard figures for one currency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CurrencyStats {
    pub currency: String,
    pub account_count: usize,
    pub total_balance: Decimal,
    pub monthly_income: Decimal,
    pub monthly_expense: Decimal,
}

impl CurrencyStats {
    pub fn monthly_net(&self) -> Decimal {
        self.monthly_income - self.monthly_expense
    }
}

/// Per-currency buckets over active accounts, ordered by currency code.
///
/// Monthly totals cover the calendar month of `today` and skip transfer legs,
/// which only move money between the user's own accounts.
pub fn currency_stats(
    accounts: &[Account],
    transactions: &[Transaction],
    today: NaiveDate,
) -> Vec<CurrencyStats> {
    let mut buckets: BTreeMap<&str, CurrencyStats> = BTreeMap::new();
    for acct in accounts.iter().filter(|a| a.is_active) {
        let entry = buckets
            .entry(acct.currency.as_str())
            .or_insert_with(|| CurrencyStats {
                currency: acct.currency.clone(),
                account_count: 0,
                total_balance: Decimal::ZERO,
                monthly_income: Decimal::ZERO,
                monthly_expense: Decimal::ZERO,
            });
        entry.account_count += 1;
        entry.total_balance = entry.total_balance.saturating_add(acct.calculated_balance);
    }

    let currency_of: HashMap<&str, &str> = accounts
        .iter()
        .map(|a| (a.id.as_str(), a.currency.as_str()))
        .collect();

    for tx in transactions {
        if !same_month(tx.date, today) || tags::is_transfer(&tx.tags) {
            continue;
        }
        let Some(ccy) = currency_of.get(tx.account_id.as_str()) else {
            continue;
        };
        let Some(entry) = buckets.get_mut(ccy) else {
            continue;
        };
        match tx.kind {
            TransactionType::Income => {
                entry.monthly_income = entry.monthly_income.saturating_add(tx.amount)
            }
            TransactionType::Expense => {
                entry.monthly_expense = entry.monthly_expense.saturating_add(tx.amount)
            }
        }
    }

    buckets.into_values().collect()
}

/// Most recent transactions first; ties keep their input order.
pub fn recent_transactions(transactions: &[Transaction], limit: usize) -> Vec<&Transaction> {
    let mut sorted: Vec<&Transaction> = transactions.iter().collect();
    sorted.sort_by(|a, b| b.date.cmp(&a.date));
    sorted.truncate(limit);
    sorted
}

/// Expense totals per category for the month of `today`, largest first.
pub fn monthly_expense_by_category(
    transactions: &[Transaction],
    today: NaiveDate,
) -> Vec<(String, Decimal)> {
    let mut totals: HashMap<&str, Decimal> = HashMap::new();
    for tx in transactions.iter().filter(|t| {
        t.kind == TransactionType::Expense && same_month(t.date, today) && !tags::is_transfer(&t.tags)
    }) {
        let total = totals.entry(tx.category.as_str()).or_insert(Decimal::ZERO);
        *total = total.saturating_add(tx.amount);
    }
    let mut items: Vec<(String, Decimal)> = totals
        .into_iter()
        .map(|(c, a)| (c.to_string(), a))
        .collect();
    items.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    items
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tx(id: &str, kind: TransactionType, amount: i64, category: &str, day: u32) -> Transaction {
        Transaction {
            id: id.into(),
            user_id: "u".into(),
            account_id: "a".into(),
            kind,
            amount: Decimal::new(amount, 0),
            category: category.into(),
            description: String::new(),
            date: NaiveDate::from_ymd_opt(2025, 3, day).unwrap(),
            tags: Vec::new(),
            saving_amount: None,
            recurrence: None,
        }
    }

    #[test]
    fn recent_is_newest_first_and_limited() {
        let txs = vec![
            tx("1", TransactionType::Expense, 5, "Food", 1),
            tx("2", TransactionType::Expense, 5, "Food", 9),
            tx("3", TransactionType::Income, 5, "Salary", 4),
        ];
        let ids: Vec<&str> = recent_transactions(&txs, 2)
            .iter()
            .map(|t| t.id.as_str())
            .collect();
        assert_eq!(ids, vec!["2", "3"]);
    }

    #[test]
    fn expense_by_category_skips_income_and_transfers() {
        let mut moved = tx("4", TransactionType::Expense, 100, "Transfer", 2);
        moved.tags = vec![tags::TRANSFER.to_string()];
        let txs = vec![
            tx("1", TransactionType::Expense, 5, "Food", 1),
            tx("2", TransactionType::Expense, 7, "Food", 9),
            tx("3", TransactionType::Expense, 30, "Travel", 4),
            tx("5", TransactionType::Income, 50, "Salary", 4),
            moved,
        ];
        let today = NaiveDate::from_ymd_opt(2025, 3, 20).unwrap();
        assert_eq!(
            monthly_expense_by_category(&txs, today),
            vec![
                ("Travel".to_string(), Decimal::new(30, 0)),
                ("Food".to_string(), Decimal::new(12, 0)),
            ]
        );
    }
}
