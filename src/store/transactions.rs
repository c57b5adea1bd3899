// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use super::FinanceStore;
use crate::backend::{DataService, Filter, Table};
use crate::error::{Error, Result};
use crate::models::{Transaction, TransactionType};
use crate::recurrence::Recurrence;
use crate::tags;

#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    pub account_id: String,
    pub kind: TransactionType,
    pub amount: Decimal,
    pub category: String,
    pub description: String,
    pub date: NaiveDate,
    pub tags: Vec<String>,
    pub saving_amount: Option<Decimal>,
    pub recurrence: Option<Recurrence>,
}

impl NewTransaction {
    pub fn new(
        account_id: &str,
        kind: TransactionType,
        amount: Decimal,
        category: &str,
        date: NaiveDate,
    ) -> Self {
        NewTransaction {
            account_id: account_id.to_string(),
            kind,
            amount,
            category: category.to_string(),
            description: String::new(),
            date,
            tags: Vec::new(),
            saving_amount: None,
            recurrence: None,
        }
    }
}

/// A future occurrence of a recurring transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScheduledTransaction {
    pub source_id: String,
    pub date: NaiveDate,
    pub account_id: String,
    pub kind: TransactionType,
    pub amount: Decimal,
    pub category: String,
    pub description: String,
}

fn check_transaction(tx: &Transaction) -> Result<()> {
    if tx.amount <= Decimal::ZERO {
        return Err(Error::NonPositiveAmount(tx.amount));
    }
    if tx.category.trim().is_empty() {
        return Err(Error::validation("category", "must not be empty"));
    }
    if let Some(r) = &tx.recurrence {
        if r.interval == 0 {
            return Err(Error::validation("recurrence interval", "must be at least 1"));
        }
        if r.end_date.is_some_and(|end| end < tx.date) {
            return Err(Error::validation(
                "recurrence end date",
                "must not be before the transaction date",
            ));
        }
    }
    Ok(())
}

fn same_movement(a: &Transaction, b: &Transaction) -> bool {
    a.account_id == b.account_id
        && a.kind == b.kind
        && a.amount == b.amount
        && a.date == b.date
        && a.tags == b.tags
}

impl<'a, S: DataService> FinanceStore<'a, S> {
    pub fn transaction(&self, id: &str) -> Result<&Transaction> {
        self.transactions
            .iter()
            .find(|t| t.id == id)
            .ok_or_else(|| Error::not_found(Table::Transactions, id))
    }

    pub fn add_transaction(&mut self, new: NewTransaction) -> Result<Transaction> {
        self.account(&new.account_id)?;
        let tx = Transaction {
            id: String::new(),
            user_id: self.user_id.clone(),
            account_id: new.account_id,
            kind: new.kind,
            amount: new.amount,
            category: new.category.trim().to_string(),
            description: new.description.trim().to_string(),
            date: new.date,
            tags: new.tags,
            saving_amount: new.saving_amount,
            recurrence: new.recurrence,
        };
        check_transaction(&tx)?;
        self.projected_balance(&tx.account_id, tx.signed_amount())?;

        let stored = self.service.insert(&tx)?;
        self.transactions.push(stored.clone());
        self.sort_transactions();
        self.sync_balance(&stored.account_id)?;
        tracing::info!(
            id = %stored.id,
            kind = %stored.kind,
            amount = %stored.amount,
            "added transaction"
        );
        Ok(stored)
    }

    /// Replace a transaction. When it moves to another account both
    /// balances are re-derived.
    ///
    /// Transfer legs only accept changes to their text fields; moving money
    /// differently means deleting the transfer and making a new one.
    pub fn update_transaction(&mut self, mut tx: Transaction) -> Result<Transaction> {
        let old = self.transaction(&tx.id)?.clone();
        let old_account = old.account_id.clone();
        self.account(&tx.account_id)?;
        tx.user_id = self.user_id.clone();
        tx.category = tx.category.trim().to_string();
        check_transaction(&tx)?;
        if (tags::is_transfer(&old.tags) || tags::is_transfer(&tx.tags)) && !same_movement(&old, &tx) {
            return Err(Error::validation(
                "transfer leg",
                "account, type, amount, date and tags of a transfer are fixed",
            ));
        }
        let rest = self.projected_balance(&old_account, -old.signed_amount())?;
        if old_account == tx.account_id {
            rest.checked_add(tx.signed_amount())
                .ok_or_else(|| Error::validation("amount", "balance would exceed the supported range"))?;
        } else {
            self.projected_balance(&tx.account_id, tx.signed_amount())?;
        }

        let stored = self.service.update(&tx)?;
        if let Some(slot) = self.transactions.iter_mut().find(|t| t.id == stored.id) {
            *slot = stored.clone();
        }
        self.sort_transactions();
        self.sync_balance(&stored.account_id)?;
        if old_account != stored.account_id {
            self.sync_balance(&old_account)?;
        }
        tracing::info!(id = %stored.id, "updated transaction");
        Ok(stored)
    }

    /// Delete a transaction, returning how many rows were removed.
    ///
    /// Deleting either leg of a transfer removes both legs and, for DPS
    /// moves, the history row.
    pub fn delete_transaction(&mut self, id: &str) -> Result<usize> {
        let tx = self.transaction(id)?.clone();
        let removed = match tags::transfer_id(&tx.tags) {
            Some(transfer_id) => {
                let correlation = tags::correlation_tag(transfer_id);
                let removed = self.service.delete(
                    Table::Transactions,
                    &self.scope().contains("tags", correlation.as_str()),
                )?;
                self.service.delete(
                    Table::DpsTransfers,
                    &self.scope().eq("transfer_id", transfer_id),
                )?;
                self.dps_transfers.retain(|d| d.transfer_id != transfer_id);
                removed
            }
            None => self
                .service
                .delete(Table::Transactions, &Filter::by_id(id))?,
        };

        let affected: Vec<String> = match tags::transfer_id(&tx.tags) {
            Some(transfer_id) => {
                let correlation = tags::correlation_tag(transfer_id);
                let mut ids: Vec<String> = self
                    .transactions
                    .iter()
                    .filter(|t| t.tags.contains(&correlation))
                    .map(|t| t.account_id.clone())
                    .collect();
                ids.dedup();
                self.transactions.retain(|t| !t.tags.contains(&correlation));
                ids
            }
            None => {
                self.transactions.retain(|t| t.id != id);
                vec![tx.account_id.clone()]
            }
        };
        for account_id in affected {
            if self.account(&account_id).is_ok() {
                self.sync_balance(&account_id)?;
            }
        }
        tracing::info!(id, removed, "deleted transaction");
        Ok(removed)
    }

    /// Occurrences of recurring transactions that fall in `from..=until`,
    /// ordered by date.
    pub fn upcoming_recurring(&self, from: NaiveDate, until: NaiveDate) -> Vec<ScheduledTransaction> {
        let mut out: Vec<ScheduledTransaction> = self
            .transactions
            .iter()
            .filter_map(|t| t.recurrence.as_ref().map(|r| (t, r)))
            .flat_map(|(t, r)| {
                r.occurrences(t.date, from, until)
                    .into_iter()
                    .map(move |date| ScheduledTransaction {
                        source_id: t.id.clone(),
                        date,
                        account_id: t.account_id.clone(),
                        kind: t.kind,
                        amount: t.amount,
                        category: t.category.clone(),
                        description: t.description.clone(),
                    })
            })
            .collect();
        out.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.source_id.cmp(&b.source_id)));
        out
    }
}
