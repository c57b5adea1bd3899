// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Client-side finance store.
//!
//! [`FinanceStore`] caches every finance table of one user and is the only
//! place that writes to them. Mutations go to the data service first and are
//! mirrored into the cache once the service accepted them. Account balances
//! are derived from the ledger (`initial_balance` plus income minus expense)
//! and re-persisted after every mutation touching an account.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::backend::{DataService, Filter, Record, Table};
use crate::dashboard::{self, CurrencyStats};
use crate::error::{Compensation, Error, Result};
use crate::models::{
    Account, Category, DpsTransfer, Profile, Purchase, PurchaseCategory, SavingsGoal, Transaction,
    TransactionType,
};
use crate::purchases::{self, BudgetStatus, PurchaseAnalytics};
use crate::savings::{self, IncomeSplit, SavingsSummary};

mod accounts;
mod categories;
mod goals;
mod purchase_ops;
mod transactions;
mod transfers;

pub use accounts::{DpsSetup, NewAccount, SavingsTarget};
pub use categories::default_categories;
pub use goals::NewGoal;
pub use purchase_ops::NewPurchase;
pub use transactions::{NewTransaction, ScheduledTransaction};
pub use transfers::{DpsReceipt, DpsTransferRequest, TransferReceipt, TransferRequest};

/// Ledger correction made by [`FinanceStore::reconcile_balances`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BalanceCorrection {
    pub account_id: String,
    pub stored: Decimal,
    pub ledger: Decimal,
}

fn balance_out_of_range(account: &Account) -> Error {
    Error::validation(
        "balance",
        format!("ledger of '{}' exceeds the supported range", account.name),
    )
}

pub struct FinanceStore<'a, S: DataService> {
    service: &'a S,
    user_id: String,
    accounts: Vec<Account>,
    /// Newest first.
    transactions: Vec<Transaction>,
    categories: Vec<Category>,
    purchases: Vec<Purchase>,
    purchase_categories: Vec<PurchaseCategory>,
    savings_goals: Vec<SavingsGoal>,
    dps_transfers: Vec<DpsTransfer>,
}

impl<'a, S: DataService> FinanceStore<'a, S> {
    /// An empty store holding only the built-in categories.
    pub fn new(service: &'a S, user_id: impl Into<String>) -> Self {
        FinanceStore {
            service,
            user_id: user_id.into(),
            accounts: Vec::new(),
            transactions: Vec::new(),
            categories: default_categories(),
            purchases: Vec::new(),
            purchase_categories: Vec::new(),
            savings_goals: Vec::new(),
            dps_transfers: Vec::new(),
        }
    }

    pub fn load(service: &'a S, user_id: impl Into<String>) -> Result<Self> {
        let mut store = Self::new(service, user_id);
        store.refresh()?;
        Ok(store)
    }

    /// Re-fetch every cached table.
    pub fn refresh(&mut self) -> Result<()> {
        self.accounts = self.fetch()?;
        self.transactions = self.fetch()?;
        self.sort_transactions();
        let mut categories = default_categories();
        categories.extend(self.fetch::<Category>()?);
        self.categories = categories;
        self.purchases = self.fetch()?;
        self.purchase_categories = self.fetch()?;
        self.savings_goals = self.fetch()?;
        self.dps_transfers = self.fetch()?;
        self.dps_transfers.sort_by(|a, b| b.date.cmp(&a.date));
        tracing::debug!(
            user = %self.user_id,
            accounts = self.accounts.len(),
            transactions = self.transactions.len(),
            "finance store refreshed"
        );
        Ok(())
    }

    fn scope(&self) -> Filter {
        Filter::new().eq("user_id", self.user_id.as_str())
    }

    fn fetch<T: Record>(&self) -> Result<Vec<T>> {
        self.service.select(&self.scope())
    }

    /// Delete rows written earlier in a failed multi-step operation.
    fn undo(&self, table: Table, filter: &Filter) -> Compensation {
        match self.service.delete(table, filter) {
            Ok(count) => {
                tracing::warn!(%table, count, "rolled back partial write");
                Compensation::Succeeded
            }
            Err(err) => {
                tracing::error!(%table, error = %err, "could not roll back partial write");
                Compensation::Failed
            }
        }
    }

    pub fn service(&self) -> &'a S {
        self.service
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn accounts(&self) -> &[Account] {
        &self.accounts
    }

    pub fn active_accounts(&self) -> impl Iterator<Item = &Account> {
        self.accounts.iter().filter(|a| a.is_active)
    }

    pub fn account(&self, id: &str) -> Result<&Account> {
        self.accounts
            .iter()
            .find(|a| a.id == id)
            .ok_or_else(|| Error::not_found(Table::Accounts, id))
    }

    pub fn account_by_name(&self, name: &str) -> Result<&Account> {
        let name = name.trim();
        self.accounts
            .iter()
            .find(|a| a.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| Error::AccountNameNotFound(name.to_string()))
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn transactions_for<'s>(&'s self, account_id: &'s str) -> impl Iterator<Item = &'s Transaction> {
        self.transactions
            .iter()
            .filter(move |t| t.account_id == account_id)
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn categories_of(&self, kind: TransactionType) -> impl Iterator<Item = &Category> {
        self.categories.iter().filter(move |c| c.kind == kind)
    }

    pub fn purchases(&self) -> &[Purchase] {
        &self.purchases
    }

    pub fn purchase_categories(&self) -> &[PurchaseCategory] {
        &self.purchase_categories
    }

    pub fn savings_goals(&self) -> &[SavingsGoal] {
        &self.savings_goals
    }

    pub fn dps_transfers(&self) -> &[DpsTransfer] {
        &self.dps_transfers
    }

    fn sort_transactions(&mut self) {
        self.transactions.sort_by(|a, b| b.date.cmp(&a.date));
    }

    /// `initial_balance` plus income minus expense over the cached ledger.
    pub fn ledger_balance(&self, account_id: &str) -> Result<Decimal> {
        let account = self.account(account_id)?;
        self.transactions_for(account_id)
            .try_fold(account.initial_balance, |total, tx| {
                total.checked_add(tx.signed_amount())
            })
            .ok_or_else(|| balance_out_of_range(account))
    }

    /// Ledger balance of `account_id` once `delta` is booked on it.
    fn projected_balance(&self, account_id: &str, delta: Decimal) -> Result<Decimal> {
        let account = self.account(account_id)?;
        self.ledger_balance(account_id)?
            .checked_add(delta)
            .ok_or_else(|| balance_out_of_range(account))
    }

    /// Persist the ledger balance of one account if the stored value differs.
    fn sync_balance(&mut self, account_id: &str) -> Result<Decimal> {
        let balance = self.ledger_balance(account_id)?;
        let idx = self
            .accounts
            .iter()
            .position(|a| a.id == account_id)
            .ok_or_else(|| Error::not_found(Table::Accounts, account_id))?;
        if self.accounts[idx].calculated_balance != balance {
            let mut updated = self.accounts[idx].clone();
            updated.calculated_balance = balance;
            self.accounts[idx] = self.service.update(&updated)?;
        }
        Ok(balance)
    }

    /// Bring every stored balance back in line with the ledger.
    pub fn reconcile_balances(&mut self) -> Result<Vec<BalanceCorrection>> {
        let mut corrections = Vec::new();
        let ids: Vec<String> = self.accounts.iter().map(|a| a.id.clone()).collect();
        for id in ids {
            let stored = self.account(&id)?.calculated_balance;
            let ledger = self.sync_balance(&id)?;
            if stored != ledger {
                tracing::info!(account = %id, %stored, %ledger, "corrected balance");
                corrections.push(BalanceCorrection {
                    account_id: id,
                    stored,
                    ledger,
                });
            }
        }
        Ok(corrections)
    }

    pub fn dashboard(&self, today: NaiveDate) -> Vec<CurrencyStats> {
        dashboard::currency_stats(&self.accounts, &self.transactions, today)
    }

    pub fn savings_summary(&self, account_id: &str) -> Result<SavingsSummary> {
        let account = self.account(account_id)?;
        Ok(savings::summarize(account, &self.transactions))
    }

    pub fn savings_breakdown(&self, account_id: &str) -> Result<Vec<(&Transaction, IncomeSplit)>> {
        let account = self.account(account_id)?;
        Ok(savings::breakdown(account, &self.transactions))
    }

    pub fn purchase_analytics(&self, today: NaiveDate) -> PurchaseAnalytics {
        purchases::analytics(&self.purchases, &self.purchase_categories, today)
    }

    pub fn budget_status(&self, today: NaiveDate) -> Vec<BudgetStatus> {
        purchases::budget_status(&self.purchases, &self.purchase_categories, today)
    }

    pub fn profile(&self) -> Result<Option<Profile>> {
        match self.service.get::<Profile>(&self.user_id) {
            Ok(p) => Ok(Some(p)),
            Err(Error::NotFound { .. }) => Ok(None),
            Err(err) => Err(err),
        }
    }

    /// Create or replace the profile of the current user.
    pub fn save_profile(&self, full_name: Option<String>, default_currency: &str) -> Result<Profile> {
        let profile = Profile {
            id: self.user_id.clone(),
            full_name,
            default_currency: crate::models::parse_currency(default_currency)?,
        };
        match self.profile()? {
            Some(_) => self.service.update(&profile),
            None => self.service.insert(&profile),
        }
    }
}
