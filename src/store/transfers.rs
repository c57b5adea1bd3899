// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Paired-leg moves between two of the user's accounts.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use super::FinanceStore;
use crate::backend::{DataService, Filter, Table};
use crate::error::{Compensation, Error, Result};
use crate::models::{Account, DpsAmountType, DpsTransfer, Transaction, TransactionType};
use crate::tags::{self, TransferKind};

const TRANSFER_CATEGORY: &str = "Transfer";
const DPS_CATEGORY: &str = "DPS";

#[derive(Debug, Clone, PartialEq)]
pub struct TransferRequest {
    pub from_account_id: String,
    pub to_account_id: String,
    /// Amount leaving the source account, in its currency.
    pub from_amount: Decimal,
    /// Destination units per source unit.
    pub exchange_rate: Decimal,
    pub date: NaiveDate,
    pub note: Option<String>,
}

impl TransferRequest {
    pub fn new(from: &str, to: &str, from_amount: Decimal, date: NaiveDate) -> Self {
        TransferRequest {
            from_account_id: from.to_string(),
            to_account_id: to.to_string(),
            from_amount,
            exchange_rate: Decimal::ONE,
            date,
            note: None,
        }
    }

    /// Amount credited to the destination, `from_amount * exchange_rate`.
    pub fn to_amount(&self) -> Result<Decimal> {
        self.from_amount
            .checked_mul(self.exchange_rate)
            .ok_or_else(|| {
                Error::validation("exchange rate", "converted amount exceeds the supported range")
            })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransferReceipt {
    pub transfer_id: String,
    pub expense: Transaction,
    pub income: Transaction,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DpsTransferRequest {
    pub account_id: String,
    /// Falls back to the configured fixed amount when absent.
    pub amount: Option<Decimal>,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DpsReceipt {
    pub transfer_id: String,
    pub expense: Transaction,
    pub income: Transaction,
    pub record: DpsTransfer,
}

struct Leg<'r> {
    account: &'r Account,
    kind: TransactionType,
    amount: Decimal,
    counterparty: &'r Account,
}

fn check_funds(account: &Account, requested: Decimal) -> Result<()> {
    if requested > account.calculated_balance {
        return Err(Error::InsufficientFunds {
            account: account.name.clone(),
            balance: account.calculated_balance,
            requested,
        });
    }
    Ok(())
}

impl<'a, S: DataService> FinanceStore<'a, S> {
    #[allow(clippy::too_many_arguments)]
    fn leg(
        &self,
        kind: TransferKind,
        transfer_id: &str,
        leg: Leg<'_>,
        converted_amount: Decimal,
        exchange_rate: Decimal,
        category: &str,
        description: &str,
        date: NaiveDate,
    ) -> Transaction {
        Transaction {
            id: String::new(),
            user_id: self.user_id.clone(),
            account_id: leg.account.id.clone(),
            kind: leg.kind,
            amount: leg.amount,
            category: category.to_string(),
            description: description.to_string(),
            date,
            tags: tags::leg_tags(
                kind,
                transfer_id,
                &leg.counterparty.id,
                converted_amount,
                exchange_rate,
            ),
            saving_amount: None,
            recurrence: None,
        }
    }

    /// Move money between two accounts as an expense/income pair.
    ///
    /// The destination receives `from_amount * exchange_rate`. If the income
    /// leg cannot be written the expense leg is deleted again and a
    /// [`Error::PartialWrite`] reports whether that worked.
    pub fn transfer(&mut self, req: TransferRequest) -> Result<TransferReceipt> {
        if req.from_account_id == req.to_account_id {
            return Err(Error::SameAccount);
        }
        if req.from_amount <= Decimal::ZERO {
            return Err(Error::NonPositiveAmount(req.from_amount));
        }
        if req.exchange_rate <= Decimal::ZERO {
            return Err(Error::InvalidExchangeRate(req.exchange_rate));
        }
        let from = self.account(&req.from_account_id)?;
        let to = self.account(&req.to_account_id)?;
        check_funds(from, req.from_amount)?;
        let to_amount = req.to_amount()?;
        self.projected_balance(&to.id, to_amount)?;

        let transfer_id = tags::new_transfer_id();
        let note = req.note.as_deref().map(str::trim).filter(|n| !n.is_empty());
        let out_desc = note.map_or_else(|| format!("Transfer to {}", to.name), str::to_string);
        let in_desc = note.map_or_else(|| format!("Transfer from {}", from.name), str::to_string);

        let expense = self.leg(
            TransferKind::Transfer,
            &transfer_id,
            Leg {
                account: from,
                kind: TransactionType::Expense,
                amount: req.from_amount,
                counterparty: to,
            },
            to_amount,
            req.exchange_rate,
            TRANSFER_CATEGORY,
            &out_desc,
            req.date,
        );
        let income = self.leg(
            TransferKind::Transfer,
            &transfer_id,
            Leg {
                account: to,
                kind: TransactionType::Income,
                amount: to_amount,
                counterparty: from,
            },
            req.from_amount,
            req.exchange_rate,
            TRANSFER_CATEGORY,
            &in_desc,
            req.date,
        );

        let expense = self.service.insert(&expense)?;
        let income = match self.service.insert(&income) {
            Ok(income) => income,
            Err(err) => {
                return Err(Error::PartialWrite {
                    operation: "transfer",
                    compensation: self.undo(Table::Transactions, &Filter::by_id(&expense.id)),
                    source: Box::new(err),
                });
            }
        };

        self.transactions.push(expense.clone());
        self.transactions.push(income.clone());
        self.sort_transactions();
        self.sync_balance(&req.from_account_id)?;
        self.sync_balance(&req.to_account_id)?;
        tracing::info!(
            %transfer_id,
            from = %req.from_account_id,
            to = %req.to_account_id,
            amount = %req.from_amount,
            rate = %req.exchange_rate,
            "transfer completed"
        );
        Ok(TransferReceipt {
            transfer_id,
            expense,
            income,
        })
    }

    /// Remove every row a failed DPS transfer may have written.
    fn undo_dps(&self, transfer_id: &str) -> Compensation {
        let correlation = tags::correlation_tag(transfer_id);
        let legs = self.undo(
            Table::Transactions,
            &self.scope().contains("tags", correlation.as_str()),
        );
        let history = self.undo(
            Table::DpsTransfers,
            &self.scope().eq("transfer_id", transfer_id),
        );
        match (legs, history) {
            (Compensation::Succeeded, Compensation::Succeeded) => Compensation::Succeeded,
            _ => Compensation::Failed,
        }
    }

    /// Move the DPS instalment of an account into its linked savings account.
    pub fn dps_transfer(&mut self, req: DpsTransferRequest) -> Result<DpsReceipt> {
        let from = self.account(&req.account_id)?;
        let dps = from
            .dps
            .as_ref()
            .ok_or_else(|| Error::DpsNotEnrolled(from.name.clone()))?;
        let savings_id = dps
            .savings_account_id
            .as_deref()
            .ok_or_else(|| Error::DpsMissingSavingsAccount(from.name.clone()))?;
        let to = self
            .account(savings_id)
            .map_err(|_| Error::DpsMissingSavingsAccount(from.name.clone()))?;
        if to.id == from.id {
            return Err(Error::SameAccount);
        }

        let amount = match (req.amount, dps.amount_type) {
            (Some(amount), _) => amount,
            (None, DpsAmountType::Fixed) => dps
                .fixed_amount
                .ok_or_else(|| Error::DpsAmountRequired(from.name.clone()))?,
            (None, DpsAmountType::Custom) => {
                return Err(Error::DpsAmountRequired(from.name.clone()));
            }
        };
        if amount <= Decimal::ZERO {
            return Err(Error::NonPositiveAmount(amount));
        }
        check_funds(from, amount)?;
        self.projected_balance(&to.id, amount)?;

        let transfer_id = tags::new_transfer_id();
        let expense = self.leg(
            TransferKind::Dps,
            &transfer_id,
            Leg {
                account: from,
                kind: TransactionType::Expense,
                amount,
                counterparty: to,
            },
            amount,
            Decimal::ONE,
            DPS_CATEGORY,
            &format!("DPS transfer to {}", to.name),
            req.date,
        );
        let income = self.leg(
            TransferKind::Dps,
            &transfer_id,
            Leg {
                account: to,
                kind: TransactionType::Income,
                amount,
                counterparty: from,
            },
            amount,
            Decimal::ONE,
            DPS_CATEGORY,
            &format!("DPS transfer from {}", from.name),
            req.date,
        );
        let record = DpsTransfer {
            id: String::new(),
            user_id: self.user_id.clone(),
            from_account_id: from.id.clone(),
            to_account_id: to.id.clone(),
            amount,
            date: req.date,
            transfer_id: transfer_id.clone(),
        };
        let to_id = to.id.clone();

        let expense = self.service.insert(&expense)?;
        let written = self
            .service
            .insert(&income)
            .and_then(|income| Ok((income, self.service.insert(&record)?)));
        let (income, record) = match written {
            Ok(rows) => rows,
            Err(err) => {
                tracing::debug!(expense = %expense.id, "DPS transfer failed after first leg");
                return Err(Error::PartialWrite {
                    operation: "DPS transfer",
                    compensation: self.undo_dps(&transfer_id),
                    source: Box::new(err),
                });
            }
        };

        self.transactions.push(expense.clone());
        self.transactions.push(income.clone());
        self.sort_transactions();
        self.dps_transfers.insert(0, record.clone());
        self.dps_transfers.sort_by(|a, b| b.date.cmp(&a.date));
        self.sync_balance(&req.account_id)?;
        self.sync_balance(&to_id)?;
        tracing::info!(%transfer_id, from = %req.account_id, to = %to_id, %amount, "DPS transfer completed");
        Ok(DpsReceipt {
            transfer_id,
            expense,
            income,
            record,
        })
    }

    /// DPS history rows leaving `account_id`, newest first.
    pub fn dps_history(&self, account_id: &str) -> Result<Vec<&DpsTransfer>> {
        self.account(account_id)?;
        Ok(self
            .dps_transfers
            .iter()
            .filter(|d| d.from_account_id == account_id)
            .collect())
    }
}
