// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::{FinanceStore, TransferReceipt, TransferRequest};
use crate::backend::{DataService, Filter, Table};
use crate::error::{Compensation, Error, Result};
use crate::models::SavingsGoal;
use crate::tags;

#[derive(Debug, Clone, PartialEq)]
pub struct NewGoal {
    pub name: String,
    pub target_amount: Decimal,
    pub source_account_id: String,
    pub savings_account_id: String,
    pub target_date: Option<NaiveDate>,
}

impl<'a, S: DataService> FinanceStore<'a, S> {
    pub fn savings_goal(&self, id: &str) -> Result<&SavingsGoal> {
        self.savings_goals
            .iter()
            .find(|g| g.id == id)
            .ok_or_else(|| Error::not_found(Table::SavingsGoals, id))
    }

    fn check_goal(&self, goal: &SavingsGoal) -> Result<()> {
        if goal.name.trim().is_empty() {
            return Err(Error::validation("goal name", "must not be empty"));
        }
        if goal.target_amount <= Decimal::ZERO {
            return Err(Error::NonPositiveAmount(goal.target_amount));
        }
        if goal.current_amount < Decimal::ZERO {
            return Err(Error::validation("current amount", "must not be negative"));
        }
        if goal.source_account_id == goal.savings_account_id {
            return Err(Error::SameAccount);
        }
        self.account(&goal.source_account_id)?;
        self.account(&goal.savings_account_id)?;
        Ok(())
    }

    pub fn create_goal(&mut self, new: NewGoal) -> Result<SavingsGoal> {
        let goal = SavingsGoal {
            id: String::new(),
            user_id: self.user_id.clone(),
            name: new.name.trim().to_string(),
            target_amount: new.target_amount,
            current_amount: Decimal::ZERO,
            source_account_id: new.source_account_id,
            savings_account_id: new.savings_account_id,
            target_date: new.target_date,
        };
        self.check_goal(&goal)?;
        let stored = self.service.insert(&goal)?;
        tracing::info!(goal = %stored.name, target = %stored.target_amount, "created savings goal");
        self.savings_goals.push(stored.clone());
        Ok(stored)
    }

    pub fn update_goal(&mut self, mut goal: SavingsGoal) -> Result<SavingsGoal> {
        self.savings_goal(&goal.id)?;
        goal.user_id = self.user_id.clone();
        goal.name = goal.name.trim().to_string();
        self.check_goal(&goal)?;
        let stored = self.service.update(&goal)?;
        if let Some(slot) = self.savings_goals.iter_mut().find(|g| g.id == stored.id) {
            *slot = stored.clone();
        }
        Ok(stored)
    }

    /// Delete a goal. Transfers made while funding it stay on the ledger.
    pub fn delete_goal(&mut self, id: &str) -> Result<()> {
        self.savings_goal(id)?;
        self.service.delete(Table::SavingsGoals, &Filter::by_id(id))?;
        self.savings_goals.retain(|g| g.id != id);
        Ok(())
    }

    /// Transfer `amount` from the goal's source account to its savings
    /// account and credit it to the goal.
    ///
    /// When the goal cannot be updated the transfer is undone.
    pub fn fund_goal(
        &mut self,
        goal_id: &str,
        amount: Decimal,
        date: NaiveDate,
    ) -> Result<(SavingsGoal, TransferReceipt)> {
        let goal = self.savings_goal(goal_id)?.clone();
        let credited = goal
            .current_amount
            .checked_add(amount)
            .ok_or_else(|| Error::validation("amount", "goal total exceeds the supported range"))?;
        let mut req = TransferRequest::new(
            &goal.source_account_id,
            &goal.savings_account_id,
            amount,
            date,
        );
        req.note = Some(format!("Savings goal: {}", goal.name));
        let receipt = self.transfer(req)?;

        let mut funded = goal.clone();
        funded.current_amount = credited;
        let stored = match self.service.update(&funded) {
            Ok(stored) => stored,
            Err(err) => {
                let compensation = self.undo_transfer(&receipt.transfer_id);
                return Err(Error::PartialWrite {
                    operation: "fund savings goal",
                    compensation,
                    source: Box::new(err),
                });
            }
        };
        if let Some(slot) = self.savings_goals.iter_mut().find(|g| g.id == stored.id) {
            *slot = stored.clone();
        }
        tracing::info!(goal = %stored.name, %amount, progress = %stored.progress_percent(), "funded savings goal");
        Ok((stored, receipt))
    }

    /// Delete both legs of a completed transfer and re-derive balances.
    fn undo_transfer(&mut self, transfer_id: &str) -> Compensation {
        let correlation = tags::correlation_tag(transfer_id);
        let compensation = self.undo(
            Table::Transactions,
            &self.scope().contains("tags", correlation.as_str()),
        );
        if compensation == Compensation::Succeeded {
            let accounts: Vec<String> = self
                .transactions
                .iter()
                .filter(|t| t.tags.contains(&correlation))
                .map(|t| t.account_id.clone())
                .collect();
            self.transactions.retain(|t| !t.tags.contains(&correlation));
            for id in accounts {
                if let Err(err) = self.sync_balance(&id) {
                    tracing::error!(account = %id, error = %err, "could not re-derive balance");
                    return Compensation::Failed;
                }
            }
        }
        compensation
    }
}
