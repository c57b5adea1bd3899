// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rust_decimal::Decimal;

use super::FinanceStore;
use crate::backend::{DataService, Filter, Table};
use crate::error::{Error, Result};
use crate::models::{Account, AccountKind, DpsAmountType, DpsConfig, DpsType, parse_currency};

/// Where a new DPS account sends its savings.
#[derive(Debug, Clone, PartialEq)]
pub enum SavingsTarget {
    Existing(String),
    /// Create a savings account in the same currency alongside.
    Create {
        name: String,
        initial_balance: Decimal,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct DpsSetup {
    pub dps_type: DpsType,
    pub amount_type: DpsAmountType,
    pub fixed_amount: Option<Decimal>,
    pub savings: SavingsTarget,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewAccount {
    pub name: String,
    pub kind: AccountKind,
    pub currency: String,
    pub initial_balance: Decimal,
    pub donation_preference: Option<Decimal>,
    pub dps: Option<DpsSetup>,
}

impl NewAccount {
    pub fn new(name: &str, kind: AccountKind, currency: &str, initial_balance: Decimal) -> Self {
        NewAccount {
            name: name.to_string(),
            kind,
            currency: currency.to_string(),
            initial_balance,
            donation_preference: None,
            dps: None,
        }
    }
}

fn check_fixed_amount(amount_type: DpsAmountType, fixed_amount: Option<Decimal>) -> Result<()> {
    match (amount_type, fixed_amount) {
        (DpsAmountType::Fixed, None) => Err(Error::validation(
            "DPS fixed amount",
            "required when the amount type is fixed",
        )),
        (_, Some(a)) if a <= Decimal::ZERO => Err(Error::NonPositiveAmount(a)),
        _ => Ok(()),
    }
}

impl<'a, S: DataService> FinanceStore<'a, S> {
    fn check_account_name(&self, name: &str, except_id: Option<&str>) -> Result<String> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::validation("account name", "must not be empty"));
        }
        let taken = self
            .accounts
            .iter()
            .any(|a| Some(a.id.as_str()) != except_id && a.name.eq_ignore_ascii_case(name));
        if taken {
            return Err(Error::validation(
                "account name",
                format!("'{}' already exists", name),
            ));
        }
        Ok(name.to_string())
    }

    /// Create an account, plus its DPS savings account when asked to.
    ///
    /// The savings account is written first; if the main account then fails
    /// to save, the savings account is deleted again.
    pub fn create_account(&mut self, new: NewAccount) -> Result<Account> {
        let name = self.check_account_name(&new.name, None)?;
        let currency = parse_currency(&new.currency)?;

        let mut created_savings: Option<Account> = None;
        let dps = match new.dps {
            None => None,
            Some(setup) => {
                check_fixed_amount(setup.amount_type, setup.fixed_amount)?;
                let savings_id = match setup.savings {
                    SavingsTarget::Existing(id) => self.account(&id)?.id.clone(),
                    SavingsTarget::Create {
                        name: savings_name,
                        initial_balance,
                    } => {
                        let savings_name = self.check_account_name(&savings_name, None)?;
                        if savings_name.eq_ignore_ascii_case(&name) {
                            return Err(Error::validation(
                                "savings account name",
                                "must differ from the account name",
                            ));
                        }
                        let savings = self.service.insert(&Account {
                            id: String::new(),
                            user_id: self.user_id.clone(),
                            name: savings_name,
                            kind: AccountKind::Savings,
                            currency: currency.clone(),
                            initial_balance,
                            calculated_balance: initial_balance,
                            is_active: true,
                            dps: None,
                            donation_preference: None,
                        })?;
                        let id = savings.id.clone();
                        created_savings = Some(savings);
                        id
                    }
                };
                Some(DpsConfig {
                    dps_type: setup.dps_type,
                    amount_type: setup.amount_type,
                    fixed_amount: setup.fixed_amount,
                    savings_account_id: Some(savings_id),
                })
            }
        };

        let account = Account {
            id: String::new(),
            user_id: self.user_id.clone(),
            name,
            kind: new.kind,
            currency,
            initial_balance: new.initial_balance,
            calculated_balance: new.initial_balance,
            is_active: true,
            dps,
            donation_preference: new.donation_preference,
        };

        let stored = match self.service.insert(&account) {
            Ok(stored) => stored,
            Err(err) => {
                return match created_savings {
                    Some(savings) => Err(Error::PartialWrite {
                        operation: "create account",
                        compensation: self.undo(Table::Accounts, &Filter::by_id(&savings.id)),
                        source: Box::new(err),
                    }),
                    None => Err(err),
                };
            }
        };

        if let Some(savings) = created_savings {
            tracing::info!(account = %savings.name, "created DPS savings account");
            self.accounts.push(savings);
        }
        tracing::info!(account = %stored.name, kind = %stored.kind, currency = %stored.currency, "created account");
        self.accounts.push(stored.clone());
        Ok(stored)
    }

    /// Replace an account's editable fields. The balance is re-derived.
    pub fn update_account(&mut self, mut account: Account) -> Result<Account> {
        let idx = self
            .accounts
            .iter()
            .position(|a| a.id == account.id)
            .ok_or_else(|| Error::not_found(Table::Accounts, account.id.as_str()))?;
        account.name = self.check_account_name(&account.name, Some(&account.id))?;
        account.currency = parse_currency(&account.currency)?;
        account.user_id = self.user_id.clone();
        if let Some(dps) = &account.dps {
            check_fixed_amount(dps.amount_type, dps.fixed_amount)?;
            if let Some(target) = dps.savings_account_id.as_deref() {
                if target == account.id {
                    return Err(Error::validation(
                        "DPS savings account",
                        "an account cannot save into itself",
                    ));
                }
                self.account(target)?;
            }
        }

        self.accounts[idx] = self.service.update(&account)?;
        let id = account.id.clone();
        self.sync_balance(&id)?;
        tracing::info!(account = %account.name, "updated account");
        self.account(&id).cloned()
    }

    pub fn set_account_active(&mut self, id: &str, active: bool) -> Result<Account> {
        let mut account = self.account(id)?.clone();
        account.is_active = active;
        self.update_account(account)
    }

    /// Delete an account and its transactions, returning how many
    /// transactions went with it.
    ///
    /// Refused while another account's DPS configuration points at it. DPS
    /// history rows touching the account go as well. Transfer legs on other
    /// accounts stay, since that money did move; their `counterparty:` tag
    /// then names an account that no longer exists.
    pub fn delete_account(&mut self, id: &str) -> Result<usize> {
        let account = self.account(id)?.clone();
        if let Some(linked) = self
            .accounts
            .iter()
            .find(|a| a.id != id && a.dps_savings_account_id() == Some(id))
        {
            return Err(Error::AccountLinked {
                account: account.name,
                linked_from: linked.name.clone(),
            });
        }

        let removed = self
            .service
            .delete(Table::Transactions, &self.scope().eq("account_id", id))?;
        for column in ["from_account_id", "to_account_id"] {
            self.service
                .delete(Table::DpsTransfers, &self.scope().eq(column, id))?;
        }
        self.service.delete(Table::Accounts, &Filter::by_id(id))?;

        self.transactions.retain(|t| t.account_id != id);
        self.dps_transfers
            .retain(|d| d.from_account_id != id && d.to_account_id != id);
        self.accounts.retain(|a| a.id != id);
        tracing::info!(account = %account.name, transactions = removed, "deleted account");
        Ok(removed)
    }
}
