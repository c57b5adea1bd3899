// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

mod common;

use common::{FlakyService, USER, d, dec, open_account};
use fintrack::backend::{DataService, Filter, SqliteService, Table};
use fintrack::error::Compensation;
use fintrack::models::{
    AccountKind, DpsAmountType, DpsTransfer, DpsType, Transaction,
};
use fintrack::store::{DpsSetup, DpsTransferRequest, FinanceStore, NewAccount, SavingsTarget};
use fintrack::{Error, tags};
use rust_decimal::Decimal;

fn dps_account<S: DataService>(
    store: &mut FinanceStore<'_, S>,
    amount_type: DpsAmountType,
    fixed: Option<Decimal>,
) -> (String, String) {
    let mut new = NewAccount::new("Salary", AccountKind::Checking, "BDT", dec("10000"));
    new.dps = Some(DpsSetup {
        dps_type: DpsType::Monthly,
        amount_type,
        fixed_amount: fixed,
        savings: SavingsTarget::Create {
            name: "Salary DPS".into(),
            initial_balance: Decimal::ZERO,
        },
    });
    let acct = store.create_account(new).unwrap();
    let savings = acct.dps_savings_account_id().unwrap().to_string();
    (acct.id, savings)
}

#[test]
fn account_creation_links_a_new_savings_account() {
    let svc = SqliteService::open_in_memory().unwrap();
    let mut store = FinanceStore::load(&svc, USER).unwrap();
    let (main, savings) = dps_account(&mut store, DpsAmountType::Fixed, Some(dec("1500")));

    let savings_acct = store.account(&savings).unwrap();
    assert_eq!(savings_acct.kind, AccountKind::Savings);
    assert_eq!(savings_acct.currency, "BDT");
    assert_eq!(store.accounts().len(), 2);

    let reloaded = FinanceStore::load(&svc, USER).unwrap();
    assert_eq!(
        reloaded.account(&main).unwrap().dps_savings_account_id(),
        Some(savings.as_str())
    );
}

#[test]
fn fixed_dps_transfer_uses_configured_amount() {
    let svc = SqliteService::open_in_memory().unwrap();
    let mut store = FinanceStore::load(&svc, USER).unwrap();
    let (main, savings) = dps_account(&mut store, DpsAmountType::Fixed, Some(dec("1500")));

    let receipt = store
        .dps_transfer(DpsTransferRequest {
            account_id: main.clone(),
            amount: None,
            date: d(2025, 5, 1),
        })
        .unwrap();

    assert_eq!(receipt.record.amount, dec("1500"));
    assert_eq!(receipt.record.transfer_id, receipt.transfer_id);
    assert!(receipt.expense.tags.contains(&tags::DPS.to_string()));
    assert!(receipt.income.tags.contains(&tags::DPS.to_string()));
    assert_eq!(store.account(&main).unwrap().calculated_balance, dec("8500"));
    assert_eq!(store.account(&savings).unwrap().calculated_balance, dec("1500"));

    let history = store.dps_history(&main).unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].to_account_id, savings);

    let stored: Vec<DpsTransfer> = svc.select(&Filter::new().eq("user_id", USER)).unwrap();
    assert_eq!(stored.len(), 1);
}

#[test]
fn dps_validation() {
    let svc = SqliteService::open_in_memory().unwrap();
    let mut store = FinanceStore::load(&svc, USER).unwrap();
    let (custom, _) = dps_account(&mut store, DpsAmountType::Custom, None);
    let plain = open_account(&mut store, "Wallet", "BDT", "100");

    let missing_amount = store.dps_transfer(DpsTransferRequest {
        account_id: custom.clone(),
        amount: None,
        date: d(2025, 5, 1),
    });
    assert!(matches!(missing_amount, Err(Error::DpsAmountRequired(_))));

    let not_enrolled = store.dps_transfer(DpsTransferRequest {
        account_id: plain.id.clone(),
        amount: Some(dec("10")),
        date: d(2025, 5, 1),
    });
    assert!(matches!(not_enrolled, Err(Error::DpsNotEnrolled(_))));

    let too_much = store.dps_transfer(DpsTransferRequest {
        account_id: custom.clone(),
        amount: Some(dec("10000.01")),
        date: d(2025, 5, 1),
    });
    assert!(matches!(too_much, Err(Error::InsufficientFunds { .. })));

    store
        .dps_transfer(DpsTransferRequest {
            account_id: custom,
            amount: Some(dec("250")),
            date: d(2025, 5, 1),
        })
        .unwrap();
}

#[test]
fn fixed_amount_type_requires_an_amount() {
    let svc = SqliteService::open_in_memory().unwrap();
    let mut store = FinanceStore::load(&svc, USER).unwrap();
    let mut new = NewAccount::new("Salary", AccountKind::Checking, "BDT", dec("100"));
    new.dps = Some(DpsSetup {
        dps_type: DpsType::Flexible,
        amount_type: DpsAmountType::Fixed,
        fixed_amount: None,
        savings: SavingsTarget::Create {
            name: "Salary DPS".into(),
            initial_balance: Decimal::ZERO,
        },
    });
    assert!(matches!(store.create_account(new), Err(Error::Validation { .. })));
    // Nothing was written, not even the savings account.
    assert!(store.accounts().is_empty());
    assert!(FinanceStore::load(&svc, USER).unwrap().accounts().is_empty());
}

#[test]
fn failed_history_write_rolls_back_both_legs() {
    let svc = FlakyService::new();
    let mut store = FinanceStore::load(&svc, USER).unwrap();
    let (main, _) = dps_account(&mut store, DpsAmountType::Fixed, Some(dec("500")));

    svc.fail_insert_after(Table::DpsTransfers, 0);
    let err = store
        .dps_transfer(DpsTransferRequest {
            account_id: main.clone(),
            amount: None,
            date: d(2025, 6, 1),
        })
        .unwrap_err();
    assert!(matches!(
        err,
        Error::PartialWrite {
            compensation: Compensation::Succeeded,
            ..
        }
    ));

    let legs: Vec<Transaction> = svc.select(&Filter::new().eq("user_id", USER)).unwrap();
    assert!(legs.is_empty());
    assert!(store.dps_history(&main).unwrap().is_empty());
    assert_eq!(store.account(&main).unwrap().calculated_balance, dec("10000"));
}

#[test]
fn savings_account_creation_is_undone_when_main_account_fails() {
    let svc = FlakyService::new();
    let mut store = FinanceStore::load(&svc, USER).unwrap();
    svc.fail_insert_after(Table::Accounts, 1);

    let mut new = NewAccount::new("Salary", AccountKind::Checking, "BDT", dec("100"));
    new.dps = Some(DpsSetup {
        dps_type: DpsType::Monthly,
        amount_type: DpsAmountType::Custom,
        fixed_amount: None,
        savings: SavingsTarget::Create {
            name: "Salary DPS".into(),
            initial_balance: Decimal::ZERO,
        },
    });
    let err = store.create_account(new).unwrap_err();
    assert!(matches!(err, Error::PartialWrite { .. }));
    assert!(store.accounts().is_empty());
    assert!(FinanceStore::load(&svc, USER).unwrap().accounts().is_empty());
}

#[test]
fn deleting_the_main_account_drops_its_dps_history() {
    let svc = SqliteService::open_in_memory().unwrap();
    let mut store = FinanceStore::load(&svc, USER).unwrap();
    let (main, savings) = dps_account(&mut store, DpsAmountType::Fixed, Some(dec("1500")));
    store
        .dps_transfer(DpsTransferRequest {
            account_id: main.clone(),
            amount: None,
            date: d(2025, 5, 1),
        })
        .unwrap();

    assert_eq!(store.delete_account(&main).unwrap(), 1);
    assert!(store.dps_transfers().is_empty());
    let stored: Vec<DpsTransfer> = svc.select(&Filter::new().eq("user_id", USER)).unwrap();
    assert!(stored.is_empty());

    // The savings side keeps the money that arrived.
    let reloaded = FinanceStore::load(&svc, USER).unwrap();
    assert_eq!(reloaded.account(&savings).unwrap().calculated_balance, dec("1500"));
    assert_eq!(reloaded.transactions().len(), 1);
    assert_eq!(reloaded.transactions()[0].account_id, savings);
}
