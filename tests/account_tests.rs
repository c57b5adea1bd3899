// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

mod common;

use common::{USER, d, dec, open_account};
use fintrack::backend::{DataService, SqliteService};
use fintrack::models::{Account, AccountKind, DpsAmountType, DpsType, TransactionType};
use fintrack::store::{DpsSetup, FinanceStore, NewAccount, NewTransaction, SavingsTarget, TransferRequest};
use fintrack::Error;

#[test]
fn names_and_currencies_are_validated() {
    let svc = SqliteService::open_in_memory().unwrap();
    let mut store = FinanceStore::load(&svc, USER).unwrap();
    let acct = open_account(&mut store, "Checking", "usd", "0");
    assert_eq!(acct.currency, "USD");

    let dup = store.create_account(NewAccount::new(" checking ", AccountKind::Cash, "USD", dec("0")));
    assert!(matches!(dup, Err(Error::Validation { .. })));

    let bad_ccy = store.create_account(NewAccount::new("Wallet", AccountKind::Cash, "dollars", dec("0")));
    assert!(matches!(bad_ccy, Err(Error::Validation { .. })));

    let blank = store.create_account(NewAccount::new("  ", AccountKind::Cash, "USD", dec("0")));
    assert!(matches!(blank, Err(Error::Validation { .. })));
    assert_eq!(store.accounts().len(), 1);
}

#[test]
fn other_users_data_is_invisible() {
    let svc = SqliteService::open_in_memory().unwrap();
    let mut mine = FinanceStore::load(&svc, USER).unwrap();
    open_account(&mut mine, "Checking", "USD", "10");

    let mut theirs = FinanceStore::load(&svc, "user-2").unwrap();
    assert!(theirs.accounts().is_empty());
    open_account(&mut theirs, "Checking", "USD", "20");

    let mine = FinanceStore::load(&svc, USER).unwrap();
    assert_eq!(mine.accounts().len(), 1);
    assert_eq!(mine.accounts()[0].calculated_balance, dec("10"));
}

#[test]
fn deleting_an_account_takes_its_transactions() {
    let svc = SqliteService::open_in_memory().unwrap();
    let mut store = FinanceStore::load(&svc, USER).unwrap();
    let a = open_account(&mut store, "A", "USD", "0");
    let b = open_account(&mut store, "B", "USD", "0");
    for (acct, amount) in [(&a, "5"), (&a, "7"), (&b, "9")] {
        store
            .add_transaction(NewTransaction::new(&acct.id, TransactionType::Income, dec(amount), "Gift", d(2025, 1, 1)))
            .unwrap();
    }

    assert_eq!(store.delete_account(&a.id).unwrap(), 2);
    assert_eq!(store.transactions().len(), 1);
    assert!(matches!(store.account(&a.id), Err(Error::NotFound { .. })));

    let reloaded = FinanceStore::load(&svc, USER).unwrap();
    assert_eq!(reloaded.accounts().len(), 1);
    assert_eq!(reloaded.transactions().len(), 1);
}

#[test]
fn linked_savings_account_cannot_be_deleted() {
    let svc = SqliteService::open_in_memory().unwrap();
    let mut store = FinanceStore::load(&svc, USER).unwrap();
    let savings = open_account(&mut store, "Vault", "BDT", "0");
    let mut new = NewAccount::new("Salary", AccountKind::Checking, "BDT", dec("0"));
    new.dps = Some(DpsSetup {
        dps_type: DpsType::Monthly,
        amount_type: DpsAmountType::Custom,
        fixed_amount: None,
        savings: SavingsTarget::Existing(savings.id.clone()),
    });
    let main = store.create_account(new).unwrap();

    assert!(matches!(store.delete_account(&savings.id), Err(Error::AccountLinked { .. })));
    store.delete_account(&main.id).unwrap();
    store.delete_account(&savings.id).unwrap();
    assert!(store.accounts().is_empty());
}

#[test]
fn reconcile_repairs_drifted_balances() {
    let svc = SqliteService::open_in_memory().unwrap();
    let mut store = FinanceStore::load(&svc, USER).unwrap();
    let acct = open_account(&mut store, "Checking", "USD", "100");
    store
        .add_transaction(NewTransaction::new(&acct.id, TransactionType::Expense, dec("30"), "Travel", d(2025, 2, 1)))
        .unwrap();

    // Simulate a stale balance written by another client.
    let mut stale: Account = svc.get(&acct.id).unwrap();
    stale.calculated_balance = dec("999");
    svc.update(&stale).unwrap();

    let mut store = FinanceStore::load(&svc, USER).unwrap();
    let fixes = store.reconcile_balances().unwrap();
    assert_eq!(fixes.len(), 1);
    assert_eq!(fixes[0].stored, dec("999"));
    assert_eq!(fixes[0].ledger, dec("70"));
    assert!(store.reconcile_balances().unwrap().is_empty());
}

#[test]
fn deactivated_accounts_keep_their_ledger() {
    let svc = SqliteService::open_in_memory().unwrap();
    let mut store = FinanceStore::load(&svc, USER).unwrap();
    let a = open_account(&mut store, "A", "USD", "50");
    let b = open_account(&mut store, "B", "USD", "0");
    store
        .transfer(TransferRequest::new(&a.id, &b.id, dec("20"), d(2025, 3, 3)))
        .unwrap();

    let off = store.set_account_active(&b.id, false).unwrap();
    assert!(!off.is_active);
    assert_eq!(off.calculated_balance, dec("20"));
    assert_eq!(store.active_accounts().count(), 1);
}

#[test]
fn savings_summary_skips_transfer_legs() {
    let svc = SqliteService::open_in_memory().unwrap();
    let mut store = FinanceStore::load(&svc, USER).unwrap();
    let mut new = NewAccount::new("Salary", AccountKind::Checking, "USD", dec("0"));
    new.donation_preference = Some(dec("-10"));
    let acct = store.create_account(new).unwrap();
    let other = open_account(&mut store, "Other", "USD", "500");

    let mut pay = NewTransaction::new(&acct.id, TransactionType::Income, dec("1000"), "Salary", d(2025, 4, 1));
    pay.saving_amount = Some(dec("-20"));
    store.add_transaction(pay).unwrap();
    let mut bonus = NewTransaction::new(&acct.id, TransactionType::Income, dec("100"), "Gift", d(2025, 4, 2));
    bonus.saving_amount = Some(dec("150"));
    store.add_transaction(bonus).unwrap();
    store
        .transfer(TransferRequest::new(&other.id, &acct.id, dec("300"), d(2025, 4, 3)))
        .unwrap();

    let summary = store.savings_summary(&acct.id).unwrap();
    assert_eq!(summary.income_count, 2);
    assert_eq!(summary.total_income, dec("1100"));
    // 200 of the salary plus the whole bonus, clamped to its amount.
    assert_eq!(summary.saved, dec("300"));
    assert_eq!(summary.donated, dec("80"));
    assert_eq!(summary.remaining, dec("720"));
}
