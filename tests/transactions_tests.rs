// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

mod common;

use common::{USER, d, dec, open_account};
use fintrack::backend::SqliteService;
use fintrack::models::TransactionType;
use fintrack::recurrence::{Frequency, Recurrence};
use fintrack::store::{FinanceStore, NewTransaction};
use fintrack::{Error, cli, commands::transactions};

#[test]
fn balances_follow_the_ledger() {
    let svc = SqliteService::open_in_memory().unwrap();
    let mut store = FinanceStore::load(&svc, USER).unwrap();
    let acct = open_account(&mut store, "Checking", "USD", "100");
    let other = open_account(&mut store, "Cash", "USD", "0");

    let income = store
        .add_transaction(NewTransaction::new(
            &acct.id,
            TransactionType::Income,
            dec("250.50"),
            "Salary",
            d(2025, 1, 5),
        ))
        .unwrap();
    let mut expense = store
        .add_transaction(NewTransaction::new(
            &acct.id,
            TransactionType::Expense,
            dec("40"),
            "Food & Dining",
            d(2025, 1, 6),
        ))
        .unwrap();
    assert_eq!(store.account(&acct.id).unwrap().calculated_balance, dec("310.50"));
    assert_eq!(store.transactions()[0].id, expense.id);

    // Moving the expense to another account re-derives both balances.
    expense.account_id = other.id.clone();
    store.update_transaction(expense).unwrap();
    assert_eq!(store.account(&acct.id).unwrap().calculated_balance, dec("350.50"));
    assert_eq!(store.account(&other.id).unwrap().calculated_balance, dec("-40"));

    store.delete_transaction(&income.id).unwrap();
    assert_eq!(store.account(&acct.id).unwrap().calculated_balance, dec("100"));

    let reloaded = FinanceStore::load(&svc, USER).unwrap();
    assert_eq!(reloaded.account(&acct.id).unwrap().calculated_balance, dec("100"));
    assert_eq!(reloaded.transactions().len(), 1);
}

#[test]
fn invalid_transactions_are_rejected() {
    let svc = SqliteService::open_in_memory().unwrap();
    let mut store = FinanceStore::load(&svc, USER).unwrap();
    let acct = open_account(&mut store, "Checking", "USD", "100");

    let negative = NewTransaction::new(&acct.id, TransactionType::Expense, dec("-5"), "Shopping", d(2025, 1, 1));
    assert!(matches!(store.add_transaction(negative), Err(Error::NonPositiveAmount(_))));

    let orphan = NewTransaction::new("missing", TransactionType::Expense, dec("5"), "Shopping", d(2025, 1, 1));
    assert!(matches!(store.add_transaction(orphan), Err(Error::NotFound { .. })));

    let mut bad_schedule = NewTransaction::new(&acct.id, TransactionType::Expense, dec("5"), "Shopping", d(2025, 3, 1));
    bad_schedule.recurrence = Some(Recurrence {
        frequency: Frequency::Monthly,
        interval: 1,
        end_date: Some(d(2025, 2, 1)),
    });
    assert!(matches!(store.add_transaction(bad_schedule), Err(Error::Validation { .. })));
    assert!(store.transactions().is_empty());
}

#[test]
fn upcoming_recurring_projects_schedules() {
    let svc = SqliteService::open_in_memory().unwrap();
    let mut store = FinanceStore::load(&svc, USER).unwrap();
    let acct = open_account(&mut store, "Checking", "USD", "0");

    let mut rent = NewTransaction::new(&acct.id, TransactionType::Expense, dec("900"), "Bills & Utilities", d(2025, 1, 31));
    rent.recurrence = Some(Recurrence::new(Frequency::Monthly));
    let rent = store.add_transaction(rent).unwrap();
    store
        .add_transaction(NewTransaction::new(&acct.id, TransactionType::Income, dec("50"), "Gift", d(2025, 1, 2)))
        .unwrap();

    let upcoming = store.upcoming_recurring(d(2025, 2, 1), d(2025, 4, 15));
    let dates: Vec<_> = upcoming.iter().map(|s| s.date).collect();
    assert_eq!(dates, vec![d(2025, 2, 28), d(2025, 3, 31)]);
    assert!(upcoming.iter().all(|s| s.source_id == rent.id));
}

#[test]
fn add_and_list_through_cli() {
    let svc = SqliteService::open_in_memory().unwrap();
    let mut store = FinanceStore::load(&svc, USER).unwrap();
    open_account(&mut store, "Checking", "USD", "0");

    for day in ["2025-01-01", "2025-01-02", "2025-01-03"] {
        let matches = cli::build_cli().get_matches_from([
            "fintrack", "tx", "add", "--account", "checking", "--type", "expense", "--amount", "10",
            "--category", "Shopping", "--date", day, "--tag", "cli",
        ]);
        let Some(("tx", tx_m)) = matches.subcommand() else {
            panic!("no tx subcommand");
        };
        transactions::handle(&mut store, tx_m).unwrap();
    }
    assert_eq!(store.transactions().len(), 3);
    assert_eq!(store.transactions()[0].date, d(2025, 1, 3));
    assert_eq!(store.transactions()[0].tags, vec!["cli".to_string()]);
    assert_eq!(store.accounts()[0].calculated_balance, dec("-30"));

    let matches = cli::build_cli().get_matches_from(["fintrack", "tx", "list", "--limit", "2", "--json"]);
    if let Some(("tx", tx_m)) = matches.subcommand() {
        transactions::handle(&mut store, tx_m).unwrap();
    } else {
        panic!("no tx subcommand");
    }
}

#[test]
fn ledger_overflow_is_rejected_before_writing() {
    let svc = SqliteService::open_in_memory().unwrap();
    let mut store = FinanceStore::load(&svc, USER).unwrap();
    let acct = open_account(&mut store, "Vault", "USD", "79228162514264337593543950000");

    let overflow = store.add_transaction(NewTransaction::new(
        &acct.id,
        TransactionType::Income,
        dec("10000000000000000000000"),
        "Salary",
        d(2025, 1, 5),
    ));
    assert!(matches!(overflow, Err(Error::Validation { .. })));
    assert!(store.transactions().is_empty());

    let expense = store
        .add_transaction(NewTransaction::new(
            &acct.id,
            TransactionType::Expense,
            dec("10000000000000000000000"),
            "Rent",
            d(2025, 1, 6),
        ))
        .unwrap();
    assert_eq!(
        store.account(&acct.id).unwrap().calculated_balance,
        dec("79228152514264337593543950000")
    );

    let reloaded = FinanceStore::load(&svc, USER).unwrap();
    assert_eq!(reloaded.transactions().len(), 1);
    assert_eq!(reloaded.transactions()[0].id, expense.id);
}
