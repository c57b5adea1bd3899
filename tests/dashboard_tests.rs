// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

mod common;

use chrono::NaiveDate;
use common::{USER, d, dec, open_account};
use fintrack::backend::SqliteService;
use fintrack::models::TransactionType;
use fintrack::store::{FinanceStore, NewTransaction, TransferRequest};
use fintrack::{cli, commands::dashboard};

fn add(
    store: &mut FinanceStore<'_, SqliteService>,
    account_id: &str,
    kind: TransactionType,
    amount: &str,
    date: NaiveDate,
) {
    store
        .add_transaction(NewTransaction::new(account_id, kind, dec(amount), "Other", date))
        .unwrap();
}

#[test]
fn buckets_per_currency_for_the_current_month() {
    let svc = SqliteService::open_in_memory().unwrap();
    let mut store = FinanceStore::load(&svc, USER).unwrap();
    let usd = open_account(&mut store, "Checking", "USD", "1000");
    let usd2 = open_account(&mut store, "Brokerage", "USD", "500");
    let bdt = open_account(&mut store, "Taka", "BDT", "20000");
    let closed = open_account(&mut store, "Old", "USD", "75");
    store.set_account_active(&closed.id, false).unwrap();

    add(&mut store, &usd.id, TransactionType::Income, "200", d(2025, 6, 3));
    add(&mut store, &usd2.id, TransactionType::Expense, "50", d(2025, 6, 20));
    add(&mut store, &usd.id, TransactionType::Expense, "999", d(2025, 5, 31));
    add(&mut store, &bdt.id, TransactionType::Expense, "1500", d(2025, 6, 1));
    store
        .transfer(TransferRequest::new(&usd.id, &usd2.id, dec("100"), d(2025, 6, 5)))
        .unwrap();

    let stats = store.dashboard(d(2025, 6, 15));
    let codes: Vec<&str> = stats.iter().map(|s| s.currency.as_str()).collect();
    assert_eq!(codes, vec!["BDT", "USD"]);

    let usd_stats = &stats[1];
    assert_eq!(usd_stats.account_count, 2);
    // 1000 + 200 - 999 - 100 and 500 - 50 + 100; the inactive account is left out.
    assert_eq!(usd_stats.total_balance, dec("651"));
    assert_eq!(usd_stats.monthly_income, dec("200"));
    assert_eq!(usd_stats.monthly_expense, dec("50"));
    assert_eq!(usd_stats.monthly_net(), dec("150"));

    assert_eq!(stats[0].total_balance, dec("18500"));
    assert_eq!(stats[0].monthly_expense, dec("1500"));
}

#[test]
fn dashboard_command_renders_json() {
    let svc = SqliteService::open_in_memory().unwrap();
    let mut store = FinanceStore::load(&svc, USER).unwrap();
    open_account(&mut store, "Checking", "USD", "10");
    let matches = cli::build_cli().get_matches_from(["fintrack", "dashboard", "--date", "2025-06-15", "--json"]);
    if let Some(("dashboard", sub)) = matches.subcommand() {
        dashboard::handle(&store, sub).unwrap();
    } else {
        panic!("no dashboard subcommand");
    }
}
