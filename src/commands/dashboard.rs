// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use clap::ArgMatches;
use serde::Serialize;

use super::date_or_today;
use crate::backend::DataService;
use crate::dashboard::{self, CurrencyStats};
use crate::models::Transaction;
use crate::store::FinanceStore;
use crate::utils::{fmt_money, maybe_print_json, pretty_table};

#[derive(Serialize)]
struct Dashboard<'a> {
    currencies: Vec<CurrencyStats>,
    recent: Vec<&'a Transaction>,
}

pub fn handle<S: DataService>(store: &FinanceStore<'_, S>, m: &ArgMatches) -> Result<()> {
    let today = date_or_today(m, "date")?;
    let limit = m.get_one::<usize>("recent").copied().unwrap_or(5);
    let view = Dashboard {
        currencies: store.dashboard(today),
        recent: dashboard::recent_transactions(store.transactions(), limit),
    };
    if maybe_print_json(m.get_flag("json"), m.get_flag("jsonl"), &view)? {
        return Ok(());
    }

    if view.currencies.is_empty() {
        println!("No active accounts");
        return Ok(());
    }
    let rows = view
        .currencies
        .iter()
        .map(|c| {
            vec![
                c.currency.clone(),
                c.account_count.to_string(),
                fmt_money(&c.total_balance, &c.currency),
                fmt_money(&c.monthly_income, &c.currency),
                fmt_money(&c.monthly_expense, &c.currency),
                fmt_money(&c.monthly_net(), &c.currency),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(
            &["Currency", "Accounts", "Balance", "Income (month)", "Expense (month)", "Net"],
            rows
        )
    );

    if !view.recent.is_empty() {
        let rows = view
            .recent
            .iter()
            .map(|t| {
                let (name, ccy) = store
                    .account(&t.account_id)
                    .map(|a| (a.name.clone(), a.currency.clone()))
                    .unwrap_or_else(|_| (t.account_id.clone(), String::new()));
                vec![
                    t.date.to_string(),
                    name,
                    t.kind.to_string(),
                    fmt_money(&t.amount, &ccy),
                    t.category.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Date", "Account", "Type", "Amount", "Category"], rows)
        );
    }
    Ok(())
}
