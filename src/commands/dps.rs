// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use clap::ArgMatches;

use super::{date_or_today, decimal_arg, required};
use crate::backend::DataService;
use crate::models::{DpsTransfer, NotificationKind};
use crate::notifications::NotificationStore;
use crate::store::{DpsTransferRequest, FinanceStore};
use crate::utils::{fmt_money, maybe_print_json, pretty_table};

pub fn handle<S: DataService>(store: &mut FinanceStore<'_, S>, m: &ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("run", sub)) => run(store, sub)?,
        Some(("history", sub)) => history(store, sub)?,
        _ => {}
    }
    Ok(())
}

fn run<S: DataService>(store: &mut FinanceStore<'_, S>, sub: &ArgMatches) -> Result<()> {
    let account = store.account_by_name(required(sub, "account")?)?.clone();
    let receipt = store.dps_transfer(DpsTransferRequest {
        account_id: account.id.clone(),
        amount: decimal_arg(sub, "amount")?,
        date: date_or_today(sub, "date")?,
    })?;
    let to = store.account(&receipt.record.to_account_id)?.name.clone();
    let message = format!(
        "{} moved from {} to {}",
        fmt_money(&receipt.record.amount, &account.currency),
        account.name,
        to
    );
    println!("{}", message);

    let mut notes = NotificationStore::new(store.service(), store.user_id());
    if let Err(err) = notes.create("DPS transfer completed", &message, NotificationKind::Success) {
        tracing::warn!(error = %err, "could not record DPS notification");
    }
    Ok(())
}

fn history<S: DataService>(store: &FinanceStore<'_, S>, sub: &ArgMatches) -> Result<()> {
    let account = store.account_by_name(required(sub, "account")?)?;
    let data: Vec<&DpsTransfer> = store.dps_history(&account.id)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let rows = data
            .iter()
            .map(|d| {
                vec![
                    d.date.to_string(),
                    store
                        .account(&d.to_account_id)
                        .map(|a| a.name.clone())
                        .unwrap_or_else(|_| d.to_account_id.clone()),
                    fmt_money(&d.amount, &account.currency),
                    d.transfer_id.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Date", "To", "Amount", "Transfer id"], rows)
        );
    }
    Ok(())
}
