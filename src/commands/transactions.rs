// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use chrono::Days;
use clap::ArgMatches;
use serde::Serialize;

use super::{date_arg, date_or_today, decimal_arg, optional, required};
use crate::backend::DataService;
use crate::models::{Transaction, TransactionType};
use crate::recurrence::{Frequency, Recurrence};
use crate::store::{FinanceStore, NewTransaction};
use crate::utils::{maybe_print_json, parse_decimal, pretty_table};

pub fn handle<S: DataService>(store: &mut FinanceStore<'_, S>, m: &ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(store, sub)?,
        Some(("list", sub)) => list(store, sub)?,
        Some(("rm", sub)) => {
            let id = required(sub, "id")?;
            let removed = store.delete_transaction(id)?;
            println!("Removed {} transaction row(s)", removed);
        }
        Some(("upcoming", sub)) => upcoming(store, sub)?,
        _ => {}
    }
    Ok(())
}

fn add<S: DataService>(store: &mut FinanceStore<'_, S>, sub: &ArgMatches) -> Result<()> {
    let account = store.account_by_name(required(sub, "account")?)?;
    let account_name = account.name.clone();
    let kind: TransactionType = required(sub, "type")?.parse()?;
    let amount = parse_decimal(required(sub, "amount")?)?;
    let date = date_or_today(sub, "date")?;

    let mut new = NewTransaction::new(&account.id, kind, amount, required(sub, "category")?, date);
    new.description = optional(sub, "description").unwrap_or_default().to_string();
    new.tags = sub
        .get_many::<String>("tag")
        .map(|vals| vals.cloned().collect())
        .unwrap_or_default();
    new.saving_amount = decimal_arg(sub, "saving")?;
    if let Some(freq) = optional(sub, "repeat") {
        let mut r = Recurrence::new(freq.parse::<Frequency>()?);
        r.interval = sub.get_one::<u32>("every").copied().unwrap_or(1);
        r.end_date = date_arg(sub, "until")?;
        new.recurrence = Some(r);
    }

    let tx = store.add_transaction(new)?;
    println!(
        "Recorded {} {} on {} in '{}' ({})",
        tx.kind, tx.amount, tx.date, account_name, tx.id
    );
    Ok(())
}

#[derive(Serialize)]
struct TxRow<'a> {
    #[serde(flatten)]
    tx: &'a Transaction,
    account: &'a str,
    currency: &'a str,
}

fn list<S: DataService>(store: &FinanceStore<'_, S>, sub: &ArgMatches) -> Result<()> {
    let account_id = optional(sub, "account")
        .map(|name| store.account_by_name(name).map(|a| a.id.as_str()))
        .transpose()?;
    let limit = sub.get_one::<usize>("limit").copied();

    let mut data = Vec::new();
    for tx in store
        .transactions()
        .iter()
        .filter(|t| account_id.is_none_or(|id| t.account_id == id))
        .take(limit.unwrap_or(usize::MAX))
    {
        let acct = store.account(&tx.account_id)?;
        data.push(TxRow {
            tx,
            account: &acct.name,
            currency: &acct.currency,
        });
    }

    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let rows = data
            .iter()
            .map(|r| {
                vec![
                    r.tx.id.clone(),
                    r.tx.date.to_string(),
                    r.account.to_string(),
                    r.tx.kind.to_string(),
                    format!("{:.2}", r.tx.amount),
                    r.currency.to_string(),
                    r.tx.category.clone(),
                    r.tx.description.clone(),
                    r.tx.tags.join(", "),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &[
                    "Id", "Date", "Account", "Type", "Amount", "Currency", "Category", "Description",
                    "Tags"
                ],
                rows
            )
        );
    }
    Ok(())
}

fn upcoming<S: DataService>(store: &FinanceStore<'_, S>, sub: &ArgMatches) -> Result<()> {
    let from = date_or_today(sub, "from")?;
    let days = sub.get_one::<u64>("days").copied().unwrap_or(30);
    let until = from
        .checked_add_days(Days::new(days))
        .ok_or_else(|| anyhow::anyhow!("--days {} is out of range", days))?;
    let data = store.upcoming_recurring(from, until);
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let rows = data
            .iter()
            .map(|s| {
                vec![
                    s.date.to_string(),
                    store
                        .account(&s.account_id)
                        .map(|a| a.name.clone())
                        .unwrap_or_else(|_| s.account_id.clone()),
                    s.kind.to_string(),
                    format!("{:.2}", s.amount),
                    s.category.clone(),
                    s.description.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["Date", "Account", "Type", "Amount", "Category", "Description"],
                rows
            )
        );
    }
    Ok(())
}
