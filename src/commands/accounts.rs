// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use clap::ArgMatches;
use rust_decimal::Decimal;
use serde::Serialize;

use super::{decimal_arg, optional, required};
use crate::backend::DataService;
use crate::models::{Account, AccountKind, DpsAmountType, DpsType};
use crate::store::{DpsSetup, FinanceStore, NewAccount, SavingsTarget};
use crate::utils::{fmt_money, maybe_print_json, parse_decimal, pretty_table};

pub fn handle<S: DataService>(store: &mut FinanceStore<'_, S>, m: &ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(store, sub)?,
        Some(("list", sub)) => list(store, sub)?,
        Some(("savings", sub)) => savings(store, sub)?,
        Some(("activate", sub)) => set_active(store, sub, true)?,
        Some(("deactivate", sub)) => set_active(store, sub, false)?,
        Some(("rm", sub)) => {
            let name = required(sub, "name")?;
            let id = store.account_by_name(name)?.id.clone();
            let removed = store.delete_account(&id)?;
            println!("Removed account '{}' and {} transaction(s)", name, removed);
        }
        Some(("reconcile", _)) => {
            let fixes = store.reconcile_balances()?;
            if fixes.is_empty() {
                println!("All balances match the ledger");
            }
            for f in fixes {
                let name = store.account(&f.account_id)?.name.clone();
                println!("{}: {} -> {}", name, f.stored, f.ledger);
            }
        }
        _ => {}
    }
    Ok(())
}

fn add<S: DataService>(store: &mut FinanceStore<'_, S>, sub: &ArgMatches) -> Result<()> {
    let name = required(sub, "name")?;
    let kind: AccountKind = required(sub, "type")?.parse()?;
    let currency = required(sub, "currency")?;
    let balance = parse_decimal(required(sub, "balance")?)?;

    let mut new = NewAccount::new(name, kind, currency, balance);
    new.donation_preference = decimal_arg(sub, "donation")?;

    if let Some(dps_type) = optional(sub, "dps") {
        let savings = match (optional(sub, "savings-account"), optional(sub, "new-savings")) {
            (Some(existing), _) => {
                SavingsTarget::Existing(store.account_by_name(existing)?.id.clone())
            }
            (None, Some(new_name)) => SavingsTarget::Create {
                name: new_name.to_string(),
                initial_balance: decimal_arg(sub, "savings-balance")?.unwrap_or(Decimal::ZERO),
            },
            (None, None) => anyhow::bail!("DPS needs --savings-account or --new-savings"),
        };
        new.dps = Some(DpsSetup {
            dps_type: dps_type.parse::<DpsType>()?,
            amount_type: optional(sub, "dps-amount-type")
                .map(str::parse::<DpsAmountType>)
                .transpose()?
                .unwrap_or(DpsAmountType::Fixed),
            fixed_amount: decimal_arg(sub, "dps-amount")?,
            savings,
        });
    }

    let acct = store
        .create_account(new)
        .with_context(|| format!("Create account '{}'", name))?;
    println!(
        "Added account '{}' ({}, {})",
        acct.name, acct.kind, acct.currency
    );
    if let Some(savings_id) = acct.dps_savings_account_id() {
        println!("DPS savings go to '{}'", store.account(savings_id)?.name);
    }
    Ok(())
}

#[derive(Serialize)]
struct AccountRow<'a> {
    #[serde(flatten)]
    account: &'a Account,
    savings_account: Option<&'a str>,
}

fn list<S: DataService>(store: &FinanceStore<'_, S>, sub: &ArgMatches) -> Result<()> {
    let all = sub.get_flag("all");
    let accounts: Vec<&Account> = store
        .accounts()
        .iter()
        .filter(|a| all || a.is_active)
        .collect();
    let data: Vec<AccountRow> = accounts
        .iter()
        .map(|a| AccountRow {
            account: a,
            savings_account: a
                .dps_savings_account_id()
                .and_then(|id| store.account(id).ok())
                .map(|s| s.name.as_str()),
        })
        .collect();
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        return Ok(());
    }
    let rows = data
        .iter()
        .map(|r| {
            let a = r.account;
            vec![
                a.name.clone(),
                a.kind.to_string(),
                a.currency.clone(),
                fmt_money(&a.calculated_balance, &a.currency),
                if a.is_active { "yes" } else { "no" }.to_string(),
                match &a.dps {
                    Some(d) => format!("{} -> {}", d.dps_type, r.savings_account.unwrap_or("?")),
                    None => String::new(),
                },
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["Name", "Type", "Currency", "Balance", "Active", "DPS"], rows)
    );
    Ok(())
}

fn savings<S: DataService>(store: &FinanceStore<'_, S>, sub: &ArgMatches) -> Result<()> {
    let acct = store.account_by_name(required(sub, "name")?)?;
    let summary = store.savings_summary(&acct.id)?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &summary)? {
        return Ok(());
    }
    let ccy = acct.currency.as_str();
    let mut rows: Vec<Vec<String>> = store
        .savings_breakdown(&acct.id)?
        .into_iter()
        .map(|(tx, split)| {
            vec![
                tx.date.to_string(),
                tx.category.clone(),
                fmt_money(&split.income, ccy),
                fmt_money(&split.saved, ccy),
                fmt_money(&split.donated, ccy),
                fmt_money(&split.remaining, ccy),
            ]
        })
        .collect();
    rows.push(vec![
        "Total".into(),
        format!("{} income(s)", summary.income_count),
        fmt_money(&summary.total_income, ccy),
        fmt_money(&summary.saved, ccy),
        fmt_money(&summary.donated, ccy),
        fmt_money(&summary.remaining, ccy),
    ]);
    println!(
        "{}",
        pretty_table(
            &["Date", "Category", "Income", "Saved", "Donated", "Remaining"],
            rows
        )
    );
    Ok(())
}

fn set_active<S: DataService>(
    store: &mut FinanceStore<'_, S>,
    sub: &ArgMatches,
    active: bool,
) -> Result<()> {
    let id = store.account_by_name(required(sub, "name")?)?.id.clone();
    let acct = store.set_account_active(&id, active)?;
    println!(
        "Account '{}' is now {}",
        acct.name,
        if active { "active" } else { "inactive" }
    );
    Ok(())
}
