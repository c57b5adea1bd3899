// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use clap::ArgMatches;

use super::{date_or_today, optional, required};
use crate::backend::DataService;
use crate::models::{Priority, Purchase, PurchaseStatus};
use crate::purchases::UNCATEGORIZED;
use crate::store::{FinanceStore, NewPurchase};
use crate::utils::{maybe_print_json, parse_decimal, pretty_table};

pub fn handle<S: DataService>(store: &mut FinanceStore<'_, S>, m: &ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(store, sub)?,
        Some(("list", sub)) => list(store, sub)?,
        Some(("status", sub)) => {
            let status: PurchaseStatus = required(sub, "status")?.parse()?;
            let p = store.set_purchase_status(required(sub, "id")?, status)?;
            println!("'{}' is now {}", p.item_name, p.status);
        }
        Some(("rm", sub)) => {
            let id = required(sub, "id")?;
            store.delete_purchase(id)?;
            println!("Removed purchase {}", id);
        }
        Some(("analytics", sub)) => analytics(store, sub)?,
        Some(("budget", sub)) => budget(store, sub)?,
        Some(("category", sub)) => category(store, sub)?,
        _ => {}
    }
    Ok(())
}

fn category_id_by_name<S: DataService>(store: &FinanceStore<'_, S>, name: &str) -> Result<String> {
    store
        .purchase_categories()
        .iter()
        .find(|c| c.name.eq_ignore_ascii_case(name.trim()))
        .map(|c| c.id.clone())
        .with_context(|| format!("Purchase category '{}' not found", name))
}

fn add<S: DataService>(store: &mut FinanceStore<'_, S>, sub: &ArgMatches) -> Result<()> {
    let mut new = NewPurchase::new(
        required(sub, "item")?,
        parse_decimal(required(sub, "price")?)?,
        date_or_today(sub, "date")?,
    );
    new.category_id = match optional(sub, "category") {
        Some(name) => Some(category_id_by_name(store, name)?),
        None => None,
    };
    new.status = required(sub, "status")?.parse::<PurchaseStatus>()?;
    new.priority = required(sub, "priority")?.parse::<Priority>()?;
    new.notes = optional(sub, "notes").map(str::to_string);
    let p = store.add_purchase(new)?;
    println!("Added purchase '{}' ({}, {})", p.item_name, p.status, p.id);
    Ok(())
}

fn list<S: DataService>(store: &FinanceStore<'_, S>, sub: &ArgMatches) -> Result<()> {
    let status = optional(sub, "status")
        .map(str::parse::<PurchaseStatus>)
        .transpose()?;
    let data: Vec<&Purchase> = store
        .purchases()
        .iter()
        .filter(|p| status.is_none_or(|s| p.status == s))
        .collect();
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let rows = data
            .iter()
            .map(|p| {
                let category = p
                    .category_id
                    .as_deref()
                    .and_then(|id| store.purchase_category(id).ok())
                    .map_or(UNCATEGORIZED, |c| c.name.as_str());
                vec![
                    p.id.clone(),
                    p.purchase_date.to_string(),
                    p.item_name.clone(),
                    format!("{:.2}", p.price),
                    category.to_string(),
                    p.status.to_string(),
                    p.priority.to_string(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["Id", "Date", "Item", "Price", "Category", "Status", "Priority"],
                rows
            )
        );
    }
    Ok(())
}

fn analytics<S: DataService>(store: &FinanceStore<'_, S>, sub: &ArgMatches) -> Result<()> {
    let stats = store.purchase_analytics(date_or_today(sub, "date")?);
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &stats)? {
        return Ok(());
    }
    println!(
        "Spent {:.2} in total, {:.2} this month ({} purchased, {} planned, {} cancelled)",
        stats.total_spent,
        stats.monthly_spent,
        stats.purchased_count,
        stats.planned_count,
        stats.cancelled_count
    );
    let rows = stats
        .category_breakdown
        .iter()
        .map(|c| {
            vec![
                c.category.clone(),
                format!("{:.2}", c.amount),
                c.count.to_string(),
                format!("{:.1}%", c.percentage),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["Category", "Spent", "Items", "Share"], rows)
    );
    Ok(())
}

fn budget<S: DataService>(store: &FinanceStore<'_, S>, sub: &ArgMatches) -> Result<()> {
    let data = store.budget_status(date_or_today(sub, "date")?);
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let rows = data
            .iter()
            .map(|b| {
                vec![
                    b.category.clone(),
                    format!("{:.2}", b.budget),
                    format!("{:.2}", b.spent),
                    format!("{:.2}", b.remaining),
                    if b.over_budget { "OVER" } else { "ok" }.to_string(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Category", "Budget", "Spent", "Remaining", "Status"], rows)
        );
    }
    Ok(())
}

fn category<S: DataService>(store: &mut FinanceStore<'_, S>, m: &ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let c = store.add_purchase_category(
                required(sub, "name")?,
                required(sub, "color")?,
                parse_decimal(required(sub, "budget")?)?,
            )?;
            println!("Added purchase category '{}' (budget {:.2})", c.name, c.monthly_budget);
        }
        Some(("list", sub)) => {
            let data = store.purchase_categories();
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
                let rows = data
                    .iter()
                    .map(|c| {
                        vec![
                            c.name.clone(),
                            c.color.clone(),
                            format!("{:.2}", c.monthly_budget),
                        ]
                    })
                    .collect();
                println!("{}", pretty_table(&["Name", "Color", "Monthly budget"], rows));
            }
        }
        Some(("rm", sub)) => {
            let name = required(sub, "name")?;
            let id = category_id_by_name(store, name)?;
            store.delete_purchase_category(&id)?;
            println!("Removed purchase category '{}'", name);
        }
        _ => {}
    }
    Ok(())
}
