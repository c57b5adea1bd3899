// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use clap::ArgMatches;
use serde::Serialize;

use super::{date_arg, date_or_today, required};
use crate::backend::DataService;
use crate::models::SavingsGoal;
use crate::store::{FinanceStore, NewGoal};
use crate::utils::{maybe_print_json, parse_decimal, pretty_table};

#[derive(Serialize)]
struct GoalRow<'a> {
    #[serde(flatten)]
    goal: &'a SavingsGoal,
    progress_percent: rust_decimal::Decimal,
}

pub fn handle<S: DataService>(store: &mut FinanceStore<'_, S>, m: &ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let from = store.account_by_name(required(sub, "from")?)?.id.clone();
            let to = store.account_by_name(required(sub, "to")?)?.id.clone();
            let goal = store.create_goal(NewGoal {
                name: required(sub, "name")?.to_string(),
                target_amount: parse_decimal(required(sub, "target")?)?,
                source_account_id: from,
                savings_account_id: to,
                target_date: date_arg(sub, "by")?,
            })?;
            println!("Added goal '{}' ({})", goal.name, goal.id);
        }
        Some(("list", sub)) => {
            let data: Vec<GoalRow> = store
                .savings_goals()
                .iter()
                .map(|g| GoalRow {
                    goal: g,
                    progress_percent: g.progress_percent(),
                })
                .collect();
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
                let rows = data
                    .iter()
                    .map(|r| {
                        let g = r.goal;
                        vec![
                            g.id.clone(),
                            g.name.clone(),
                            format!("{:.2}", g.current_amount),
                            format!("{:.2}", g.target_amount),
                            format!("{:.0}%", r.progress_percent),
                            g.target_date.map(|d| d.to_string()).unwrap_or_default(),
                        ]
                    })
                    .collect();
                println!(
                    "{}",
                    pretty_table(
                        &["Id", "Name", "Saved", "Target", "Progress", "By"],
                        rows
                    )
                );
            }
        }
        Some(("fund", sub)) => {
            let amount = parse_decimal(required(sub, "amount")?)?;
            let (goal, _) = store.fund_goal(required(sub, "id")?, amount, date_or_today(sub, "date")?)?;
            println!(
                "Goal '{}' at {:.2} of {:.2} ({:.0}%)",
                goal.name,
                goal.current_amount,
                goal.target_amount,
                goal.progress_percent()
            );
        }
        Some(("rm", sub)) => {
            let id = required(sub, "id")?;
            store.delete_goal(id)?;
            println!("Removed goal {}", id);
        }
        _ => {}
    }
    Ok(())
}
