// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use clap::ArgMatches;

use super::{optional, required};
use crate::backend::DataService;
use crate::models::{Category, TransactionType};
use crate::store::FinanceStore;
use crate::utils::{maybe_print_json, pretty_table};

pub fn handle<S: DataService>(store: &mut FinanceStore<'_, S>, m: &ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let kind: TransactionType = required(sub, "type")?.parse()?;
            let cat = store.add_category(
                required(sub, "name")?,
                kind,
                required(sub, "color")?,
                required(sub, "icon")?,
            )?;
            println!("Added {} category '{}' ({})", cat.kind, cat.name, cat.id);
        }
        Some(("list", sub)) => {
            let kind = optional(sub, "type")
                .map(str::parse::<TransactionType>)
                .transpose()?;
            let data: Vec<&Category> = store
                .categories()
                .iter()
                .filter(|c| kind.is_none_or(|k| c.kind == k))
                .collect();
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
                let rows = data
                    .iter()
                    .map(|c| {
                        vec![
                            c.id.clone(),
                            c.name.clone(),
                            c.kind.to_string(),
                            c.color.clone(),
                            c.icon.clone(),
                        ]
                    })
                    .collect();
                println!(
                    "{}",
                    pretty_table(&["Id", "Name", "Type", "Color", "Icon"], rows)
                );
            }
        }
        Some(("rm", sub)) => {
            let id = required(sub, "id")?;
            store.delete_category(id)?;
            println!("Removed category {}", id);
        }
        _ => {}
    }
    Ok(())
}
