// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use clap::ArgMatches;

use super::{optional, required};
use crate::backend::DataService;
use crate::store::FinanceStore;
use crate::utils::maybe_print_json;

pub fn handle<S: DataService>(store: &FinanceStore<'_, S>, m: &ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("show", sub)) => {
            let profile = store.profile()?;
            if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &profile)? {
                return Ok(());
            }
            match profile {
                Some(p) => println!(
                    "{} ({}), default currency {}",
                    p.full_name.as_deref().unwrap_or("unnamed"),
                    p.id,
                    p.default_currency
                ),
                None => println!("No profile for user {}", store.user_id()),
            }
        }
        Some(("set", sub)) => {
            let p = store.save_profile(
                optional(sub, "name").map(str::to_string),
                required(sub, "currency")?,
            )?;
            println!("Saved profile for {} ({})", p.id, p.default_currency);
        }
        _ => {}
    }
    Ok(())
}
