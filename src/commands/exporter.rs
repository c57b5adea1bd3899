// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::path::Path;

use anyhow::{Context, Result};
use clap::ArgMatches;

use super::required;
use crate::backend::DataService;
use crate::export;
use crate::store::FinanceStore;

pub fn handle<S: DataService>(store: &FinanceStore<'_, S>, m: &ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("transactions", sub)) => export_transactions(store, sub),
        _ => Ok(()),
    }
}

fn export_transactions<S: DataService>(store: &FinanceStore<'_, S>, sub: &ArgMatches) -> Result<()> {
    let format = required(sub, "format")?;
    let out = required(sub, "out")?;
    let count = export::export_transactions(
        format,
        Path::new(out),
        store.accounts(),
        store.transactions(),
    )
    .with_context(|| format!("Export transactions to {}", out))?;
    println!("Exported {} transaction(s) to {}", count, out);
    Ok(())
}
