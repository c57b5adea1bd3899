// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use clap::ArgMatches;

use super::{date_or_today, optional, required};
use crate::backend::DataService;
use crate::models::NotificationKind;
use crate::notifications::NotificationStore;
use crate::store::{FinanceStore, TransferRequest};
use crate::utils::{fmt_money, parse_decimal};

pub fn handle<S: DataService>(store: &mut FinanceStore<'_, S>, m: &ArgMatches) -> Result<()> {
    let from = store.account_by_name(required(m, "from")?)?.clone();
    let to = store.account_by_name(required(m, "to")?)?.clone();
    let mut req = TransferRequest::new(
        &from.id,
        &to.id,
        parse_decimal(required(m, "amount")?)?,
        date_or_today(m, "date")?,
    );
    req.exchange_rate = parse_decimal(required(m, "rate")?)?;
    req.note = optional(m, "note").map(str::to_string);

    let receipt = store
        .transfer(req)
        .with_context(|| format!("Transfer from '{}' to '{}'", from.name, to.name))?;
    let message = format!(
        "{} from {} arrived as {} in {}",
        fmt_money(&receipt.expense.amount, &from.currency),
        from.name,
        fmt_money(&receipt.income.amount, &to.currency),
        to.name
    );
    println!("{}", message);

    let mut notes = NotificationStore::new(store.service(), store.user_id());
    if let Err(err) = notes.create("Transfer completed", &message, NotificationKind::Success) {
        tracing::warn!(error = %err, "could not record transfer notification");
    }
    Ok(())
}
