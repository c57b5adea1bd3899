// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::ArgMatches;
use rust_decimal::Decimal;

use crate::utils::{parse_date, parse_decimal};

pub mod accounts;
pub mod categories;
pub mod dashboard;
pub mod dps;
pub mod exporter;
pub mod goals;
pub mod notify;
pub mod profile;
pub mod purchases;
pub mod transactions;
pub mod transfers;

pub(crate) fn required<'m>(m: &'m ArgMatches, id: &str) -> Result<&'m str> {
    m.get_one::<String>(id)
        .map(String::as_str)
        .with_context(|| format!("Missing argument '{}'", id))
}

pub(crate) fn optional<'m>(m: &'m ArgMatches, id: &str) -> Option<&'m str> {
    m.get_one::<String>(id).map(String::as_str)
}

pub(crate) fn decimal_arg(m: &ArgMatches, id: &str) -> Result<Option<Decimal>> {
    optional(m, id).map(parse_decimal).transpose()
}

pub(crate) fn date_arg(m: &ArgMatches, id: &str) -> Result<Option<NaiveDate>> {
    optional(m, id).map(parse_date).transpose()
}

pub(crate) fn date_or_today(m: &ArgMatches, id: &str) -> Result<NaiveDate> {
    Ok(date_arg(m, id)?.unwrap_or_else(|| Local::now().date_naive()))
}
