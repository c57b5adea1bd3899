// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::error::{Error, Result};
use crate::models::{Account, Transaction};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl FromStr for ExportFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            other => Err(Error::validation(
                "export format",
                format!("'{}' is not one of: csv, json", other),
            )),
        }
    }
}

/// One exported transaction, with the account resolved to its name.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportRow {
    pub date: String,
    pub account: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub amount: Decimal,
    pub currency: String,
    pub category: String,
    pub description: String,
    pub tags: Vec<String>,
    pub saving_amount: Option<Decimal>,
}

const HEADER: [&str; 9] = [
    "date",
    "account",
    "type",
    "amount",
    "currency",
    "category",
    "description",
    "tags",
    "saving_amount",
];

/// Rows in ledger order: oldest first, ties in input order.
pub fn rows(accounts: &[Account], transactions: &[Transaction]) -> Vec<ExportRow> {
    let by_id: HashMap<&str, &Account> = accounts.iter().map(|a| (a.id.as_str(), a)).collect();
    let mut sorted: Vec<&Transaction> = transactions.iter().collect();
    sorted.sort_by_key(|t| t.date);
    sorted
        .into_iter()
        .map(|t| {
            let account = by_id.get(t.account_id.as_str());
            ExportRow {
                date: t.date.format("%Y-%m-%d").to_string(),
                account: account.map_or_else(|| t.account_id.clone(), |a| a.name.clone()),
                kind: t.kind.to_string(),
                amount: t.amount,
                currency: account.map(|a| a.currency.clone()).unwrap_or_default(),
                category: t.category.clone(),
                description: t.description.clone(),
                tags: t.tags.clone(),
                saving_amount: t.saving_amount,
            }
        })
        .collect()
}

pub fn write_csv<W: Write>(writer: W, rows: &[ExportRow]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(HEADER)?;
    for r in rows {
        wtr.write_record([
            r.date.clone(),
            r.account.clone(),
            r.kind.clone(),
            r.amount.to_string(),
            r.currency.clone(),
            r.category.clone(),
            r.description.clone(),
            r.tags.join(";"),
            r.saving_amount.map(|s| s.to_string()).unwrap_or_default(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_json<W: Write>(mut writer: W, rows: &[ExportRow]) -> Result<()> {
    serde_json::to_writer_pretty(&mut writer, rows)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

/// Write the transactions to `path`, returning the number of rows.
///
/// The format is checked before the file is created, so an unknown format
/// leaves nothing behind.
pub fn export_transactions(
    format: &str,
    path: &Path,
    accounts: &[Account],
    transactions: &[Transaction],
) -> Result<usize> {
    let format: ExportFormat = format.parse()?;
    let rows = rows(accounts, transactions);
    let out = BufWriter::new(File::create(path)?);
    match format {
        ExportFormat::Csv => write_csv(out, &rows)?,
        ExportFormat::Json => write_json(out, &rows)?,
    }
    tracing::info!(path = %path.display(), rows = rows.len(), ?format, "exported transactions");
    Ok(rows.len())
}
