// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use rusqlite::Connection;

use crate::backend::Table;

static APP: Lazy<(&str, &str, &str)> =
    Lazy::new(|| ("com.alphavelocity", "Fintrack", "fintrack"));

pub fn db_path() -> Result<PathBuf> {
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific data dir")?;
    let data_dir = proj.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data dir")?;
    Ok(data_dir.join("fintrack.sqlite"))
}

pub fn open_or_init(path: &Path) -> Result<Connection> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Create data dir {}", parent.display()))?;
    }
    let conn = Connection::open(path).with_context(|| format!("Open DB at {}", path.display()))?;
    init_schema(&conn)?;
    Ok(conn)
}

/// Every table mirrors one remote table: the row is kept as a JSON document
/// keyed by its id, and filters run against `json_extract` of the body.
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    for table in Table::ALL {
        conn.execute_batch(&format!(
            r#"
    CREATE TABLE IF NOT EXISTS {t}(
        id TEXT PRIMARY KEY,
        body TEXT NOT NULL CHECK(json_valid(body)),
        created_at TEXT NOT NULL DEFAULT (datetime('now'))
    );
    CREATE INDEX IF NOT EXISTS idx_{t}_user ON {t}(json_extract(body, '$.user_id'));
    "#,
            t = table.as_str()
        ))?;
    }
    conn.execute_batch(
        r#"
    CREATE INDEX IF NOT EXISTS idx_transactions_account
        ON transactions(json_extract(body, '$.account_id'));
    CREATE INDEX IF NOT EXISTS idx_transactions_date
        ON transactions(json_extract(body, '$.date'));
    "#,
    )?;
    Ok(())
}
