// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Environment-driven configuration.
//!
//! When `FINTRACK_SERVICE_URL` is set the hosted data service is used and
//! `FINTRACK_API_KEY` plus `FINTRACK_USER_ID` become mandatory. Otherwise the
//! local SQLite mirror at `FINTRACK_DB` (or the platform data dir) is used.

use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};

pub const SERVICE_URL: &str = "FINTRACK_SERVICE_URL";
pub const API_KEY: &str = "FINTRACK_API_KEY";
pub const ACCESS_TOKEN: &str = "FINTRACK_ACCESS_TOKEN";
pub const USER_ID: &str = "FINTRACK_USER_ID";
pub const DB_PATH: &str = "FINTRACK_DB";
pub const LOG_FILTER: &str = "FINTRACK_LOG";

const LOCAL_USER: &str = "local";

#[derive(Debug, Clone, PartialEq)]
pub struct RemoteConfig {
    pub url: String,
    pub api_key: String,
    pub access_token: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Backend {
    Remote(RemoteConfig),
    Local { db_path: PathBuf },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub user_id: String,
    pub backend: Backend,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from any key lookup; empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        if let Some(url) = get(SERVICE_URL) {
            let api_key = get(API_KEY)
                .with_context(|| format!("{} must be set when {} is set", API_KEY, SERVICE_URL))?;
            let user_id = get(USER_ID)
                .ok_or_else(|| anyhow!("{} must be set when {} is set", USER_ID, SERVICE_URL))?;
            return Ok(Config {
                user_id,
                backend: Backend::Remote(RemoteConfig {
                    url,
                    api_key,
                    access_token: get(ACCESS_TOKEN),
                }),
            });
        }

        let db_path = match get(DB_PATH) {
            Some(p) => PathBuf::from(p),
            None => crate::db::db_path()?,
        };
        Ok(Config {
            user_id: get(USER_ID).unwrap_or_else(|| LOCAL_USER.to_string()),
            backend: Backend::Local { db_path },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |k| map.get(k).cloned()
    }

    #[test]
    fn remote_requires_key_and_user() {
        let err = Config::from_lookup(lookup(&[(SERVICE_URL, "https://x.test")])).unwrap_err();
        assert!(err.to_string().contains(API_KEY));

        let cfg = Config::from_lookup(lookup(&[
            (SERVICE_URL, "https://x.test"),
            (API_KEY, "anon"),
            (USER_ID, "u-9"),
        ]))
        .unwrap();
        assert_eq!(cfg.user_id, "u-9");
        assert!(matches!(cfg.backend, Backend::Remote(ref r) if r.access_token.is_none()));
    }

    #[test]
    fn local_uses_explicit_db_path() {
        let cfg = Config::from_lookup(lookup(&[(DB_PATH, "/tmp/f.sqlite"), (SERVICE_URL, " ")]))
            .unwrap();
        assert_eq!(cfg.user_id, "local");
        assert_eq!(
            cfg.backend,
            Backend::Local {
                db_path: PathBuf::from("/tmp/f.sqlite")
            }
        );
    }
}
