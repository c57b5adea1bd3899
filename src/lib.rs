// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod backend;
pub mod cli;
pub mod commands;
pub mod config;
pub mod dashboard;
pub mod db;
pub mod error;
pub mod export;
pub mod logging;
pub mod models;
pub mod notifications;
pub mod purchases;
pub mod recurrence;
pub mod savings;
pub mod store;
pub mod tags;
pub mod utils;

pub use error::{Error, Result};
