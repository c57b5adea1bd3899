// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use tracing_subscriber::EnvFilter;

use crate::config::LOG_FILTER;

const DEFAULT_FILTER: &str = "warn";

/// Install the stderr subscriber. The filter comes from `FINTRACK_LOG`,
/// falling back to `warn` when unset or unparsable.
pub fn init() {
    let filter = EnvFilter::try_from_env(LOG_FILTER).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    // A second call, as happens in tests, keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
