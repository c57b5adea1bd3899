// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::fmt;
use std::str::FromStr;

use chrono::{Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Frequency::Daily => "daily",
            Frequency::Weekly => "weekly",
            Frequency::Monthly => "monthly",
            Frequency::Yearly => "yearly",
        };
        f.write_str(s)
    }
}

impl FromStr for Frequency {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "daily" => Ok(Frequency::Daily),
            "weekly" => Ok(Frequency::Weekly),
            "monthly" => Ok(Frequency::Monthly),
            "yearly" => Ok(Frequency::Yearly),
            other => Err(Error::validation(
                "frequency",
                format!("'{}' is not one of: daily, weekly, monthly, yearly", other),
            )),
        }
    }
}

fn default_interval() -> u32 {
    1
}

/// Repeat schedule attached to a transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recurrence {
    pub frequency: Frequency,
    #[serde(default = "default_interval")]
    pub interval: u32,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
}

impl Recurrence {
    pub fn new(frequency: Frequency) -> Self {
        Recurrence {
            frequency,
            interval: 1,
            end_date: None,
        }
    }

    /// The date `steps` intervals after `start`.
    ///
    /// Month and year steps are taken from `start` rather than chained, so a
    /// schedule anchored on the 31st keeps landing on month end.
    fn nth(&self, start: NaiveDate, steps: u32) -> Option<NaiveDate> {
        let n = self.interval.max(1).checked_mul(steps)?;
        match self.frequency {
            Frequency::Daily => start.checked_add_days(Days::new(n as u64)),
            Frequency::Weekly => start.checked_add_days(Days::new(n as u64 * 7)),
            Frequency::Monthly => start.checked_add_months(Months::new(n)),
            Frequency::Yearly => start.checked_add_months(Months::new(n.checked_mul(12)?)),
        }
    }

    fn within_end(&self, date: NaiveDate) -> bool {
        self.end_date.is_none_or(|end| date <= end)
    }

    /// First occurrence strictly after `date` for a schedule anchored at `start`.
    pub fn next_after(&self, start: NaiveDate, date: NaiveDate) -> Option<NaiveDate> {
        let mut step = 1;
        loop {
            let next = self.nth(start, step)?;
            if !self.within_end(next) {
                return None;
            }
            if next > date {
                return Some(next);
            }
            step += 1;
        }
    }

    /// Occurrences after `start` that fall inside `[from, until]`.
    ///
    /// `start` itself is the transaction already recorded and is never
    /// returned.
    pub fn occurrences(&self, start: NaiveDate, from: NaiveDate, until: NaiveDate) -> Vec<NaiveDate> {
        let mut out = Vec::new();
        let mut step = 1;
        while let Some(next) = self.nth(start, step) {
            if next > until || !self.within_end(next) {
                break;
            }
            if next >= from {
                out.push(next);
            }
            step += 1;
        }
        out
    }
}
