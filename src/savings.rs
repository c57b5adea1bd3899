// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Saved / donated derivation for income.
//!
//! Both the per-transaction `saving_amount` and the per-account
//! `donation_preference` follow one sign convention: a negative value is a
//! percentage (its absolute value, capped at 100), a non-negative value is a
//! fixed amount.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::{Account, Transaction, TransactionType};
use crate::tags;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignedRule {
    Percent(Decimal),
    Fixed(Decimal),
}

impl SignedRule {
    pub fn from_signed(value: Decimal) -> Self {
        if value.is_sign_negative() && !value.is_zero() {
            SignedRule::Percent((-value).min(Decimal::ONE_HUNDRED))
        } else {
            SignedRule::Fixed(value)
        }
    }

    pub fn to_signed(self) -> Decimal {
        match self {
            SignedRule::Percent(p) => -p,
            SignedRule::Fixed(f) => f,
        }
    }

    /// Amount this rule takes out of `base`, before any clamping.
    ///
    /// A percentage never exceeds 100, so its result is bounded by `base`.
    pub fn apply(self, base: Decimal) -> Decimal {
        match self {
            SignedRule::Percent(p) => base * (p / Decimal::ONE_HUNDRED),
            SignedRule::Fixed(f) => f,
        }
    }
}

/// How one income amount divides into saved, donated and remaining money.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct IncomeSplit {
    pub income: Decimal,
    pub saved: Decimal,
    /// `income - saved`; the donation rule applies to this.
    pub donation_base: Decimal,
    pub donated: Decimal,
    pub remaining: Decimal,
}

/// Split one income amount.
///
/// Saved is kept within `[0, income]` and donated within
/// `[0, donation_base]`, so `remaining` is never negative.
pub fn split_income(
    income: Decimal,
    saving_amount: Option<Decimal>,
    donation_preference: Option<Decimal>,
) -> IncomeSplit {
    let income = income.max(Decimal::ZERO);
    let saved = saving_amount
        .map(|s| SignedRule::from_signed(s).apply(income))
        .unwrap_or(Decimal::ZERO)
        .clamp(Decimal::ZERO, income);
    let donation_base = income - saved;
    let donated = donation_preference
        .map(|d| SignedRule::from_signed(d).apply(donation_base))
        .unwrap_or(Decimal::ZERO)
        .clamp(Decimal::ZERO, donation_base);
    IncomeSplit {
        income,
        saved,
        donation_base,
        donated,
        remaining: donation_base - donated,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SavingsSummary {
    pub account_id: String,
    pub income_count: usize,
    pub total_income: Decimal,
    pub saved: Decimal,
    pub donated: Decimal,
    pub remaining: Decimal,
}

fn counts_as_income(account: &Account, tx: &Transaction) -> bool {
    tx.account_id == account.id && tx.kind == TransactionType::Income && !tags::is_transfer(&tx.tags)
}

/// Per-transaction splits for the account's income, transfers excluded.
pub fn breakdown<'a>(
    account: &Account,
    transactions: &'a [Transaction],
) -> Vec<(&'a Transaction, IncomeSplit)> {
    transactions
        .iter()
        .filter(|tx| counts_as_income(account, tx))
        .map(|tx| {
            (
                tx,
                split_income(tx.amount, tx.saving_amount, account.donation_preference),
            )
        })
        .collect()
}

/// Totals of [`breakdown`], as shown on the account card.
pub fn summarize(account: &Account, transactions: &[Transaction]) -> SavingsSummary {
    let mut summary = SavingsSummary {
        account_id: account.id.clone(),
        income_count: 0,
        total_income: Decimal::ZERO,
        saved: Decimal::ZERO,
        donated: Decimal::ZERO,
        remaining: Decimal::ZERO,
    };
    for (_, split) in breakdown(account, transactions) {
        summary.income_count += 1;
        summary.total_income = summary.total_income.saturating_add(split.income);
        summary.saved = summary.saved.saturating_add(split.saved);
        summary.donated = summary.donated.saturating_add(split.donated);
        summary.remaining = summary.remaining.saturating_add(split.remaining);
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn negative_saving_is_percentage() {
        let split = split_income(dec("2000"), Some(dec("-15")), None);
        assert_eq!(split.saved, dec("300"));
        assert_eq!(split.donation_base, dec("1700"));
        assert_eq!(split.remaining, dec("1700"));
    }

    #[test]
    fn fixed_saving_and_percentage_donation() {
        let split = split_income(dec("1000"), Some(dec("250")), Some(dec("-10")));
        assert_eq!(split.saved, dec("250"));
        assert_eq!(split.donated, dec("75"));
        assert_eq!(split.remaining, dec("675"));
    }

    #[test]
    fn fixed_donation_is_clamped_to_base() {
        let split = split_income(dec("100"), Some(dec("-50")), Some(dec("80")));
        assert_eq!(split.saved, dec("50"));
        assert_eq!(split.donated, dec("50"));
        assert_eq!(split.remaining, Decimal::ZERO);
    }

    #[test]
    fn saved_never_exceeds_income() {
        let split = split_income(dec("40"), Some(dec("100")), Some(dec("5")));
        assert_eq!(split.saved, dec("40"));
        assert_eq!(split.donated, Decimal::ZERO);
        let over = split_income(dec("40"), Some(dec("-250")), None);
        assert_eq!(over.saved, dec("40"));
    }

    #[test]
    fn fractional_preference_is_a_fixed_amount() {
        // 0.5 is half a currency unit, not fifty percent.
        let split = split_income(dec("10"), None, Some(dec("0.5")));
        assert_eq!(split.donated, dec("0.5"));
    }

    #[test]
    fn percentage_of_largest_income_stays_in_range() {
        let income = dec("10000000000000000000000000000");
        let split = split_income(income, Some(dec("-50")), Some(dec("-100")));
        assert_eq!(split.saved, dec("5000000000000000000000000000"));
        assert_eq!(split.donated, split.donation_base);
        assert_eq!(split.remaining, Decimal::ZERO);
    }

    #[test]
    fn signed_rule_round_trips() {
        assert_eq!(SignedRule::from_signed(dec("-12.5")), SignedRule::Percent(dec("12.5")));
        assert_eq!(SignedRule::from_signed(Decimal::ZERO), SignedRule::Fixed(Decimal::ZERO));
        assert_eq!(SignedRule::Percent(dec("7")).to_signed(), dec("-7"));
    }
}
