// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::HashMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::{Purchase, PurchaseCategory, PurchaseStatus};
use crate::utils::same_month;

pub const UNCATEGORIZED: &str = "Uncategorized";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategorySpend {
    pub category: String,
    pub amount: Decimal,
    pub count: usize,
    /// Share of `total_spent`, in percent.
    pub percentage: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PurchaseAnalytics {
    pub total_spent: Decimal,
    pub monthly_spent: Decimal,
    pub planned_count: usize,
    pub purchased_count: usize,
    pub cancelled_count: usize,
    pub category_breakdown: Vec<CategorySpend>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BudgetStatus {
    pub category: String,
    pub budget: Decimal,
    pub spent: Decimal,
    pub remaining: Decimal,
    pub over_budget: bool,
}

/// Spend figures only count purchases with status `purchased`.
pub fn analytics(
    purchases: &[Purchase],
    categories: &[PurchaseCategory],
    today: NaiveDate,
) -> PurchaseAnalytics {
    let names: HashMap<&str, &str> = categories
        .iter()
        .map(|c| (c.id.as_str(), c.name.as_str()))
        .collect();

    let mut out = PurchaseAnalytics {
        total_spent: Decimal::ZERO,
        monthly_spent: Decimal::ZERO,
        planned_count: 0,
        purchased_count: 0,
        cancelled_count: 0,
        category_breakdown: Vec::new(),
    };
    let mut by_category: HashMap<&str, (Decimal, usize)> = HashMap::new();

    for p in purchases {
        match p.status {
            PurchaseStatus::Planned => out.planned_count += 1,
            PurchaseStatus::Cancelled => out.cancelled_count += 1,
            PurchaseStatus::Purchased => {
                out.purchased_count += 1;
                out.total_spent = out.total_spent.saturating_add(p.price);
                if same_month(p.purchase_date, today) {
                    out.monthly_spent = out.monthly_spent.saturating_add(p.price);
                }
                let name = p
                    .category_id
                    .as_deref()
                    .and_then(|id| names.get(id).copied())
                    .unwrap_or(UNCATEGORIZED);
                let entry = by_category.entry(name).or_insert((Decimal::ZERO, 0));
                entry.0 = entry.0.saturating_add(p.price);
                entry.1 += 1;
            }
        }
    }

    let mut breakdown: Vec<CategorySpend> = by_category
        .into_iter()
        .map(|(name, (amount, count))| CategorySpend {
            category: name.to_string(),
            amount,
            count,
            percentage: if out.total_spent.is_zero() {
                Decimal::ZERO
            } else {
                amount / out.total_spent * Decimal::ONE_HUNDRED
            },
        })
        .collect();
    breakdown.sort_by(|a, b| {
        b.percentage
            .cmp(&a.percentage)
            .then_with(|| a.category.cmp(&b.category))
    });
    out.category_breakdown = breakdown;
    out
}

/// Spend against each category's monthly budget for the month of `today`.
pub fn budget_status(
    purchases: &[Purchase],
    categories: &[PurchaseCategory],
    today: NaiveDate,
) -> Vec<BudgetStatus> {
    categories
        .iter()
        .map(|c| {
            let spent: Decimal = purchases
                .iter()
                .filter(|p| {
                    p.status == PurchaseStatus::Purchased
                        && p.category_id.as_deref() == Some(c.id.as_str())
                        && same_month(p.purchase_date, today)
                })
                .fold(Decimal::ZERO, |total, p| total.saturating_add(p.price));
            BudgetStatus {
                category: c.name.clone(),
                budget: c.monthly_budget,
                spent,
                remaining: c.monthly_budget.saturating_sub(spent),
                over_budget: spent > c.monthly_budget,
            }
        })
        .collect()
}
