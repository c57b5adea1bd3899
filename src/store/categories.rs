// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::FinanceStore;
use crate::backend::{DataService, Filter, Table};
use crate::error::{Error, Result};
use crate::models::{Category, TransactionType};

const DEFAULT_ID_PREFIX: &str = "default-";

const DEFAULTS: &[(&str, TransactionType, &str, &str)] = &[
    ("Salary", TransactionType::Income, "#22c55e", "briefcase"),
    ("Freelance", TransactionType::Income, "#10b981", "laptop"),
    ("Investment", TransactionType::Income, "#0ea5e9", "trending-up"),
    ("Gift", TransactionType::Income, "#a855f7", "gift"),
    ("Other Income", TransactionType::Income, "#64748b", "plus-circle"),
    ("Food & Dining", TransactionType::Expense, "#f97316", "utensils"),
    ("Transportation", TransactionType::Expense, "#eab308", "car"),
    ("Shopping", TransactionType::Expense, "#ec4899", "shopping-bag"),
    ("Bills & Utilities", TransactionType::Expense, "#ef4444", "file-text"),
    ("Entertainment", TransactionType::Expense, "#8b5cf6", "film"),
    ("Healthcare", TransactionType::Expense, "#14b8a6", "heart"),
    ("Education", TransactionType::Expense, "#3b82f6", "book"),
    ("Travel", TransactionType::Expense, "#06b6d4", "plane"),
    ("Other Expense", TransactionType::Expense, "#6b7280", "more-horizontal"),
];

/// Built-in categories, seeded client-side and never written to the service.
pub fn default_categories() -> Vec<Category> {
    DEFAULTS
        .iter()
        .map(|(name, kind, color, icon)| Category {
            id: format!(
                "{DEFAULT_ID_PREFIX}{}",
                name.to_lowercase().replace(" & ", "-").replace(' ', "-")
            ),
            user_id: String::new(),
            name: name.to_string(),
            kind: *kind,
            color: color.to_string(),
            icon: icon.to_string(),
        })
        .collect()
}

impl<'a, S: DataService> FinanceStore<'a, S> {
    pub fn add_category(
        &mut self,
        name: &str,
        kind: TransactionType,
        color: &str,
        icon: &str,
    ) -> Result<Category> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::validation("category name", "must not be empty"));
        }
        if self
            .categories
            .iter()
            .any(|c| c.kind == kind && c.name.eq_ignore_ascii_case(name))
        {
            return Err(Error::validation(
                "category name",
                format!("{} category '{}' already exists", kind, name),
            ));
        }
        let category = self.service.insert(&Category {
            id: String::new(),
            user_id: self.user_id.clone(),
            name: name.to_string(),
            kind,
            color: color.trim().to_string(),
            icon: icon.trim().to_string(),
        })?;
        tracing::info!(category = %category.name, %kind, "added category");
        self.categories.push(category.clone());
        Ok(category)
    }

    pub fn delete_category(&mut self, id: &str) -> Result<()> {
        if id.starts_with(DEFAULT_ID_PREFIX) {
            return Err(Error::validation(
                "category",
                "built-in categories cannot be deleted",
            ));
        }
        if !self.categories.iter().any(|c| c.id == id) {
            return Err(Error::not_found(Table::Categories, id));
        }
        self.service.delete(Table::Categories, &Filter::by_id(id))?;
        self.categories.retain(|c| c.id != id);
        Ok(())
    }
}
