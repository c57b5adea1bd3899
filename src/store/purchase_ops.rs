// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::FinanceStore;
use crate::backend::{DataService, Filter, Table};
use crate::error::{Error, Result};
use crate::models::{Priority, Purchase, PurchaseCategory, PurchaseStatus};

#[derive(Debug, Clone, PartialEq)]
pub struct NewPurchase {
    pub item_name: String,
    pub price: Decimal,
    pub category_id: Option<String>,
    pub status: PurchaseStatus,
    pub priority: Priority,
    pub purchase_date: NaiveDate,
    pub notes: Option<String>,
}

impl NewPurchase {
    pub fn new(item_name: &str, price: Decimal, purchase_date: NaiveDate) -> Self {
        NewPurchase {
            item_name: item_name.to_string(),
            price,
            category_id: None,
            status: PurchaseStatus::Planned,
            priority: Priority::Medium,
            purchase_date,
            notes: None,
        }
    }
}

impl<'a, S: DataService> FinanceStore<'a, S> {
    pub fn purchase(&self, id: &str) -> Result<&Purchase> {
        self.purchases
            .iter()
            .find(|p| p.id == id)
            .ok_or_else(|| Error::not_found(Table::Purchases, id))
    }

    pub fn purchase_category(&self, id: &str) -> Result<&PurchaseCategory> {
        self.purchase_categories
            .iter()
            .find(|c| c.id == id)
            .ok_or_else(|| Error::not_found(Table::PurchaseCategories, id))
    }

    fn check_purchase(&self, p: &Purchase) -> Result<()> {
        if p.item_name.trim().is_empty() {
            return Err(Error::validation("item name", "must not be empty"));
        }
        if p.price < Decimal::ZERO {
            return Err(Error::validation("price", "must not be negative"));
        }
        if let Some(id) = p.category_id.as_deref() {
            self.purchase_category(id)?;
        }
        Ok(())
    }

    pub fn add_purchase(&mut self, new: NewPurchase) -> Result<Purchase> {
        let purchase = Purchase {
            id: String::new(),
            user_id: self.user_id.clone(),
            item_name: new.item_name.trim().to_string(),
            price: new.price,
            category_id: new.category_id,
            status: new.status,
            priority: new.priority,
            purchase_date: new.purchase_date,
            notes: new.notes.filter(|n| !n.trim().is_empty()),
        };
        self.check_purchase(&purchase)?;
        let stored = self.service.insert(&purchase)?;
        tracing::info!(item = %stored.item_name, status = %stored.status, "added purchase");
        self.purchases.insert(0, stored.clone());
        Ok(stored)
    }

    pub fn update_purchase(&mut self, mut purchase: Purchase) -> Result<Purchase> {
        self.purchase(&purchase.id)?;
        purchase.user_id = self.user_id.clone();
        self.check_purchase(&purchase)?;
        let stored = self.service.update(&purchase)?;
        if let Some(slot) = self.purchases.iter_mut().find(|p| p.id == stored.id) {
            *slot = stored.clone();
        }
        Ok(stored)
    }

    pub fn set_purchase_status(&mut self, id: &str, status: PurchaseStatus) -> Result<Purchase> {
        let mut purchase = self.purchase(id)?.clone();
        purchase.status = status;
        self.update_purchase(purchase)
    }

    pub fn delete_purchase(&mut self, id: &str) -> Result<()> {
        self.purchase(id)?;
        self.service.delete(Table::Purchases, &Filter::by_id(id))?;
        self.purchases.retain(|p| p.id != id);
        Ok(())
    }

    pub fn add_purchase_category(
        &mut self,
        name: &str,
        color: &str,
        monthly_budget: Decimal,
    ) -> Result<PurchaseCategory> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::validation("purchase category name", "must not be empty"));
        }
        if monthly_budget < Decimal::ZERO {
            return Err(Error::validation("monthly budget", "must not be negative"));
        }
        if self
            .purchase_categories
            .iter()
            .any(|c| c.name.eq_ignore_ascii_case(name))
        {
            return Err(Error::validation(
                "purchase category name",
                format!("'{}' already exists", name),
            ));
        }
        let stored = self.service.insert(&PurchaseCategory {
            id: String::new(),
            user_id: self.user_id.clone(),
            name: name.to_string(),
            color: color.trim().to_string(),
            monthly_budget,
        })?;
        tracing::info!(category = %stored.name, budget = %stored.monthly_budget, "added purchase category");
        self.purchase_categories.push(stored.clone());
        Ok(stored)
    }

    pub fn update_purchase_category(&mut self, mut category: PurchaseCategory) -> Result<PurchaseCategory> {
        self.purchase_category(&category.id)?;
        if category.monthly_budget < Decimal::ZERO {
            return Err(Error::validation("monthly budget", "must not be negative"));
        }
        category.user_id = self.user_id.clone();
        let stored = self.service.update(&category)?;
        if let Some(slot) = self
            .purchase_categories
            .iter_mut()
            .find(|c| c.id == stored.id)
        {
            *slot = stored.clone();
        }
        Ok(stored)
    }

    /// Delete a purchase category. Its purchases become uncategorized.
    pub fn delete_purchase_category(&mut self, id: &str) -> Result<()> {
        self.purchase_category(id)?;
        let orphans: Vec<Purchase> = self
            .purchases
            .iter()
            .filter(|p| p.category_id.as_deref() == Some(id))
            .cloned()
            .collect();
        for mut p in orphans {
            p.category_id = None;
            let stored = self.service.update(&p)?;
            if let Some(slot) = self.purchases.iter_mut().find(|x| x.id == stored.id) {
                *slot = stored;
            }
        }
        self.service
            .delete(Table::PurchaseCategories, &Filter::by_id(id))?;
        self.purchase_categories.retain(|c| c.id != id);
        Ok(())
    }
}
