// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Notification cache kept current by change events of the data service.

use std::sync::mpsc::{Receiver, TryRecvError};

use chrono::Utc;

use crate::backend::{ChangeEvent, ChangeKind, DataService, Filter, Table};
use crate::error::{Error, Result};
use crate::models::{Notification, NotificationKind};

pub struct NotificationStore<'a, S: DataService> {
    service: &'a S,
    user_id: String,
    /// Newest first.
    notifications: Vec<Notification>,
    changes: Option<Receiver<ChangeEvent>>,
}

impl<'a, S: DataService> NotificationStore<'a, S> {
    pub fn new(service: &'a S, user_id: impl Into<String>) -> Self {
        NotificationStore {
            service,
            user_id: user_id.into(),
            notifications: Vec::new(),
            changes: None,
        }
    }

    pub fn load(service: &'a S, user_id: impl Into<String>) -> Result<Self> {
        let mut store = Self::new(service, user_id);
        store.refresh()?;
        Ok(store)
    }

    pub fn refresh(&mut self) -> Result<()> {
        self.notifications = self
            .service
            .select(&Filter::new().eq("user_id", self.user_id.as_str()))?;
        self.sort();
        Ok(())
    }

    fn sort(&mut self) {
        self.notifications
            .sort_by(|a, b| b.created_at.cmp(&a.created_at));
    }

    /// Start listening for notification changes.
    ///
    /// Returns `false` when the service cannot push changes; the cache then
    /// only moves on explicit refreshes and local mutations.
    pub fn subscribe(&mut self) -> Result<bool> {
        match self.service.subscribe(Table::Notifications) {
            Ok(rx) => {
                self.changes = Some(rx);
                Ok(true)
            }
            Err(Error::SubscriptionUnsupported) => {
                tracing::debug!("notification subscriptions unavailable");
                Ok(false)
            }
            Err(err) => Err(err),
        }
    }

    /// Apply every change event received so far, returning how many
    /// changed the cache.
    ///
    /// An event that cannot be applied is logged and skipped; the
    /// subscription stays open.
    pub fn sync_changes(&mut self) -> usize {
        let Some(rx) = self.changes.take() else {
            return 0;
        };
        let mut events = Vec::new();
        let disconnected = loop {
            match rx.try_recv() {
                Ok(event) => events.push(event),
                Err(TryRecvError::Empty) => break false,
                Err(TryRecvError::Disconnected) => break true,
            }
        };
        if disconnected {
            tracing::debug!("notification change stream closed");
        } else {
            self.changes = Some(rx);
        }

        let mut applied = 0;
        for event in &events {
            match self.apply_change(event) {
                Ok(true) => applied += 1,
                Ok(false) => {}
                Err(err) => {
                    tracing::warn!(kind = ?event.kind, error = %err, "skipped notification change");
                }
            }
        }
        applied
    }

    pub fn is_subscribed(&self) -> bool {
        self.changes.is_some()
    }

    /// Apply one change event. Events of other tables or users are ignored.
    pub fn apply_change(&mut self, event: &ChangeEvent) -> Result<bool> {
        if event.table != Table::Notifications {
            return Ok(false);
        }
        let note: Notification = serde_json::from_value(event.record.clone())?;
        if note.user_id != self.user_id {
            return Ok(false);
        }
        let pos = self.notifications.iter().position(|n| n.id == note.id);
        match (event.kind, pos) {
            (ChangeKind::Insert, None) => {
                self.notifications.push(note);
                self.sort();
            }
            (ChangeKind::Insert, Some(i)) | (ChangeKind::Update, Some(i)) => {
                self.notifications[i] = note;
                self.sort();
            }
            (ChangeKind::Update, None) => {
                self.notifications.push(note);
                self.sort();
            }
            (ChangeKind::Delete, Some(i)) => {
                self.notifications.remove(i);
            }
            (ChangeKind::Delete, None) => return Ok(false),
        }
        Ok(true)
    }

    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    pub fn unread_count(&self) -> usize {
        self.notifications.iter().filter(|n| !n.is_read).count()
    }

    fn upsert_local(&mut self, note: Notification) {
        match self.notifications.iter().position(|n| n.id == note.id) {
            Some(i) => self.notifications[i] = note,
            None => self.notifications.push(note),
        }
        self.sort();
    }

    pub fn create(
        &mut self,
        title: &str,
        message: &str,
        kind: NotificationKind,
    ) -> Result<Notification> {
        if title.trim().is_empty() {
            return Err(Error::validation("notification title", "must not be empty"));
        }
        let stored = self.service.insert(&Notification {
            id: String::new(),
            user_id: self.user_id.clone(),
            title: title.trim().to_string(),
            message: message.trim().to_string(),
            kind,
            is_read: false,
            created_at: Utc::now(),
        })?;
        tracing::debug!(id = %stored.id, %kind, "created notification");
        self.upsert_local(stored.clone());
        Ok(stored)
    }

    pub fn mark_read(&mut self, id: &str) -> Result<Notification> {
        let mut note = self
            .notifications
            .iter()
            .find(|n| n.id == id)
            .cloned()
            .ok_or_else(|| Error::not_found(Table::Notifications, id))?;
        if note.is_read {
            return Ok(note);
        }
        note.is_read = true;
        let stored = self.service.update(&note)?;
        self.upsert_local(stored.clone());
        Ok(stored)
    }

    /// Mark every unread notification read, returning how many changed.
    pub fn mark_all_read(&mut self) -> Result<usize> {
        let unread: Vec<String> = self
            .notifications
            .iter()
            .filter(|n| !n.is_read)
            .map(|n| n.id.clone())
            .collect();
        for id in &unread {
            self.mark_read(id)?;
        }
        Ok(unread.len())
    }

    pub fn delete(&mut self, id: &str) -> Result<()> {
        if !self.notifications.iter().any(|n| n.id == id) {
            return Err(Error::not_found(Table::Notifications, id));
        }
        self.service
            .delete(Table::Notifications, &Filter::by_id(id))?;
        self.notifications.retain(|n| n.id != id);
        Ok(())
    }
}
