// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

mod common;

use common::USER;
use fintrack::backend::{DataService, Filter, SqliteService, Table};
use fintrack::models::{Notification, NotificationKind};
use fintrack::notifications::NotificationStore;

#[test]
fn changes_from_other_sessions_are_applied() {
    let svc = SqliteService::open_in_memory().unwrap();
    let mut watcher = NotificationStore::load(&svc, USER).unwrap();
    assert!(watcher.subscribe().unwrap());
    let mut writer = NotificationStore::load(&svc, USER).unwrap();

    let n = writer
        .create("Budget", "Gadgets is over budget", NotificationKind::Warning)
        .unwrap();
    let mut foreign = NotificationStore::new(&svc, "user-2");
    foreign.create("Hello", "not yours", NotificationKind::Info).unwrap();

    assert_eq!(watcher.sync_changes(), 1);
    assert_eq!(watcher.notifications().len(), 1);
    assert_eq!(watcher.unread_count(), 1);

    writer.mark_read(&n.id).unwrap();
    assert_eq!(watcher.sync_changes(), 1);
    assert_eq!(watcher.unread_count(), 0);

    writer.delete(&n.id).unwrap();
    assert_eq!(watcher.sync_changes(), 1);
    assert!(watcher.notifications().is_empty());
    assert_eq!(watcher.sync_changes(), 0);
}

#[test]
fn mark_all_read_persists() {
    let svc = SqliteService::open_in_memory().unwrap();
    let mut store = NotificationStore::load(&svc, USER).unwrap();
    let first = store.create("One", "", NotificationKind::Info).unwrap();
    store.create("Two", "", NotificationKind::Success).unwrap();
    assert!(store.create("  ", "", NotificationKind::Error).is_err());
    assert_eq!(store.unread_count(), 2);

    store.mark_read(&first.id).unwrap();
    assert_eq!(store.unread_count(), 1);
    assert_eq!(store.mark_all_read().unwrap(), 1);
    assert_eq!(store.mark_all_read().unwrap(), 0);

    let stored: Vec<Notification> = svc
        .select(&Filter::new().eq("user_id", USER))
        .unwrap();
    assert!(stored.iter().all(|n| n.is_read));
}

#[test]
fn unreadable_change_is_skipped_and_subscription_survives() {
    let svc = SqliteService::open_in_memory().unwrap();
    let mut watcher = NotificationStore::load(&svc, USER).unwrap();
    assert!(watcher.subscribe().unwrap());

    // A row missing most notification fields, written outside the service.
    svc.connection()
        .execute(
            r#"INSERT INTO notifications(id, body) VALUES ('broken', '{"user_id":"user-1"}')"#,
            [],
        )
        .unwrap();
    svc.delete(Table::Notifications, &Filter::by_id("broken")).unwrap();

    let mut writer = NotificationStore::load(&svc, USER).unwrap();
    writer.create("Salary", "arrived", NotificationKind::Success).unwrap();
    assert_eq!(watcher.sync_changes(), 1);
    assert!(watcher.is_subscribed());

    writer.create("Rent", "due", NotificationKind::Info).unwrap();
    assert_eq!(watcher.sync_changes(), 1);
    assert_eq!(watcher.notifications().len(), 2);
}
