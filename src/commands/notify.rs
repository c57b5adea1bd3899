// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use clap::ArgMatches;

use super::required;
use crate::backend::DataService;
use crate::models::{Notification, NotificationKind};
use crate::notifications::NotificationStore;
use crate::utils::{maybe_print_json, pretty_table};

pub fn handle<S: DataService>(store: &mut NotificationStore<'_, S>, m: &ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("list", sub)) => {
            let unread_only = sub.get_flag("unread");
            let data: Vec<&Notification> = store
                .notifications()
                .iter()
                .filter(|n| !unread_only || !n.is_read)
                .collect();
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
                let rows = data
                    .iter()
                    .map(|n| {
                        vec![
                            n.id.clone(),
                            n.created_at.format("%Y-%m-%d %H:%M").to_string(),
                            n.kind.to_string(),
                            n.title.clone(),
                            n.message.clone(),
                            if n.is_read { "" } else { "*" }.to_string(),
                        ]
                    })
                    .collect();
                println!(
                    "{}",
                    pretty_table(&["Id", "When", "Type", "Title", "Message", "New"], rows)
                );
                println!("{} unread", store.unread_count());
            }
        }
        Some(("add", sub)) => {
            let kind: NotificationKind = required(sub, "type")?.parse()?;
            let n = store.create(required(sub, "title")?, required(sub, "message")?, kind)?;
            println!("Added notification {}", n.id);
        }
        Some(("read", sub)) => {
            if sub.get_flag("all") {
                let count = store.mark_all_read()?;
                println!("Marked {} notification(s) read", count);
            } else {
                let n = store.mark_read(required(sub, "id")?)?;
                println!("Marked '{}' read", n.title);
            }
        }
        Some(("rm", sub)) => {
            let id = required(sub, "id")?;
            store.delete(id)?;
            println!("Removed notification {}", id);
        }
        _ => {}
    }
    Ok(())
}
