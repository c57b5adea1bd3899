// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use clap::ArgMatches;

use fintrack::backend::{DataService, RestService, SqliteService};
use fintrack::config::{Backend, Config};
use fintrack::notifications::NotificationStore;
use fintrack::store::FinanceStore;
use fintrack::{cli, commands, db, logging};

fn run<S: DataService>(service: &S, user_id: &str, matches: &ArgMatches) -> Result<()> {
    if let Some(("notify", sub)) = matches.subcommand() {
        let mut notes = NotificationStore::load(service, user_id)?;
        return commands::notify::handle(&mut notes, sub);
    }

    let mut store = FinanceStore::load(service, user_id)?;
    match matches.subcommand() {
        Some(("account", sub)) => commands::accounts::handle(&mut store, sub)?,
        Some(("category", sub)) => commands::categories::handle(&mut store, sub)?,
        Some(("tx", sub)) => commands::transactions::handle(&mut store, sub)?,
        Some(("transfer", sub)) => commands::transfers::handle(&mut store, sub)?,
        Some(("dps", sub)) => commands::dps::handle(&mut store, sub)?,
        Some(("dashboard", sub)) => commands::dashboard::handle(&store, sub)?,
        Some(("purchase", sub)) => commands::purchases::handle(&mut store, sub)?,
        Some(("goal", sub)) => commands::goals::handle(&mut store, sub)?,
        Some(("profile", sub)) => commands::profile::handle(&store, sub)?,
        Some(("export", sub)) => commands::exporter::handle(&store, sub)?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    logging::init();
    let matches = cli::build_cli().get_matches();
    let config = Config::from_env()?;

    match &config.backend {
        Backend::Remote(remote) => {
            tracing::debug!(url = %remote.url, user = %config.user_id, "using remote data service");
            if let Some(("init", _)) = matches.subcommand() {
                println!("Nothing to initialise for the remote service at {}", remote.url);
                return Ok(());
            }
            let service = RestService::new(remote)?;
            run(&service, &config.user_id, &matches)
        }
        Backend::Local { db_path } => {
            tracing::debug!(path = %db_path.display(), user = %config.user_id, "using local database");
            let service = SqliteService::new(db::open_or_init(db_path)?)?;
            if let Some(("init", _)) = matches.subcommand() {
                println!("Database initialized at {}", db_path.display());
                return Ok(());
            }
            run(&service, &config.user_id, &matches)
        }
    }
}
