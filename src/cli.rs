// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, crate_version};

fn json_flags(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .conflicts_with("jsonl")
            .help("Print pretty JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .help("Print one JSON object per line"),
    )
}

fn date_arg(id: &'static str, help: &'static str) -> Arg {
    Arg::new(id).long(id).value_name("YYYY-MM-DD").help(help)
}

fn account_cmd() -> Command {
    Command::new("account")
        .about("Manage accounts")
        .subcommand_required(true)
        .subcommand(
            Command::new("add")
                .about("Create an account")
                .arg(Arg::new("name").required(true))
                .arg(
                    Arg::new("type")
                        .long("type")
                        .default_value("checking")
                        .help("checking | savings | credit | investment | cash"),
                )
                .arg(Arg::new("currency").long("currency").required(true))
                .arg(Arg::new("balance").long("balance").default_value("0"))
                .arg(
                    Arg::new("donation")
                        .long("donation")
                        .allow_hyphen_values(true)
                        .help("Negative: percent of remaining income; otherwise a fixed amount"),
                )
                .arg(
                    Arg::new("dps")
                        .long("dps")
                        .value_name("monthly|flexible")
                        .help("Enroll the account in DPS"),
                )
                .arg(
                    Arg::new("dps-amount-type")
                        .long("dps-amount-type")
                        .value_name("fixed|custom")
                        .requires("dps")
                        .help("Defaults to fixed"),
                )
                .arg(Arg::new("dps-amount").long("dps-amount").requires("dps"))
                .arg(
                    Arg::new("savings-account")
                        .long("savings-account")
                        .requires("dps")
                        .conflicts_with("new-savings")
                        .help("Existing account receiving DPS transfers"),
                )
                .arg(
                    Arg::new("new-savings")
                        .long("new-savings")
                        .requires("dps")
                        .help("Create a savings account with this name for DPS"),
                )
                .arg(
                    Arg::new("savings-balance")
                        .long("savings-balance")
                        .requires("new-savings"),
                ),
        )
        .subcommand(json_flags(
            Command::new("list")
                .about("List accounts")
                .arg(Arg::new("all").long("all").action(ArgAction::SetTrue).help("Include inactive accounts")),
        ))
        .subcommand(json_flags(
            Command::new("savings")
                .about("Saved and donated income of an account")
                .arg(Arg::new("name").required(true)),
        ))
        .subcommand(Command::new("activate").arg(Arg::new("name").required(true)))
        .subcommand(Command::new("deactivate").arg(Arg::new("name").required(true)))
        .subcommand(
            Command::new("rm")
                .about("Delete an account and its transactions")
                .arg(Arg::new("name").required(true)),
        )
        .subcommand(Command::new("reconcile").about("Re-derive stored balances from the ledger"))
}

fn category_cmd() -> Command {
    Command::new("category")
        .about("Manage transaction categories")
        .subcommand_required(true)
        .subcommand(
            Command::new("add")
                .arg(Arg::new("name").required(true))
                .arg(Arg::new("type").long("type").required(true))
                .arg(Arg::new("color").long("color").default_value("#6b7280"))
                .arg(Arg::new("icon").long("icon").default_value("tag")),
        )
        .subcommand(json_flags(
            Command::new("list").arg(Arg::new("type").long("type")),
        ))
        .subcommand(Command::new("rm").arg(Arg::new("id").required(true)))
}

fn tx_cmd() -> Command {
    Command::new("tx")
        .about("Record and list transactions")
        .subcommand_required(true)
        .subcommand(
            Command::new("add")
                .arg(Arg::new("account").long("account").required(true))
                .arg(Arg::new("type").long("type").required(true))
                .arg(Arg::new("amount").long("amount").required(true))
                .arg(Arg::new("category").long("category").required(true))
                .arg(date_arg("date", "Defaults to today"))
                .arg(Arg::new("description").long("description"))
                .arg(Arg::new("tag").long("tag").action(ArgAction::Append))
                .arg(
                    Arg::new("saving")
                        .long("saving")
                        .allow_hyphen_values(true)
                        .help("Negative: percent of the amount; otherwise a fixed amount"),
                )
                .arg(
                    Arg::new("repeat")
                        .long("repeat")
                        .value_name("daily|weekly|monthly|yearly"),
                )
                .arg(
                    Arg::new("every")
                        .long("every")
                        .value_parser(clap::value_parser!(u32))
                        .requires("repeat")
                        .help("Interval between occurrences, defaults to 1"),
                )
                .arg(date_arg("until", "Last date of the schedule").requires("repeat")),
        )
        .subcommand(json_flags(
            Command::new("list")
                .arg(Arg::new("account").long("account"))
                .arg(Arg::new("limit").long("limit").value_parser(clap::value_parser!(usize))),
        ))
        .subcommand(Command::new("rm").arg(Arg::new("id").required(true)))
        .subcommand(json_flags(
            Command::new("upcoming")
                .about("Scheduled occurrences of recurring transactions")
                .arg(date_arg("from", "Defaults to today"))
                .arg(Arg::new("days").long("days").default_value("30").value_parser(clap::value_parser!(u64))),
        ))
}

fn transfer_cmd() -> Command {
    Command::new("transfer")
        .about("Move money between two accounts")
        .arg(Arg::new("from").long("from").required(true))
        .arg(Arg::new("to").long("to").required(true))
        .arg(Arg::new("amount").long("amount").required(true))
        .arg(Arg::new("rate").long("rate").default_value("1"))
        .arg(date_arg("date", "Defaults to today"))
        .arg(Arg::new("note").long("note"))
}

fn dps_cmd() -> Command {
    Command::new("dps")
        .about("DPS savings transfers")
        .subcommand_required(true)
        .subcommand(
            Command::new("run")
                .arg(Arg::new("account").long("account").required(true))
                .arg(Arg::new("amount").long("amount"))
                .arg(date_arg("date", "Defaults to today")),
        )
        .subcommand(json_flags(
            Command::new("history").arg(Arg::new("account").long("account").required(true)),
        ))
}

fn dashboard_cmd() -> Command {
    json_flags(
        Command::new("dashboard")
            .about("Balances and monthly totals per currency")
            .arg(date_arg("date", "Reference day, defaults to today"))
            .arg(
                Arg::new("recent")
                    .long("recent")
                    .default_value("5")
                    .value_parser(clap::value_parser!(usize)),
            ),
    )
}

fn purchase_cmd() -> Command {
    Command::new("purchase")
        .about("Track planned and completed purchases")
        .subcommand_required(true)
        .subcommand(
            Command::new("add")
                .arg(Arg::new("item").required(true))
                .arg(Arg::new("price").long("price").required(true))
                .arg(Arg::new("category").long("category"))
                .arg(Arg::new("status").long("status").default_value("planned"))
                .arg(Arg::new("priority").long("priority").default_value("medium"))
                .arg(date_arg("date", "Defaults to today"))
                .arg(Arg::new("notes").long("notes")),
        )
        .subcommand(json_flags(
            Command::new("list").arg(Arg::new("status").long("status")),
        ))
        .subcommand(
            Command::new("status")
                .arg(Arg::new("id").required(true))
                .arg(Arg::new("status").required(true)),
        )
        .subcommand(Command::new("rm").arg(Arg::new("id").required(true)))
        .subcommand(json_flags(
            Command::new("analytics").arg(date_arg("date", "Reference day, defaults to today")),
        ))
        .subcommand(json_flags(
            Command::new("budget").arg(date_arg("date", "Reference day, defaults to today")),
        ))
        .subcommand(
            Command::new("category")
                .subcommand_required(true)
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("name").required(true))
                        .arg(Arg::new("budget").long("budget").default_value("0"))
                        .arg(Arg::new("color").long("color").default_value("#6b7280")),
                )
                .subcommand(json_flags(Command::new("list")))
                .subcommand(Command::new("rm").arg(Arg::new("name").required(true))),
        )
}

fn goal_cmd() -> Command {
    Command::new("goal")
        .about("Savings goals funded by transfers")
        .subcommand_required(true)
        .subcommand(
            Command::new("add")
                .arg(Arg::new("name").required(true))
                .arg(Arg::new("target").long("target").required(true))
                .arg(Arg::new("from").long("from").required(true))
                .arg(Arg::new("to").long("to").required(true))
                .arg(date_arg("by", "Target date")),
        )
        .subcommand(json_flags(Command::new("list")))
        .subcommand(
            Command::new("fund")
                .arg(Arg::new("id").required(true))
                .arg(Arg::new("amount").long("amount").required(true))
                .arg(date_arg("date", "Defaults to today")),
        )
        .subcommand(Command::new("rm").arg(Arg::new("id").required(true)))
}

fn notify_cmd() -> Command {
    Command::new("notify")
        .about("Notifications")
        .subcommand_required(true)
        .subcommand(json_flags(
            Command::new("list").arg(Arg::new("unread").long("unread").action(ArgAction::SetTrue)),
        ))
        .subcommand(
            Command::new("add")
                .arg(Arg::new("title").required(true))
                .arg(Arg::new("message").long("message").default_value(""))
                .arg(Arg::new("type").long("type").default_value("info")),
        )
        .subcommand(
            Command::new("read")
                .arg(Arg::new("id").required_unless_present("all"))
                .arg(Arg::new("all").long("all").action(ArgAction::SetTrue)),
        )
        .subcommand(Command::new("rm").arg(Arg::new("id").required(true)))
}

fn profile_cmd() -> Command {
    Command::new("profile")
        .about("User profile")
        .subcommand_required(true)
        .subcommand(json_flags(Command::new("show")))
        .subcommand(
            Command::new("set")
                .arg(Arg::new("name").long("name"))
                .arg(Arg::new("currency").long("currency").required(true)),
        )
}

fn export_cmd() -> Command {
    Command::new("export")
        .about("Export data to files")
        .subcommand_required(true)
        .subcommand(
            Command::new("transactions")
                .arg(Arg::new("format").long("format").default_value("csv"))
                .arg(Arg::new("out").long("out").required(true)),
        )
}

pub fn build_cli() -> Command {
    Command::new("fintrack")
        .version(crate_version!())
        .about("Personal finance tracking: accounts, transfers, DPS savings and purchases")
        .subcommand(Command::new("init").about("Create the local database"))
        .subcommand(account_cmd())
        .subcommand(category_cmd())
        .subcommand(tx_cmd())
        .subcommand(transfer_cmd())
        .subcommand(dps_cmd())
        .subcommand(dashboard_cmd())
        .subcommand(purchase_cmd())
        .subcommand(goal_cmd())
        .subcommand(notify_cmd())
        .subcommand(profile_cmd())
        .subcommand(export_cmd())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_tree_is_consistent() {
        build_cli().debug_assert();
    }
}
