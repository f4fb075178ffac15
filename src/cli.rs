// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, command};

fn json_flags() -> [Arg; 2] {
    [
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print JSON"),
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .conflicts_with("json")
            .help("Print one JSON object per line"),
    ]
}

fn month_arg() -> Arg {
    Arg::new("month")
        .long("month")
        .value_name("YYYY-MM")
        .help("Budget period; defaults to the latest month with transactions")
}

pub fn build_cli() -> Command {
    command!()
        .name("budgetbook")
        .about("Envelope budgeting ledger: accounts, transactions and monthly budgets")
        .arg(
            Arg::new("db")
                .long("db")
                .global(true)
                .value_name("PATH")
                .help("SQLite database file (overrides BUDGETBOOK_DB)"),
        )
        .subcommand(Command::new("init").about("Create the database if it does not exist"))
        .subcommand(
            Command::new("account")
                .about("Manage accounts")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(
                            Arg::new("balance")
                                .long("balance")
                                .default_value("0")
                                .allow_hyphen_values(true)
                                .help("Starting balance; funds Ready to Assign"),
                        )
                        .arg(
                            Arg::new("type")
                                .long("type")
                                .default_value("checking")
                                .help("checking, savings, credit, ..."),
                        ),
                )
                .subcommand(Command::new("list").args(json_flags())),
        )
        .subcommand(
            Command::new("category")
                .about("Manage categories and their groups")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(Arg::new("group").long("group")),
                )
                .subcommand(Command::new("list").args(json_flags()))
                .subcommand(
                    Command::new("group")
                        .about("Assign a category to a group; an empty group unassigns it")
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(Arg::new("group").long("group").default_value("")),
                ),
        )
        .subcommand(
            Command::new("tx")
                .about("Record, list and delete transactions")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("date").long("date").required(true))
                        .arg(
                            Arg::new("type")
                                .long("type")
                                .default_value("expense")
                                .value_parser(["income", "expense", "refund", "transfer"]),
                        )
                        .arg(Arg::new("account").long("account").required(true))
                        .arg(Arg::new("amount").long("amount").required(true))
                        .arg(Arg::new("category").long("category"))
                        .arg(Arg::new("payee").long("payee"))
                        .arg(Arg::new("memo").long("memo")),
                )
                .subcommand(
                    Command::new("list")
                        .arg(month_arg())
                        .arg(Arg::new("account").long("account"))
                        .arg(Arg::new("category").long("category"))
                        .arg(
                            Arg::new("search")
                                .long("search")
                                .help("Case-insensitive match on payee or memo"),
                        )
                        .arg(Arg::new("from").long("from").value_name("YYYY-MM-DD"))
                        .arg(Arg::new("to").long("to").value_name("YYYY-MM-DD"))
                        .arg(
                            Arg::new("limit")
                                .long("limit")
                                .value_parser(clap::value_parser!(usize)),
                        )
                        .args(json_flags()),
                )
                .subcommand(
                    Command::new("rm").arg(
                        Arg::new("id")
                            .long("id")
                            .required(true)
                            .value_parser(clap::value_parser!(i64)),
                    ),
                ),
        )
        .subcommand(
            Command::new("budget")
                .about("Assign money to categories and view the month")
                .subcommand(
                    Command::new("set")
                        .arg(Arg::new("month").long("month").required(true))
                        .arg(Arg::new("category").long("category").required(true))
                        .arg(Arg::new("amount").long("amount").required(true)),
                )
                .subcommand(Command::new("view").arg(month_arg()).args(json_flags())),
        )
        .subcommand(
            Command::new("report")
                .about("Read-only summaries")
                .subcommand(Command::new("spending").arg(month_arg()).args(json_flags()))
                .subcommand(Command::new("summary").arg(month_arg()).args(json_flags())),
        )
        .subcommand(
            Command::new("export")
                .about("Write the whole ledger as a JSON document")
                .arg(Arg::new("out").long("out").required(true)),
        )
        .subcommand(
            Command::new("import")
                .about("Replace the whole ledger with a JSON document")
                .arg(Arg::new("path").long("path").required(true)),
        )
        .subcommand(
            Command::new("doctor")
                .about("Check the ledger for dangling references and drift")
                .args(json_flags()),
        )
        .subcommand(
            Command::new("clear")
                .about("Delete all data")
                .arg(
                    Arg::new("yes")
                        .long("yes")
                        .action(ArgAction::SetTrue)
                        .help("Confirm"),
                ),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_definition_is_valid() {
        build_cli().debug_assert();
    }
}
