// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use std::path::Path;

use budgetbook::{Ledger, cli, commands, config::Config, logging};

fn main() -> Result<()> {
    let matches = cli::build_cli().get_matches();

    let db_override = matches.get_one::<String>("db").map(Path::new);
    let config = Config::from_env(db_override)?;
    logging::init(&config.log_filter);

    let mut ledger = Ledger::open(&config.db_path)
        .with_context(|| format!("Open ledger at {}", config.db_path.display()))?;

    match matches.subcommand() {
        Some(("init", _)) => {
            println!("Database initialized at {}", config.db_path.display());
        }
        Some(("account", sub)) => commands::accounts::handle(&mut ledger, sub)?,
        Some(("category", sub)) => commands::categories::handle(&mut ledger, sub)?,
        Some(("tx", sub)) => commands::transactions::handle(&mut ledger, sub)?,
        Some(("budget", sub)) => commands::budgets::handle(&mut ledger, sub)?,
        Some(("report", sub)) => commands::reports::handle(&ledger, sub)?,
        Some(("export", sub)) => commands::exporter::handle(&ledger, sub)?,
        Some(("import", sub)) => commands::importer::handle(&mut ledger, sub)?,
        Some(("doctor", sub)) => commands::doctor::handle(&ledger, sub)?,
        Some(("clear", sub)) => commands::clear::handle(&mut ledger, sub)?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
