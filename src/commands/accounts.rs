// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::ledger::Ledger;
use crate::utils::{fmt_money, maybe_print_json, parse_decimal, pretty_table, required};
use anyhow::Result;

pub fn handle(ledger: &mut Ledger, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let name = required(sub, "name")?;
            let typ = required(sub, "type")?;
            let balance = parse_decimal(required(sub, "balance")?)?;
            ledger.add_account(name, balance, typ)?;
            println!(
                "Added account '{}' ({}, {}). Ready to Assign: {}",
                name,
                typ,
                fmt_money(&balance),
                fmt_money(&ledger.ready_to_assign()?)
            );
        }
        Some(("list", sub)) => {
            let accounts = ledger.accounts()?;
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &accounts)? {
                let data = accounts
                    .iter()
                    .map(|a| vec![a.name.clone(), a.r#type.clone(), fmt_money(&a.balance)])
                    .collect();
                println!("{}", pretty_table(&["Name", "Type", "Balance"], data));
                println!("Ready to Assign: {}", fmt_money(&ledger.ready_to_assign()?));
            }
        }
        _ => {}
    }
    Ok(())
}
