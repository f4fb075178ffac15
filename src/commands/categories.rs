// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::ledger::Ledger;
use crate::utils::{maybe_print_json, pretty_table, required};
use anyhow::Result;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct CategoryRow {
    pub name: String,
    pub group: String,
}

pub fn rows(ledger: &Ledger) -> Result<Vec<CategoryRow>> {
    let snapshot = ledger.snapshot()?;
    Ok(snapshot
        .categories
        .iter()
        .map(|c| CategoryRow {
            name: c.clone(),
            group: snapshot.groups.group_name(c).to_string(),
        })
        .collect())
}

pub fn handle(ledger: &mut Ledger, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let name = required(sub, "name")?;
            let group = sub.get_one::<String>("group").map(String::as_str);
            ledger.add_category(name, group)?;
            println!("Added category '{}'", name);
        }
        Some(("list", sub)) => {
            let data = rows(ledger)?;
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
                let table = data.into_iter().map(|r| vec![r.name, r.group]).collect();
                println!("{}", pretty_table(&["Category", "Group"], table));
                let empty = ledger.snapshot()?.groups.empty_defaults();
                if !empty.is_empty() {
                    println!("Empty groups: {}", empty.join(", "));
                }
            }
        }
        Some(("group", sub)) => {
            let name = required(sub, "name")?;
            let group = required(sub, "group")?;
            ledger.set_category_group(name, group)?;
            let now = ledger.snapshot()?.groups.group_name(name).to_string();
            println!("Category '{}' is now in '{}'", name, now);
        }
        _ => {}
    }
    Ok(())
}
