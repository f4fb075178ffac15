// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::budget_view::BudgetView;
use crate::ledger::Ledger;
use crate::utils::{
    fmt_money, maybe_print_json, month_or_default, parse_decimal, parse_month, pretty_table,
    required,
};
use anyhow::Result;

pub fn handle(ledger: &mut Ledger, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("set", sub)) => set(ledger, sub)?,
        Some(("view", sub)) => view(ledger, sub)?,
        _ => {}
    }
    Ok(())
}

fn set(ledger: &mut Ledger, sub: &clap::ArgMatches) -> Result<()> {
    let month = parse_month(required(sub, "month")?)?;
    let cat = required(sub, "category")?;
    let amount = parse_decimal(required(sub, "amount")?)?;
    ledger.set_budgeted_amount(&month, cat, amount)?;
    println!(
        "Budget set for {} / {} = {}. Ready to Assign: {}",
        month,
        cat,
        fmt_money(&amount),
        fmt_money(&ledger.ready_to_assign()?)
    );
    Ok(())
}

/// Table rows: one header row per group followed by its categories.
pub fn table_rows(view: &BudgetView) -> Vec<Vec<String>> {
    let mut data = Vec::new();
    for group in view.grouped() {
        let mut header = vec![String::new(); 5];
        header[0] = format!("[{}]", group.name);
        data.push(header);
        for row in group.rows {
            let name = if row.is_savings_goal {
                format!("  {} *", row.name)
            } else {
                format!("  {}", row.name)
            };
            data.push(vec![
                name,
                fmt_money(&row.prev_avail),
                fmt_money(&row.budgeted),
                fmt_money(&row.spent),
                fmt_money(&row.available),
            ]);
        }
    }
    data.push(vec![
        "Total".to_string(),
        String::new(),
        fmt_money(&view.totals.budgeted),
        fmt_money(&view.totals.spent),
        fmt_money(&view.totals.available),
    ]);
    data
}

fn view(ledger: &Ledger, sub: &clap::ArgMatches) -> Result<()> {
    let month = month_or_default(ledger, sub)?;
    let view = ledger.budget_view(&month)?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &view)? {
        return Ok(());
    }

    let nav = ledger.navigation(&month)?;
    println!(
        "{}{}{}   Ready to Assign: {}",
        if nav.can_go_back { "< " } else { "  " },
        month,
        if nav.can_go_forward { " >" } else { "  " },
        fmt_money(&ledger.ready_to_assign()?)
    );
    if view.is_empty() {
        println!("No budget categories. Add one with `budgetbook category add`.");
        return Ok(());
    }
    println!(
        "{}",
        pretty_table(
            &["Category", "Carryover", "Budgeted", "Activity", "Available"],
            table_rows(&view),
        )
    );
    if view.rows.iter().any(|r| r.is_savings_goal) {
        println!("* savings goal");
    }
    Ok(())
}
