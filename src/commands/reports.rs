// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::ledger::Ledger;
use crate::utils::{fmt_money, maybe_print_json, month_or_default, pretty_table};
use anyhow::Result;
use rust_decimal::Decimal;

pub fn handle(ledger: &Ledger, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("spending", sub)) => spending(ledger, sub)?,
        Some(("summary", sub)) => summary(ledger, sub)?,
        _ => {}
    }
    Ok(())
}

fn spending(ledger: &Ledger, sub: &clap::ArgMatches) -> Result<()> {
    let month = month_or_default(ledger, sub)?;
    let breakdown = ledger.spending_breakdown(&month)?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &breakdown)? {
        return Ok(());
    }
    let Some(breakdown) = breakdown else {
        println!("No spending recorded for {}", month);
        return Ok(());
    };

    let total = breakdown.total();
    let data = breakdown
        .slices
        .iter()
        .map(|s| {
            let share = if total.is_zero() {
                Decimal::ZERO
            } else {
                s.amount / total * Decimal::ONE_HUNDRED
            };
            vec![
                s.label.clone(),
                fmt_money(&s.amount),
                format!("{:.1}%", share.round_dp(1)),
            ]
        })
        .collect();
    println!("Spending for {}", month);
    println!("{}", pretty_table(&["Category", "Spent", "Share"], data));
    Ok(())
}

fn summary(ledger: &Ledger, sub: &clap::ArgMatches) -> Result<()> {
    let month = month_or_default(ledger, sub)?;
    let summary = ledger.period_summary(&month)?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &summary)? {
        return Ok(());
    }
    let data = vec![
        vec!["Income".to_string(), fmt_money(&summary.income)],
        vec!["Spending".to_string(), fmt_money(&summary.spending)],
        vec![
            "Net".to_string(),
            fmt_money(&(summary.income - summary.spending)),
        ],
        vec![
            "Ready to Assign".to_string(),
            fmt_money(&ledger.ready_to_assign()?),
        ],
    ];
    println!("Summary for {}", month);
    println!("{}", pretty_table(&["", "Amount"], data));
    Ok(())
}
