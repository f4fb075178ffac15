// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::ledger::Ledger;
use crate::models::{NewTransaction, Transaction, TxType};
use crate::snapshot::TransactionFilter;
use crate::utils::{
    fmt_money, maybe_print_json, parse_date, parse_decimal, parse_month, pretty_table, required,
};
use anyhow::{Result, anyhow};

pub fn handle(ledger: &mut Ledger, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(ledger, sub)?,
        Some(("list", sub)) => list(ledger, sub)?,
        Some(("rm", sub)) => rm(ledger, sub)?,
        _ => {}
    }
    Ok(())
}

fn add(ledger: &mut Ledger, sub: &clap::ArgMatches) -> Result<()> {
    let date = parse_date(required(sub, "date")?)?;
    let r#type: TxType = required(sub, "type")?.parse().map_err(|e: String| anyhow!(e))?;
    let account = required(sub, "account")?.trim();
    let amount = parse_decimal(required(sub, "amount")?)?;
    let category = sub.get_one::<String>("category").map(String::as_str);

    let mut new = NewTransaction::new(date, r#type, account, category, amount);
    if let Some(payee) = sub.get_one::<String>("payee") {
        new = new.with_payee(payee);
    }
    if let Some(memo) = sub.get_one::<String>("memo") {
        new = new.with_memo(memo);
    }

    let id = ledger.add_transaction(new)?;
    let balance = ledger
        .snapshot()?
        .account(account)
        .map(|a| a.balance)
        .unwrap_or_default();
    println!(
        "Recorded #{} {} {} on {} (acct: {}, balance {})",
        id,
        r#type,
        fmt_money(&amount),
        date,
        account,
        fmt_money(&balance)
    );
    Ok(())
}

fn rm(ledger: &mut Ledger, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub
        .get_one::<i64>("id")
        .ok_or_else(|| anyhow!("Missing argument --id"))?;
    let removed = ledger.delete_transaction(id)?;
    println!(
        "Deleted #{} {} {} on {} (acct: {}). Ready to Assign: {}",
        removed.id,
        removed.r#type,
        fmt_money(&removed.amount),
        removed.date,
        removed.account,
        fmt_money(&ledger.ready_to_assign()?)
    );
    Ok(())
}

fn list(ledger: &Ledger, sub: &clap::ArgMatches) -> Result<()> {
    let data = query_rows(ledger, sub)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|t| {
                vec![
                    t.id.to_string(),
                    t.date.to_string(),
                    t.r#type.to_string(),
                    t.account.clone(),
                    t.category.clone().unwrap_or_default(),
                    fmt_money(&t.amount),
                    t.payee.clone().unwrap_or_default(),
                    t.memo.clone().unwrap_or_default(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["ID", "Date", "Type", "Account", "Category", "Amount", "Payee", "Memo"],
                rows,
            )
        );
    }
    Ok(())
}

pub fn filter_from_args(sub: &clap::ArgMatches) -> Result<TransactionFilter> {
    Ok(TransactionFilter {
        month: sub.get_one::<String>("month").map(|m| parse_month(m)).transpose()?,
        account: sub.get_one::<String>("account").cloned(),
        category: sub.get_one::<String>("category").cloned(),
        search: sub.get_one::<String>("search").cloned(),
        start: sub.get_one::<String>("from").map(|d| parse_date(d)).transpose()?,
        end: sub.get_one::<String>("to").map(|d| parse_date(d)).transpose()?,
        limit: sub.get_one::<usize>("limit").copied(),
    })
}

pub fn query_rows(ledger: &Ledger, sub: &clap::ArgMatches) -> Result<Vec<Transaction>> {
    let filter = filter_from_args(sub)?;
    Ok(ledger.transactions(&filter)?)
}
