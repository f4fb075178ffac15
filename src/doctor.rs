// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Consistency checks over a loaded snapshot. Nothing here writes.

use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

use crate::models::TxType;
use crate::snapshot::Snapshot;
use crate::spending::tolerance;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Issue {
    pub kind: &'static str,
    pub detail: String,
}

impl Issue {
    fn new(kind: &'static str, detail: String) -> Self {
        Issue { kind, detail }
    }
}

pub fn audit(snapshot: &Snapshot) -> Vec<Issue> {
    let mut issues = Vec::new();
    let categories: BTreeSet<&str> = snapshot.categories.iter().map(String::as_str).collect();
    let accounts: BTreeSet<&str> = snapshot.accounts.iter().map(|a| a.name.as_str()).collect();

    for (period, record) in &snapshot.budget_periods {
        for category in record.budget.keys() {
            if !categories.contains(category.as_str()) {
                issues.push(Issue::new(
                    "budget_unknown_category",
                    format!("{} {}", period, category),
                ));
            }
        }
    }

    for t in &snapshot.transactions {
        if !accounts.contains(t.account.as_str()) {
            issues.push(Issue::new(
                "txn_unknown_account",
                format!("#{} {} {}", t.id, t.date, t.account),
            ));
        }
    }

    for (category, group) in &snapshot.groups.0 {
        if !categories.contains(category.as_str()) {
            issues.push(Issue::new(
                "group_unknown_category",
                format!("{} -> {}", category, group),
            ));
        }
    }

    let expected = expected_ready_to_assign(snapshot);
    if (snapshot.ready_to_assign - expected).abs() > tolerance() {
        issues.push(Issue::new(
            "rta_mismatch",
            format!("stored {} expected {}", snapshot.ready_to_assign, expected),
        ));
    }

    for issue in &issues {
        tracing::warn!(kind = issue.kind, detail = %issue.detail, "ledger issue");
    }
    issues
}

/// Ready to Assign rebuilt from opening balances, income and budgets.
/// Opening balances are derived by backing live transactions out of each
/// stored balance.
pub fn expected_ready_to_assign(snapshot: &Snapshot) -> Decimal {
    let mut signed: BTreeMap<&str, Decimal> = BTreeMap::new();
    for t in &snapshot.transactions {
        *signed.entry(t.account.as_str()).or_default() += t.r#type.balance_delta(t.amount);
    }
    let openings: Decimal = snapshot
        .accounts
        .iter()
        .map(|a| a.balance - signed.get(a.name.as_str()).copied().unwrap_or_default())
        .sum();
    let income: Decimal = snapshot
        .transactions
        .iter()
        .filter(|t| t.r#type == TxType::Income)
        .map(|t| t.amount)
        .sum();
    let budgeted: Decimal = snapshot.budget_periods.values().map(|b| b.total()).sum();
    openings + income - budgeted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Account, BudgetPeriod, Transaction};
    use chrono::NaiveDate;

    fn snapshot() -> Snapshot {
        let mut budget = BudgetPeriod::empty("2024-03");
        budget.budget.insert("Groceries".into(), Decimal::from(200));
        Snapshot {
            transactions: vec![Transaction {
                id: 1,
                date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
                r#type: TxType::Income,
                account: "Checking".into(),
                category: None,
                amount: Decimal::from(1000),
                payee: None,
                memo: None,
                entry_timestamp: String::new(),
            }],
            accounts: vec![Account {
                name: "Checking".into(),
                balance: Decimal::from(1500),
                r#type: "checking".into(),
            }],
            categories: vec!["Groceries".into()],
            budget_periods: [("2024-03".to_string(), budget)].into_iter().collect(),
            // opening 500 + income 1000 - budgeted 200
            ready_to_assign: Decimal::from(1300),
            ..Snapshot::default()
        }
    }

    #[test]
    fn consistent_ledger_has_no_issues() {
        assert!(audit(&snapshot()).is_empty());
    }

    #[test]
    fn reports_dangling_references_and_rta_drift() {
        let mut s = snapshot();
        s.ready_to_assign = Decimal::from(1299);
        s.transactions[0].account = "Savings".into();
        s.groups.0.insert("Gone".into(), "Bills".into());

        let kinds: Vec<&str> = audit(&s).iter().map(|i| i.kind).collect();
        assert!(kinds.contains(&"txn_unknown_account"));
        assert!(kinds.contains(&"group_unknown_category"));
        assert!(kinds.contains(&"rta_mismatch"));
    }
}
