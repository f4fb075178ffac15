// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::models::{
    CategoryGroups, GroupKind, OTHER_LABEL, Transaction, TxType, UNCATEGORIZED,
    UNKNOWN_INCOME_SOURCE,
};

/// Net totals at or below this are treated as no spending.
pub fn tolerance() -> Decimal {
    Decimal::new(5, 3)
}

/// Slices under this share of the total merge into "Other" once there are
/// more than `MERGE_ABOVE` of them.
const MIN_SHARE_PERCENT: i64 = 3;
const MERGE_ABOVE: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpendingSlice {
    pub label: String,
    pub amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpendingBreakdown {
    pub slices: Vec<SpendingSlice>,
}

impl SpendingBreakdown {
    pub fn labels(&self) -> Vec<&str> {
        self.slices.iter().map(|s| s.label.as_str()).collect()
    }

    pub fn amounts(&self) -> Vec<Decimal> {
        self.slices.iter().map(|s| s.amount).collect()
    }

    pub fn total(&self) -> Decimal {
        self.slices.iter().map(|s| s.amount).sum()
    }
}

/// Per-category net spending for a period, largest first. `None` means there
/// is nothing to chart.
pub fn compute_spending_breakdown(
    period: &str,
    transactions: &[Transaction],
    groups: &CategoryGroups,
) -> Option<SpendingBreakdown> {
    tracing::debug!(period, "computing spending breakdown");

    let mut totals: BTreeMap<&str, Decimal> = BTreeMap::new();
    for t in transactions.iter().filter(|t| t.in_period(period)) {
        if !matches!(t.r#type, TxType::Expense | TxType::Refund) {
            continue;
        }
        let category = t.category_name().unwrap_or(UNCATEGORIZED);
        if category == UNKNOWN_INCOME_SOURCE || groups.kind(category) == GroupKind::SavingsGoals {
            continue;
        }
        *totals.entry(category).or_default() += t.r#type.spending_delta(t.amount);
    }

    let mut slices: Vec<SpendingSlice> = totals
        .into_iter()
        .filter(|(_, amount)| *amount > tolerance())
        .map(|(label, amount)| SpendingSlice {
            label: label.to_string(),
            amount,
        })
        .collect();
    if slices.is_empty() {
        return None;
    }
    slices.sort_by(|a, b| b.amount.cmp(&a.amount));

    if slices.len() > MERGE_ABOVE {
        slices = merge_small_slices(slices);
    }
    Some(SpendingBreakdown { slices })
}

fn merge_small_slices(slices: Vec<SpendingSlice>) -> Vec<SpendingSlice> {
    let total: Decimal = slices.iter().map(|s| s.amount).sum();
    let threshold = total * Decimal::new(MIN_SHARE_PERCENT, 2);

    let (mut kept, small): (Vec<_>, Vec<_>) =
        slices.into_iter().partition(|s| s.amount >= threshold);
    let other: Decimal = small.iter().map(|s| s.amount).sum();
    if other > tolerance() {
        kept.push(SpendingSlice {
            label: OTHER_LABEL.to_string(),
            amount: other,
        });
    }
    kept
}
