// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Month-by-month budget table: carryover, budgeted, activity and available.

use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::models::{
    ARCHIVED_GROUP, BudgetPeriod, CategoryGroups, GroupKind, INCOME_GROUP, SAVINGS_GROUP,
    Transaction, UNASSIGNED_GROUP, UNCATEGORIZED, UNKNOWN_INCOME_SOURCE,
};
use crate::period::previous_period;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetRow {
    pub name: String,
    pub group: String,
    /// Carryover from the previous period.
    pub prev_avail: Decimal,
    pub budgeted: Decimal,
    /// Net spending (activity) in this period.
    pub spent: Decimal,
    pub available: Decimal,
    pub is_savings_goal: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BudgetTotals {
    pub budgeted: Decimal,
    pub spent: Decimal,
    pub available: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetView {
    pub period: String,
    pub rows: Vec<BudgetRow>,
    pub totals: BudgetTotals,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetGroup<'a> {
    pub name: &'a str,
    pub rows: Vec<&'a BudgetRow>,
}

/// Net spending for one category in one period: expenses minus refunds.
pub fn net_spending(period: &str, category: &str, transactions: &[Transaction]) -> Decimal {
    transactions
        .iter()
        .filter(|t| t.category_name() == Some(category) && t.in_period(period))
        .map(|t| t.r#type.spending_delta(t.amount))
        .sum()
}

fn display_categories(categories: &[String]) -> Vec<&str> {
    let mut out: Vec<&str> = categories
        .iter()
        .map(String::as_str)
        .filter(|c| *c != UNKNOWN_INCOME_SOURCE && *c != UNCATEGORIZED)
        .collect();
    out.sort_unstable();
    out.dedup();
    if categories.iter().any(|c| c == UNCATEGORIZED) {
        out.push(UNCATEGORIZED);
    }
    out
}

pub fn compute_budget_view(
    period: &str,
    categories: &[String],
    budget_periods: &BTreeMap<String, BudgetPeriod>,
    transactions: &[Transaction],
    groups: &CategoryGroups,
) -> BudgetView {
    tracing::debug!(period, categories = categories.len(), "computing budget view");

    let empty = BudgetPeriod::default();
    let period_budget = budget_periods.get(period).unwrap_or(&empty);
    let prev = previous_period(period);
    let prev_budget = prev
        .as_deref()
        .and_then(|p| budget_periods.get(p))
        .unwrap_or(&empty);

    let mut rows = Vec::new();
    for cat in display_categories(categories) {
        let kind = groups.kind(cat);
        if matches!(kind, GroupKind::Archived | GroupKind::Income) {
            continue;
        }

        let budgeted = period_budget.amount_for(cat);
        let spent = net_spending(period, cat, transactions);
        let prev_avail = match prev.as_deref() {
            Some(p) => prev_budget.amount_for(cat) - net_spending(p, cat, transactions),
            None => Decimal::ZERO,
        };

        rows.push(BudgetRow {
            name: cat.to_string(),
            group: groups.group_name(cat).to_string(),
            prev_avail,
            budgeted,
            spent,
            available: prev_avail + budgeted - spent,
            is_savings_goal: kind == GroupKind::SavingsGoals,
        });
    }

    let budgeted: Decimal = rows.iter().map(|r| r.budgeted).sum();
    let spent: Decimal = rows.iter().map(|r| r.spent).sum();
    let carried: Decimal = rows.iter().map(|r| r.prev_avail).sum();

    BudgetView {
        period: period.to_string(),
        rows,
        totals: BudgetTotals {
            budgeted,
            spent,
            available: carried + budgeted - spent,
        },
    }
}

fn group_rank(name: &str) -> u8 {
    match name {
        INCOME_GROUP => 1,
        "Bills" => 2,
        "Expenses" => 3,
        SAVINGS_GROUP => 10,
        ARCHIVED_GROUP => 11,
        UNASSIGNED_GROUP => 99,
        _ => 5,
    }
}

impl BudgetView {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows bucketed by group for display: groups by fixed precedence then
    /// name, categories alphabetical within each group.
    pub fn grouped(&self) -> Vec<BudgetGroup<'_>> {
        let mut buckets: BTreeMap<&str, Vec<&BudgetRow>> = BTreeMap::new();
        for row in &self.rows {
            buckets.entry(row.group.as_str()).or_default().push(row);
        }
        let mut groups: Vec<BudgetGroup<'_>> = buckets
            .into_iter()
            .map(|(name, mut rows)| {
                rows.sort_by(|a, b| a.name.cmp(&b.name));
                BudgetGroup { name, rows }
            })
            .collect();
        groups.sort_by(|a, b| {
            group_rank(a.name)
                .cmp(&group_rank(b.name))
                .then_with(|| a.name.cmp(b.name))
        });
        groups
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TxType;
    use chrono::NaiveDate;

    fn expense(id: i64, date: &str, category: &str, amount: i64) -> Transaction {
        Transaction {
            id,
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            r#type: TxType::Expense,
            account: "Checking".into(),
            category: Some(category.into()),
            amount: Decimal::from(amount),
            payee: None,
            memo: None,
            entry_timestamp: String::new(),
        }
    }

    fn budgets(entries: &[(&str, &str, i64)]) -> BTreeMap<String, BudgetPeriod> {
        let mut out: BTreeMap<String, BudgetPeriod> = BTreeMap::new();
        for (period, cat, amount) in entries {
            out.entry(period.to_string())
                .or_insert_with(|| BudgetPeriod::empty(period))
                .budget
                .insert(cat.to_string(), Decimal::from(*amount));
        }
        out
    }

    fn groups(entries: &[(&str, &str)]) -> CategoryGroups {
        entries
            .iter()
            .map(|(c, g)| (c.to_string(), g.to_string()))
            .collect()
    }

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn carryover_from_previous_month() {
        let b = budgets(&[("2024-02", "Groceries", 100), ("2024-03", "Groceries", 50)]);
        let txs = vec![
            expense(1, "2024-02-10", "Groceries", 40),
            expense(2, "2024-03-10", "Groceries", 10),
        ];
        let view = compute_budget_view("2024-03", &names(&["Groceries"]), &b, &txs, &groups(&[]));
        let row = &view.rows[0];
        assert_eq!(row.prev_avail, Decimal::from(60));
        assert_eq!(row.budgeted, Decimal::from(50));
        assert_eq!(row.spent, Decimal::from(10));
        assert_eq!(row.available, Decimal::from(100));
    }

    #[test]
    fn income_archived_and_placeholder_are_not_rows() {
        let cats = names(&["Salary", "Old Gym", "Unknown Income Source", "Rent"]);
        let g = groups(&[("Salary", "Income"), ("Old Gym", "Archived"), ("Rent", "Bills")]);
        let view = compute_budget_view("2024-03", &cats, &BTreeMap::new(), &[], &g);
        let rows: Vec<&str> = view.rows.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(rows, vec!["Rent"]);
    }

    #[test]
    fn uncategorized_sorts_last() {
        let cats = names(&["Uncategorized", "Dining", "Auto"]);
        let view = compute_budget_view("2024-03", &cats, &BTreeMap::new(), &[], &groups(&[]));
        let rows: Vec<&str> = view.rows.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(rows, vec!["Auto", "Dining", "Uncategorized"]);
    }

    #[test]
    fn refunds_reduce_activity() {
        let mut refund = expense(2, "2024-03-12", "Dining", 15);
        refund.r#type = TxType::Refund;
        let txs = vec![expense(1, "2024-03-10", "Dining", 40), refund];
        let view = compute_budget_view(
            "2024-03",
            &names(&["Dining"]),
            &BTreeMap::new(),
            &txs,
            &groups(&[]),
        );
        assert_eq!(view.rows[0].spent, Decimal::from(25));
        assert_eq!(view.rows[0].available, Decimal::from(-25));
    }

    #[test]
    fn savings_goals_are_tagged_and_can_go_negative() {
        let b = budgets(&[("2024-02", "Vacation", 10)]);
        let txs = vec![expense(1, "2024-02-03", "Vacation", 50)];
        let g = groups(&[("Vacation", "Savings Goals")]);
        let view = compute_budget_view("2024-03", &names(&["Vacation"]), &b, &txs, &g);
        assert!(view.rows[0].is_savings_goal);
        assert_eq!(view.rows[0].prev_avail, Decimal::from(-40));
        assert_eq!(view.rows[0].available, Decimal::from(-40));
    }

    #[test]
    fn totals_agree_with_row_sums() {
        let b = budgets(&[
            ("2024-02", "Groceries", 100),
            ("2024-02", "Rent", 900),
            ("2024-03", "Groceries", 50),
            ("2024-03", "Fun", 30),
        ]);
        let txs = vec![
            expense(1, "2024-02-10", "Groceries", 40),
            expense(2, "2024-02-01", "Rent", 950),
            expense(3, "2024-03-10", "Fun", 45),
        ];
        let cats = names(&["Groceries", "Rent", "Fun"]);
        let view = compute_budget_view("2024-03", &cats, &b, &txs, &groups(&[("Rent", "Bills")]));
        let row_sum: Decimal = view.rows.iter().map(|r| r.available).sum();
        let carried: Decimal = view.rows.iter().map(|r| r.prev_avail).sum();
        assert_eq!(view.totals.available, row_sum);
        assert_eq!(
            view.totals.available,
            carried + view.totals.budgeted - view.totals.spent
        );
    }

    #[test]
    fn empty_category_set_yields_zero_totals() {
        let view = compute_budget_view("2024-03", &[], &BTreeMap::new(), &[], &groups(&[]));
        assert!(view.is_empty());
        assert_eq!(view.totals, BudgetTotals::default());
    }

    #[test]
    fn malformed_period_has_no_carryover() {
        let b = budgets(&[("2024-02", "Groceries", 100)]);
        let view = compute_budget_view("March", &names(&["Groceries"]), &b, &[], &groups(&[]));
        assert_eq!(view.rows[0].prev_avail, Decimal::ZERO);
    }

    #[test]
    fn groups_follow_display_precedence() {
        let cats = names(&["Zoo", "Rent", "Phone", "Vacation", "Food", "Misc", "Coffee"]);
        let g = groups(&[
            ("Rent", "Bills"),
            ("Phone", "Bills"),
            ("Vacation", "Savings Goals"),
            ("Food", "Expenses"),
            ("Misc", "Hobbies"),
            ("Coffee", "Daily"),
        ]);
        let view = compute_budget_view("2024-03", &cats, &BTreeMap::new(), &[], &g);
        let grouped = view.grouped();
        let order: Vec<&str> = grouped.iter().map(|g| g.name).collect();
        assert_eq!(
            order,
            vec!["Bills", "Expenses", "Daily", "Hobbies", "Savings Goals", "Unassigned"]
        );
        let bills: Vec<&str> = grouped[0].rows.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(bills, vec!["Phone", "Rent"]);
    }
}
