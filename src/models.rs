// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

pub const INCOME_GROUP: &str = "Income";
pub const SAVINGS_GROUP: &str = "Savings Goals";
pub const ARCHIVED_GROUP: &str = "Archived";
pub const UNASSIGNED_GROUP: &str = "Unassigned";
pub const UNCATEGORIZED: &str = "Uncategorized";
/// Tags income that has no assigned source; never shown as a budget row.
pub const UNKNOWN_INCOME_SOURCE: &str = "Unknown Income Source";
pub const OTHER_LABEL: &str = "Other";
/// Key of the single metadata record holding Ready to Assign.
pub const RTA_KEY: &str = "appData";

/// Default groups offered by front ends even when no category uses them yet.
pub const DEFAULT_GROUPS: [&str; 5] = [
    INCOME_GROUP,
    "Expenses",
    "Bills",
    SAVINGS_GROUP,
    ARCHIVED_GROUP,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TxType {
    Income,
    Expense,
    Refund,
    Transfer,
}

impl TxType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TxType::Income => "income",
            TxType::Expense => "expense",
            TxType::Refund => "refund",
            TxType::Transfer => "transfer",
        }
    }

    /// Signed effect of a transaction of this type on its account balance.
    pub fn balance_delta(&self, amount: Decimal) -> Decimal {
        match self {
            TxType::Income | TxType::Refund => amount,
            TxType::Expense => -amount,
            TxType::Transfer => Decimal::ZERO,
        }
    }

    /// Signed contribution to a category's net spending.
    pub fn spending_delta(&self, amount: Decimal) -> Decimal {
        match self {
            TxType::Expense => amount,
            TxType::Refund => -amount,
            TxType::Income | TxType::Transfer => Decimal::ZERO,
        }
    }
}

impl fmt::Display for TxType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TxType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "income" => Ok(TxType::Income),
            "expense" => Ok(TxType::Expense),
            "refund" => Ok(TxType::Refund),
            "transfer" => Ok(TxType::Transfer),
            other => Err(format!(
                "unknown transaction type '{}' (use income|expense|refund|transfer)",
                other
            )),
        }
    }
}

/// Input for a transaction that has not been stored yet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTransaction {
    pub date: NaiveDate,
    pub r#type: TxType,
    pub account: String,
    pub category: Option<String>,
    pub amount: Decimal,
    pub payee: Option<String>,
    pub memo: Option<String>,
}

impl NewTransaction {
    pub fn new(
        date: NaiveDate,
        r#type: TxType,
        account: &str,
        category: Option<&str>,
        amount: Decimal,
    ) -> Self {
        Self {
            date,
            r#type,
            account: account.to_string(),
            category: category.map(str::to_string),
            amount,
            payee: None,
            memo: None,
        }
    }

    pub fn with_payee(mut self, payee: &str) -> Self {
        self.payee = Some(payee.to_string());
        self
    }

    pub fn with_memo(mut self, memo: &str) -> Self {
        self.memo = Some(memo.to_string());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub date: NaiveDate,
    pub r#type: TxType,
    pub account: String,
    pub category: Option<String>,
    pub amount: Decimal,
    pub payee: Option<String>,
    pub memo: Option<String>,
    pub entry_timestamp: String,
}

impl Transaction {
    /// `YYYY-MM` of the transaction date.
    pub fn period(&self) -> String {
        self.date.format("%Y-%m").to_string()
    }

    pub fn in_period(&self, period: &str) -> bool {
        self.period() == period
    }

    pub fn category_name(&self) -> Option<&str> {
        self.category.as_deref().filter(|c| !c.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub name: String,
    pub balance: Decimal,
    pub r#type: String,
}

/// Budgeted amounts for one calendar month, keyed by category name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BudgetPeriod {
    pub period: String,
    pub budget: BTreeMap<String, Decimal>,
}

impl BudgetPeriod {
    pub fn empty(period: &str) -> Self {
        Self {
            period: period.to_string(),
            budget: BTreeMap::new(),
        }
    }

    pub fn amount_for(&self, category: &str) -> Decimal {
        self.budget.get(category).copied().unwrap_or(Decimal::ZERO)
    }

    pub fn total(&self) -> Decimal {
        self.budget.values().copied().sum()
    }
}

/// Classification of a category by the group it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupKind {
    /// Funds Ready to Assign; not a budget row.
    Income,
    /// Shown with distinct treatment, left out of spending breakdowns.
    SavingsGoals,
    /// Hidden from the budget view entirely.
    Archived,
    /// No group mapping.
    Unassigned,
    Expense,
}

impl GroupKind {
    pub fn of(group: Option<&str>) -> Self {
        match group {
            None | Some("") => GroupKind::Unassigned,
            Some(INCOME_GROUP) => GroupKind::Income,
            Some(SAVINGS_GROUP) => GroupKind::SavingsGoals,
            Some(ARCHIVED_GROUP) => GroupKind::Archived,
            Some(UNASSIGNED_GROUP) => GroupKind::Unassigned,
            Some(_) => GroupKind::Expense,
        }
    }
}

/// Category → group name mapping with one-lookup classification.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryGroups(pub BTreeMap<String, String>);

impl CategoryGroups {
    pub fn group_name<'a>(&'a self, category: &str) -> &'a str {
        self.0
            .get(category)
            .map(String::as_str)
            .filter(|g| !g.is_empty())
            .unwrap_or(UNASSIGNED_GROUP)
    }

    pub fn kind(&self, category: &str) -> GroupKind {
        GroupKind::of(self.0.get(category).map(String::as_str))
    }

    /// Default groups no category is assigned to yet.
    pub fn empty_defaults(&self) -> Vec<&'static str> {
        DEFAULT_GROUPS
            .into_iter()
            .filter(|g| !self.0.values().any(|v| v == g))
            .collect()
    }
}

impl FromIterator<(String, String)> for CategoryGroups {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        CategoryGroups(iter.into_iter().collect())
    }
}
