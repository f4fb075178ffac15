// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! A coherent in-memory copy of the ledger and the JSON interchange document.

use chrono::{NaiveDate, Utc};
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{LedgerError, LedgerResult};
use crate::models::{Account, BudgetPeriod, CategoryGroups, Transaction, TxType};
use crate::store;

/// Everything the read-only calculators consult, read in one store transaction.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub transactions: Vec<Transaction>,
    pub accounts: Vec<Account>,
    pub categories: Vec<String>,
    pub groups: CategoryGroups,
    pub budget_periods: BTreeMap<String, BudgetPeriod>,
    pub ready_to_assign: Decimal,
}

impl Snapshot {
    pub fn load(conn: &Connection) -> LedgerResult<Self> {
        let tx = conn.unchecked_transaction()?;
        let snapshot = Snapshot {
            transactions: store::all_transactions(&tx)?,
            accounts: store::all_accounts(&tx)?,
            categories: store::all_categories(&tx)?,
            groups: store::all_category_groups(&tx)?,
            budget_periods: store::all_budget_periods(&tx)?,
            ready_to_assign: store::get_ready_to_assign(&tx)?,
        };
        tx.commit()?;
        Ok(snapshot)
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
            && self.accounts.is_empty()
            && self.categories.is_empty()
            && self.budget_periods.is_empty()
    }

    pub fn account(&self, name: &str) -> Option<&Account> {
        self.accounts.iter().find(|a| a.name == name)
    }

    pub fn filter_transactions(&self, filter: &TransactionFilter) -> Vec<&Transaction> {
        let mut out: Vec<&Transaction> = self
            .transactions
            .iter()
            .filter(|t| filter.matches(t))
            .collect();
        out.sort_by(|a, b| b.date.cmp(&a.date).then(b.id.cmp(&a.id)));
        if let Some(limit) = filter.limit {
            out.truncate(limit);
        }
        out
    }
}

#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    pub month: Option<String>,
    pub account: Option<String>,
    pub category: Option<String>,
    /// Case-insensitive match on payee or memo.
    pub search: Option<String>,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub limit: Option<usize>,
}

impl TransactionFilter {
    pub fn matches(&self, t: &Transaction) -> bool {
        if let Some(month) = &self.month {
            if !t.in_period(month) {
                return false;
            }
        }
        if let Some(account) = &self.account {
            if &t.account != account {
                return false;
            }
        }
        if let Some(category) = &self.category {
            if t.category_name() != Some(category.as_str()) {
                return false;
            }
        }
        if let Some(start) = self.start {
            if t.date < start {
                return false;
            }
        }
        if let Some(end) = self.end {
            if t.date > end {
                return false;
            }
        }
        if let Some(term) = self
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
        {
            let term = term.to_lowercase();
            let hit = |s: &Option<String>| {
                s.as_deref()
                    .is_some_and(|v| v.to_lowercase().contains(&term))
            };
            if !hit(&t.payee) && !hit(&t.memo) {
                return false;
            }
        }
        true
    }
}

/// Income and net spending (expense minus refund) for one period.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PeriodSummary {
    pub income: Decimal,
    pub spending: Decimal,
}

pub fn period_summary(period: &str, transactions: &[Transaction]) -> PeriodSummary {
    let mut summary = PeriodSummary::default();
    for t in transactions.iter().filter(|t| t.in_period(period)) {
        match t.r#type {
            TxType::Income => summary.income += t.amount,
            TxType::Expense | TxType::Refund => {
                summary.spending += t.r#type.spending_delta(t.amount)
            }
            TxType::Transfer => {}
        }
    }
    summary
}

// ---- interchange document ----

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentTransaction {
    /// Written as a string; older exports used numbers. Never read back,
    /// imported transactions get fresh ids.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<serde_json::Value>,
    pub date: String,
    /// Kept as text so one unknown type skips a single entry on import.
    pub r#type: String,
    pub account: String,
    #[serde(default)]
    pub category: Option<String>,
    pub amount: Decimal,
    #[serde(default)]
    pub payee: Option<String>,
    #[serde(default)]
    pub memo: Option<String>,
}

impl From<&Transaction> for DocumentTransaction {
    fn from(t: &Transaction) -> Self {
        DocumentTransaction {
            id: Some(serde_json::Value::String(t.id.to_string())),
            date: t.date.to_string(),
            r#type: t.r#type.to_string(),
            account: t.account.clone(),
            category: t.category.clone(),
            amount: t.amount,
            payee: t.payee.clone(),
            memo: t.memo.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportMetadata {
    pub mode: String,
    pub timestamp: String,
}

/// The de facto interchange format for whole-ledger import and export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerDocument {
    pub accounts: BTreeMap<String, Decimal>,
    pub transactions: Vec<DocumentTransaction>,
    pub categories: Vec<String>,
    pub category_groups: BTreeMap<String, String>,
    pub budget_periods: BTreeMap<String, BTreeMap<String, Decimal>>,
    pub ready_to_assign: Decimal,
    #[serde(default, rename = "_account_types", skip_serializing_if = "Option::is_none")]
    pub account_types: Option<BTreeMap<String, String>>,
    #[serde(default, rename = "_export_metadata", skip_serializing_if = "Option::is_none")]
    pub export_metadata: Option<ExportMetadata>,
}

impl LedgerDocument {
    pub fn from_snapshot(snapshot: &Snapshot) -> Self {
        LedgerDocument {
            accounts: snapshot
                .accounts
                .iter()
                .map(|a| (a.name.clone(), a.balance))
                .collect(),
            transactions: snapshot.transactions.iter().map(DocumentTransaction::from).collect(),
            categories: snapshot.categories.clone(),
            category_groups: snapshot.groups.0.clone(),
            budget_periods: snapshot
                .budget_periods
                .iter()
                .map(|(p, record)| (p.clone(), record.budget.clone()))
                .collect(),
            ready_to_assign: snapshot.ready_to_assign,
            account_types: Some(
                snapshot
                    .accounts
                    .iter()
                    .map(|a| (a.name.clone(), a.r#type.clone()))
                    .collect(),
            ),
            export_metadata: Some(ExportMetadata {
                mode: "standalone".to_string(),
                timestamp: Utc::now().to_rfc3339(),
            }),
        }
    }

    /// Parses a document; all six collection keys must be present.
    pub fn from_json(text: &str) -> LedgerResult<Self> {
        serde_json::from_str(text)
            .map_err(|e| LedgerError::Validation(format!("invalid ledger document: {}", e)))
    }

    pub fn to_json(&self) -> LedgerResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| {
            LedgerError::Validation(format!("cannot serialise ledger document: {}", e))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tx(id: i64, date: &str, r#type: TxType, category: &str, amount: i64) -> Transaction {
        Transaction {
            id,
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            r#type,
            account: "Checking".into(),
            category: Some(category.into()),
            amount: Decimal::from(amount),
            payee: Some(format!("Payee {}", id)),
            memo: None,
            entry_timestamp: String::new(),
        }
    }

    #[test]
    fn summary_nets_refunds_and_ignores_transfers() {
        let txs = vec![
            tx(1, "2024-03-01", TxType::Income, "Salary", 2000),
            tx(2, "2024-03-02", TxType::Expense, "Groceries", 120),
            tx(3, "2024-03-03", TxType::Refund, "Groceries", 20),
            tx(4, "2024-03-04", TxType::Transfer, "", 500),
            tx(5, "2024-04-01", TxType::Expense, "Groceries", 99),
        ];
        let s = period_summary("2024-03", &txs);
        assert_eq!(s.income, Decimal::from(2000));
        assert_eq!(s.spending, Decimal::from(100));
    }

    #[test]
    fn filter_orders_newest_first_and_limits() {
        let snapshot = Snapshot {
            transactions: vec![
                tx(1, "2024-03-01", TxType::Expense, "Groceries", 10),
                tx(2, "2024-03-09", TxType::Expense, "Dining", 20),
                tx(3, "2024-03-05", TxType::Expense, "Groceries", 30),
            ],
            ..Snapshot::default()
        };
        let filter = TransactionFilter {
            category: Some("Groceries".into()),
            ..TransactionFilter::default()
        };
        let ids: Vec<i64> = snapshot.filter_transactions(&filter).iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![3, 1]);

        let filter = TransactionFilter {
            search: Some("payee 2".into()),
            limit: Some(1),
            ..TransactionFilter::default()
        };
        let ids: Vec<i64> = snapshot.filter_transactions(&filter).iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![2]);
    }

    #[test]
    fn document_requires_every_collection() {
        let err =
            LedgerDocument::from_json(r#"{"accounts": {}, "transactions": []}"#).unwrap_err();
        assert!(matches!(err, LedgerError::Validation(_)));
    }

    #[test]
    fn document_accepts_numeric_ids_and_amounts() {
        let doc = LedgerDocument::from_json(
            r#"{
                "accounts": {"Checking": 500.25},
                "transactions": [{"id": 7, "date": "2024-03-05", "type": "expense",
                                  "account": "Checking", "category": "Groceries", "amount": 12.5}],
                "categories": ["Groceries"],
                "category_groups": {"Groceries": "Expenses"},
                "budget_periods": {"2024-03": {"Groceries": 200}},
                "ready_to_assign": 300
            }"#,
        )
        .unwrap();
        assert_eq!(doc.accounts["Checking"], Decimal::new(50025, 2));
        assert_eq!(doc.transactions[0].id, Some(serde_json::json!(7)));
        assert_eq!(doc.transactions[0].r#type, "expense");
        assert_eq!(doc.transactions[0].amount, Decimal::new(125, 1));
        assert_eq!(doc.budget_periods["2024-03"]["Groceries"], Decimal::from(200));
        assert_eq!(doc.ready_to_assign, Decimal::from(300));
    }

    #[test]
    fn amounts_keep_every_digit_through_json() {
        let balance = Decimal::new(123456789012345678, 2);
        let doc = LedgerDocument {
            accounts: [("Checking".to_string(), balance)].into_iter().collect(),
            transactions: Vec::new(),
            categories: Vec::new(),
            category_groups: BTreeMap::new(),
            budget_periods: BTreeMap::new(),
            ready_to_assign: balance,
            account_types: None,
            export_metadata: None,
        };
        let text = doc.to_json().unwrap();
        assert!(text.contains("1234567890123456.78"));

        let back = LedgerDocument::from_json(&text).unwrap();
        assert_eq!(back.accounts["Checking"], balance);
        assert_eq!(back.ready_to_assign, balance);
    }
}
