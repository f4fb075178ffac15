// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! The ledger handle and its read-only query path.
//!
//! Every query loads a fresh [`Snapshot`], so callers re-query after a
//! mutation instead of patching state they already hold.

use rusqlite::Connection;
use rust_decimal::Decimal;
use std::path::Path;

use crate::budget_view::{BudgetView, compute_budget_view};
use crate::db;
use crate::doctor::{self, Issue};
use crate::error::LedgerResult;
use crate::models::{Account, Transaction};
use crate::period::{self, Navigation};
use crate::snapshot::{LedgerDocument, PeriodSummary, Snapshot, TransactionFilter, period_summary};
use crate::spending::{SpendingBreakdown, compute_spending_breakdown};
use crate::store;

pub struct Ledger {
    pub(crate) conn: Connection,
}

impl Ledger {
    pub fn open(path: &Path) -> LedgerResult<Self> {
        Ok(Ledger {
            conn: db::open(path)?,
        })
    }

    pub fn open_in_memory() -> LedgerResult<Self> {
        Ok(Ledger {
            conn: db::open_in_memory()?,
        })
    }

    pub fn snapshot(&self) -> LedgerResult<Snapshot> {
        Snapshot::load(&self.conn)
    }

    pub fn ready_to_assign(&self) -> LedgerResult<Decimal> {
        store::get_ready_to_assign(&self.conn)
    }

    pub fn accounts(&self) -> LedgerResult<Vec<Account>> {
        store::all_accounts(&self.conn)
    }

    pub fn categories(&self) -> LedgerResult<Vec<String>> {
        store::all_categories(&self.conn)
    }

    pub fn transactions(&self, filter: &TransactionFilter) -> LedgerResult<Vec<Transaction>> {
        let snapshot = self.snapshot()?;
        Ok(snapshot
            .filter_transactions(filter)
            .into_iter()
            .cloned()
            .collect())
    }

    pub fn budget_view(&self, period: &str) -> LedgerResult<BudgetView> {
        let s = self.snapshot()?;
        Ok(compute_budget_view(
            period,
            &s.categories,
            &s.budget_periods,
            &s.transactions,
            &s.groups,
        ))
    }

    pub fn spending_breakdown(&self, period: &str) -> LedgerResult<Option<SpendingBreakdown>> {
        let s = self.snapshot()?;
        Ok(compute_spending_breakdown(period, &s.transactions, &s.groups))
    }

    pub fn period_summary(&self, period: &str) -> LedgerResult<PeriodSummary> {
        let s = self.snapshot()?;
        Ok(period_summary(period, &s.transactions))
    }

    /// Latest month with data, or the current month for an empty ledger.
    pub fn default_period(&self) -> LedgerResult<String> {
        let s = self.snapshot()?;
        Ok(period::latest_month(&s.transactions).unwrap_or_else(period::current_real_month))
    }

    pub fn navigation(&self, displayed: &str) -> LedgerResult<Navigation> {
        let s = self.snapshot()?;
        let earliest = period::earliest_month(&s.transactions);
        Ok(period::navigation(
            displayed,
            earliest.as_deref(),
            &period::current_real_month(),
        ))
    }

    pub fn export_snapshot(&self) -> LedgerResult<LedgerDocument> {
        let s = self.snapshot()?;
        Ok(LedgerDocument::from_snapshot(&s))
    }

    pub fn audit(&self) -> LedgerResult<Vec<Issue>> {
        let s = self.snapshot()?;
        Ok(doctor::audit(&s))
    }
}
