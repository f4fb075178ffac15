// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Mutations that keep account balances and Ready to Assign in lockstep with
//! the ledger.
//!
//! Each operation runs inside one SQLite transaction. An early return drops
//! the transaction uncommitted, which rolls every write back.

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{info, warn};

use crate::error::{LedgerError, LedgerResult};
use crate::ledger::Ledger;
use crate::models::{Account, BudgetPeriod, NewTransaction, Transaction, TxType};
use crate::period::is_valid_period;
use crate::snapshot::LedgerDocument;
use crate::store;

fn entry_timestamp() -> String {
    Utc::now().to_rfc3339()
}

fn require_name(what: &str, value: &str) -> LedgerResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(LedgerError::Validation(format!("{} name must not be empty", what)));
    }
    Ok(trimmed.to_string())
}

fn require_non_negative(amount: Decimal) -> LedgerResult<()> {
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(LedgerError::invalid_amount(amount));
    }
    Ok(())
}

/// Unwraps a checked `Decimal` operation; overflow is a validation error.
fn in_range(value: Option<Decimal>) -> LedgerResult<Decimal> {
    value.ok_or_else(LedgerError::amount_out_of_range)
}

/// Counts reported by [`Ledger::import_snapshot`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub transactions: usize,
    pub accounts: usize,
    pub categories: usize,
    pub budget_periods: usize,
    pub skipped: usize,
}

impl Ledger {
    /// Records a transaction and applies its effect to the account balance
    /// and, for income, to Ready to Assign. Returns the new id.
    pub fn add_transaction(&mut self, new: NewTransaction) -> LedgerResult<i64> {
        require_non_negative(new.amount)?;
        let account_name = require_name("account", &new.account)?;
        let new = NewTransaction {
            account: account_name,
            category: new.category.filter(|c| !c.trim().is_empty()),
            ..new
        };

        let tx = self.conn.transaction()?;
        let id = store::add_transaction(&tx, &new, &entry_timestamp())?;

        let mut account = store::get_account(&tx, &new.account)?
            .ok_or_else(|| LedgerError::account_not_found(&new.account))?;
        account.balance = in_range(
            account
                .balance
                .checked_add(new.r#type.balance_delta(new.amount)),
        )?;
        store::put_account(&tx, &account)?;

        let mut rta = store::get_ready_to_assign(&tx)?;
        if new.r#type == TxType::Income {
            rta = in_range(rta.checked_add(new.amount))?;
            store::put_ready_to_assign(&tx, rta)?;
        }
        tx.commit()?;

        info!(
            id,
            kind = %new.r#type,
            account = %account.name,
            amount = %new.amount,
            balance = %account.balance,
            rta = %rta,
            "transaction added"
        );
        Ok(id)
    }

    /// Removes a transaction and reverses everything adding it did.
    pub fn delete_transaction(&mut self, id: i64) -> LedgerResult<Transaction> {
        let tx = self.conn.transaction()?;
        let existing =
            store::get_transaction(&tx, id)?.ok_or_else(|| LedgerError::transaction_not_found(id))?;
        store::delete_transaction(&tx, id)?;

        let mut account = store::get_account(&tx, &existing.account)?
            .ok_or_else(|| LedgerError::account_not_found(&existing.account))?;
        account.balance = in_range(
            account
                .balance
                .checked_sub(existing.r#type.balance_delta(existing.amount)),
        )?;
        store::put_account(&tx, &account)?;

        let mut rta = store::get_ready_to_assign(&tx)?;
        if existing.r#type == TxType::Income {
            rta = in_range(rta.checked_sub(existing.amount))?;
            store::put_ready_to_assign(&tx, rta)?;
        }
        tx.commit()?;

        info!(
            id,
            account = %account.name,
            balance = %account.balance,
            rta = %rta,
            "transaction deleted"
        );
        Ok(existing)
    }

    /// Sets the amount budgeted to `category` in `period`; the difference
    /// from the previous amount comes out of (or goes back to) Ready to Assign.
    pub fn set_budgeted_amount(
        &mut self,
        period: &str,
        category: &str,
        amount: Decimal,
    ) -> LedgerResult<()> {
        if !is_valid_period(period) {
            return Err(LedgerError::Validation(format!(
                "invalid period '{}', expected YYYY-MM",
                period
            )));
        }
        let category = require_name("category", category)?;
        require_non_negative(amount)?;

        let tx = self.conn.transaction()?;
        let mut record =
            store::get_budget_period(&tx, period)?.unwrap_or_else(|| BudgetPeriod::empty(period));
        let old = record.amount_for(&category);
        record.budget.insert(category.clone(), amount);
        store::put_budget_period(&tx, &record)?;

        let delta = in_range(amount.checked_sub(old))?;
        let rta = in_range(store::get_ready_to_assign(&tx)?.checked_sub(delta))?;
        store::put_ready_to_assign(&tx, rta)?;
        tx.commit()?;

        info!(period, category = %category, old = %old, new = %amount, rta = %rta, "budget set");
        Ok(())
    }

    /// Opens a new account; its starting balance funds Ready to Assign.
    pub fn add_account(&mut self, name: &str, balance: Decimal, r#type: &str) -> LedgerResult<()> {
        let name = require_name("account", name)?;
        let account = Account {
            name,
            balance,
            r#type: r#type.trim().to_string(),
        };

        let tx = self.conn.transaction()?;
        if store::get_account(&tx, &account.name)?.is_some() {
            return Err(LedgerError::DuplicateKey {
                entity: "account",
                key: account.name,
            });
        }
        store::add_account(&tx, &account)?;
        let rta = in_range(store::get_ready_to_assign(&tx)?.checked_add(balance))?;
        store::put_ready_to_assign(&tx, rta)?;
        tx.commit()?;

        info!(account = %account.name, balance = %balance, rta = %rta, "account added");
        Ok(())
    }

    /// Maps `category` to `group`; an empty group removes the mapping.
    pub fn set_category_group(&mut self, category: &str, group: &str) -> LedgerResult<()> {
        let category = require_name("category", category)?;
        let group = group.trim();

        let tx = self.conn.transaction()?;
        if group.is_empty() {
            store::delete_category_group(&tx, &category)?;
        } else {
            store::put_category_group(&tx, &category, group)?;
        }
        tx.commit()?;

        info!(category = %category, group, "category group set");
        Ok(())
    }

    pub fn add_category(&mut self, name: &str, group: Option<&str>) -> LedgerResult<()> {
        let name = require_name("category", name)?;
        let group = group.map(str::trim).filter(|g| !g.is_empty());

        let tx = self.conn.transaction()?;
        store::add_category(&tx, &name)?;
        if let Some(group) = group {
            store::put_category_group(&tx, &name, group)?;
        }
        tx.commit()?;

        info!(category = %name, group = group.unwrap_or(""), "category added");
        Ok(())
    }

    /// Replaces the whole ledger with the contents of `doc`. Balances and
    /// Ready to Assign are taken as written, not recomputed.
    pub fn import_snapshot(&mut self, doc: &LedgerDocument) -> LedgerResult<ImportSummary> {
        let mut summary = ImportSummary::default();
        let stamp = entry_timestamp();

        let tx = self.conn.transaction()?;
        store::clear_all(&tx)?;

        for item in &doc.transactions {
            let Ok(date) = NaiveDate::parse_from_str(&item.date, "%Y-%m-%d") else {
                warn!(date = %item.date, "skipping imported transaction with invalid date");
                summary.skipped += 1;
                continue;
            };
            let Ok(r#type) = item.r#type.parse::<TxType>() else {
                warn!(kind = %item.r#type, "skipping imported transaction with unknown type");
                summary.skipped += 1;
                continue;
            };
            if item.account.trim().is_empty() || require_non_negative(item.amount).is_err() {
                warn!(
                    account = %item.account,
                    amount = %item.amount,
                    "skipping invalid imported transaction"
                );
                summary.skipped += 1;
                continue;
            }
            let new = NewTransaction {
                date,
                r#type,
                account: item.account.trim().to_string(),
                category: item.category.clone().filter(|c| !c.trim().is_empty()),
                amount: item.amount,
                payee: item.payee.clone(),
                memo: item.memo.clone(),
            };
            store::add_transaction(&tx, &new, &stamp)?;
            summary.transactions += 1;
        }

        for (name, balance) in &doc.accounts {
            if name.trim().is_empty() {
                summary.skipped += 1;
                continue;
            }
            let r#type = doc
                .account_types
                .as_ref()
                .and_then(|types| types.get(name))
                .cloned()
                .unwrap_or_else(|| "unknown".to_string());
            store::put_account(
                &tx,
                &Account {
                    name: name.clone(),
                    balance: *balance,
                    r#type,
                },
            )?;
            summary.accounts += 1;
        }

        for name in &doc.categories {
            if name.trim().is_empty() {
                summary.skipped += 1;
                continue;
            }
            store::put_category(&tx, name)?;
            summary.categories += 1;
        }

        for (category, group) in &doc.category_groups {
            if category.trim().is_empty() || group.trim().is_empty() {
                summary.skipped += 1;
                continue;
            }
            store::put_category_group(&tx, category, group)?;
        }

        for (period, budget) in &doc.budget_periods {
            if !is_valid_period(period) {
                warn!(period = %period, "skipping budget period with invalid key");
                summary.skipped += 1;
                continue;
            }
            let record = BudgetPeriod {
                period: period.clone(),
                budget: budget.clone(),
            };
            store::put_budget_period(&tx, &record)?;
            summary.budget_periods += 1;
        }

        store::put_ready_to_assign(&tx, doc.ready_to_assign)?;
        tx.commit()?;

        info!(
            transactions = summary.transactions,
            accounts = summary.accounts,
            categories = summary.categories,
            budget_periods = summary.budget_periods,
            skipped = summary.skipped,
            "ledger imported"
        );
        Ok(summary)
    }

    pub fn clear_all(&mut self) -> LedgerResult<()> {
        let tx = self.conn.transaction()?;
        store::clear_all(&tx)?;
        tx.commit()?;
        info!("ledger cleared");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_zero_is_not_negative() {
        assert!(require_non_negative(Decimal::ZERO).is_ok());
        assert!(require_non_negative(-Decimal::ZERO).is_ok());
        assert!(require_non_negative(Decimal::new(-1, 2)).is_err());
    }

    #[test]
    fn blank_names_are_rejected() {
        assert!(matches!(
            require_name("account", "   "),
            Err(LedgerError::Validation(_))
        ));
        assert_eq!(require_name("account", " Checking ").unwrap(), "Checking");
    }
}
