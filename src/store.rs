// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Per-collection access to the six ledger collections.
//!
//! Every function takes a plain `&Connection`; callers that need several
//! calls to succeed or fail together pass a `rusqlite::Transaction`, which
//! derefs to a connection.

use chrono::NaiveDate;
use rusqlite::{Connection, ErrorCode, OptionalExtension, Row, params};
use rust_decimal::Decimal;
use std::collections::BTreeMap;

use crate::error::{LedgerError, LedgerResult};
use crate::models::{
    Account, BudgetPeriod, CategoryGroups, NewTransaction, RTA_KEY, Transaction, TxType,
};

fn parse_amount(raw: &str, what: &str) -> LedgerResult<Decimal> {
    raw.parse::<Decimal>()
        .map_err(|_| LedgerError::CorruptRecord(format!("invalid amount '{}' for {}", raw, what)))
}

fn is_constraint_violation(err: &rusqlite::Error) -> bool {
    matches!(err, rusqlite::Error::SqliteFailure(e, _) if e.code == ErrorCode::ConstraintViolation)
}

// ---- transactions ----

struct RawTransaction {
    id: i64,
    date: String,
    r#type: String,
    account: String,
    category: Option<String>,
    amount: String,
    payee: Option<String>,
    memo: Option<String>,
    entry_timestamp: String,
}

const TX_COLUMNS: &str = "id, date, type, account, category, amount, payee, memo, entry_timestamp";

fn raw_transaction(r: &Row<'_>) -> rusqlite::Result<RawTransaction> {
    Ok(RawTransaction {
        id: r.get(0)?,
        date: r.get(1)?,
        r#type: r.get(2)?,
        account: r.get(3)?,
        category: r.get(4)?,
        amount: r.get(5)?,
        payee: r.get(6)?,
        memo: r.get(7)?,
        entry_timestamp: r.get(8)?,
    })
}

impl RawTransaction {
    fn into_transaction(self) -> LedgerResult<Transaction> {
        let what = format!("transaction {}", self.id);
        let date = NaiveDate::parse_from_str(&self.date, "%Y-%m-%d").map_err(|_| {
            LedgerError::CorruptRecord(format!("invalid date '{}' for {}", self.date, what))
        })?;
        let r#type = self
            .r#type
            .parse::<TxType>()
            .map_err(|e: String| LedgerError::CorruptRecord(format!("{} for {}", e, what)))?;
        Ok(Transaction {
            id: self.id,
            date,
            r#type,
            account: self.account,
            category: self.category,
            amount: parse_amount(&self.amount, &what)?,
            payee: self.payee,
            memo: self.memo,
            entry_timestamp: self.entry_timestamp,
        })
    }
}

pub fn all_transactions(conn: &Connection) -> LedgerResult<Vec<Transaction>> {
    let mut stmt = conn.prepare(&format!("SELECT {} FROM transactions ORDER BY id", TX_COLUMNS))?;
    let rows = stmt.query_map([], raw_transaction)?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?.into_transaction()?);
    }
    Ok(out)
}

pub fn get_transaction(conn: &Connection, id: i64) -> LedgerResult<Option<Transaction>> {
    let raw = conn
        .query_row(
            &format!("SELECT {} FROM transactions WHERE id=?1", TX_COLUMNS),
            params![id],
            raw_transaction,
        )
        .optional()?;
    raw.map(RawTransaction::into_transaction).transpose()
}

/// Inserts a transaction and returns its store-assigned id.
pub fn add_transaction(
    conn: &Connection,
    tx: &NewTransaction,
    entry_timestamp: &str,
) -> LedgerResult<i64> {
    conn.execute(
        "INSERT INTO transactions
             (date, type, account, category, amount, payee, memo, entry_timestamp)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            tx.date.to_string(),
            tx.r#type.as_str(),
            tx.account,
            tx.category,
            tx.amount.to_string(),
            tx.payee,
            tx.memo,
            entry_timestamp
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Returns whether a row was removed.
pub fn delete_transaction(conn: &Connection, id: i64) -> LedgerResult<bool> {
    let n = conn.execute("DELETE FROM transactions WHERE id=?1", params![id])?;
    Ok(n > 0)
}

// ---- accounts ----

fn read_account(name: String, balance: String, r#type: String) -> LedgerResult<Account> {
    let balance = parse_amount(&balance, &format!("account '{}'", name))?;
    Ok(Account {
        name,
        balance,
        r#type,
    })
}

pub fn all_accounts(conn: &Connection) -> LedgerResult<Vec<Account>> {
    let mut stmt = conn.prepare("SELECT name, balance, type FROM accounts ORDER BY name")?;
    let rows = stmt.query_map([], |r| {
        Ok((
            r.get::<_, String>(0)?,
            r.get::<_, String>(1)?,
            r.get::<_, String>(2)?,
        ))
    })?;
    let mut out = Vec::new();
    for row in rows {
        let (name, balance, typ) = row?;
        out.push(read_account(name, balance, typ)?);
    }
    Ok(out)
}

pub fn get_account(conn: &Connection, name: &str) -> LedgerResult<Option<Account>> {
    let row = conn
        .query_row(
            "SELECT name, balance, type FROM accounts WHERE name=?1",
            params![name],
            |r| {
                Ok((
                    r.get::<_, String>(0)?,
                    r.get::<_, String>(1)?,
                    r.get::<_, String>(2)?,
                ))
            },
        )
        .optional()?;
    row.map(|(n, b, t)| read_account(n, b, t)).transpose()
}

/// Inserts a new account; fails with `DuplicateKey` if the name is taken.
pub fn add_account(conn: &Connection, account: &Account) -> LedgerResult<()> {
    let res = conn.execute(
        "INSERT INTO accounts(name, balance, type) VALUES (?1, ?2, ?3)",
        params![account.name, account.balance.to_string(), account.r#type],
    );
    match res {
        Ok(_) => Ok(()),
        Err(e) if is_constraint_violation(&e) => Err(LedgerError::DuplicateKey {
            entity: "account",
            key: account.name.clone(),
        }),
        Err(e) => Err(e.into()),
    }
}

pub fn put_account(conn: &Connection, account: &Account) -> LedgerResult<()> {
    conn.execute(
        "INSERT INTO accounts(name, balance, type) VALUES (?1, ?2, ?3)
         ON CONFLICT(name) DO UPDATE SET balance=excluded.balance, type=excluded.type",
        params![account.name, account.balance.to_string(), account.r#type],
    )?;
    Ok(())
}

// ---- categories ----

pub fn all_categories(conn: &Connection) -> LedgerResult<Vec<String>> {
    let mut stmt = conn.prepare("SELECT name FROM categories ORDER BY name")?;
    let rows = stmt.query_map([], |r| r.get::<_, String>(0))?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}

pub fn add_category(conn: &Connection, name: &str) -> LedgerResult<()> {
    match conn.execute("INSERT INTO categories(name) VALUES (?1)", params![name]) {
        Ok(_) => Ok(()),
        Err(e) if is_constraint_violation(&e) => Err(LedgerError::DuplicateKey {
            entity: "category",
            key: name.to_string(),
        }),
        Err(e) => Err(e.into()),
    }
}

pub fn put_category(conn: &Connection, name: &str) -> LedgerResult<()> {
    conn.execute(
        "INSERT INTO categories(name) VALUES (?1) ON CONFLICT(name) DO NOTHING",
        params![name],
    )?;
    Ok(())
}

// ---- category groups ----

pub fn all_category_groups(conn: &Connection) -> LedgerResult<CategoryGroups> {
    let mut stmt = conn.prepare("SELECT category_name, group_name FROM category_groups")?;
    let rows = stmt.query_map([], |r| Ok((r.get::<_, String>(0)?, r.get::<_, String>(1)?)))?;
    let mut out = BTreeMap::new();
    for row in rows {
        let (cat, group) = row?;
        out.insert(cat, group);
    }
    Ok(CategoryGroups(out))
}

pub fn put_category_group(conn: &Connection, category: &str, group: &str) -> LedgerResult<()> {
    conn.execute(
        "INSERT INTO category_groups(category_name, group_name) VALUES (?1, ?2)
         ON CONFLICT(category_name) DO UPDATE SET group_name=excluded.group_name",
        params![category, group],
    )?;
    Ok(())
}

pub fn delete_category_group(conn: &Connection, category: &str) -> LedgerResult<()> {
    conn.execute(
        "DELETE FROM category_groups WHERE category_name=?1",
        params![category],
    )?;
    Ok(())
}

// ---- budget periods ----

pub fn all_budget_periods(conn: &Connection) -> LedgerResult<BTreeMap<String, BudgetPeriod>> {
    let mut stmt = conn.prepare("SELECT period, category, amount FROM budget_periods")?;
    let rows = stmt.query_map([], |r| {
        Ok((
            r.get::<_, String>(0)?,
            r.get::<_, String>(1)?,
            r.get::<_, String>(2)?,
        ))
    })?;
    let mut out: BTreeMap<String, BudgetPeriod> = BTreeMap::new();
    for row in rows {
        let (period, category, amount) = row?;
        let amount = parse_amount(&amount, &format!("budget {} / {}", period, category))?;
        out.entry(period.clone())
            .or_insert_with(|| BudgetPeriod::empty(&period))
            .budget
            .insert(category, amount);
    }
    Ok(out)
}

pub fn get_budget_period(conn: &Connection, period: &str) -> LedgerResult<Option<BudgetPeriod>> {
    let mut stmt =
        conn.prepare_cached("SELECT category, amount FROM budget_periods WHERE period=?1")?;
    let rows = stmt.query_map(params![period], |r| {
        Ok((r.get::<_, String>(0)?, r.get::<_, String>(1)?))
    })?;
    let mut record: Option<BudgetPeriod> = None;
    for row in rows {
        let (category, amount) = row?;
        let amount = parse_amount(&amount, &format!("budget {} / {}", period, category))?;
        record
            .get_or_insert_with(|| BudgetPeriod::empty(period))
            .budget
            .insert(category, amount);
    }
    Ok(record)
}

/// Replaces the stored record for `record.period`.
pub fn put_budget_period(conn: &Connection, record: &BudgetPeriod) -> LedgerResult<()> {
    conn.execute(
        "DELETE FROM budget_periods WHERE period=?1",
        params![record.period],
    )?;
    let mut stmt = conn.prepare_cached(
        "INSERT INTO budget_periods(period, category, amount) VALUES (?1, ?2, ?3)",
    )?;
    for (category, amount) in &record.budget {
        stmt.execute(params![record.period, category, amount.to_string()])?;
    }
    Ok(())
}

// ---- metadata ----

/// Ready to Assign; an absent record reads as zero.
pub fn get_ready_to_assign(conn: &Connection) -> LedgerResult<Decimal> {
    let raw: Option<String> = conn
        .query_row(
            "SELECT ready_to_assign FROM metadata WHERE key=?1",
            params![RTA_KEY],
            |r| r.get(0),
        )
        .optional()?;
    match raw {
        Some(s) => parse_amount(&s, "ready_to_assign"),
        None => Ok(Decimal::ZERO),
    }
}

pub fn put_ready_to_assign(conn: &Connection, value: Decimal) -> LedgerResult<()> {
    conn.execute(
        "INSERT INTO metadata(key, ready_to_assign) VALUES (?1, ?2)
         ON CONFLICT(key) DO UPDATE SET ready_to_assign=excluded.ready_to_assign",
        params![RTA_KEY, value.to_string()],
    )?;
    Ok(())
}

pub fn clear_all(conn: &Connection) -> LedgerResult<()> {
    conn.execute_batch(
        "DELETE FROM transactions;
         DELETE FROM accounts;
         DELETE FROM categories;
         DELETE FROM category_groups;
         DELETE FROM budget_periods;
         DELETE FROM metadata;",
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;

    #[test]
    fn budget_period_record_round_trips_through_rows() {
        let conn = db::open_in_memory().unwrap();
        assert!(get_budget_period(&conn, "2024-03").unwrap().is_none());

        let mut record = BudgetPeriod::empty("2024-03");
        record.budget.insert("Groceries".into(), Decimal::new(20000, 2));
        record.budget.insert("Rent".into(), Decimal::from(900));
        put_budget_period(&conn, &record).unwrap();
        assert_eq!(get_budget_period(&conn, "2024-03").unwrap(), Some(record.clone()));

        record.budget.remove("Rent");
        put_budget_period(&conn, &record).unwrap();
        let all = all_budget_periods(&conn).unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all["2024-03"].budget.len(), 1);
    }

    #[test]
    fn add_account_rejects_duplicates() {
        let conn = db::open_in_memory().unwrap();
        let acct = Account {
            name: "Checking".into(),
            balance: Decimal::from(10),
            r#type: "checking".into(),
        };
        add_account(&conn, &acct).unwrap();
        let err = add_account(&conn, &acct).unwrap_err();
        assert!(matches!(err, LedgerError::DuplicateKey { entity: "account", .. }));
    }

    #[test]
    fn transaction_ids_are_monotonic() {
        let conn = db::open_in_memory().unwrap();
        let tx = NewTransaction::new(
            NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(),
            TxType::Expense,
            "Checking",
            Some("Groceries"),
            Decimal::new(1250, 2),
        );
        let a = add_transaction(&conn, &tx, "2024-03-05T00:00:00Z").unwrap();
        assert!(delete_transaction(&conn, a).unwrap());
        let b = add_transaction(&conn, &tx, "2024-03-05T00:00:00Z").unwrap();
        assert!(b > a);
        let stored = get_transaction(&conn, b).unwrap().unwrap();
        assert_eq!(stored.amount, Decimal::new(1250, 2));
        assert_eq!(stored.r#type, TxType::Expense);
    }

    #[test]
    fn corrupt_amount_is_reported() {
        let conn = db::open_in_memory().unwrap();
        conn.execute(
            "INSERT INTO metadata(key, ready_to_assign) VALUES ('appData', 'lots')",
            [],
        )
        .unwrap();
        assert!(matches!(
            get_ready_to_assign(&conn),
            Err(LedgerError::CorruptRecord(_))
        ));
    }
}
