// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rusqlite::Connection;
use std::path::Path;

use crate::error::{LedgerError, LedgerResult};

pub fn open(path: &Path) -> LedgerResult<Connection> {
    let conn = Connection::open(path).map_err(|e| {
        LedgerError::StoreUnavailable(format!("open DB at {}: {}", path.display(), e))
    })?;
    init_schema(&conn)?;
    Ok(conn)
}

pub fn open_in_memory() -> LedgerResult<Connection> {
    let conn = Connection::open_in_memory()
        .map_err(|e| LedgerError::StoreUnavailable(format!("open in-memory DB: {}", e)))?;
    init_schema(&conn)?;
    Ok(conn)
}

pub fn init_schema(conn: &Connection) -> LedgerResult<()> {
    conn.execute_batch(
        r#"
    CREATE TABLE IF NOT EXISTS transactions(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        date TEXT NOT NULL,
        type TEXT NOT NULL CHECK(type IN ('income','expense','refund','transfer')),
        account TEXT NOT NULL,
        category TEXT,
        amount TEXT NOT NULL,
        payee TEXT,
        memo TEXT,
        entry_timestamp TEXT NOT NULL
    );
    CREATE INDEX IF NOT EXISTS idx_transactions_date ON transactions(date);
    CREATE INDEX IF NOT EXISTS idx_transactions_category ON transactions(category);
    CREATE INDEX IF NOT EXISTS idx_transactions_account ON transactions(account);

    CREATE TABLE IF NOT EXISTS accounts(
        name TEXT PRIMARY KEY,
        balance TEXT NOT NULL,
        type TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS categories(
        name TEXT PRIMARY KEY
    );

    CREATE TABLE IF NOT EXISTS category_groups(
        category_name TEXT PRIMARY KEY,
        group_name TEXT NOT NULL
    );

    -- one row per (period, category); read back as a single record per period
    CREATE TABLE IF NOT EXISTS budget_periods(
        period TEXT NOT NULL,
        category TEXT NOT NULL,
        amount TEXT NOT NULL,
        PRIMARY KEY(period, category)
    );

    CREATE TABLE IF NOT EXISTS metadata(
        key TEXT PRIMARY KEY,
        ready_to_assign TEXT NOT NULL
    );
    "#,
    )
    .map_err(|e| LedgerError::StoreUnavailable(format!("initialise schema: {}", e)))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_creates_six_collections() {
        let conn = open_in_memory().unwrap();
        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name IN \
                 ('transactions','accounts','categories','category_groups', \
                  'budget_periods','metadata')",
                [],
                |r| r.get(0),
            )
            .unwrap();
        assert_eq!(count, 6);
    }

    #[test]
    fn schema_is_idempotent() {
        let conn = open_in_memory().unwrap();
        init_schema(&conn).unwrap();
    }

    #[test]
    fn unopenable_path_is_store_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let err = open(&dir.path().join("missing").join("ledger.sqlite")).unwrap_err();
        assert!(err.is_fatal());
    }
}
