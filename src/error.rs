// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rust_decimal::Decimal;
use thiserror::Error;

/// Failures surfaced by ledger operations.
///
/// Every mutating operation either commits all of its effects or returns one
/// of these and leaves the store untouched.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Malformed input, rejected before any store write.
    #[error("invalid input: {0}")]
    Validation(String),

    #[error("{entity} '{key}' not found")]
    NotFound { entity: &'static str, key: String },

    #[error("{entity} '{key}' already exists")]
    DuplicateKey { entity: &'static str, key: String },

    /// The underlying store could not be opened or initialised.
    #[error("ledger store unavailable: {0}")]
    StoreUnavailable(String),

    /// A store-level read or write failed; the surrounding operation was rolled back.
    #[error("store operation aborted: {0}")]
    TransactionAborted(#[from] rusqlite::Error),

    /// A persisted value no longer parses (for example a hand-edited amount).
    #[error("corrupt record: {0}")]
    CorruptRecord(String),
}

pub type LedgerResult<T> = Result<T, LedgerError>;

impl LedgerError {
    pub fn account_not_found(name: &str) -> Self {
        LedgerError::NotFound {
            entity: "account",
            key: name.to_string(),
        }
    }

    pub fn transaction_not_found(id: i64) -> Self {
        LedgerError::NotFound {
            entity: "transaction",
            key: id.to_string(),
        }
    }

    pub fn invalid_amount(amount: Decimal) -> Self {
        LedgerError::Validation(format!("amount must not be negative (got {})", amount))
    }

    pub fn amount_out_of_range() -> Self {
        LedgerError::Validation("amount out of range".to_string())
    }

    /// True when the session cannot continue and the front end should fall
    /// back to an empty, read-only state.
    pub fn is_fatal(&self) -> bool {
        matches!(self, LedgerError::StoreUnavailable(_))
    }
}
