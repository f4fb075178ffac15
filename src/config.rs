// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use directories::ProjectDirs;
use once_cell::sync::Lazy;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{LedgerError, LedgerResult};

static APP: Lazy<(&str, &str, &str)> =
    Lazy::new(|| ("com.alphavelocity", "Budgetbook", "budgetbook"));

pub const DB_ENV: &str = "BUDGETBOOK_DB";
pub const LOG_ENV: &str = "BUDGETBOOK_LOG";
pub const DEFAULT_LOG_FILTER: &str = "budgetbook=info";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub db_path: PathBuf,
    pub log_filter: String,
}

impl Config {
    /// Resolves settings from `BUDGETBOOK_DB` / `BUDGETBOOK_LOG`, falling
    /// back to the platform data directory and `budgetbook=info`. An
    /// explicit database path (`--db`) wins over both.
    pub fn from_env(db_override: Option<&Path>) -> LedgerResult<Self> {
        let db_path = match (db_override, env::var_os(DB_ENV)) {
            (Some(p), _) => p.to_path_buf(),
            (None, Some(p)) if !p.is_empty() => PathBuf::from(p),
            _ => default_db_path()?,
        };
        let log_filter = env::var(LOG_ENV)
            .ok()
            .filter(|f| !f.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());
        Ok(Config {
            db_path,
            log_filter,
        })
    }
}

pub fn default_db_path() -> LedgerResult<PathBuf> {
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2).ok_or_else(|| {
        LedgerError::StoreUnavailable("could not determine platform data dir".to_string())
    })?;
    let data_dir = proj.data_dir();
    fs::create_dir_all(data_dir).map_err(|e| {
        LedgerError::StoreUnavailable(format!("create data dir {}: {}", data_dir.display(), e))
    })?;
    Ok(data_dir.join("budgetbook.sqlite"))
}
