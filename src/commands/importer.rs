// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::engine::ImportSummary;
use crate::ledger::Ledger;
use crate::snapshot::LedgerDocument;
use crate::utils::{fmt_money, required};
use anyhow::{Context, Result};
use std::path::Path;

pub fn handle(ledger: &mut Ledger, m: &clap::ArgMatches) -> Result<()> {
    let path = required(m, "path")?.trim();
    let summary = import_from_path(ledger, Path::new(path))?;
    println!(
        "Imported {} transactions, {} accounts, {} categories, {} budget months ({} skipped)",
        summary.transactions,
        summary.accounts,
        summary.categories,
        summary.budget_periods,
        summary.skipped
    );
    println!("Ready to Assign: {}", fmt_money(&ledger.ready_to_assign()?));
    Ok(())
}

/// Replaces the ledger with the document at `path`.
pub fn import_from_path(ledger: &mut Ledger, path: &Path) -> Result<ImportSummary> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Open ledger document {}", path.display()))?;
    let doc = LedgerDocument::from_json(&text)
        .with_context(|| format!("Parse ledger document {}", path.display()))?;
    Ok(ledger.import_snapshot(&doc)?)
}
