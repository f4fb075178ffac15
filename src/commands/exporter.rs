// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::ledger::Ledger;
use crate::utils::required;
use anyhow::{Context, Result};
use std::path::Path;

pub fn handle(ledger: &Ledger, m: &clap::ArgMatches) -> Result<()> {
    let out = required(m, "out")?.trim();
    let n = export_to_path(ledger, Path::new(out))?;
    println!("Exported {} transactions to {}", n, out);
    Ok(())
}

/// Writes the interchange document and returns the transaction count.
pub fn export_to_path(ledger: &Ledger, path: &Path) -> Result<usize> {
    let doc = ledger.export_snapshot()?;
    std::fs::write(path, doc.to_json()?)
        .with_context(|| format!("Write export to {}", path.display()))?;
    Ok(doc.transactions.len())
}
