// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod budget_view;
pub mod cli;
pub mod commands;
pub mod config;
pub mod db;
pub mod doctor;
pub mod engine;
pub mod error;
pub mod ledger;
pub mod logging;
pub mod models;
pub mod period;
pub mod snapshot;
pub mod spending;
pub mod store;
pub mod utils;

pub use error::{LedgerError, LedgerResult};
pub use ledger::Ledger;
