// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Calendar-month arithmetic on `YYYY-MM` period identifiers.

use chrono::{Datelike, Local, Months, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::models::Transaction;

static PERIOD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{4}-\d{2}$").unwrap());

pub fn is_valid_period(period: &str) -> bool {
    first_day(period).is_some()
}

/// First day of the month named by `period`, or `None` if it is malformed.
pub fn first_day(period: &str) -> Option<NaiveDate> {
    if !PERIOD_RE.is_match(period) {
        return None;
    }
    let year: i32 = period[..4].parse().ok()?;
    let month: u32 = period[5..].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, 1)
}

fn format_period(date: NaiveDate) -> String {
    format!("{:04}-{:02}", date.year(), date.month())
}

pub fn current_real_month() -> String {
    format_period(Local::now().date_naive())
}

pub fn previous_period(period: &str) -> Option<String> {
    let last_of_previous = first_day(period)?.pred_opt()?;
    Some(format_period(last_of_previous))
}

pub fn next_period(period: &str) -> Option<String> {
    let next = first_day(period)?.checked_add_months(Months::new(1))?;
    Some(format_period(next))
}

pub fn earliest_month(transactions: &[Transaction]) -> Option<String> {
    transactions.iter().map(Transaction::period).min()
}

pub fn latest_month(transactions: &[Transaction]) -> Option<String> {
    transactions.iter().map(Transaction::period).max()
}

/// Which month-navigation moves make sense from the displayed period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Navigation {
    pub can_go_back: bool,
    pub can_go_forward: bool,
}

pub fn navigation(displayed: &str, earliest: Option<&str>, current: &str) -> Navigation {
    Navigation {
        can_go_back: earliest.is_none_or(|e| displayed > e),
        can_go_forward: displayed < current,
    }
}
