use chrono::{Datelike, NaiveDate};

use crate::error::MarginError;
use crate::MarginResult;

/// Parse an ISO `YYYY-MM-DD` valuation date.
pub fn parse_as_of(value: &str) -> MarginResult<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|e| MarginError::DateError(format!("'{value}' is not a YYYY-MM-DD date: {e}")))
}

/// Full month name and year, e.g. "January 2024".
pub fn month_label(date: NaiveDate) -> String {
    date.format("%B %Y").to_string()
}

/// Calendar quarter (1-4) of a date.
pub fn quarter_of(date: NaiveDate) -> u32 {
    date.month0() / 3 + 1
}

/// Quarter and year, e.g. "Q1 2024".
pub fn quarter_label(date: NaiveDate) -> String {
    format!("Q{} {}", quarter_of(date), date.year())
}

/// Whole days from `from` to `to`, never negative.
pub fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    to.signed_duration_since(from).num_days().max(0)
}
