//! Input checks run before any repository call.
//!
//! Each check returns the cleaned value or a human readable message naming the
//! field. [`Validator`] collects messages across several fields so a caller can
//! report every problem at once.

use chrono::{DateTime, Datelike, NaiveDate, Utc};

use super::id::RecordId;
use crate::serde::parse_datetime;

/// Checks that `value` is a well-formed record id.
pub fn check_id(value: &str, field: &str) -> Result<RecordId, String> {
    if value.trim().is_empty() {
        return Err(format!("You must provide a {field}"));
    }
    RecordId::parse(value).map_err(|_| format!("{field} is not a valid object id"))
}

/// Checks that `value` is a non-blank string and returns it trimmed.
pub fn check_string(value: &str, field: &str) -> Result<String, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(format!("{field} cannot be an empty string or just spaces"));
    }
    Ok(trimmed.to_string())
}

/// Checks that `value` looks like an email address and returns it lowercased.
pub fn check_email(value: &str, field: &str) -> Result<String, String> {
    let email = check_string(value, field)?.to_lowercase();
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !email.chars().any(char::is_whitespace)
        }
        None => false,
    };
    if !valid {
        return Err(format!("{field} is not a valid email address"));
    }
    Ok(email)
}

/// Parses a `YYYY-MM-DD` calendar date.
pub fn check_date(value: &str, field: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| format!("{field} must be a date in YYYY-MM-DD format"))
}

/// Parses a timestamp in any format accepted by [`parse_datetime`].
pub fn check_datetime(value: &str, field: &str) -> Result<DateTime<Utc>, String> {
    if value.trim().is_empty() {
        return Err(format!("You must provide a {field}"));
    }
    parse_datetime(value).ok_or_else(|| format!("{field} is not a valid date and time"))
}

/// Checks that `start` is strictly before `end` and both fall in years
/// 0 through 9999.
pub fn check_interval(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<(), String> {
    if !(0..=9999).contains(&start.year()) || !(0..=9999).contains(&end.year()) {
        return Err("Event dates must fall between the years 0 and 9999".to_string());
    }
    if start >= end {
        return Err("Start date and time must be before end date and time".to_string());
    }
    Ok(())
}

/// Accumulates validation messages across several checks.
#[derive(Debug, Default)]
pub struct Validator {
    errors: Vec<String>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the error of a failed check and returns its value on success.
    pub fn check<T>(&mut self, result: Result<T, String>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(message) => {
                self.errors.push(message);
                None
            }
        }
    }

    /// Consumes the validator and returns the collected messages.
    pub fn into_messages(self) -> Vec<String> {
        self.errors
    }
}
