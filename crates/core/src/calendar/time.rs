//! Conversions between local calendar dates and stored UTC instants.
//!
//! Events are all-day. A local date is stored as midnight UTC of the same
//! wall-clock date, so converting back only needs the UTC date component.

use chrono::{DateTime, Datelike, NaiveDate, Utc};

/// Format used for stored start/end dates.
pub const STORED_DATE_FORMAT: &str = "%Y-%m-%dT00:00:00.000Z";

/// Converts a local calendar date to the ISO-8601 UTC string stored in
/// documents.
pub fn shift_to_utc(date: NaiveDate) -> String {
    date.format(STORED_DATE_FORMAT).to_string()
}

/// Converts a stored date string back to a local calendar date.
///
/// Accepts RFC 3339 instants and plain `YYYY-MM-DD` dates. Returns `None`
/// for anything else.
pub fn shift_to_local(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    if let Ok(instant) = DateTime::parse_from_rfc3339(value) {
        return Some(instant.with_timezone(&Utc).date_naive());
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}

/// Formats the month of `date` as `MM-YYYY`.
pub fn format_month_year(date: NaiveDate) -> String {
    date.format("%m-%Y").to_string()
}

/// Returns `MM-YYYY` for every month from `start`'s month to `end`'s month,
/// inclusive and in order. Empty when `end` is in an earlier month.
pub fn months_in_range(start: NaiveDate, end: NaiveDate) -> Vec<String> {
    let mut months = Vec::new();
    let (mut year, mut month) = (start.year(), start.month());
    let last = (end.year(), end.month());

    while (year, month) <= last {
        months.push(format!("{:02}-{}", month, year));
        if month == 12 {
            year += 1;
            month = 1;
        } else {
            month += 1;
        }
    }

    months
}
