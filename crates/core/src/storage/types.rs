use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::DateRangeError;

/// A date range with inclusive start and end dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// Creates a new date range, validating that start <= end.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, DateRangeError> {
        if start > end {
            return Err(DateRangeError::InvalidRange);
        }
        Ok(Self { start, end })
    }

    /// Returns true if `date` lies within the range, bounds included.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// The half-open range a calendar view asks for: `start` is the first
/// visible day, `end` is the day after the last visible one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DisplayRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Converts the exclusive end into an inclusive date range.
    ///
    /// Fails for empty views (`end <= start`).
    pub fn to_inclusive(self) -> Result<DateRange, DateRangeError> {
        let end = self.end.pred_opt().ok_or(DateRangeError::InvalidRange)?;
        DateRange::new(self.start, end)
    }
}

/// A named collection returned by the document store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentCollection {
    pub name: String,
    #[serde(default)]
    pub documents: Vec<Value>,
}

impl DocumentCollection {
    pub fn new(name: impl Into<String>, documents: Vec<Value>) -> Self {
        Self {
            name: name.into(),
            documents,
        }
    }
}

/// Returns the `id` field of a document, if it is a string.
pub fn document_id(document: &Value) -> Option<&str> {
    document.get("id").and_then(Value::as_str)
}
