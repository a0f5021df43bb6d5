//! Input types for creating and editing free-form events.
//!
//! Following the Functional Core pattern, these are pure data types with no I/O.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::time::shift_to_utc;
use super::types::{CalendarEvent, Category};

/// The fields a user enters when adding or editing an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventDraft {
    pub title: String,
    /// First day of the event (local date).
    pub start: NaiveDate,
    /// Last day of the event (local date, inclusive).
    pub end: NaiveDate,
    #[serde(default)]
    pub category: Category,
    #[serde(default)]
    pub description: String,
}

impl EventDraft {
    /// Create a draft with just a title and dates.
    pub fn new(title: impl Into<String>, start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            title: title.into(),
            start,
            end,
            category: Category::default(),
            description: String::new(),
        }
    }

    /// Set the event category.
    pub fn with_category(mut self, category: impl Into<Category>) -> Self {
        self.category = category.into();
        self
    }

    /// Set the event description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Convert into a stored event without an id: dates shifted to UTC and
    /// the category normalized to its plain name.
    pub fn into_event(self) -> CalendarEvent {
        CalendarEvent {
            id: None,
            start_date: shift_to_utc(self.start),
            end_date: shift_to_utc(self.end),
            title: self.title,
            description: self.description,
            category: Some(self.category.normalize()),
        }
    }
}
