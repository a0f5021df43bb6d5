use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

use super::time::shift_to_local;

/// Category shown for events stored without one.
pub const UNCATEGORIZED: &str = "Uncategorized";

/// Prefix of display record ids produced by the free-form event source.
pub const FREE_FORM_ID: &str = "FreeForm";

/// An event category as stored or entered.
///
/// Stored documents carry either a plain category name or a resolved
/// `{ id, title }` record. Both normalize to the title string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Category {
    Name(String),
    Resolved {
        #[serde(default)]
        id: String,
        title: String,
    },
}

impl Category {
    /// Returns the normalized category name.
    pub fn title(&self) -> &str {
        match self {
            Category::Name(name) => name,
            Category::Resolved { title, .. } => title,
        }
    }

    /// Converts into the normalized plain-name form.
    pub fn normalize(self) -> Self {
        match self {
            Category::Resolved { title, .. } => Category::Name(title),
            name => name,
        }
    }

    /// Returns true if this category belongs in the known-categories set.
    ///
    /// Empty names and the "Uncategorized" placeholder never do.
    pub fn is_registrable(&self) -> bool {
        let title = self.title();
        !title.is_empty() && title != UNCATEGORIZED
    }
}

impl Default for Category {
    fn default() -> Self {
        Category::Name(String::new())
    }
}

impl From<&str> for Category {
    fn from(name: &str) -> Self {
        Category::Name(name.to_string())
    }
}

impl From<String> for Category {
    fn from(name: String) -> Self {
        Category::Name(name)
    }
}

/// A free-form calendar event as persisted in the document store.
///
/// Dates are ISO-8601 UTC strings; see [`super::shift_to_utc`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEvent {
    /// Assigned by the store on creation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub start_date: String,
    #[serde(default)]
    pub end_date: String,
    /// Unrecognized shapes read as no category.
    #[serde(
        default,
        deserialize_with = "lenient_category",
        skip_serializing_if = "Option::is_none"
    )]
    pub category: Option<Category>,
}

fn lenient_category<'de, D>(deserializer: D) -> Result<Option<Category>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

impl CalendarEvent {
    /// Local start date, or `None` if the stored value is malformed.
    pub fn start(&self) -> Option<NaiveDate> {
        shift_to_local(&self.start_date)
    }

    /// Local end date, or `None` if the stored value is malformed.
    pub fn end(&self) -> Option<NaiveDate> {
        shift_to_local(&self.end_date)
    }

    /// Normalized category name; empty when the event has none.
    pub fn category_title(&self) -> &str {
        self.category.as_ref().map(Category::title).unwrap_or("")
    }

}

/// Extra data carried by a display record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtendedProps {
    pub category: String,
    pub description: String,
    pub id: String,
}

/// A display record handed to the calendar renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventInput {
    /// `FreeForm.<event id>`.
    pub id: String,
    pub all_day: bool,
    pub editable: bool,
    pub start: NaiveDate,
    /// Exclusive: the day after the event's last day.
    pub end: NaiveDate,
    pub title: String,
    pub color: String,
    pub extended_props: ExtendedProps,
}

/// Per-category aggregate shown next to the calendar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventCategorySummary {
    pub title: String,
    pub color: String,
    /// The single event's title, or `"<count> events"` when there are more.
    pub sub_title: String,
    pub event_count: usize,
}
