mod color;
mod error;
mod operations;
mod requests;
mod time;
mod types;

pub use color::generate_color;
pub use error::EventError;
pub use operations::{
    display_category, is_visible, project_events, summarize_categories, validate_event_draft,
};
pub use requests::EventDraft;
pub use time::{
    format_month_year, months_in_range, shift_to_local, shift_to_utc, STORED_DATE_FORMAT,
};
pub use types::{
    CalendarEvent, Category, EventCategorySummary, EventInput, ExtendedProps, FREE_FORM_ID,
    UNCATEGORIZED,
};
