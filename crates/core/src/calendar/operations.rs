use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::storage::DateRange;

use super::color::generate_color;
use super::error::EventError;
use super::requests::EventDraft;
use super::types::{
    CalendarEvent, EventCategorySummary, EventInput, ExtendedProps, FREE_FORM_ID, UNCATEGORIZED,
};

/// Validates an event draft before creation or update.
pub fn validate_event_draft(draft: &EventDraft) -> Result<(), EventError> {
    if draft.title.trim().is_empty() {
        return Err(EventError::EmptyTitle);
    }
    if draft.title.chars().count() > 200 {
        return Err(EventError::TitleTooLong);
    }
    if draft.end < draft.start {
        return Err(EventError::InvalidDateRange);
    }
    Ok(())
}

/// Decides whether an event is shown for a visible range.
///
/// An event is shown when its start OR its end falls inside the range.
/// An event spanning the whole range with both endpoints outside it is not
/// shown.
pub fn is_visible(start: NaiveDate, end: NaiveDate, range: &DateRange) -> bool {
    range.contains(start) || range.contains(end)
}

/// Returns the category an event is displayed under.
pub fn display_category(event: &CalendarEvent) -> String {
    match event.category_title() {
        "" => UNCATEGORIZED.to_string(),
        title => title.to_string(),
    }
}

/// Builds the display record for an event with parseable dates.
fn to_event_input(id: &str, event: &CalendarEvent, start: NaiveDate, end: NaiveDate) -> EventInput {
    let category = display_category(event);
    EventInput {
        id: format!("{}.{}", FREE_FORM_ID, id),
        all_day: true,
        editable: true,
        start,
        end: end.succ_opt().unwrap_or(end),
        title: event.title.clone(),
        color: generate_color(&category),
        extended_props: ExtendedProps {
            category,
            description: event.description.clone(),
            id: id.to_string(),
        },
    }
}

/// Projects stored events into display records for an inclusive range.
///
/// Events without an id or with a malformed date are skipped silently.
/// Records are ordered by start date, then title, then id.
pub fn project_events<'a>(
    events: impl IntoIterator<Item = &'a CalendarEvent>,
    range: DateRange,
) -> Vec<EventInput> {
    let mut inputs: Vec<EventInput> = events
        .into_iter()
        .filter_map(|event| {
            let id = event.id.as_deref()?;
            let start = event.start()?;
            let end = event.end()?;
            is_visible(start, end, &range).then(|| to_event_input(id, event, start, end))
        })
        .collect();

    inputs.sort_by(|a, b| {
        a.start
            .cmp(&b.start)
            .then_with(|| a.title.cmp(&b.title))
            .then_with(|| a.id.cmp(&b.id))
    });
    inputs
}

/// Aggregates display records per category, ordered by category title.
///
/// The subtitle is the first record's title; categories with more than one
/// record get `"<count> events"` instead.
pub fn summarize_categories(inputs: &[EventInput]) -> Vec<EventCategorySummary> {
    let mut summaries: BTreeMap<&str, EventCategorySummary> = BTreeMap::new();

    for input in inputs {
        summaries
            .entry(input.extended_props.category.as_str())
            .and_modify(|summary| summary.event_count += 1)
            .or_insert_with(|| EventCategorySummary {
                title: input.extended_props.category.clone(),
                color: input.color.clone(),
                sub_title: input.title.clone(),
                event_count: 1,
            });
    }

    summaries
        .into_values()
        .map(|mut summary| {
            if summary.event_count > 1 {
                summary.sub_title = format!("{} events", summary.event_count);
            }
            summary
        })
        .collect()
}
