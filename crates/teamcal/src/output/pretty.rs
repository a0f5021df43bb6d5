//! Pretty output formatting.

use teamcal_core::calendar::{CalendarEvent, EventCategorySummary, EventInput};

/// Format a stored event for display.
pub fn format_event(event: &CalendarEvent) -> String {
    let mut output = format!(
        "{}\n  ID: {}\n  Start: {}\n  End: {}",
        event.title,
        event.id.as_deref().unwrap_or("-"),
        event.start_date,
        event.end_date
    );
    if !event.category_title().is_empty() {
        output.push_str(&format!("\n  Category: {}", event.category_title()));
    }
    if !event.description.is_empty() {
        output.push_str(&format!("\n  Description: {}", event.description));
    }
    output
}

/// Format a display record. The shown end is the last day, not the
/// exclusive boundary.
pub fn format_event_input(input: &EventInput) -> String {
    let last_day = input.end.pred_opt().unwrap_or(input.end);
    let mut output = format!(
        "{} [{}]\n  ID: {}\n  Dates: {} .. {}",
        input.title, input.extended_props.category, input.extended_props.id, input.start, last_day
    );
    if !input.extended_props.description.is_empty() {
        output.push_str(&format!("\n  Description: {}", input.extended_props.description));
    }
    output
}

/// Format display records for display.
pub fn format_event_inputs(inputs: &[EventInput]) -> String {
    if inputs.is_empty() {
        return "No events found.".to_string();
    }
    let mut output = format!("EVENTS ({})\n", inputs.len());
    output.push_str(&"-".repeat(40));
    for input in inputs {
        output.push_str(&format!("\n{}", format_event_input(input)));
        output.push('\n');
    }
    output
}

/// Format category summaries for display.
pub fn format_summaries(summaries: &[EventCategorySummary]) -> String {
    if summaries.is_empty() {
        return "No categories found.".to_string();
    }
    let mut output = format!("CATEGORIES ({})\n", summaries.len());
    output.push_str(&"-".repeat(40));
    for summary in summaries {
        output.push_str(&format!(
            "\n{} ({}) - {}",
            summary.title, summary.color, summary.sub_title
        ));
    }
    output
}
