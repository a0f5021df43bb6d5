use chrono::NaiveDate;

use crate::calendar::{format_month_year, months_in_range};

use super::DateRange;

/// Returns the monthly collection key (`<team>.<MM-YYYY>`) for an event
/// starting on `start`.
pub fn monthly_collection_key(team_id: &str, start: NaiveDate) -> String {
    format!("{}.{}", team_id, format_month_year(start))
}

/// Returns the pre-sharding collection holding all of a team's events.
pub fn legacy_collection_key(team_id: &str) -> String {
    team_id.to_string()
}

/// Returns the legacy collection holding a team's category documents.
pub fn categories_collection_key(team_id: &str) -> String {
    format!("{}-categories", team_id)
}

/// Returns the ordered, distinct monthly collection keys covering `range`.
pub fn collection_keys_for_range(team_id: &str, range: DateRange) -> Vec<String> {
    months_in_range(range.start, range.end)
        .into_iter()
        .map(|month| format!("{}.{}", team_id, month))
        .collect()
}
