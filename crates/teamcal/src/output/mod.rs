//! Output formatting functions.
//!
//! JSON output is a single compact line per command so it can be piped into
//! other tools; pretty output lives in [`pretty`].

pub mod pretty;

use serde::Serialize;

use crate::cli::OutputFormat;

/// Format a value for output. Pretty mode falls back to indented JSON for
/// values without a dedicated formatter.
pub fn format_output<T: Serialize>(value: &T, format: OutputFormat) -> String {
    let rendered = match format {
        OutputFormat::Json => serde_json::to_string(value),
        OutputFormat::Pretty => serde_json::to_string_pretty(value),
    };
    rendered.unwrap_or_else(|err| format!("{{\"error\":\"unserializable output: {err}\"}}"))
}

/// Listing output: display records together with their category summary.
#[derive(Debug, Serialize)]
pub struct Listing<'a, E: Serialize, S: Serialize> {
    pub events: &'a [E],
    pub summary: &'a [S],
}
