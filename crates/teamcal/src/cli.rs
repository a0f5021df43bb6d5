//! CLI command definitions.

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};

use teamcal_core::calendar::{Category, EventDraft};

/// Team calendar event source backed by a document store.
#[derive(Debug, Parser)]
#[command(name = "teamcal")]
#[command(about = "Manage a team's calendar events", long_about = None)]
pub struct Cli {
    /// Team whose calendar to use.
    #[arg(long, env = "TEAMCAL_TEAM")]
    pub team: String,

    /// SQLite database path. Defaults to `SQLITE_PATH` or "teamcal.db".
    #[arg(long)]
    pub db: Option<String>,

    /// Use a throwaway in-memory store instead of SQLite.
    #[arg(long)]
    pub memory: bool,

    /// Concurrent lanes for legacy migration. Defaults to
    /// `TEAMCAL_MIGRATION_CONCURRENCY` or 10.
    #[arg(long)]
    pub migration_concurrency: Option<usize>,

    /// Output format.
    #[arg(long, default_value = "pretty")]
    pub format: OutputFormat,

    /// Suppress non-essential output.
    #[arg(long)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format options.
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Raw JSON output.
    Json,
    /// Human-readable output.
    #[default]
    Pretty,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Create an event.
    Add(EventArgs),
    /// Rewrite an existing event.
    Update {
        /// Event ID.
        id: String,
        /// Current start date (YYYY-MM-DD) when it is in another month than `--start`.
        #[arg(long)]
        previous_start: Option<NaiveDate>,
        #[command(flatten)]
        event: EventArgs,
    },
    /// Delete an event.
    Delete {
        /// Event ID.
        id: String,
        /// Start date of the event (YYYY-MM-DD), used to find its month.
        #[arg(long)]
        start: NaiveDate,
    },
    /// List events shown in a date range.
    List(RangeArgs),
    /// Show per-category event counts for a date range.
    Categories(RangeArgs),
}

/// Fields of an event.
#[derive(Debug, Clone, Args)]
pub struct EventArgs {
    /// Event title.
    #[arg(long)]
    pub title: String,
    /// First day (YYYY-MM-DD).
    #[arg(long)]
    pub start: NaiveDate,
    /// Last day, inclusive (YYYY-MM-DD).
    #[arg(long)]
    pub end: NaiveDate,
    /// Category name.
    #[arg(long)]
    pub category: Option<String>,
    /// Optional description.
    #[arg(long)]
    pub description: Option<String>,
}

impl From<EventArgs> for EventDraft {
    fn from(args: EventArgs) -> Self {
        let mut draft = EventDraft::new(args.title, args.start, args.end);
        if let Some(category) = args.category {
            draft = draft.with_category(Category::from(category));
        }
        if let Some(description) = args.description {
            draft = draft.with_description(description);
        }
        draft
    }
}

/// A display range: `start` is included, `end` is not.
#[derive(Debug, Clone, Copy, Args)]
pub struct RangeArgs {
    /// First day shown (YYYY-MM-DD).
    #[arg(long)]
    pub start: NaiveDate,
    /// Day after the last day shown (YYYY-MM-DD).
    #[arg(long)]
    pub end: NaiveDate,
}
