use std::env;

/// Default number of concurrent legacy migration lanes.
pub const DEFAULT_MIGRATION_CONCURRENCY: usize = 10;

/// Event source configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Maximum concurrent create/delete chains during legacy migration
    /// (default: 10, never below 1)
    pub migration_concurrency: usize,
    /// Path to SQLite database file (default: "teamcal.db")
    /// Note: Only used when the `sqlite` feature is enabled.
    pub sqlite_path: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `TEAMCAL_MIGRATION_CONCURRENCY` - Migration lanes (default: 10)
    /// - `SQLITE_PATH` - SQLite database path (default: "teamcal.db")
    pub fn from_env() -> Self {
        Self {
            migration_concurrency: env::var("TEAMCAL_MIGRATION_CONCURRENCY")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_MIGRATION_CONCURRENCY)
                .max(1),
            sqlite_path: env::var("SQLITE_PATH").unwrap_or_else(|_| "teamcal.db".to_string()),
        }
    }

    /// Sets the migration concurrency, clamped to at least one lane.
    pub fn with_migration_concurrency(mut self, lanes: usize) -> Self {
        self.migration_concurrency = lanes.max(1);
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            migration_concurrency: DEFAULT_MIGRATION_CONCURRENCY,
            sqlite_path: "teamcal.db".to_string(),
        }
    }
}
