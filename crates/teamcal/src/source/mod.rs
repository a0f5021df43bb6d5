//! The per-team event source and its supporting pieces.

mod cache;
mod migration;
mod session;

pub use cache::EventCache;
pub use migration::{spawn_migration, MigrationHandle, MigrationReport};
pub use session::EventsSource;
