//! teamcal CLI entry point.

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use teamcal::cli::{Cli, Commands, OutputFormat};
use teamcal::config::Config;
use teamcal::output::{format_output, pretty, Listing};
use teamcal::storage::InMemoryDocumentStore;
use teamcal::EventsSource;
use teamcal_core::storage::{DateRange, DisplayRange, DocumentStore};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "teamcal=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut config = Config::from_env();
    if let Some(db) = &cli.db {
        config.sqlite_path = db.clone();
    }
    if let Some(lanes) = cli.migration_concurrency {
        config = config.with_migration_concurrency(lanes);
    }

    let store = open_store(cli.memory, &config).await?;
    let source = EventsSource::with_config(cli.team.clone(), store, &config);

    run(&cli, &source).await?;

    // Let a legacy migration started by this run finish before exiting.
    if source.migration_in_progress().await {
        tracing::info!(team_id = %source.team_id(), "Waiting for legacy migration to finish");
    }
    if let Some(report) = source.wait_for_migration().await? {
        if !report.is_clean() && !cli.quiet {
            eprintln!(
                "Legacy migration finished with {} failure(s); it will resume on the next run.",
                report.failures.len()
            );
        }
    }

    Ok(())
}

async fn open_store(memory: bool, config: &Config) -> Result<Arc<dyn DocumentStore>> {
    if memory {
        return Ok(Arc::new(InMemoryDocumentStore::new()));
    }

    #[cfg(feature = "sqlite")]
    let store: Arc<dyn DocumentStore> = {
        tracing::debug!(path = %config.sqlite_path, "Opening SQLite store");
        Arc::new(teamcal::storage::SqliteDocumentStore::new(&config.sqlite_path).await?)
    };

    #[cfg(not(feature = "sqlite"))]
    let store: Arc<dyn DocumentStore> = {
        tracing::warn!(path = %config.sqlite_path, "Built without SQLite support, using an in-memory store");
        Arc::new(InMemoryDocumentStore::new())
    };

    Ok(store)
}

async fn run(cli: &Cli, source: &EventsSource) -> Result<()> {
    match &cli.command {
        Commands::Add(args) => {
            let event = source.add_event(args.clone().into()).await?;
            match cli.format {
                OutputFormat::Json => println!("{}", format_output(&event, cli.format)),
                OutputFormat::Pretty => println!("Created:\n{}", pretty::format_event(&event)),
            }
        }
        Commands::Update {
            id,
            previous_start,
            event,
        } => {
            // The event has to be cached before it can be updated.
            let first = previous_start.unwrap_or(event.start).min(event.start);
            let last = previous_start.unwrap_or(event.start).max(event.start);
            source.fetch_events(DateRange::new(first, last)?).await?;

            let updated = source.update_event(id, event.clone().into()).await?;
            match cli.format {
                OutputFormat::Json => println!("{}", format_output(&updated, cli.format)),
                OutputFormat::Pretty => println!("Updated:\n{}", pretty::format_event(&updated)),
            }
        }
        Commands::Delete { id, start } => {
            source.delete_event(id, *start).await?;
            if !cli.quiet {
                println!("Deleted event {}", id);
            }
        }
        Commands::List(range) => {
            let events = source
                .get_events(DisplayRange::new(range.start, range.end))
                .await?;
            let summaries = source.summary_data().borrow().clone();
            match cli.format {
                OutputFormat::Json => println!(
                    "{}",
                    format_output(
                        &Listing {
                            events: &events,
                            summary: &summaries,
                        },
                        cli.format
                    )
                ),
                OutputFormat::Pretty => {
                    println!("{}", pretty::format_event_inputs(&events));
                    if !cli.quiet {
                        println!("{}", pretty::format_summaries(&summaries));
                    }
                }
            }
        }
        Commands::Categories(range) => {
            source
                .get_events(DisplayRange::new(range.start, range.end))
                .await?;
            let summaries = source.summary_data().borrow().clone();
            match cli.format {
                OutputFormat::Json => println!("{}", format_output(&summaries, cli.format)),
                OutputFormat::Pretty => println!("{}", pretty::format_summaries(&summaries)),
            }
        }
    }
    Ok(())
}
