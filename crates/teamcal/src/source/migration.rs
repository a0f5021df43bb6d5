//! Background migration of legacy single-collection data into monthly
//! collections.
//!
//! Each legacy event becomes a "create in its monthly collection, then
//! delete from the legacy collection" chain; each legacy category document
//! becomes a delete. Work items are dealt round-robin onto a bounded number
//! of lanes. Lanes run concurrently, items within a lane run in order.

use std::sync::Arc;

use serde_json::Value;
use tokio::task::JoinHandle;

use teamcal_core::calendar::CalendarEvent;
use teamcal_core::storage::{
    categories_collection_key, document_id, legacy_collection_key, monthly_collection_key,
    DocumentStore, StoreError,
};

use crate::error::{Result, SourceError};

/// Outcome of a legacy migration run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MigrationReport {
    /// Events now present in their monthly collection.
    pub migrated: usize,
    /// Events removed from the legacy collection.
    pub deleted: usize,
    /// Legacy category documents removed.
    pub categories_deleted: usize,
    /// Legacy documents left in place because they have no id or no
    /// readable start date.
    pub skipped: usize,
    pub failures: Vec<String>,
}

impl MigrationReport {
    fn absorb(&mut self, other: MigrationReport) {
        self.migrated += other.migrated;
        self.deleted += other.deleted;
        self.categories_deleted += other.categories_deleted;
        self.skipped += other.skipped;
        self.failures.extend(other.failures);
    }

    /// Returns true if every planned operation succeeded.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// One unit of migration work.
#[derive(Debug, Clone)]
enum WorkItem {
    Move {
        id: String,
        target: String,
        document: Value,
    },
    DeleteCategory {
        id: String,
    },
}

/// Handle to a running migration.
#[derive(Debug)]
pub struct MigrationHandle {
    handle: JoinHandle<MigrationReport>,
}

impl MigrationHandle {
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Waits for the migration to settle.
    pub async fn wait(self) -> Result<MigrationReport> {
        self.handle
            .await
            .map_err(|err| SourceError::Migration(err.to_string()))
    }
}

/// Deals items round-robin onto `min(items, max_lanes)` lanes.
fn assign_lanes<T>(items: Vec<T>, max_lanes: usize) -> Vec<Vec<T>> {
    let lane_count = items.len().min(max_lanes.max(1));
    let mut lanes: Vec<Vec<T>> = (0..lane_count).map(|_| Vec::new()).collect();
    for (index, item) in items.into_iter().enumerate() {
        lanes[index % lane_count].push(item);
    }
    lanes
}

/// Turns legacy documents into move items, counting the ones that cannot
/// be placed.
fn plan_moves(team_id: &str, documents: Vec<Value>) -> (Vec<WorkItem>, usize) {
    let mut items = Vec::with_capacity(documents.len());
    let mut skipped = 0;

    for document in documents {
        let Some(id) = document_id(&document).map(str::to_string) else {
            tracing::warn!(%team_id, "Legacy event without an id left in place");
            skipped += 1;
            continue;
        };
        let start = serde_json::from_value::<CalendarEvent>(document.clone())
            .ok()
            .and_then(|event| event.start());
        let Some(start) = start else {
            tracing::warn!(%team_id, event_id = %id, "Legacy event with unreadable start date left in place");
            skipped += 1;
            continue;
        };
        items.push(WorkItem::Move {
            id,
            target: monthly_collection_key(team_id, start),
            document,
        });
    }

    (items, skipped)
}

async fn run_lane(
    store: Arc<dyn DocumentStore>,
    legacy: String,
    categories: String,
    items: Vec<WorkItem>,
) -> MigrationReport {
    let mut report = MigrationReport::default();

    for item in items {
        match item {
            WorkItem::Move {
                id,
                target,
                document,
            } => {
                match store.create_document(&target, &document).await {
                    // A previous run created it but did not get to the delete.
                    Ok(_) | Err(StoreError::AlreadyExists { .. }) => report.migrated += 1,
                    Err(err) => {
                        tracing::warn!(event_id = %id, collection = %target, error = %err, "Failed to copy legacy event");
                        report.failures.push(format!("create {id} in {target}: {err}"));
                        continue;
                    }
                }
                match store.delete_document(&legacy, &id).await {
                    Ok(()) => report.deleted += 1,
                    Err(err) => {
                        tracing::warn!(event_id = %id, collection = %legacy, error = %err, "Failed to delete legacy event");
                        report.failures.push(format!("delete {id} from {legacy}: {err}"));
                    }
                }
            }
            WorkItem::DeleteCategory { id } => {
                match store.delete_document(&categories, &id).await {
                    Ok(()) => report.categories_deleted += 1,
                    Err(err) => {
                        tracing::warn!(document_id = %id, collection = %categories, error = %err, "Failed to delete legacy category");
                        report.failures.push(format!("delete {id} from {categories}: {err}"));
                    }
                }
            }
        }
    }

    report
}

async fn migrate(
    store: Arc<dyn DocumentStore>,
    team_id: String,
    documents: Vec<Value>,
    max_lanes: usize,
) -> MigrationReport {
    let legacy = legacy_collection_key(&team_id);
    let categories = categories_collection_key(&team_id);
    let mut report = MigrationReport::default();

    let (mut items, skipped) = plan_moves(&team_id, documents);
    report.skipped = skipped;

    match store
        .query_collections_by_name(std::slice::from_ref(&categories))
        .await
    {
        Ok(collections) => {
            let category_ids = collections
                .into_iter()
                .flatten()
                .flat_map(|collection| collection.documents)
                .filter_map(|document| document_id(&document).map(str::to_string));
            items.extend(category_ids.map(|id| WorkItem::DeleteCategory { id }));
        }
        Err(err) => {
            tracing::warn!(%team_id, error = %err, "Failed to read legacy categories");
            report.failures.push(format!("query {categories}: {err}"));
        }
    }

    let lanes = assign_lanes(items, max_lanes);
    tracing::info!(%team_id, lanes = lanes.len(), "Migrating legacy events");

    let mut workers = Vec::with_capacity(lanes.len());
    for lane in lanes {
        let handle: JoinHandle<MigrationReport> = tokio::spawn(run_lane(
            Arc::clone(&store),
            legacy.clone(),
            categories.clone(),
            lane,
        ));
        workers.push(handle);
    }
    for worker in workers {
        match worker.await {
            Ok(lane_report) => report.absorb(lane_report),
            Err(err) => report.failures.push(format!("migration lane panicked: {err}")),
        }
    }

    tracing::info!(
        %team_id,
        migrated = report.migrated,
        deleted = report.deleted,
        categories_deleted = report.categories_deleted,
        skipped = report.skipped,
        failures = report.failures.len(),
        "Legacy migration finished"
    );
    report
}

/// Starts migrating a team's legacy documents on a background task.
///
/// The caller is not blocked; use the returned handle to observe completion.
pub fn spawn_migration(
    store: Arc<dyn DocumentStore>,
    team_id: &str,
    documents: Vec<Value>,
    max_lanes: usize,
) -> MigrationHandle {
    MigrationHandle {
        handle: tokio::spawn(migrate(store, team_id.to_string(), documents, max_lanes)),
    }
}
