//! Per-team event source session.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use serde_json::Value;
use tokio::sync::{watch, Mutex, RwLock};

use teamcal_core::calendar::{
    project_events, shift_to_utc, summarize_categories, validate_event_draft, CalendarEvent,
    EventCategorySummary, EventDraft, EventInput,
};
use teamcal_core::storage::{
    collection_keys_for_range, document_id, legacy_collection_key, monthly_collection_key,
    DateRange, DisplayRange, DocumentStore, StoreError,
};

use super::cache::EventCache;
use super::migration::{spawn_migration, MigrationHandle, MigrationReport};
use crate::config::{Config, DEFAULT_MIGRATION_CONCURRENCY};
use crate::error::{Result, SourceError};

/// One team's view of the calendar.
///
/// Events live in monthly collections (`<team>.<MM-YYYY>`). Each collection
/// is read from the store at most once per session and kept in an in-memory
/// cache that serves all reads. The first fetch also reads the team's legacy
/// single collection and migrates it to monthly collections in the
/// background.
///
/// Switching teams means creating a new session.
pub struct EventsSource {
    team_id: String,
    store: Arc<dyn DocumentStore>,
    migration_concurrency: usize,
    cache: RwLock<EventCache>,
    summary_tx: watch::Sender<Vec<EventCategorySummary>>,
    migration: Mutex<Option<MigrationHandle>>,
}

impl EventsSource {
    /// Creates a fresh session for `team_id` with default settings.
    pub fn initialize(team_id: impl Into<String>, store: Arc<dyn DocumentStore>) -> Self {
        Self::build(team_id.into(), store, DEFAULT_MIGRATION_CONCURRENCY)
    }

    /// Creates a fresh session for `team_id` using `config`.
    pub fn with_config(
        team_id: impl Into<String>,
        store: Arc<dyn DocumentStore>,
        config: &Config,
    ) -> Self {
        Self::build(team_id.into(), store, config.migration_concurrency)
    }

    fn build(team_id: String, store: Arc<dyn DocumentStore>, migration_concurrency: usize) -> Self {
        let (summary_tx, _) = watch::channel(Vec::new());
        Self {
            team_id,
            store,
            migration_concurrency: migration_concurrency.max(1),
            cache: RwLock::new(EventCache::new()),
            summary_tx,
            migration: Mutex::new(None),
        }
    }

    pub fn team_id(&self) -> &str {
        &self.team_id
    }

    /// Known category names, excluding "Uncategorized".
    pub async fn categories(&self) -> BTreeSet<String> {
        self.cache.read().await.categories().clone()
    }

    /// Subscribes to the category summaries published by [`Self::get_events`].
    pub fn summary_data(&self) -> watch::Receiver<Vec<EventCategorySummary>> {
        self.summary_tx.subscribe()
    }

    /// Returns a copy of every cached event, keyed by id.
    pub async fn cached_events(&self) -> HashMap<String, CalendarEvent> {
        self.cache.read().await.snapshot()
    }

    /// Ensures every monthly collection overlapping `range` is cached and
    /// returns a snapshot of the cache.
    pub async fn fetch_events(&self, range: DateRange) -> Result<HashMap<String, CalendarEvent>> {
        self.ensure_fetched(range).await?;
        Ok(self.cache.read().await.snapshot())
    }

    /// Loads the monthly collections overlapping `range` that this session
    /// has not read yet.
    ///
    /// If the query fails, the collections it covered are retried on the
    /// next call.
    async fn ensure_fetched(&self, range: DateRange) -> Result<()> {
        let keys = collection_keys_for_range(&self.team_id, range);
        let pending = self.cache.write().await.claim_unfetched(&keys);

        if pending.is_empty() {
            tracing::trace!(team_id = %self.team_id, count = keys.len(), "Cache hit");
        } else {
            tracing::trace!(team_id = %self.team_id, count = pending.len(), "Cache miss");
            match self.store.query_collections_by_name(&pending).await {
                Ok(collections) => {
                    let mut cache = self.cache.write().await;
                    for collection in collections.into_iter().flatten() {
                        let merged = cache.merge_documents(&collection.name, &collection.documents);
                        tracing::debug!(collection = %collection.name, count = merged, "Fetched collection");
                    }
                }
                Err(err) => {
                    self.cache.write().await.release(&pending);
                    tracing::warn!(team_id = %self.team_id, error = %err, "Failed to fetch collections");
                    return Err(err.into());
                }
            }
        }

        self.consult_legacy().await
    }

    /// Reads the legacy collection once per session and starts migrating
    /// whatever it holds.
    async fn consult_legacy(&self) -> Result<()> {
        if !self.cache.write().await.claim_legacy() {
            return Ok(());
        }

        let legacy = legacy_collection_key(&self.team_id);
        let collection = match self
            .store
            .query_collections_by_name(std::slice::from_ref(&legacy))
            .await
        {
            Ok(collections) => collections.into_iter().flatten().next(),
            Err(err) => {
                self.cache.write().await.finish_legacy(false);
                tracing::warn!(team_id = %self.team_id, error = %err, "Failed to read legacy collection");
                return Err(err.into());
            }
        };

        let documents = {
            let mut cache = self.cache.write().await;
            cache.finish_legacy(true);
            match collection {
                Some(collection) => {
                    cache.merge_documents(&legacy, &collection.documents);
                    collection.documents
                }
                None => return Ok(()),
            }
        };

        tracing::info!(team_id = %self.team_id, count = documents.len(), "Found legacy events");
        let handle = spawn_migration(
            Arc::clone(&self.store),
            &self.team_id,
            documents,
            self.migration_concurrency,
        );
        *self.migration.lock().await = Some(handle);
        Ok(())
    }

    /// Returns true while a legacy migration started by this session is
    /// still running.
    pub async fn migration_in_progress(&self) -> bool {
        self.migration
            .lock()
            .await
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Waits for the background legacy migration, if one was started.
    pub async fn wait_for_migration(&self) -> Result<Option<MigrationReport>> {
        let handle = self.migration.lock().await.take();
        match handle {
            Some(handle) => handle.wait().await.map(Some),
            None => Ok(None),
        }
    }

    /// Returns the display records for `range` and publishes the category
    /// summary for the same records.
    pub async fn get_events(&self, range: DisplayRange) -> Result<Vec<EventInput>> {
        let range = range.to_inclusive()?;
        self.ensure_fetched(range).await?;

        let inputs = {
            let mut cache = self.cache.write().await;
            cache.normalize_categories();
            project_events(cache.events(), range)
        };

        self.summary_tx.send_replace(summarize_categories(&inputs));
        Ok(inputs)
    }

    /// Callback form of [`Self::get_events`].
    pub async fn get_events_with<S, F>(&self, range: DisplayRange, on_success: S, on_failure: F)
    where
        S: FnOnce(Vec<EventInput>),
        F: FnOnce(SourceError),
    {
        match self.get_events(range).await {
            Ok(inputs) => on_success(inputs),
            Err(err) => on_failure(err),
        }
    }

    /// Creates an event in the collection of its start month.
    pub async fn add_event(&self, draft: EventDraft) -> Result<CalendarEvent> {
        validate_event_draft(&draft)?;

        let collection = monthly_collection_key(&self.team_id, draft.start);
        let event = draft.into_event();
        if let Some(category) = &event.category {
            self.cache.write().await.register_category(category);
        }

        let created = self
            .store
            .create_document(&collection, &serde_json::to_value(&event).map_err(StoreError::from)?)
            .await?;
        let id = document_id(&created)
            .ok_or_else(|| SourceError::MissingId {
                collection: collection.clone(),
            })?
            .to_string();

        let mut added = parse_event(created)?;
        added.start_date = event.start_date;
        added.end_date = event.end_date;

        tracing::debug!(%collection, event_id = %id, "Added event");
        self.cache.write().await.insert(id, added.clone());
        Ok(added)
    }

    /// Removes an event from the cache, then from the collection of the
    /// month `start` falls in.
    ///
    /// The cache entry is gone even if the store call fails.
    pub async fn delete_event(&self, id: &str, start: chrono::NaiveDate) -> Result<()> {
        self.cache.write().await.remove(id);

        let collection = monthly_collection_key(&self.team_id, start);
        self.store.delete_document(&collection, id).await?;
        tracing::debug!(%collection, event_id = %id, "Deleted event");
        Ok(())
    }

    /// Rewrites a cached event from `draft`.
    ///
    /// If the start month changes, the event is created in the new month's
    /// collection and then deleted from the old one. A failure of that
    /// delete is returned after the cache already holds the moved event.
    pub async fn update_event(&self, id: &str, draft: EventDraft) -> Result<CalendarEvent> {
        validate_event_draft(&draft)?;

        let (previous_start, event) = {
            let mut cache = self.cache.write().await;
            let event = cache
                .get_mut(id)
                .ok_or_else(|| SourceError::EventNotFound(id.to_string()))?;
            let previous_start = event.start().ok_or_else(|| SourceError::InvalidStoredDate {
                id: id.to_string(),
                value: event.start_date.clone(),
            })?;

            event.title = draft.title;
            event.description = draft.description;
            event.start_date = shift_to_utc(draft.start);
            event.end_date = shift_to_utc(draft.end);
            event.category = Some(draft.category.normalize());
            event.id = Some(id.to_string());

            let event = event.clone();
            if let Some(category) = &event.category {
                cache.register_category(category);
            }
            (previous_start, event)
        };

        let old_collection = monthly_collection_key(&self.team_id, previous_start);
        let new_collection = monthly_collection_key(&self.team_id, draft.start);
        let document = serde_json::to_value(&event).map_err(StoreError::from)?;

        if old_collection == new_collection {
            let updated = parse_event(self.store.update_document(&new_collection, &document).await?)?;
            tracing::debug!(collection = %new_collection, event_id = %id, "Updated event");
            self.cache.write().await.insert(id.to_string(), updated.clone());
            return Ok(updated);
        }

        let created = match self.store.create_document(&new_collection, &document).await {
            // A stale copy left behind by an earlier move whose delete failed.
            Err(StoreError::AlreadyExists { .. }) => {
                tracing::debug!(collection = %new_collection, event_id = %id, "Overwriting stale copy");
                self.store.update_document(&new_collection, &document).await?
            }
            result => result?,
        };
        let moved = parse_event(created)?;
        self.cache.write().await.insert(id.to_string(), moved.clone());
        tracing::debug!(from = %old_collection, to = %new_collection, event_id = %id, "Moved event");

        self.store.delete_document(&old_collection, id).await?;
        Ok(moved)
    }
}

fn parse_event(document: Value) -> Result<CalendarEvent> {
    serde_json::from_value(document)
        .map_err(StoreError::from)
        .map_err(SourceError::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    use async_trait::async_trait;
    use chrono::NaiveDate;
    use serde_json::json;
    use teamcal_core::calendar::{generate_color, Category, FREE_FORM_ID};
    use teamcal_core::storage::{DocumentCollection, Result as StoreResult};

    use crate::storage::InMemoryDocumentStore;

    /// Store wrapper that counts calls and can be told to fail queries.
    struct CountingStore {
        inner: InMemoryDocumentStore,
        query_calls: AtomicUsize,
        queried_names: std::sync::Mutex<Vec<Vec<String>>>,
        fail_queries: AtomicBool,
        fail_deletes: AtomicBool,
    }

    impl CountingStore {
        fn new(inner: InMemoryDocumentStore) -> Arc<Self> {
            Arc::new(Self {
                inner,
                query_calls: AtomicUsize::new(0),
                queried_names: std::sync::Mutex::new(Vec::new()),
                fail_queries: AtomicBool::new(false),
                fail_deletes: AtomicBool::new(false),
            })
        }

        fn query_calls(&self) -> usize {
            self.query_calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl DocumentStore for CountingStore {
        async fn create_document(&self, collection: &str, document: &Value) -> StoreResult<Value> {
            self.inner.create_document(collection, document).await
        }

        async fn update_document(&self, collection: &str, document: &Value) -> StoreResult<Value> {
            self.inner.update_document(collection, document).await
        }

        async fn delete_document(&self, collection: &str, id: &str) -> StoreResult<()> {
            if self.fail_deletes.load(Ordering::SeqCst) {
                return Err(StoreError::ConnectionFailed("store offline".to_string()));
            }
            self.inner.delete_document(collection, id).await
        }

        async fn query_collections_by_name(
            &self,
            names: &[String],
        ) -> StoreResult<Vec<Option<DocumentCollection>>> {
            self.query_calls.fetch_add(1, Ordering::SeqCst);
            self.queried_names.lock().unwrap().push(names.to_vec());
            if self.fail_queries.load(Ordering::SeqCst) {
                return Err(StoreError::QueryFailed("store offline".to_string()));
            }
            self.inner.query_collections_by_name(names).await
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn june() -> DisplayRange {
        DisplayRange::new(date(2024, 6, 1), date(2024, 7, 1))
    }

    fn source(store: &Arc<CountingStore>) -> EventsSource {
        EventsSource::initialize("team", store.clone() as Arc<dyn DocumentStore>)
    }

    #[tokio::test]
    async fn test_add_then_get_returns_event() {
        let inner = InMemoryDocumentStore::new();
        let store = CountingStore::new(inner.clone());
        let source = source(&store);

        let added = source
            .add_event(
                EventDraft::new("Sprint review", date(2024, 6, 14), date(2024, 6, 14)).with_category(
                    Category::Resolved {
                        id: "c1".to_string(),
                        title: "Ceremonies".to_string(),
                    },
                ),
            )
            .await
            .unwrap();
        let id = added.id.clone().unwrap();

        let events = source.get_events(june()).await.unwrap();

        assert_eq!(events.len(), 1);
        let event = &events[0];
        assert_eq!(event.id, format!("{FREE_FORM_ID}.{id}"));
        assert_eq!(event.extended_props.id, id);
        assert_eq!(event.extended_props.category, "Ceremonies");
        assert_eq!(event.color, generate_color("Ceremonies"));
        assert_eq!(event.start, date(2024, 6, 14));
        assert_eq!(event.end, date(2024, 6, 15));
        assert_eq!(inner.documents("team.06-2024").await.len(), 1);
        assert_eq!(inner.documents("team.06-2024").await[0]["category"], "Ceremonies");
        assert!(source.categories().await.contains("Ceremonies"));
    }

    #[tokio::test]
    async fn test_add_rejects_invalid_draft() {
        let store = CountingStore::new(InMemoryDocumentStore::new());
        let source = source(&store);

        let result = source
            .add_event(EventDraft::new("  ", date(2024, 6, 1), date(2024, 6, 1)))
            .await;

        assert!(matches!(result, Err(SourceError::Validation(_))));
        assert!(source.cached_events().await.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_is_memoized() {
        let store = CountingStore::new(InMemoryDocumentStore::new());
        let source = source(&store);

        source.get_events(june()).await.unwrap();
        // Monthly collections plus the one-time legacy lookup.
        assert_eq!(store.query_calls(), 2);

        source.get_events(june()).await.unwrap();
        assert_eq!(store.query_calls(), 2);

        // Only July is new.
        source
            .get_events(DisplayRange::new(date(2024, 6, 15), date(2024, 7, 15)))
            .await
            .unwrap();
        assert_eq!(store.query_calls(), 3);
        let names = store.queried_names.lock().unwrap();
        assert_eq!(names[2], vec!["team.07-2024".to_string()]);
    }

    #[tokio::test]
    async fn test_failed_fetch_reaches_failure_callback_and_is_retried() {
        let store = CountingStore::new(InMemoryDocumentStore::new());
        let source = source(&store);
        store.fail_queries.store(true, Ordering::SeqCst);

        let mut failure = None;
        source
            .get_events_with(
                june(),
                |_| panic!("should not succeed"),
                |err| failure = Some(err),
            )
            .await;

        assert!(matches!(
            failure,
            Some(SourceError::Store(StoreError::QueryFailed(_)))
        ));

        store.fail_queries.store(false, Ordering::SeqCst);
        let mut delivered = None;
        source
            .get_events_with(
                june(),
                |inputs| delivered = Some(inputs),
                |err| panic!("unexpected failure: {err}"),
            )
            .await;

        assert_eq!(delivered, Some(Vec::new()));
        let names = store.queried_names.lock().unwrap();
        assert_eq!(names[1], vec!["team.06-2024".to_string()]);
    }

    #[tokio::test]
    async fn test_update_moves_event_between_months() {
        let inner = InMemoryDocumentStore::new();
        let store = CountingStore::new(inner.clone());
        let source = source(&store);
        let added = source
            .add_event(EventDraft::new("Offsite", date(2024, 6, 20), date(2024, 6, 21)))
            .await
            .unwrap();
        let id = added.id.unwrap();

        let moved = source
            .update_event(
                &id,
                EventDraft::new("Offsite", date(2024, 7, 3), date(2024, 7, 4)).with_category("Travel"),
            )
            .await
            .unwrap();

        assert_eq!(moved.id.as_deref(), Some(id.as_str()));
        assert!(inner.documents("team.06-2024").await.is_empty());
        let july = inner.documents("team.07-2024").await;
        assert_eq!(july.len(), 1);
        assert_eq!(july[0]["startDate"], "2024-07-03T00:00:00.000Z");
        assert_eq!(
            source.cached_events().await[&id].start_date,
            "2024-07-03T00:00:00.000Z"
        );
    }

    #[tokio::test]
    async fn test_update_within_month_updates_in_place() {
        let inner = InMemoryDocumentStore::new();
        let store = CountingStore::new(inner.clone());
        let source = source(&store);
        let id = source
            .add_event(EventDraft::new("Draft", date(2024, 6, 3), date(2024, 6, 3)))
            .await
            .unwrap()
            .id
            .unwrap();

        source
            .update_event(
                &id,
                EventDraft::new("Final", date(2024, 6, 28), date(2024, 6, 29))
                    .with_description("moved within June"),
            )
            .await
            .unwrap();

        let june_docs = inner.documents("team.06-2024").await;
        assert_eq!(june_docs.len(), 1);
        assert_eq!(june_docs[0]["title"], "Final");
        assert_eq!(june_docs[0]["description"], "moved within June");
    }

    #[tokio::test]
    async fn test_update_move_with_failed_delete_keeps_cache_moved() {
        let inner = InMemoryDocumentStore::new();
        let store = CountingStore::new(inner.clone());
        let source = source(&store);
        let id = source
            .add_event(EventDraft::new("Launch", date(2024, 6, 10), date(2024, 6, 10)))
            .await
            .unwrap()
            .id
            .unwrap();
        store.fail_deletes.store(true, Ordering::SeqCst);

        let result = source
            .update_event(&id, EventDraft::new("Launch", date(2024, 8, 1), date(2024, 8, 1)))
            .await;

        assert!(matches!(
            result,
            Err(SourceError::Store(StoreError::ConnectionFailed(_)))
        ));
        assert_eq!(inner.documents("team.08-2024").await.len(), 1);
        assert_eq!(inner.documents("team.06-2024").await.len(), 1);
        assert_eq!(
            source.cached_events().await[&id].start_date,
            "2024-08-01T00:00:00.000Z"
        );
    }

    #[tokio::test]
    async fn test_move_back_overwrites_stale_copy() {
        let inner = InMemoryDocumentStore::new();
        let store = CountingStore::new(inner.clone());
        let source = source(&store);
        let id = source
            .add_event(EventDraft::new("B", date(2024, 6, 3), date(2024, 6, 3)))
            .await
            .unwrap()
            .id
            .unwrap();

        // The June delete fails and leaves a stale copy behind.
        store.fail_deletes.store(true, Ordering::SeqCst);
        assert!(source
            .update_event(&id, EventDraft::new("B", date(2024, 7, 3), date(2024, 7, 3)))
            .await
            .is_err());
        store.fail_deletes.store(false, Ordering::SeqCst);

        let moved = source
            .update_event(&id, EventDraft::new("B2", date(2024, 6, 4), date(2024, 6, 4)))
            .await
            .unwrap();

        assert_eq!(moved.title, "B2");
        let june = inner.documents("team.06-2024").await;
        assert_eq!(june.len(), 1);
        assert_eq!(june[0]["title"], "B2");
        assert_eq!(june[0]["startDate"], "2024-06-04T00:00:00.000Z");
        assert!(inner.documents("team.07-2024").await.is_empty());
        assert_eq!(source.cached_events().await[&id].title, "B2");
    }

    #[tokio::test]
    async fn test_update_unknown_event_fails() {
        let store = CountingStore::new(InMemoryDocumentStore::new());
        let source = source(&store);

        let result = source
            .update_event("ghost", EventDraft::new("x", date(2024, 6, 1), date(2024, 6, 1)))
            .await;

        assert!(matches!(result, Err(SourceError::EventNotFound(id)) if id == "ghost"));
    }

    #[tokio::test]
    async fn test_update_with_unreadable_cached_start_fails() {
        let inner = InMemoryDocumentStore::new();
        inner
            .create_document(
                "team.06-2024",
                &json!({"id": "bad", "title": "Broken", "startDate": "soon", "endDate": "later"}),
            )
            .await
            .unwrap();
        let store = CountingStore::new(inner);
        let source = source(&store);
        source.get_events(june()).await.unwrap();

        let result = source
            .update_event("bad", EventDraft::new("x", date(2024, 6, 1), date(2024, 6, 1)))
            .await;

        assert!(matches!(result, Err(SourceError::InvalidStoredDate { .. })));
    }

    #[tokio::test]
    async fn test_delete_removes_from_cache_even_if_store_fails() {
        let inner = InMemoryDocumentStore::new();
        let store = CountingStore::new(inner.clone());
        let source = source(&store);
        let id = source
            .add_event(EventDraft::new("Retro", date(2024, 6, 7), date(2024, 6, 7)))
            .await
            .unwrap()
            .id
            .unwrap();
        store.fail_deletes.store(true, Ordering::SeqCst);

        let result = source.delete_event(&id, date(2024, 6, 7)).await;

        assert!(result.is_err());
        assert!(source.cached_events().await.is_empty());
        assert_eq!(inner.documents("team.06-2024").await.len(), 1);
    }

    #[tokio::test]
    async fn test_delete_event() {
        let inner = InMemoryDocumentStore::new();
        let store = CountingStore::new(inner.clone());
        let source = source(&store);
        let id = source
            .add_event(EventDraft::new("Retro", date(2024, 6, 7), date(2024, 6, 7)))
            .await
            .unwrap()
            .id
            .unwrap();

        source.delete_event(&id, date(2024, 6, 7)).await.unwrap();

        assert!(inner.documents("team.06-2024").await.is_empty());
        assert!(source.get_events(june()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_summary_aggregates_categories() {
        let store = CountingStore::new(InMemoryDocumentStore::new());
        let source = source(&store);
        let summary = source.summary_data();
        for (title, day, category) in [("One", 3, "A"), ("Two", 4, "A"), ("Three", 5, "B")] {
            source
                .add_event(
                    EventDraft::new(title, date(2024, 6, day), date(2024, 6, day))
                        .with_category(category),
                )
                .await
                .unwrap();
        }

        source.get_events(june()).await.unwrap();

        let summaries = summary.borrow().clone();
        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].title, "A");
        assert_eq!(summaries[0].event_count, 2);
        assert_eq!(summaries[0].sub_title, "2 events");
        assert_eq!(summaries[1].title, "B");
        assert_eq!(summaries[1].event_count, 1);
        assert_eq!(summaries[1].sub_title, "Three");
        assert_eq!(summaries[1].color, generate_color("B"));
    }

    #[tokio::test]
    async fn test_visibility_includes_end_only_and_excludes_full_span() {
        let store = CountingStore::new(InMemoryDocumentStore::new());
        let source = source(&store);
        source
            .add_event(EventDraft::new("Tail", date(2024, 5, 28), date(2024, 6, 2)))
            .await
            .unwrap();
        source
            .add_event(EventDraft::new("Spanning", date(2024, 5, 30), date(2024, 7, 5)))
            .await
            .unwrap();

        let events = source.get_events(june()).await.unwrap();

        let titles: Vec<&str> = events.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["Tail"]);
    }

    #[tokio::test]
    async fn test_uncategorized_display_and_malformed_dates_skipped() {
        let inner = InMemoryDocumentStore::new();
        inner
            .create_document(
                "team.06-2024",
                &json!({
                    "id": "plain",
                    "title": "No category",
                    "startDate": "2024-06-10T00:00:00.000Z",
                    "endDate": "2024-06-10T00:00:00.000Z"
                }),
            )
            .await
            .unwrap();
        inner
            .create_document(
                "team.06-2024",
                &json!({"id": "junk", "title": "Junk", "startDate": "tbd", "endDate": "tbd", "category": "Hidden"}),
            )
            .await
            .unwrap();
        let store = CountingStore::new(inner);
        let source = source(&store);

        let events = source.get_events(june()).await.unwrap();

        assert_eq!(events.len(), 1);
        assert_eq!(events[0].extended_props.category, "Uncategorized");
        assert!(source.categories().await.is_empty());
    }

    #[tokio::test]
    async fn test_event_with_unrecognized_category_is_shown_uncategorized() {
        let inner = InMemoryDocumentStore::new();
        inner
            .create_document(
                "team.06-2024",
                &json!({
                    "id": "odd",
                    "title": "Odd category",
                    "startDate": "2024-06-12T00:00:00.000Z",
                    "endDate": "2024-06-12T00:00:00.000Z",
                    "category": 7
                }),
            )
            .await
            .unwrap();
        let store = CountingStore::new(inner);
        let source = source(&store);

        let events = source.get_events(june()).await.unwrap();

        assert_eq!(events.len(), 1);
        assert_eq!(events[0].extended_props.id, "odd");
        assert_eq!(events[0].extended_props.category, "Uncategorized");
    }

    #[tokio::test]
    async fn test_legacy_events_are_shown_and_migrated() {
        let inner = InMemoryDocumentStore::new();
        for (id, start) in [
            ("l1", "2024-06-03T00:00:00.000Z"),
            ("l2", "2024-06-18T00:00:00.000Z"),
            ("l3", "2024-09-01T00:00:00.000Z"),
        ] {
            inner
                .create_document(
                    "team",
                    &json!({"id": id, "title": id, "startDate": start, "endDate": start}),
                )
                .await
                .unwrap();
        }
        inner
            .create_document("team-categories", &json!({"id": "c1", "title": "Old"}))
            .await
            .unwrap();
        let store = CountingStore::new(inner.clone());
        let source = source(&store);

        let events = source.get_events(june()).await.unwrap();
        assert_eq!(events.len(), 2);

        let report = source.wait_for_migration().await.unwrap().unwrap();

        assert_eq!(report.migrated, 3);
        assert_eq!(report.deleted, 3);
        assert_eq!(report.categories_deleted, 1);
        assert!(inner.documents("team").await.is_empty());
        assert!(inner.documents("team-categories").await.is_empty());
        assert_eq!(inner.documents("team.06-2024").await.len(), 2);
        assert_eq!(inner.documents("team.09-2024").await.len(), 1);

        // The legacy collection is consulted once per session.
        let calls = store.query_calls();
        source
            .get_events(DisplayRange::new(date(2024, 9, 1), date(2024, 10, 1)))
            .await
            .unwrap();
        assert_eq!(store.query_calls(), calls + 1);
        assert!(source.wait_for_migration().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_no_legacy_collection_means_no_migration() {
        let store = CountingStore::new(InMemoryDocumentStore::new());
        let source = source(&store);

        source.get_events(june()).await.unwrap();

        assert_eq!(source.team_id(), "team");
        assert!(!source.migration_in_progress().await);

        assert!(source.wait_for_migration().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_empty_display_range_is_rejected() {
        let store = CountingStore::new(InMemoryDocumentStore::new());
        let source = source(&store);

        let result = source
            .get_events(DisplayRange::new(date(2024, 6, 1), date(2024, 6, 1)))
            .await;

        assert!(matches!(result, Err(SourceError::Range(_))));
        assert_eq!(store.query_calls(), 0);
    }
}
