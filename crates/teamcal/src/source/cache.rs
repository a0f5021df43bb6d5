//! In-memory state of one team's event source session.

use std::collections::{BTreeSet, HashMap, HashSet};

use serde_json::Value;

use teamcal_core::calendar::{CalendarEvent, Category};

/// Progress of the one-time legacy collection lookup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum LegacyState {
    #[default]
    Pending,
    InFlight,
    Consulted,
}

/// Events fetched so far, keyed by id, plus fetch memoization and the
/// known category names.
#[derive(Debug, Default)]
pub struct EventCache {
    events: HashMap<String, CalendarEvent>,
    fetched: HashSet<String>,
    legacy: LegacyState,
    categories: BTreeSet<String>,
}

impl EventCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks the given collection keys as fetched and returns the ones that
    /// were not already, preserving order.
    pub fn claim_unfetched(&mut self, keys: &[String]) -> Vec<String> {
        keys.iter()
            .filter(|key| self.fetched.insert((*key).clone()))
            .cloned()
            .collect()
    }

    /// Forgets that the given keys were fetched, so a later call retries them.
    pub fn release(&mut self, keys: &[String]) {
        for key in keys {
            self.fetched.remove(key);
        }
    }

    #[cfg(test)]
    pub fn is_fetched(&self, key: &str) -> bool {
        self.fetched.contains(key)
    }

    /// Claims the legacy lookup. Returns false if it already happened or is
    /// in progress.
    pub fn claim_legacy(&mut self) -> bool {
        if self.legacy == LegacyState::Pending {
            self.legacy = LegacyState::InFlight;
            true
        } else {
            false
        }
    }

    /// Records the outcome of a claimed legacy lookup.
    pub fn finish_legacy(&mut self, consulted: bool) {
        self.legacy = if consulted {
            LegacyState::Consulted
        } else {
            LegacyState::Pending
        };
    }

    #[cfg(test)]
    pub fn legacy_consulted(&self) -> bool {
        self.legacy == LegacyState::Consulted
    }

    /// Merges raw store documents into the cache, overwriting by id.
    ///
    /// Documents that are not events or have no id are skipped. Returns the
    /// number of documents merged.
    pub fn merge_documents(&mut self, collection: &str, documents: &[Value]) -> usize {
        let mut merged = 0;
        for document in documents {
            match serde_json::from_value::<CalendarEvent>(document.clone()) {
                Ok(event) => match event.id.clone() {
                    Some(id) => {
                        self.events.insert(id, event);
                        merged += 1;
                    }
                    None => {
                        tracing::warn!(%collection, "Skipping stored event without an id");
                    }
                },
                Err(err) => {
                    tracing::warn!(%collection, error = %err, "Skipping unreadable document");
                }
            }
        }
        merged
    }

    pub fn insert(&mut self, id: String, event: CalendarEvent) {
        self.events.insert(id, event);
    }

    #[cfg(test)]
    pub fn get(&self, id: &str) -> Option<&CalendarEvent> {
        self.events.get(id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut CalendarEvent> {
        self.events.get_mut(id)
    }

    pub fn remove(&mut self, id: &str) -> Option<CalendarEvent> {
        self.events.remove(id)
    }

    pub fn events(&self) -> impl Iterator<Item = &CalendarEvent> {
        self.events.values()
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn snapshot(&self) -> HashMap<String, CalendarEvent> {
        self.events.clone()
    }

    /// Adds a category to the known set unless it is empty or
    /// "Uncategorized". Returns true if it was newly added.
    pub fn register_category(&mut self, category: &Category) -> bool {
        category.is_registrable() && self.categories.insert(category.title().to_string())
    }

    pub fn categories(&self) -> &BTreeSet<String> {
        &self.categories
    }

    /// Rewrites every displayable event's category to its plain name and
    /// registers it. Events with unreadable dates are left untouched.
    pub fn normalize_categories(&mut self) {
        for event in self.events.values_mut() {
            if event.start().is_none() || event.end().is_none() {
                continue;
            }
            if let Some(category) = event.category.take() {
                let category = category.normalize();
                if category.is_registrable() {
                    self.categories.insert(category.title().to_string());
                }
                event.category = Some(category);
            }
        }
    }
}
