//! In-memory document store implementation.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;
use uuid::Uuid;

use teamcal_core::storage::{document_id, DocumentCollection, DocumentStore, Result, StoreError};

type Collection = BTreeMap<String, Value>;

/// In-memory document store for testing.
///
/// Collections map document ids to JSON documents. A collection exists once
/// a document has been created in it, even if it is emptied later. Data is
/// not persisted and will be lost when the store is dropped.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDocumentStore {
    collections: Arc<RwLock<HashMap<String, Collection>>>,
}

impl InMemoryDocumentStore {
    /// Creates a new empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the documents of a collection, ordered by id.
    pub async fn documents(&self, collection: &str) -> Vec<Value> {
        let collections = self.collections.read().await;
        collections
            .get(collection)
            .map(|docs| docs.values().cloned().collect())
            .unwrap_or_default()
    }

    /// Returns the names of all collections, sorted.
    pub async fn collection_names(&self) -> Vec<String> {
        let collections = self.collections.read().await;
        let mut names: Vec<String> = collections.keys().cloned().collect();
        names.sort();
        names
    }
}

/// Ensures the document is an object and returns it with a string id.
fn with_id(document: &Value) -> Result<(String, Value)> {
    let mut document = document.clone();
    let object = document
        .as_object_mut()
        .ok_or_else(|| StoreError::InvalidData("document must be a JSON object".to_string()))?;

    let id = match object.get("id") {
        Some(Value::String(id)) => id.clone(),
        None | Some(Value::Null) => {
            let id = Uuid::new_v4().to_string();
            object.insert("id".to_string(), Value::String(id.clone()));
            id
        }
        Some(other) => {
            return Err(StoreError::InvalidData(format!(
                "document id must be a string, got {other}"
            )))
        }
    };

    Ok((id, document))
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn create_document(&self, collection: &str, document: &Value) -> Result<Value> {
        let (id, document) = with_id(document)?;
        let mut collections = self.collections.write().await;
        let docs = collections.entry(collection.to_string()).or_default();
        if docs.contains_key(&id) {
            return Err(StoreError::AlreadyExists {
                collection: collection.to_string(),
                id,
            });
        }
        docs.insert(id, document.clone());
        Ok(document)
    }

    async fn update_document(&self, collection: &str, document: &Value) -> Result<Value> {
        let id = document_id(document).ok_or_else(|| {
            StoreError::InvalidData("cannot update a document without an id".to_string())
        })?;
        let mut collections = self.collections.write().await;
        match collections
            .get_mut(collection)
            .and_then(|docs| docs.get_mut(id))
        {
            Some(existing) => {
                *existing = document.clone();
                Ok(document.clone())
            }
            None => Err(StoreError::NotFound {
                collection: collection.to_string(),
                id: id.to_string(),
            }),
        }
    }

    async fn delete_document(&self, collection: &str, id: &str) -> Result<()> {
        let mut collections = self.collections.write().await;
        if collections
            .get_mut(collection)
            .and_then(|docs| docs.remove(id))
            .is_none()
        {
            return Err(StoreError::NotFound {
                collection: collection.to_string(),
                id: id.to_string(),
            });
        }
        Ok(())
    }

    async fn query_collections_by_name(
        &self,
        names: &[String],
    ) -> Result<Vec<Option<DocumentCollection>>> {
        let collections = self.collections.read().await;
        Ok(names
            .iter()
            .map(|name| {
                collections.get(name).map(|docs| {
                    DocumentCollection::new(name.clone(), docs.values().cloned().collect())
                })
            })
            .collect())
    }
}
