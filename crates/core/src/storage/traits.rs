use async_trait::async_trait;
use serde_json::Value;

use super::{DocumentCollection, Result};

/// Contract for the key/collection document store the event source
/// persists into.
///
/// Documents are JSON objects; the `id` field is the document id.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Creates a document in a collection, assigning an id if it has none.
    ///
    /// Returns the stored document, including its id.
    async fn create_document(&self, collection: &str, document: &Value) -> Result<Value>;

    /// Replaces an existing document (matched by `id`) in a collection.
    async fn update_document(&self, collection: &str, document: &Value) -> Result<Value>;

    /// Deletes a document by id from a collection.
    async fn delete_document(&self, collection: &str, id: &str) -> Result<()>;

    /// Queries several collections at once.
    ///
    /// The result has one slot per requested name, in request order. A slot
    /// is `None` when the collection does not exist.
    async fn query_collections_by_name(
        &self,
        names: &[String],
    ) -> Result<Vec<Option<DocumentCollection>>>;
}
