//! SQLite document store implementation.

use async_trait::async_trait;
use serde_json::Value;
use tokio_rusqlite::Connection;
use uuid::Uuid;

use teamcal_core::storage::{document_id, DocumentCollection, DocumentStore, Result, StoreError};

use super::error::{map_document_error, map_query_error};
use super::schema;

/// Helper to wrap rusqlite errors for tokio_rusqlite closures.
fn wrap_err(e: rusqlite::Error) -> tokio_rusqlite::Error {
    tokio_rusqlite::Error::Rusqlite(e)
}

/// SQLite-based document store.
pub struct SqliteDocumentStore {
    conn: Connection,
}

impl SqliteDocumentStore {
    /// Creates a new store with a file-based database.
    ///
    /// The database file will be created if it doesn't exist.
    /// Schema tables are created automatically.
    pub async fn new(path: &str) -> Result<Self> {
        let conn = Connection::open(path)
            .await
            .map_err(|e| StoreError::ConnectionFailed(e.to_string()))?;

        Self::init_schema(&conn).await?;

        Ok(Self { conn })
    }

    /// Creates a new store with an in-memory database.
    ///
    /// Useful for testing - data is lost when the connection is dropped.
    pub async fn new_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .await
            .map_err(|e| StoreError::ConnectionFailed(e.to_string()))?;

        Self::init_schema(&conn).await?;

        Ok(Self { conn })
    }

    async fn init_schema(conn: &Connection) -> Result<()> {
        conn.call(|conn| {
            conn.execute_batch(schema::CREATE_TABLES)
                .map_err(wrap_err)?;
            Ok(())
        })
        .await
        .map_err(|e| StoreError::QueryFailed(e.to_string()))
    }
}

/// Ensures the document is an object and returns it with a string id,
/// generating one if absent.
fn prepare_for_insert(document: &Value) -> Result<(String, Value)> {
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
impl DocumentStore for SqliteDocumentStore {
    async fn create_document(&self, collection: &str, document: &Value) -> Result<Value> {
        let (id, document) = prepare_for_insert(document)?;
        let body = serde_json::to_string(&document)?;
        let collection_name = collection.to_string();
        let doc_id = id.clone();

        self.conn
            .call(move |conn| {
                let tx = conn.transaction().map_err(wrap_err)?;
                tx.execute(schema::INSERT_COLLECTION, [&collection_name])
                    .map_err(wrap_err)?;
                tx.execute(
                    schema::INSERT_DOCUMENT,
                    rusqlite::params![collection_name, doc_id, body],
                )
                .map_err(wrap_err)?;
                tx.commit().map_err(wrap_err)?;
                Ok(())
            })
            .await
            .map_err(|e| map_document_error(e, collection, &id))?;

        Ok(document)
    }

    async fn update_document(&self, collection: &str, document: &Value) -> Result<Value> {
        let id = document_id(document)
            .ok_or_else(|| {
                StoreError::InvalidData("cannot update a document without an id".to_string())
            })?
            .to_string();
        let body = serde_json::to_string(document)?;
        let collection_name = collection.to_string();
        let doc_id = id.clone();

        self.conn
            .call(move |conn| {
                let rows = conn
                    .execute(
                        schema::UPDATE_DOCUMENT,
                        rusqlite::params![collection_name, doc_id, body],
                    )
                    .map_err(wrap_err)?;
                if rows == 0 {
                    Err(wrap_err(rusqlite::Error::QueryReturnedNoRows))
                } else {
                    Ok(())
                }
            })
            .await
            .map_err(|e| map_document_error(e, collection, &id))?;

        Ok(document.clone())
    }

    async fn delete_document(&self, collection: &str, id: &str) -> Result<()> {
        let collection_name = collection.to_string();
        let doc_id = id.to_string();

        self.conn
            .call(move |conn| {
                let rows = conn
                    .execute(
                        schema::DELETE_DOCUMENT,
                        rusqlite::params![collection_name, doc_id],
                    )
                    .map_err(wrap_err)?;
                if rows == 0 {
                    Err(wrap_err(rusqlite::Error::QueryReturnedNoRows))
                } else {
                    Ok(())
                }
            })
            .await
            .map_err(|e| map_document_error(e, collection, id))
    }

    async fn query_collections_by_name(
        &self,
        names: &[String],
    ) -> Result<Vec<Option<DocumentCollection>>> {
        let names = names.to_vec();

        let rows: Vec<Option<(String, Vec<String>)>> = self
            .conn
            .call(move |conn| {
                let mut exists = conn.prepare(schema::SELECT_COLLECTION).map_err(wrap_err)?;
                let mut select = conn
                    .prepare(schema::SELECT_DOCUMENTS_BY_COLLECTION)
                    .map_err(wrap_err)?;

                let mut result = Vec::with_capacity(names.len());
                for name in names {
                    if !exists.exists([&name]).map_err(wrap_err)? {
                        result.push(None);
                        continue;
                    }
                    let bodies = select
                        .query_map([&name], |row| row.get::<_, String>(0))
                        .map_err(wrap_err)?
                        .collect::<std::result::Result<Vec<_>, _>>()
                        .map_err(wrap_err)?;
                    result.push(Some((name, bodies)));
                }
                Ok(result)
            })
            .await
            .map_err(map_query_error)?;

        rows.into_iter()
            .map(|slot| {
                slot.map(|(name, bodies)| {
                    let documents = bodies
                        .iter()
                        .map(|body| serde_json::from_str(body))
                        .collect::<std::result::Result<Vec<Value>, _>>()?;
                    Ok::<_, StoreError>(DocumentCollection::new(name, documents))
                })
                .transpose()
            })
            .collect()
    }
}
