mod error;
mod keys;
mod traits;
mod types;

pub use error::{DateRangeError, Result, StoreError};
pub use keys::{
    categories_collection_key, collection_keys_for_range, legacy_collection_key,
    monthly_collection_key,
};
pub use traits::DocumentStore;
pub use types::{document_id, DateRange, DisplayRange, DocumentCollection};
