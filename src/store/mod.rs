//! Point-lookup access to the backing store.

mod dynamodb;

pub use dynamodb::{DynamoDbItemStore, from_attribute_value};

use crate::error::BackendError;
use crate::value::StoreRecord;
use async_trait::async_trait;

/// A single-item lookup by partition key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupRequest {
    /// Table to read from.
    pub table: String,
    /// Name of the partition key attribute.
    pub key_attribute: String,
    /// Partition key value.
    pub key: String,
}

/// A client handle that can fetch one record by key.
///
/// Implementations are shared across concurrent lookups, so they must not keep
/// per-request state.
#[async_trait]
pub trait ItemStore: Send + Sync {
    /// Fetch the record stored under `request.key`.
    ///
    /// Returns `Ok(None)` when the table holds no such record.
    ///
    /// # Errors
    ///
    /// Returns a [`BackendError`] for any failure to complete the lookup.
    async fn get_item(&self, request: &LookupRequest) -> Result<Option<StoreRecord>, BackendError>;

    /// A human-readable name for this store (for logging/debugging).
    fn name(&self) -> String;
}
