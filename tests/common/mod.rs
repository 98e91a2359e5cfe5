//! Shared fixtures for integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use dynamodb_env_repository::client::{ClientSettings, StoreConnector};
use dynamodb_env_repository::error::{BackendError, Result};
use dynamodb_env_repository::store::{ItemStore, LookupRequest};
use dynamodb_env_repository::value::{StoreRecord, TypedValue};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

/// In-memory table keyed by `(table, key attribute, key)`.
#[derive(Default)]
pub struct InMemoryStore {
    items: Mutex<HashMap<(String, String, String), StoreRecord>>,
    requests: Mutex<Vec<LookupRequest>>,
}

impl InMemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn put(&self, table: &str, key_attribute: &str, key: &str, record: StoreRecord) {
        self.items.lock().insert(
            (table.to_string(), key_attribute.to_string(), key.to_string()),
            record,
        );
    }

    /// Store `config` under `attribute` of the record keyed by `key`.
    pub fn put_config(
        &self,
        table: &str,
        key_attribute: &str,
        key: &str,
        attribute: &str,
        config: TypedValue,
    ) {
        let mut record = HashMap::new();
        record.insert(key_attribute.to_string(), TypedValue::string(key));
        record.insert(attribute.to_string(), config);
        self.put(table, key_attribute, key, record);
    }

    pub fn requests(&self) -> Vec<LookupRequest> {
        self.requests.lock().clone()
    }
}

#[async_trait]
impl ItemStore for InMemoryStore {
    async fn get_item(
        &self,
        request: &LookupRequest,
    ) -> std::result::Result<Option<StoreRecord>, BackendError> {
        self.requests.lock().push(request.clone());
        let key = (
            request.table.clone(),
            request.key_attribute.clone(),
            request.key.clone(),
        );
        Ok(self.items.lock().get(&key).cloned())
    }

    fn name(&self) -> String {
        "in-memory".to_string()
    }
}

/// Store that fails every lookup with the same error.
pub struct FailingStore(pub BackendError);

#[async_trait]
impl ItemStore for FailingStore {
    async fn get_item(
        &self,
        _request: &LookupRequest,
    ) -> std::result::Result<Option<StoreRecord>, BackendError> {
        Err(self.0.clone())
    }

    fn name(&self) -> String {
        "failing".to_string()
    }
}

/// Connector handing out one shared store and recording the settings it saw.
pub struct SharedStoreConnector {
    store: Arc<InMemoryStore>,
    seen: Mutex<Vec<ClientSettings>>,
}

impl SharedStoreConnector {
    pub fn new(store: Arc<InMemoryStore>) -> Self {
        Self {
            store,
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn seen(&self) -> Vec<ClientSettings> {
        self.seen.lock().clone()
    }
}

#[async_trait]
impl StoreConnector for SharedStoreConnector {
    async fn connect(&self, settings: &ClientSettings) -> Result<Arc<dyn ItemStore>> {
        self.seen.lock().push(settings.clone());
        Ok(self.store.clone())
    }
}
