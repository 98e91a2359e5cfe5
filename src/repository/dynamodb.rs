//! DynamoDB-backed environment repository.

use super::{EnvironmentRepository, LookupOutcome};
use crate::core::DynamoDbProperties;
use crate::environment::{Environment, PropertySource};
use crate::flatten::flatten_typed;
use crate::store::{ItemStore, LookupRequest};
use crate::value::{StoreRecord, TypedValue};
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;

#[cfg(feature = "metrics")]
use crate::metrics::RepositoryMetrics;

/// Scheme prefix of every property-source name this repository produces.
pub const PROPERTY_SOURCE_SCHEME: &str = "DynamoDB://";

/// Environment repository that reads one record per `(application, profile)`.
///
/// The record is stored under `{application}{delimiter}{profile}` in the configured
/// partition key attribute, and its configuration attribute holds a nested map that
/// is flattened into a single [`PropertySource`].
///
/// # Examples
///
/// ```rust,no_run
/// use dynamodb_env_repository::prelude::*;
/// use std::sync::Arc;
///
/// # async fn example(store: Arc<dyn ItemStore>) {
/// let props = DynamoDbProperties::builder()
///     .region("us-east-1")
///     .table("config_table")
///     .build();
///
/// let repository = DynamoDbEnvironmentRepository::new(props, store);
/// let environment = repository.find_one("myapp", "dev", "main").await;
///
/// for source in environment.property_sources() {
///     println!("{}: {} properties", source.name(), source.len());
/// }
/// # }
/// ```
pub struct DynamoDbEnvironmentRepository {
    properties: DynamoDbProperties,
    store: Option<Arc<dyn ItemStore>>,
    #[cfg(feature = "metrics")]
    metrics: Option<RepositoryMetrics>,
}

impl fmt::Debug for DynamoDbEnvironmentRepository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DynamoDbEnvironmentRepository")
            .field("properties", &self.properties)
            .field("store", &self.store.as_ref().map(|store| store.name()))
            .finish()
    }
}

impl DynamoDbEnvironmentRepository {
    /// Create a repository reading through `store`.
    pub fn new(properties: DynamoDbProperties, store: Arc<dyn ItemStore>) -> Self {
        Self::from_parts(properties, Some(store))
    }

    /// Create a repository with no client handle.
    ///
    /// Every lookup logs a backend failure and returns an empty environment.
    pub fn unbound(properties: DynamoDbProperties) -> Self {
        Self::from_parts(properties, None)
    }

    pub(crate) fn from_parts(
        properties: DynamoDbProperties,
        store: Option<Arc<dyn ItemStore>>,
    ) -> Self {
        Self {
            properties,
            store,
            #[cfg(feature = "metrics")]
            metrics: None,
        }
    }

    /// Record lookup metrics through `metrics`.
    #[cfg(feature = "metrics")]
    pub fn with_metrics(mut self, metrics: RepositoryMetrics) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Properties this repository was built with.
    pub fn properties(&self) -> &DynamoDbProperties {
        &self.properties
    }

    /// Whether a client handle is bound.
    pub fn is_bound(&self) -> bool {
        self.store.is_some()
    }

    /// Identifier of the property source produced for a lookup.
    pub fn property_source_name(&self, application: &str, profile: &str, label: &str) -> String {
        format!(
            "{}{}:{}/{}/{}/{}",
            PROPERTY_SOURCE_SCHEME,
            self.properties.region(),
            self.properties.table(),
            application,
            profile,
            label
        )
    }

    async fn fetch(
        &self,
        lookup_key: &str,
    ) -> Result<Option<StoreRecord>, crate::error::BackendError> {
        let store = self
            .store
            .as_ref()
            .ok_or(crate::error::BackendError::ClientUnavailable)?;

        let request = LookupRequest {
            table: self.properties.table().to_string(),
            key_attribute: self.properties.partition_key().to_string(),
            key: lookup_key.to_string(),
        };

        store.get_item(&request).await
    }

    async fn lookup(
        &self,
        application: &str,
        profile: &str,
        label: &str,
    ) -> (Option<PropertySource>, LookupOutcome) {
        let lookup_key = self.properties.lookup_key(application, profile);

        let record = match self.fetch(&lookup_key).await {
            Ok(Some(record)) => record,
            Ok(None) => {
                tracing::info!(
                    key = %lookup_key,
                    table = %self.properties.table(),
                    "no configuration record found"
                );
                return (None, LookupOutcome::Miss);
            }
            Err(err) => {
                tracing::error!(
                    key = %lookup_key,
                    table = %self.properties.table(),
                    error = %err,
                    "failed to load configuration from DynamoDB"
                );
                return (None, LookupOutcome::Failure);
            }
        };

        let attribute = self.properties.config_attribute();
        let config = match record.get(attribute) {
            Some(TypedValue::Map(map)) if !map.is_empty() => map,
            Some(TypedValue::Map(_)) | None => {
                tracing::warn!(
                    key = %lookup_key,
                    attribute,
                    "configuration attribute is missing or empty"
                );
                return (None, LookupOutcome::EmptyAttribute);
            }
            Some(other) => {
                tracing::warn!(
                    key = %lookup_key,
                    attribute,
                    kind = other.kind(),
                    "configuration attribute is not a map, ignoring"
                );
                return (None, LookupOutcome::EmptyAttribute);
            }
        };

        let flat = flatten_typed(config);
        tracing::debug!(key = %lookup_key, properties = flat.len(), "loaded configuration");

        let name = self.property_source_name(application, profile, label);
        (Some(PropertySource::new(name, flat)), LookupOutcome::Hit)
    }
}

#[async_trait]
impl EnvironmentRepository for DynamoDbEnvironmentRepository {
    async fn find_one(&self, application: &str, profile: &str, label: &str) -> Environment {
        #[cfg(feature = "metrics")]
        let timer = self.metrics.as_ref().map(|metrics| metrics.start_lookup());

        let mut environment = Environment::new(application, profile, label);
        let (source, _outcome) = self.lookup(application, profile, label).await;

        #[cfg(feature = "metrics")]
        if let (Some(metrics), Some(timer)) = (&self.metrics, timer) {
            metrics.record_lookup(timer, _outcome);
        }

        if let Some(source) = source {
            environment.add(source);
        }
        environment
    }

    fn order(&self) -> i32 {
        self.properties.order()
    }
}
