//! Factory producing [`DynamoDbEnvironmentRepository`] instances.

use crate::core::DynamoDbProperties;
use crate::registry::ComponentRegistry;
use crate::repository::DynamoDbEnvironmentRepository;
use crate::store::ItemStore;
use std::sync::Arc;

#[cfg(feature = "metrics")]
use crate::metrics::RepositoryMetrics;

/// Where a factory gets its client handle from.
#[derive(Clone)]
pub enum ClientBinding {
    /// A handle supplied up front (bootstrap phase).
    Direct(Arc<dyn ItemStore>),
    /// A handle resolved by name from a registry at build time (main phase).
    Registry {
        /// Registry to resolve from.
        registry: ComponentRegistry,
        /// Registered client name.
        name: String,
    },
    /// No handle; every built repository fails open.
    Unbound,
}

impl std::fmt::Debug for ClientBinding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Direct(store) => f.debug_tuple("Direct").field(&store.name()).finish(),
            Self::Registry { registry, name } => f
                .debug_struct("Registry")
                .field("phase", &registry.phase())
                .field("name", name)
                .finish(),
            Self::Unbound => write!(f, "Unbound"),
        }
    }
}

/// Builds repositories from properties, one per backend entry.
///
/// A single factory can serve several composite entries, each with its own
/// region, table and order.
///
/// # Examples
///
/// ```rust,no_run
/// use dynamodb_env_repository::prelude::*;
/// use std::sync::Arc;
///
/// # fn example(store: Arc<dyn ItemStore>) {
/// let factory = DynamoDbEnvironmentRepositoryFactory::new(store);
///
/// let primary = factory.build(
///     DynamoDbProperties::builder().region("us-east-1").table("config").order(1).build(),
/// );
/// let fallback = factory.build(
///     DynamoDbProperties::builder().region("us-west-2").table("config").order(2).build(),
/// );
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct DynamoDbEnvironmentRepositoryFactory {
    binding: ClientBinding,
    #[cfg(feature = "metrics")]
    metrics: Option<RepositoryMetrics>,
}

impl DynamoDbEnvironmentRepositoryFactory {
    /// Factory bound to a client handle.
    pub fn new(client: Arc<dyn ItemStore>) -> Self {
        Self::with_binding(ClientBinding::Direct(client))
    }

    /// Factory resolving `name` from `registry` each time it builds.
    pub fn from_registry(registry: ComponentRegistry, name: impl Into<String>) -> Self {
        Self::with_binding(ClientBinding::Registry {
            registry,
            name: name.into(),
        })
    }

    /// Factory with no client handle.
    pub fn unbound() -> Self {
        Self::with_binding(ClientBinding::Unbound)
    }

    /// Factory with an explicit binding.
    pub fn with_binding(binding: ClientBinding) -> Self {
        Self {
            binding,
            #[cfg(feature = "metrics")]
            metrics: None,
        }
    }

    /// Attach metrics to every repository this factory builds.
    #[cfg(feature = "metrics")]
    pub fn with_metrics(mut self, metrics: RepositoryMetrics) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// The binding this factory resolves clients through.
    pub fn binding(&self) -> &ClientBinding {
        &self.binding
    }

    /// Build a repository for `properties`.
    ///
    /// Never fails. A missing client produces a repository whose lookups return
    /// empty environments.
    pub fn build(&self, properties: DynamoDbProperties) -> DynamoDbEnvironmentRepository {
        let store = match &self.binding {
            ClientBinding::Direct(store) => Some(Arc::clone(store)),
            ClientBinding::Registry { registry, name } => {
                let store = registry.client(name);
                if store.is_none() {
                    tracing::warn!(
                        phase = %registry.phase(),
                        name = %name,
                        "client not registered, repository will be unbound"
                    );
                }
                store
            }
            ClientBinding::Unbound => None,
        };

        tracing::debug!(
            table = %properties.table(),
            order = properties.order(),
            bound = store.is_some(),
            "building DynamoDB environment repository"
        );

        let repository = DynamoDbEnvironmentRepository::from_parts(properties, store);

        #[cfg(feature = "metrics")]
        let repository = match &self.metrics {
            Some(metrics) => repository.with_metrics(metrics.clone()),
            None => repository,
        };

        repository
    }
}

impl Default for DynamoDbEnvironmentRepositoryFactory {
    fn default() -> Self {
        Self::unbound()
    }
}
