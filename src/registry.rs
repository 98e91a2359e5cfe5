//! Named component registry for one server phase.

use crate::client::Phase;
use crate::store::ItemStore;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

/// Internal registry state.
struct RegistryInner {
    clients: HashMap<String, Arc<dyn ItemStore>>,
}

/// Holds the client handles registered during one phase.
///
/// Cloning shares the underlying map, so the bootstrap and main phases each
/// keep their own registry while any number of factories can resolve from it.
///
/// # Examples
///
/// ```rust,no_run
/// use dynamodb_env_repository::client::Phase;
/// use dynamodb_env_repository::registry::ComponentRegistry;
///
/// let registry = ComponentRegistry::new(Phase::Main);
/// assert!(!registry.contains_client("configDynamodbClient"));
/// ```
#[derive(Clone)]
pub struct ComponentRegistry {
    phase: Phase,
    inner: Arc<RwLock<RegistryInner>>,
}

impl ComponentRegistry {
    /// Create an empty registry for `phase`.
    pub fn new(phase: Phase) -> Self {
        Self {
            phase,
            inner: Arc::new(RwLock::new(RegistryInner {
                clients: HashMap::new(),
            })),
        }
    }

    /// Phase this registry belongs to.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Register a client under `name`, returning the handle it replaced.
    pub fn register_client(
        &self,
        name: impl Into<String>,
        client: Arc<dyn ItemStore>,
    ) -> Option<Arc<dyn ItemStore>> {
        let name = name.into();
        tracing::debug!(phase = %self.phase, name = %name, "registering client");
        self.inner.write().clients.insert(name, client)
    }

    /// Look up a registered client.
    pub fn client(&self, name: &str) -> Option<Arc<dyn ItemStore>> {
        self.inner.read().clients.get(name).cloned()
    }

    /// Whether a client is registered under `name`.
    pub fn contains_client(&self, name: &str) -> bool {
        self.inner.read().clients.contains_key(name)
    }

    /// Names of all registered clients, sorted.
    pub fn client_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.inner.read().clients.keys().cloned().collect();
        names.sort();
        names
    }
}

impl std::fmt::Debug for ComponentRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComponentRegistry")
            .field("phase", &self.phase)
            .field("clients", &self.client_names())
            .finish()
    }
}
