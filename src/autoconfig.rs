//! Profile-gated wiring of the bootstrap and main phases.
//!
//! The host calls [`configure_bootstrap`] with the bootstrap registry before the
//! server's own settings are bound, then [`configure_main`] with the main registry.
//! Both activate only when the `dynamodb` profile is active, so a server either gets
//! the backend in both phases or in neither.
//!
//! # Examples
//!
//! ```rust,no_run
//! use dynamodb_env_repository::prelude::*;
//! use dynamodb_env_repository::autoconfig::{configure_bootstrap, configure_main};
//!
//! # async fn example() -> dynamodb_env_repository::error::Result<()> {
//! let settings = PropertiesLoader::new()
//!     .with_file("config/server.yaml")
//!     .with_env_overrides("CONFIG", "__")
//!     .load()?;
//!
//! let bootstrap_registry = ComponentRegistry::new(Phase::Bootstrap);
//! let bootstrap = configure_bootstrap(
//!     settings.active_profiles(),
//!     settings.dynamodb(),
//!     &ClientProvider::bootstrap(),
//!     &bootstrap_registry,
//! )
//! .await?;
//!
//! let main_registry = ComponentRegistry::new(Phase::Main);
//! if let Some(main) = configure_main(
//!     settings.active_profiles(),
//!     settings.dynamodb(),
//!     &ClientProvider::main(),
//!     &main_registry,
//! )
//! .await?
//! {
//!     let environment = main.repository.find_one("myapp", "dev", "main").await;
//!     println!("{} property sources", environment.property_sources().len());
//! }
//! # let _ = bootstrap;
//! # Ok(())
//! # }
//! ```

use crate::client::{ClientProvider, Phase, StoreConnector};
use crate::core::DynamoDbProperties;
use crate::error::{RepositoryError, Result};
use crate::factory::DynamoDbEnvironmentRepositoryFactory;
use crate::registry::ComponentRegistry;
use crate::repository::{
    CompositeEnvironmentRepository, DynamoDbEnvironmentRepository, EnvironmentRepository,
};
use crate::store::ItemStore;
use std::sync::Arc;

/// Profile that activates the DynamoDB backend.
pub const BACKEND_PROFILE: &str = "dynamodb";

/// Registry name of the main-phase client.
pub const MAIN_CLIENT_NAME: &str = "configDynamodbClient";

/// Registry name of the bootstrap-phase client.
pub const BOOTSTRAP_CLIENT_NAME: &str = "bootstrapDynamodbClient";

/// Components produced by main-phase wiring.
pub struct MainPhaseComponents {
    /// Client registered as [`MAIN_CLIENT_NAME`].
    pub client: Arc<dyn ItemStore>,
    /// Repository for the top-level properties.
    pub repository: DynamoDbEnvironmentRepository,
    /// Factory resolving [`MAIN_CLIENT_NAME`] from the main registry.
    pub factory: DynamoDbEnvironmentRepositoryFactory,
}

/// Components produced by bootstrap-phase wiring.
pub struct BootstrapComponents {
    /// Client registered as [`BOOTSTRAP_CLIENT_NAME`].
    pub client: Arc<dyn ItemStore>,
    /// Factory bound directly to the bootstrap client.
    pub factory: DynamoDbEnvironmentRepositoryFactory,
}

impl std::fmt::Debug for MainPhaseComponents {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MainPhaseComponents")
            .field("client", &self.client.name())
            .field("repository", &self.repository)
            .field("factory", &self.factory)
            .finish()
    }
}

impl std::fmt::Debug for BootstrapComponents {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BootstrapComponents")
            .field("client", &self.client.name())
            .field("factory", &self.factory)
            .finish()
    }
}

/// Whether the backend profile is among `active_profiles`.
pub fn backend_enabled<S: AsRef<str>>(active_profiles: &[S]) -> bool {
    active_profiles
        .iter()
        .any(|profile| profile.as_ref().trim() == BACKEND_PROFILE)
}

/// Wire the main phase.
///
/// Returns `Ok(None)` when the backend profile is not active.
///
/// # Errors
///
/// Fails when the provider is not a main-phase provider or when the client cannot
/// be built (missing region, invalid properties, connector failure).
pub async fn configure_main<S, C>(
    active_profiles: &[S],
    properties: &DynamoDbProperties,
    provider: &ClientProvider<C>,
    registry: &ComponentRegistry,
) -> Result<Option<MainPhaseComponents>>
where
    S: AsRef<str>,
    C: StoreConnector,
{
    if !backend_enabled(active_profiles) {
        tracing::debug!(
            profile = BACKEND_PROFILE,
            "profile not active, skipping main-phase wiring"
        );
        return Ok(None);
    }
    ensure_phase(Phase::Main, provider, registry)?;

    let client = provider.build_client(properties).await?;
    registry.register_client(MAIN_CLIENT_NAME, Arc::clone(&client));

    let factory =
        DynamoDbEnvironmentRepositoryFactory::from_registry(registry.clone(), MAIN_CLIENT_NAME);
    let repository = factory.build(properties.clone());

    tracing::info!(
        region = %properties.region(),
        table = %properties.table(),
        "DynamoDB environment repository configured"
    );

    Ok(Some(MainPhaseComponents {
        client,
        repository,
        factory,
    }))
}

/// Wire the bootstrap phase.
///
/// Returns `Ok(None)` when the backend profile is not active. A missing region falls
/// back to [`DEFAULT_BOOTSTRAP_REGION`](crate::client::DEFAULT_BOOTSTRAP_REGION).
///
/// # Errors
///
/// Fails when the provider is not a bootstrap-phase provider or the connector fails.
pub async fn configure_bootstrap<S, C>(
    active_profiles: &[S],
    properties: &DynamoDbProperties,
    provider: &ClientProvider<C>,
    registry: &ComponentRegistry,
) -> Result<Option<BootstrapComponents>>
where
    S: AsRef<str>,
    C: StoreConnector,
{
    if !backend_enabled(active_profiles) {
        tracing::debug!(profile = BACKEND_PROFILE, "profile not active, skipping bootstrap wiring");
        return Ok(None);
    }
    ensure_phase(Phase::Bootstrap, provider, registry)?;

    let client = provider.build_client(properties).await?;
    registry.register_client(BOOTSTRAP_CLIENT_NAME, Arc::clone(&client));

    Ok(Some(BootstrapComponents {
        factory: DynamoDbEnvironmentRepositoryFactory::new(Arc::clone(&client)),
        client,
    }))
}

/// Build one repository per entry and combine them by order.
pub fn composite_repository<'a>(
    factory: &DynamoDbEnvironmentRepositoryFactory,
    entries: impl IntoIterator<Item = &'a DynamoDbProperties>,
) -> CompositeEnvironmentRepository {
    let repositories = entries
        .into_iter()
        .map(|properties| {
            Box::new(factory.build(properties.clone())) as Box<dyn EnvironmentRepository>
        })
        .collect();

    CompositeEnvironmentRepository::new(repositories)
}

fn ensure_phase<C>(
    expected: Phase,
    provider: &ClientProvider<C>,
    registry: &ComponentRegistry,
) -> Result<()>
where
    C: StoreConnector,
{
    if provider.phase() != expected || registry.phase() != expected {
        return Err(RepositoryError::ValidationError(format!(
            "{} wiring requires {} provider and registry, got provider={} registry={}",
            expected,
            expected,
            provider.phase(),
            registry.phase()
        )));
    }
    Ok(())
}
