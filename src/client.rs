//! Backing-store client construction for the bootstrap and main phases.
//!
//! The configuration server starts in two stages with separate component
//! registries, and each stage builds its own client:
//!
//! - [`Phase::Bootstrap`] runs before all settings are bound, so a missing region
//!   falls back to [`DEFAULT_BOOTSTRAP_REGION`].
//! - [`Phase::Main`] validates the properties and refuses to start without a region.

use crate::core::{DynamoDbProperties, Validate};
use crate::error::{RepositoryError, Result};
use crate::store::{DynamoDbItemStore, ItemStore};
use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_config::timeout::TimeoutConfig;
use aws_sdk_dynamodb::config::{Credentials, Region};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Region used by the bootstrap phase when none is configured.
pub const DEFAULT_BOOTSTRAP_REGION: &str = "us-east-1";

/// Provider name reported for static credentials.
const STATIC_CREDENTIALS_PROVIDER: &str = "DynamoDbEnvironmentProperties";

/// Server lifecycle stage a client is built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Early stage, before composite backends are resolved.
    Bootstrap,
    /// Regular application stage.
    Main,
}

impl Phase {
    /// Region to use when the properties leave it blank.
    pub fn default_region(self) -> Option<&'static str> {
        match self {
            Self::Bootstrap => Some(DEFAULT_BOOTSTRAP_REGION),
            Self::Main => None,
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bootstrap => write!(f, "bootstrap"),
            Self::Main => write!(f, "main"),
        }
    }
}

/// Explicit access key / secret key pair.
#[derive(Clone, PartialEq, Eq)]
pub struct StaticCredentials {
    access_key_id: String,
    secret_access_key: String,
}

impl StaticCredentials {
    /// Access key id.
    pub fn access_key_id(&self) -> &str {
        &self.access_key_id
    }

    /// Secret access key.
    pub fn secret_access_key(&self) -> &str {
        &self.secret_access_key
    }
}

impl fmt::Debug for StaticCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StaticCredentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"** redacted **")
            .finish()
    }
}

/// Everything needed to open a client, resolved for one phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSettings {
    /// Region the client talks to.
    pub region: String,
    /// Static credentials, or `None` for the ambient provider chain.
    pub credentials: Option<StaticCredentials>,
    /// Connect timeout.
    pub connect_timeout: Duration,
    /// Whole-operation timeout.
    pub operation_timeout: Duration,
    /// Endpoint override.
    pub endpoint: Option<String>,
}

impl ClientSettings {
    /// Resolve client settings from properties for the given phase.
    ///
    /// # Errors
    ///
    /// In [`Phase::Main`], returns [`RepositoryError::MissingRegion`] when no region is
    /// set and [`RepositoryError::ValidationError`] for other invalid properties.
    /// [`Phase::Bootstrap`] never fails.
    pub fn resolve(properties: &DynamoDbProperties, phase: Phase) -> Result<Self> {
        let region = match (properties.has_region(), phase.default_region()) {
            (true, _) => properties.region().trim().to_string(),
            (false, Some(fallback)) => {
                tracing::debug!(%phase, region = fallback, "no region configured, using default");
                fallback.to_string()
            }
            (false, None) => return Err(RepositoryError::MissingRegion),
        };

        if phase == Phase::Main {
            properties.validate()?;
        }

        let credentials = if properties.has_credentials() {
            Some(StaticCredentials {
                access_key_id: properties.access_key().unwrap_or_default().to_string(),
                secret_access_key: properties.secret_key().unwrap_or_default().to_string(),
            })
        } else {
            None
        };

        Ok(Self {
            region,
            credentials,
            connect_timeout: properties.connection_timeout(),
            operation_timeout: properties.timeout(),
            endpoint: properties.endpoint().map(String::from),
        })
    }
}

/// Opens a store handle from resolved settings.
#[async_trait]
pub trait StoreConnector: Send + Sync {
    /// Build a client handle.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::ClientError`] if the handle cannot be built from
    /// `settings`.
    async fn connect(&self, settings: &ClientSettings) -> Result<Arc<dyn ItemStore>>;
}

/// Connector producing [`DynamoDbItemStore`] handles from the AWS SDK.
#[derive(Debug, Clone, Copy, Default)]
pub struct DynamoDbConnector;

impl DynamoDbConnector {
    /// Build the SDK client for the given settings.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::ClientError`] when the endpoint override is not an
    /// absolute `http` or `https` URL.
    pub async fn build_store(&self, settings: &ClientSettings) -> Result<DynamoDbItemStore> {
        if let Some(endpoint) = &settings.endpoint {
            check_endpoint(endpoint)?;
        }

        let timeouts = TimeoutConfig::builder()
            .connect_timeout(settings.connect_timeout)
            .operation_timeout(settings.operation_timeout)
            .build();

        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(settings.region.clone()))
            .timeout_config(timeouts);

        if let Some(credentials) = &settings.credentials {
            loader = loader.credentials_provider(Credentials::new(
                credentials.access_key_id.clone(),
                credentials.secret_access_key.clone(),
                None,
                None,
                STATIC_CREDENTIALS_PROVIDER,
            ));
        }

        if let Some(endpoint) = &settings.endpoint {
            loader = loader.endpoint_url(endpoint.clone());
        }

        let sdk_config = loader.load().await;
        let client = aws_sdk_dynamodb::Client::new(&sdk_config);
        Ok(DynamoDbItemStore::from_client(client, &settings.region))
    }
}

fn check_endpoint(endpoint: &str) -> Result<()> {
    let url = Url::parse(endpoint).map_err(|e| {
        RepositoryError::ClientError(format!("invalid endpoint '{}': {}", endpoint, e))
    })?;

    match url.scheme() {
        "http" | "https" if url.has_host() => Ok(()),
        scheme => Err(RepositoryError::ClientError(format!(
            "invalid endpoint '{}': expected an http(s) URL with a host, got scheme '{}'",
            endpoint, scheme
        ))),
    }
}

#[async_trait]
impl StoreConnector for DynamoDbConnector {
    async fn connect(&self, settings: &ClientSettings) -> Result<Arc<dyn ItemStore>> {
        Ok(Arc::new(self.build_store(settings).await?))
    }
}

/// Builds client handles for one phase.
///
/// # Examples
///
/// ```rust,no_run
/// use dynamodb_env_repository::client::ClientProvider;
/// use dynamodb_env_repository::core::DynamoDbProperties;
///
/// # async fn example() -> dynamodb_env_repository::error::Result<()> {
/// let props = DynamoDbProperties::builder().table("config_table").build();
///
/// // Bootstrap tolerates the missing region...
/// let _client = ClientProvider::bootstrap().build_client(&props).await?;
///
/// // ...the main phase does not.
/// assert!(ClientProvider::main().build_client(&props).await.is_err());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ClientProvider<C = DynamoDbConnector> {
    phase: Phase,
    connector: C,
}

impl ClientProvider<DynamoDbConnector> {
    /// Provider for the bootstrap phase, backed by the AWS SDK.
    pub fn bootstrap() -> Self {
        Self::with_connector(Phase::Bootstrap, DynamoDbConnector)
    }

    /// Provider for the main phase, backed by the AWS SDK.
    pub fn main() -> Self {
        Self::with_connector(Phase::Main, DynamoDbConnector)
    }
}

impl<C: StoreConnector> ClientProvider<C> {
    /// Provider for `phase` using a custom connector.
    pub fn with_connector(phase: Phase, connector: C) -> Self {
        Self { phase, connector }
    }

    /// The phase this provider builds clients for.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The connector handles are opened through.
    pub fn connector(&self) -> &C {
        &self.connector
    }

    /// Resolve settings for this provider's phase and open a client.
    ///
    /// # Errors
    ///
    /// Propagates [`ClientSettings::resolve`] and connector failures.
    pub async fn build_client(
        &self,
        properties: &DynamoDbProperties,
    ) -> Result<Arc<dyn ItemStore>> {
        let settings = ClientSettings::resolve(properties, self.phase)?;

        tracing::debug!(
            phase = %self.phase,
            region = %settings.region,
            static_credentials = settings.credentials.is_some(),
            "building DynamoDB client"
        );

        self.connector.connect(&settings).await
    }
}
