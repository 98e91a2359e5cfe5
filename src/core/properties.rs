//! DynamoDB repository properties.

use crate::core::Validate;
use crate::error::ValidationError;
use std::fmt;
use std::time::Duration;

/// Order value meaning "consult last".
pub const LOWEST_PRECEDENCE: i32 = i32::MAX;

/// Default partition key attribute name.
pub const DEFAULT_PARTITION_KEY: &str = "config_id";

/// Default name of the attribute holding the configuration map.
pub const DEFAULT_CONFIG_ATTRIBUTE: &str = "properties";

/// Default separator between application and profile in the lookup key.
pub const DEFAULT_DELIMITER: &str = "-";

/// Default connect timeout in milliseconds.
pub const DEFAULT_CONNECTION_TIMEOUT_MS: u64 = 10_000;

/// Default request timeout in milliseconds.
pub const DEFAULT_TIMEOUT_MS: u64 = 50_000;

/// Connection and schema settings for one DynamoDB-backed repository.
///
/// Values are fixed once built; use [`DynamoDbProperties::builder`] or
/// [`DynamoDbProperties::to_builder`] to derive a variant.
///
/// # Examples
///
/// ```rust
/// use dynamodb_env_repository::core::DynamoDbProperties;
///
/// let props = DynamoDbProperties::builder()
///     .region("us-east-1")
///     .table("config_table")
///     .order(1)
///     .build();
///
/// assert_eq!(props.partition_key(), "config_id");
/// assert_eq!(props.lookup_key("myapp", "prod"), "myapp-prod");
/// assert!(!props.has_credentials());
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct DynamoDbProperties {
    region: String,
    table: String,
    access_key: Option<String>,
    secret_key: Option<String>,
    partition_key: String,
    config_attribute: String,
    delimiter: String,
    order: i32,
    connection_timeout_ms: u64,
    timeout_ms: u64,
    endpoint: Option<String>,
}

impl DynamoDbProperties {
    /// Create a builder populated with defaults.
    pub fn builder() -> DynamoDbPropertiesBuilder {
        DynamoDbPropertiesBuilder::new()
    }

    /// Create a builder seeded with these values.
    pub fn to_builder(&self) -> DynamoDbPropertiesBuilder {
        DynamoDbPropertiesBuilder {
            props: self.clone(),
        }
    }

    /// AWS region, empty when unset.
    pub fn region(&self) -> &str {
        &self.region
    }

    /// Table name, empty when unset.
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Explicit access key, if configured.
    pub fn access_key(&self) -> Option<&str> {
        self.access_key.as_deref()
    }

    /// Explicit secret key, if configured.
    pub fn secret_key(&self) -> Option<&str> {
        self.secret_key.as_deref()
    }

    /// Name of the partition key attribute.
    pub fn partition_key(&self) -> &str {
        &self.partition_key
    }

    /// Name of the attribute holding the configuration map.
    pub fn config_attribute(&self) -> &str {
        &self.config_attribute
    }

    /// Separator joining application and profile.
    pub fn delimiter(&self) -> &str {
        &self.delimiter
    }

    /// Precedence among repositories (lower first).
    pub fn order(&self) -> i32 {
        self.order
    }

    /// Connect timeout in milliseconds.
    pub fn connection_timeout_ms(&self) -> u64 {
        self.connection_timeout_ms
    }

    /// Request timeout in milliseconds.
    pub fn timeout_ms(&self) -> u64 {
        self.timeout_ms
    }

    /// Connect timeout as a `Duration`.
    pub fn connection_timeout(&self) -> Duration {
        Duration::from_millis(self.connection_timeout_ms)
    }

    /// Request timeout as a `Duration`.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Endpoint override (LocalStack, DynamoDB Local).
    pub fn endpoint(&self) -> Option<&str> {
        self.endpoint.as_deref()
    }

    /// Whether a region is set.
    pub fn has_region(&self) -> bool {
        !is_blank(&self.region)
    }

    /// Whether both access key and secret key are present and non-blank.
    ///
    /// A lone key is never treated as credentials.
    pub fn has_credentials(&self) -> bool {
        self.access_key.as_deref().is_some_and(|k| !is_blank(k))
            && self.secret_key.as_deref().is_some_and(|k| !is_blank(k))
    }

    /// Build the partition key value for an application/profile pair.
    pub fn lookup_key(&self, application: &str, profile: &str) -> String {
        format!("{}{}{}", application, self.delimiter, profile)
    }
}

impl Default for DynamoDbProperties {
    fn default() -> Self {
        Self {
            region: String::new(),
            table: String::new(),
            access_key: None,
            secret_key: None,
            partition_key: DEFAULT_PARTITION_KEY.to_string(),
            config_attribute: DEFAULT_CONFIG_ATTRIBUTE.to_string(),
            delimiter: DEFAULT_DELIMITER.to_string(),
            order: LOWEST_PRECEDENCE,
            connection_timeout_ms: DEFAULT_CONNECTION_TIMEOUT_MS,
            timeout_ms: DEFAULT_TIMEOUT_MS,
            endpoint: None,
        }
    }
}

// Secret key is never printed.
impl fmt::Debug for DynamoDbProperties {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DynamoDbProperties")
            .field("region", &self.region)
            .field("table", &self.table)
            .field("access_key", &self.access_key)
            .field("partition_key", &self.partition_key)
            .field("config_attribute", &self.config_attribute)
            .field("delimiter", &self.delimiter)
            .field("order", &self.order)
            .field("connection_timeout_ms", &self.connection_timeout_ms)
            .field("timeout_ms", &self.timeout_ms)
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

impl Validate for DynamoDbProperties {
    fn validate(&self) -> Result<(), ValidationError> {
        let mut errors = Vec::new();

        if !self.has_region() {
            errors.push(ValidationError::invalid_field("region", "must not be blank"));
        }
        if is_blank(&self.partition_key) {
            errors.push(ValidationError::invalid_field(
                "partition-key",
                "must not be blank",
            ));
        }
        if is_blank(&self.config_attribute) {
            errors.push(ValidationError::invalid_field(
                "config-attribute",
                "must not be blank",
            ));
        }

        ValidationError::collect(errors)
    }
}

fn is_blank(s: &str) -> bool {
    s.trim().is_empty()
}

/// Builder for [`DynamoDbProperties`].
#[derive(Debug, Clone, Default)]
pub struct DynamoDbPropertiesBuilder {
    props: DynamoDbProperties,
}

impl DynamoDbPropertiesBuilder {
    /// Create a builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the AWS region.
    pub fn region(mut self, region: impl Into<String>) -> Self {
        self.props.region = region.into();
        self
    }

    /// Set the table name.
    pub fn table(mut self, table: impl Into<String>) -> Self {
        self.props.table = table.into();
        self
    }

    /// Set the access key.
    pub fn access_key(mut self, access_key: impl Into<String>) -> Self {
        self.props.access_key = Some(access_key.into());
        self
    }

    /// Set the secret key.
    pub fn secret_key(mut self, secret_key: impl Into<String>) -> Self {
        self.props.secret_key = Some(secret_key.into());
        self
    }

    /// Set or clear both credential halves at once.
    pub fn credentials(mut self, access_key: Option<String>, secret_key: Option<String>) -> Self {
        self.props.access_key = access_key;
        self.props.secret_key = secret_key;
        self
    }

    /// Set the partition key attribute name.
    pub fn partition_key(mut self, partition_key: impl Into<String>) -> Self {
        self.props.partition_key = partition_key.into();
        self
    }

    /// Set the configuration attribute name.
    pub fn config_attribute(mut self, config_attribute: impl Into<String>) -> Self {
        self.props.config_attribute = config_attribute.into();
        self
    }

    /// Set the application/profile delimiter.
    pub fn delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.props.delimiter = delimiter.into();
        self
    }

    /// Set the repository order (lower = consulted first).
    pub fn order(mut self, order: i32) -> Self {
        self.props.order = order;
        self
    }

    /// Set the connect timeout in milliseconds.
    pub fn connection_timeout_ms(mut self, millis: u64) -> Self {
        self.props.connection_timeout_ms = millis;
        self
    }

    /// Set the request timeout in milliseconds.
    pub fn timeout_ms(mut self, millis: u64) -> Self {
        self.props.timeout_ms = millis;
        self
    }

    /// Set an endpoint override.
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.props.endpoint = Some(endpoint.into());
        self
    }

    /// Finish building.
    pub fn build(self) -> DynamoDbProperties {
        self.props
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let props = DynamoDbProperties::default();
        assert_eq!(props.region(), "");
        assert_eq!(props.table(), "");
        assert!(props.access_key().is_none());
        assert!(props.secret_key().is_none());
        assert_eq!(props.partition_key(), "config_id");
        assert_eq!(props.config_attribute(), "properties");
        assert_eq!(props.delimiter(), "-");
        assert_eq!(props.order(), i32::MAX);
        assert_eq!(props.connection_timeout_ms(), 10_000);
        assert_eq!(props.timeout_ms(), 50_000);
        assert!(props.endpoint().is_none());
    }

    #[test]
    fn test_builder_sets_everything() {
        let props = DynamoDbProperties::builder()
            .region("eu-west-1")
            .table("config_store")
            .access_key("test-access-key")
            .secret_key("test-secret-key")
            .partition_key("app_config")
            .config_attribute("config_data")
            .delimiter("_")
            .order(5)
            .connection_timeout_ms(2_000)
            .timeout_ms(30_000)
            .endpoint("http://localhost:4566")
            .build();

        assert_eq!(props.region(), "eu-west-1");
        assert_eq!(props.table(), "config_store");
        assert_eq!(props.access_key(), Some("test-access-key"));
        assert_eq!(props.secret_key(), Some("test-secret-key"));
        assert_eq!(props.partition_key(), "app_config");
        assert_eq!(props.config_attribute(), "config_data");
        assert_eq!(props.delimiter(), "_");
        assert_eq!(props.order(), 5);
        assert_eq!(props.connection_timeout(), Duration::from_secs(2));
        assert_eq!(props.timeout(), Duration::from_secs(30));
        assert_eq!(props.endpoint(), Some("http://localhost:4566"));
        assert!(props.has_credentials());
    }

    #[test]
    fn test_credentials_require_both_halves() {
        let only_access = DynamoDbProperties::builder().access_key("access-key").build();
        assert!(!only_access.has_credentials());

        let only_secret = DynamoDbProperties::builder().secret_key("secret-key").build();
        assert!(!only_secret.has_credentials());

        let both = DynamoDbProperties::builder()
            .access_key("access-key")
            .secret_key("secret-key")
            .build();
        assert!(both.has_credentials());
    }

    #[test]
    fn test_blank_credentials_rejected() {
        let empty = DynamoDbProperties::builder().access_key("").secret_key("").build();
        assert!(!empty.has_credentials());

        let whitespace = DynamoDbProperties::builder()
            .access_key("   ")
            .secret_key("   ")
            .build();
        assert!(!whitespace.has_credentials());

        let blank_secret = DynamoDbProperties::builder()
            .access_key("valid-access-key")
            .secret_key(" \t")
            .build();
        assert!(!blank_secret.has_credentials());

        let blank_access = DynamoDbProperties::builder()
            .access_key("")
            .secret_key("valid-secret-key")
            .build();
        assert!(!blank_access.has_credentials());
    }

    #[test]
    fn test_credentials_cleared() {
        let props = DynamoDbProperties::builder()
            .access_key("a")
            .secret_key("b")
            .build()
            .to_builder()
            .credentials(None, None)
            .build();
        assert!(!props.has_credentials());
    }

    #[test]
    fn test_lookup_key() {
        let props = DynamoDbProperties::default();
        assert_eq!(props.lookup_key("myapp", "prod"), "myapp-prod");

        let props = props.to_builder().delimiter("_").build();
        assert_eq!(props.lookup_key("service", "test"), "service_test");

        let props = props.to_builder().delimiter("::").build();
        assert_eq!(props.lookup_key("my-app", "dev"), "my-app::dev");
    }

    #[test]
    fn test_debug_hides_secret() {
        let props = DynamoDbProperties::builder()
            .access_key("visible-access")
            .secret_key("super-secret-value")
            .build();
        let rendered = format!("{:?}", props);
        assert!(rendered.contains("visible-access"));
        assert!(!rendered.contains("super-secret-value"));
    }

    #[test]
    fn test_validate() {
        let valid = DynamoDbProperties::builder().region("us-east-1").build();
        assert!(valid.validate().is_ok());

        let missing_region = DynamoDbProperties::builder().region("  ").build();
        let err = missing_region.validate().unwrap_err();
        assert!(err.to_string().contains("region"));

        let broken = DynamoDbProperties::builder()
            .partition_key("")
            .config_attribute(" ")
            .build();
        assert!(matches!(
            broken.validate(),
            Err(ValidationError::Multiple(errors)) if errors.len() == 3
        ));
    }
}
