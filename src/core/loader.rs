//! Settings loader that binds repository properties from files and environment variables.

use crate::core::DynamoDbProperties;
use crate::error::{RepositoryError, Result};
use config::{Environment, File};
use serde::Deserialize;
use std::path::PathBuf;

/// Composite entry type handled by this crate.
pub const DYNAMODB_TYPE: &str = "dynamodb";

/// Loads [`ServerSettings`] from layered sources.
///
/// Sources are merged in the order files → environment variables → explicit
/// overrides; later files override earlier ones.
///
/// Recognised layout (YAML shown):
///
/// ```yaml
/// profiles:
///   active: dynamodb
/// server:
///   bootstrap: false
///   dynamodb:
///     region: us-east-1
///     table: config_table
///     partition-key: config_id
///     config-attribute: properties
///     delimiter: "-"
///     order: 1
///   composite:
///     - type: dynamodb
///       region: eu-west-1
///       table: shared_config
///       order: 2
/// ```
///
/// # Examples
///
/// ```rust,no_run
/// use dynamodb_env_repository::core::PropertiesLoader;
///
/// # fn example() -> dynamodb_env_repository::error::Result<()> {
/// let settings = PropertiesLoader::new()
///     .with_file("config/server.yaml")
///     .with_env_overrides("CONFIG", "__")
///     .load()?;
///
/// println!("table: {}", settings.dynamodb().table());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct PropertiesLoader {
    file_paths: Vec<PathBuf>,
    env_prefix: Option<String>,
    env_separator: Option<String>,
    overrides: Vec<(String, config::Value)>,
}

impl PropertiesLoader {
    /// Create a loader with no sources.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a settings file. Supported formats: YAML (.yaml, .yml), TOML (.toml), JSON (.json)
    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.file_paths.push(path.into());
        self
    }

    /// Read environment variables with the given prefix.
    ///
    /// `CONFIG_SERVER__DYNAMODB__REGION=eu-west-1` with prefix `CONFIG` and separator
    /// `__` sets `server.dynamodb.region`.
    pub fn with_env_overrides(mut self, prefix: &str, separator: &str) -> Self {
        self.env_prefix = Some(prefix.to_string());
        self.env_separator = Some(separator.to_string());
        self
    }

    /// Set a single key, taking precedence over every other source.
    pub fn with_override(
        mut self,
        key: impl Into<String>,
        value: impl Into<config::Value>,
    ) -> Self {
        self.overrides.push((key.into(), value.into()));
        self
    }

    /// Merge all sources and bind the result.
    ///
    /// # Errors
    ///
    /// Returns an error if a file has an unsupported extension or is missing, if any
    /// source fails to parse, or if the merged values do not fit the settings layout.
    pub fn load(&self) -> Result<ServerSettings> {
        let mut builder = config::Config::builder();

        for path in &self.file_paths {
            validate_extension(path)?;
            if !path.exists() {
                return Err(RepositoryError::LoadError(format!(
                    "Settings file not found: {}",
                    path.display()
                )));
            }
            builder = builder.add_source(File::from(path.clone()).required(true));
        }

        if let (Some(prefix), Some(separator)) = (&self.env_prefix, &self.env_separator) {
            builder = builder.add_source(
                Environment::with_prefix(prefix)
                    .prefix_separator("_")
                    .separator(separator)
                    .try_parsing(true),
            );
        }

        for (key, value) in &self.overrides {
            builder = builder.set_override(key, value.clone()).map_err(|e| {
                RepositoryError::LoadError(format!("Failed to apply override '{}': {}", key, e))
            })?;
        }

        let merged = builder
            .build()
            .map_err(|e| RepositoryError::LoadError(format!("Failed to build settings: {}", e)))?;

        let raw = merged.try_deserialize::<RawSettings>().map_err(|e| {
            RepositoryError::DeserializationError(format!("Failed to bind settings: {}", e))
        })?;

        Ok(raw.into())
    }
}

fn validate_extension(path: &std::path::Path) -> Result<()> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .ok_or_else(|| {
            RepositoryError::LoadError(format!(
                "Unable to determine file format for: {}",
                path.display()
            ))
        })?;

    match extension {
        "yaml" | "yml" | "toml" | "json" => Ok(()),
        _ => Err(RepositoryError::LoadError(format!(
            "Unsupported file extension: {}. Supported: .yaml, .yml, .toml, .json",
            extension
        ))),
    }
}

/// Settings bound by [`PropertiesLoader`].
#[derive(Debug, Clone, Default)]
pub struct ServerSettings {
    active_profiles: Vec<String>,
    bootstrap: bool,
    dynamodb: DynamoDbProperties,
    composite: Vec<CompositeEntry>,
}

impl ServerSettings {
    /// Active profile names.
    pub fn active_profiles(&self) -> &[String] {
        &self.active_profiles
    }

    /// Whether the server runs its bootstrap phase.
    pub fn bootstrap_enabled(&self) -> bool {
        self.bootstrap
    }

    /// Properties of the single `server.dynamodb` section.
    pub fn dynamodb(&self) -> &DynamoDbProperties {
        &self.dynamodb
    }

    /// Every composite entry, whatever its type.
    pub fn composite(&self) -> &[CompositeEntry] {
        &self.composite
    }

    /// Properties of composite entries of type `dynamodb`, in declaration order.
    pub fn dynamodb_composite_entries(&self) -> impl Iterator<Item = &DynamoDbProperties> {
        self.composite
            .iter()
            .filter(|entry| entry.kind.eq_ignore_ascii_case(DYNAMODB_TYPE))
            .map(|entry| &entry.properties)
    }
}

/// One entry of the `server.composite` list.
#[derive(Debug, Clone)]
pub struct CompositeEntry {
    kind: String,
    properties: DynamoDbProperties,
}

impl CompositeEntry {
    /// The backend type, e.g. `dynamodb` or `git`.
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Properties bound from the entry's remaining keys.
    pub fn properties(&self) -> &DynamoDbProperties {
        &self.properties
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawSettings {
    profiles: RawProfiles,
    server: RawServer,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawProfiles {
    active: Option<ProfileList>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ProfileList {
    Joined(String),
    List(Vec<String>),
}

impl ProfileList {
    fn into_names(self) -> Vec<String> {
        let names = match self {
            Self::Joined(joined) => joined.split(',').map(String::from).collect(),
            Self::List(list) => list,
        };
        names
            .into_iter()
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty())
            .collect()
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawServer {
    bootstrap: bool,
    dynamodb: RawDynamoDb,
    composite: Vec<RawCompositeEntry>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
struct RawDynamoDb {
    region: Option<String>,
    table: Option<String>,
    #[serde(alias = "access_key")]
    access_key: Option<String>,
    #[serde(alias = "secret_key")]
    secret_key: Option<String>,
    #[serde(alias = "partition_key")]
    partition_key: Option<String>,
    #[serde(alias = "config_attribute")]
    config_attribute: Option<String>,
    delimiter: Option<String>,
    order: Option<i32>,
    #[serde(alias = "connection_timeout")]
    connection_timeout: Option<u64>,
    timeout: Option<u64>,
    endpoint: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawCompositeEntry {
    #[serde(rename = "type")]
    kind: String,
    #[serde(flatten)]
    dynamodb: RawDynamoDb,
}

impl RawDynamoDb {
    fn into_properties(self) -> DynamoDbProperties {
        let mut builder =
            DynamoDbProperties::builder().credentials(self.access_key, self.secret_key);

        if let Some(region) = self.region {
            builder = builder.region(region);
        }
        if let Some(table) = self.table {
            builder = builder.table(table);
        }
        if let Some(partition_key) = self.partition_key {
            builder = builder.partition_key(partition_key);
        }
        if let Some(config_attribute) = self.config_attribute {
            builder = builder.config_attribute(config_attribute);
        }
        if let Some(delimiter) = self.delimiter {
            builder = builder.delimiter(delimiter);
        }
        if let Some(order) = self.order {
            builder = builder.order(order);
        }
        if let Some(millis) = self.connection_timeout {
            builder = builder.connection_timeout_ms(millis);
        }
        if let Some(millis) = self.timeout {
            builder = builder.timeout_ms(millis);
        }
        if let Some(endpoint) = self.endpoint {
            builder = builder.endpoint(endpoint);
        }

        builder.build()
    }
}

impl From<RawSettings> for ServerSettings {
    fn from(raw: RawSettings) -> Self {
        Self {
            active_profiles: raw
                .profiles
                .active
                .map(ProfileList::into_names)
                .unwrap_or_default(),
            bootstrap: raw.server.bootstrap,
            dynamodb: raw.server.dynamodb.into_properties(),
            composite: raw
                .server
                .composite
                .into_iter()
                .map(|entry| CompositeEntry {
                    kind: entry.kind,
                    properties: entry.dynamodb.into_properties(),
                })
                .collect(),
        }
    }
}

#[cfg(test)]
#[allow(unsafe_code)] // For env var manipulation in tests
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_validate_extension() {
        assert!(validate_extension(std::path::Path::new("server.yaml")).is_ok());
        assert!(validate_extension(std::path::Path::new("server.yml")).is_ok());
        assert!(validate_extension(std::path::Path::new("server.toml")).is_ok());
        assert!(validate_extension(std::path::Path::new("server.json")).is_ok());
        assert!(validate_extension(std::path::Path::new("server.txt")).is_err());
        assert!(validate_extension(std::path::Path::new("server")).is_err());
    }

    #[test]
    fn test_empty_loader_yields_defaults() {
        let settings = PropertiesLoader::new().load().unwrap();
        assert!(settings.active_profiles().is_empty());
        assert!(!settings.bootstrap_enabled());
        assert_eq!(settings.dynamodb(), &DynamoDbProperties::default());
        assert!(settings.composite().is_empty());
    }

    #[test]
    fn test_load_yaml_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("server.yaml");
        fs::write(
            &path,
            r#"
profiles:
  active: dynamodb
server:
  dynamodb:
    region: eu-west-1
    table: config_store
    access-key: test-access-key
    secret-key: test-secret-key
    partition-key: app_profile
    config-attribute: config_data
    delimiter: "_"
    order: 5
    timeout: 30000
"#,
        )
        .unwrap();

        let settings = PropertiesLoader::new().with_file(&path).load().unwrap();
        let props = settings.dynamodb();

        assert_eq!(settings.active_profiles(), ["dynamodb".to_string()]);
        assert_eq!(props.region(), "eu-west-1");
        assert_eq!(props.table(), "config_store");
        assert_eq!(props.access_key(), Some("test-access-key"));
        assert_eq!(props.secret_key(), Some("test-secret-key"));
        assert_eq!(props.partition_key(), "app_profile");
        assert_eq!(props.config_attribute(), "config_data");
        assert_eq!(props.delimiter(), "_");
        assert_eq!(props.order(), 5);
        assert_eq!(props.connection_timeout_ms(), 10_000);
        assert_eq!(props.timeout_ms(), 30_000);
        assert!(props.has_credentials());
    }

    #[test]
    fn test_empty_credentials_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("server.yaml");
        fs::write(
            &path,
            r#"
server:
  dynamodb:
    region: us-east-1
    access-key: ""
    secret-key: ""
"#,
        )
        .unwrap();

        let settings = PropertiesLoader::new().with_file(&path).load().unwrap();
        assert!(!settings.dynamodb().has_credentials());
    }

    #[test]
    fn test_composite_entries() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("server.yaml");
        fs::write(
            &path,
            r#"
profiles:
  active: [dynamodb, composite]
server:
  bootstrap: true
  composite:
    - type: dynamodb
      region: us-east-1
      table: config_table
      order: 1
    - type: git
      uri: https://example.com/config.git
    - type: dynamodb
      region: eu-west-1
      table: shared_config
"#,
        )
        .unwrap();

        let settings = PropertiesLoader::new().with_file(&path).load().unwrap();
        assert!(settings.bootstrap_enabled());
        assert_eq!(settings.active_profiles().len(), 2);
        assert_eq!(settings.composite().len(), 3);
        assert_eq!(settings.composite()[1].kind(), "git");

        let entries: Vec<_> = settings.dynamodb_composite_entries().collect();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].table(), "config_table");
        assert_eq!(entries[0].order(), 1);
        assert_eq!(entries[1].region(), "eu-west-1");
        assert_eq!(entries[1].order(), i32::MAX);
    }

    #[test]
    fn test_later_file_wins() {
        let temp_dir = TempDir::new().unwrap();
        let base = temp_dir.path().join("base.toml");
        let local = temp_dir.path().join("local.json");
        fs::write(
            &base,
            r#"
[server.dynamodb]
region = "us-east-1"
table = "config_table"
"#,
        )
        .unwrap();
        fs::write(&local, r#"{"server": {"dynamodb": {"region": "ap-south-1"}}}"#).unwrap();

        let settings = PropertiesLoader::new()
            .with_file(&base)
            .with_file(&local)
            .load()
            .unwrap();
        assert_eq!(settings.dynamodb().region(), "ap-south-1");
        assert_eq!(settings.dynamodb().table(), "config_table");
    }

    #[test]
    fn test_overrides_take_precedence() {
        let settings = PropertiesLoader::new()
            .with_override("profiles.active", "dynamodb, native")
            .with_override("server.dynamodb.region", "us-west-2")
            .with_override("server.dynamodb.order", 3i64)
            .load()
            .unwrap();

        assert_eq!(
            settings.active_profiles(),
            ["dynamodb".to_string(), "native".to_string()]
        );
        assert_eq!(settings.dynamodb().region(), "us-west-2");
        assert_eq!(settings.dynamodb().order(), 3);
    }

    #[test]
    fn test_env_overrides() {
        unsafe {
            std::env::set_var("DYNREPO_LOADER_TEST_SERVER__DYNAMODB__TABLE", "env_table");
            std::env::set_var("DYNREPO_LOADER_TEST_SERVER__DYNAMODB__ACCESS_KEY", "env-key");
        }

        let settings = PropertiesLoader::new()
            .with_env_overrides("DYNREPO_LOADER_TEST", "__")
            .load()
            .unwrap();

        unsafe {
            std::env::remove_var("DYNREPO_LOADER_TEST_SERVER__DYNAMODB__TABLE");
            std::env::remove_var("DYNREPO_LOADER_TEST_SERVER__DYNAMODB__ACCESS_KEY");
        }

        assert_eq!(settings.dynamodb().table(), "env_table");
        assert_eq!(settings.dynamodb().access_key(), Some("env-key"));
        assert!(!settings.dynamodb().has_credentials());
    }

    #[test]
    fn test_missing_file() {
        let result = PropertiesLoader::new()
            .with_file("/nonexistent/server.yaml")
            .load();
        assert!(matches!(result, Err(RepositoryError::LoadError(_))));
    }

    #[test]
    fn test_bad_type_is_deserialization_error() {
        let result = PropertiesLoader::new()
            .with_override("server.dynamodb.order", "not-a-number")
            .load();
        assert!(matches!(result, Err(RepositoryError::DeserializationError(_))));
    }
}
