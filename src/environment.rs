//! The result model handed back to the configuration server.

use crate::value::Value;
use serde::Serialize;
use std::collections::BTreeMap;

/// A named, flat set of properties contributed by one backend lookup.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PropertySource {
    name: String,
    source: BTreeMap<String, Value>,
}

impl PropertySource {
    /// Create a property source from an identifier and a flat map.
    pub fn new(name: impl Into<String>, source: BTreeMap<String, Value>) -> Self {
        Self {
            name: name.into(),
            source,
        }
    }

    /// The identifier, e.g. `DynamoDB://us-east-1:config_table/myapp/dev/main`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The flat property map.
    pub fn source(&self) -> &BTreeMap<String, Value> {
        &self.source
    }

    /// Look up a single property.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.source.get(key)
    }

    /// Number of properties.
    pub fn len(&self) -> usize {
        self.source.len()
    }

    /// Whether the property map is empty.
    pub fn is_empty(&self) -> bool {
        self.source.is_empty()
    }
}

/// Configuration for one application/profile/label request.
///
/// Serializes in the shape configuration clients expect:
///
/// ```json
/// {"name":"myapp","profiles":["dev"],"label":"main","version":null,"state":null,
///  "propertySources":[]}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Environment {
    name: String,
    profiles: Vec<String>,
    label: String,
    version: Option<String>,
    state: Option<String>,
    property_sources: Vec<PropertySource>,
}

impl Environment {
    /// Create an empty environment shell.
    ///
    /// `profile` may hold several comma-separated profile names.
    pub fn new(application: impl Into<String>, profile: &str, label: impl Into<String>) -> Self {
        Self {
            name: application.into(),
            profiles: split_profiles(profile),
            label: label.into(),
            version: None,
            state: None,
            property_sources: Vec::new(),
        }
    }

    /// Append a property source (lowest precedence last).
    pub fn add(&mut self, source: PropertySource) {
        self.property_sources.push(source);
    }

    /// Append every property source from an iterator.
    pub fn add_all(&mut self, sources: impl IntoIterator<Item = PropertySource>) {
        self.property_sources.extend(sources);
    }

    /// Application name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Active profile names.
    pub fn profiles(&self) -> &[String] {
        &self.profiles
    }

    /// Requested label.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Backend version marker, if any.
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    /// Backend state marker, if any.
    pub fn state(&self) -> Option<&str> {
        self.state.as_deref()
    }

    /// Property sources in precedence order.
    pub fn property_sources(&self) -> &[PropertySource] {
        &self.property_sources
    }

    /// Consume the environment, returning its property sources.
    pub fn into_property_sources(self) -> Vec<PropertySource> {
        self.property_sources
    }
}

fn split_profiles(profile: &str) -> Vec<String> {
    profile
        .split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(String::from)
        .collect()
}
