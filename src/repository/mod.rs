//! Environment repositories: resolve `(application, profile, label)` into an [`Environment`].

mod composite;
mod dynamodb;

pub use composite::CompositeEnvironmentRepository;
pub use dynamodb::{DynamoDbEnvironmentRepository, PROPERTY_SOURCE_SCHEME};

use crate::environment::Environment;
use async_trait::async_trait;

/// A source of environments for the configuration server.
///
/// Lookups never fail: implementations absorb backend errors and return an
/// environment without property sources instead.
#[async_trait]
pub trait EnvironmentRepository: Send + Sync {
    /// Resolve the environment for an application and profile.
    ///
    /// `label` is echoed into the result but implementations may ignore it.
    async fn find_one(&self, application: &str, profile: &str, label: &str) -> Environment;

    /// Precedence among repositories; lower values come first.
    fn order(&self) -> i32;
}

/// How a single lookup ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupOutcome {
    /// A property source was produced.
    Hit,
    /// No record exists under the lookup key.
    Miss,
    /// The record exists but its configuration attribute is absent, empty or not a map.
    EmptyAttribute,
    /// The backend failed and the lookup degraded to an empty environment.
    Failure,
}

impl LookupOutcome {
    /// Short label used in logs and metric attributes.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Hit => "hit",
            Self::Miss => "miss",
            Self::EmptyAttribute => "empty_attribute",
            Self::Failure => "failure",
        }
    }
}
