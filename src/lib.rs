//! # dynamodb-env-repository
//!
//! Amazon DynamoDB backend for a centralized configuration server.
//!
//! ## Overview
//!
//! Each `(application, profile)` pair maps to one DynamoDB item. The item is keyed by
//! `{application}{delimiter}{profile}` and carries a nested map attribute holding the
//! configuration. A lookup fetches that item, flattens the map into dot-joined keys
//! and returns it as a single property source of an [`Environment`](environment::Environment).
//!
//! - Point lookups only: no scans, no caching, no writes
//! - Lookups fail open: a backend error yields an environment with no property sources
//! - Separate clients for the bootstrap and main phases, gated on the `dynamodb` profile
//! - Settings bound from YAML/TOML/JSON files and environment variables
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use dynamodb_env_repository::prelude::*;
//!
//! # async fn example() -> dynamodb_env_repository::error::Result<()> {
//! let props = DynamoDbProperties::builder()
//!     .region("us-east-1")
//!     .table("config_table")
//!     .build();
//!
//! let client = ClientProvider::main().build_client(&props).await?;
//! let repository = DynamoDbEnvironmentRepositoryFactory::new(client).build(props);
//!
//! let environment = repository.find_one("myapp", "dev", "main").await;
//! if let Some(source) = environment.property_sources().first() {
//!     println!("{:?}", source.get("server.port"));
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Feature Flags
//!
//! - `metrics`: OpenTelemetry lookup counters and latency histogram
//!
//! ```toml
//! [dependencies]
//! dynamodb-env-repository = { version = "0.1", features = ["metrics"] }
//! ```

#![warn(missing_docs, rust_2024_compatibility)]
#![deny(unsafe_code)]

pub mod autoconfig;
pub mod client;
pub mod core;
pub mod environment;
pub mod error;
pub mod factory;
pub mod flatten;
pub mod registry;
pub mod repository;
pub mod store;
pub mod value;

#[cfg(feature = "metrics")]
pub mod metrics;

/// Convenient re-exports for common usage patterns.
pub mod prelude {
    pub use crate::client::{ClientProvider, Phase};
    pub use crate::core::{DynamoDbProperties, PropertiesLoader, ServerSettings, Validate};
    pub use crate::environment::{Environment, PropertySource};
    pub use crate::error::{BackendError, RepositoryError, Result, ValidationError};
    pub use crate::factory::DynamoDbEnvironmentRepositoryFactory;
    pub use crate::registry::ComponentRegistry;
    pub use crate::repository::{
        CompositeEnvironmentRepository, DynamoDbEnvironmentRepository, EnvironmentRepository,
    };
    pub use crate::store::ItemStore;
    pub use crate::value::{TypedValue, Value};
}
