//! Built-in metrics for repository lookups.
//!
//! Provides OpenTelemetry metrics tracking:
//! - Lookup attempts
//! - Hits, misses and backend failures
//! - Records whose configuration attribute was empty or unusable
//! - Lookup duration
//!
//! # Examples
//!
//! ```rust,no_run
//! use dynamodb_env_repository::prelude::*;
//! use dynamodb_env_repository::metrics::RepositoryMetrics;
//! use opentelemetry::global;
//! use std::sync::Arc;
//!
//! # fn example(store: Arc<dyn ItemStore>) {
//! let metrics = RepositoryMetrics::new(global::meter("config-server"));
//!
//! let props = DynamoDbProperties::builder().region("eu-west-1").table("config").build();
//! let repository = DynamoDbEnvironmentRepository::new(props, store).with_metrics(metrics);
//! # }
//! ```

mod lookup_metrics;

pub use crate::repository::LookupOutcome;
pub use lookup_metrics::RepositoryMetrics;
