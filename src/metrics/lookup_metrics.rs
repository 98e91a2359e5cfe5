//! Lookup metrics tracking using OpenTelemetry.

use crate::repository::LookupOutcome;
use opentelemetry::KeyValue;
use opentelemetry::metrics::{Counter, Histogram, Meter};
use std::time::Instant;

/// Metrics collector for repository lookups.
///
/// # Examples
///
/// ```rust,no_run
/// use dynamodb_env_repository::metrics::{LookupOutcome, RepositoryMetrics};
/// use opentelemetry::global;
///
/// let metrics = RepositoryMetrics::new(global::meter("config-server"));
///
/// let timer = metrics.start_lookup();
/// // ... perform lookup ...
/// metrics.record_lookup(timer, LookupOutcome::Hit);
/// ```
#[derive(Clone)]
pub struct RepositoryMetrics {
    lookup_attempts: Counter<u64>,
    lookup_hits: Counter<u64>,
    lookup_misses: Counter<u64>,
    lookup_failures: Counter<u64>,
    empty_attributes: Counter<u64>,
    lookup_duration: Histogram<f64>,
}

impl std::fmt::Debug for RepositoryMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RepositoryMetrics").finish_non_exhaustive()
    }
}

impl RepositoryMetrics {
    /// Create a new metrics collector with the provided meter.
    pub fn new(meter: Meter) -> Self {
        let lookup_attempts = meter
            .u64_counter("dynamodb_env_repository.lookup.attempts")
            .with_description("Total number of environment lookups")
            .build();

        let lookup_hits = meter
            .u64_counter("dynamodb_env_repository.lookup.hits")
            .with_description("Lookups that produced a property source")
            .build();

        let lookup_misses = meter
            .u64_counter("dynamodb_env_repository.lookup.misses")
            .with_description("Lookups with no record under the key")
            .build();

        let lookup_failures = meter
            .u64_counter("dynamodb_env_repository.lookup.failures")
            .with_description("Lookups that failed at the backing store")
            .build();

        let empty_attributes = meter
            .u64_counter("dynamodb_env_repository.lookup.empty_attribute")
            .with_description("Records whose configuration attribute was missing or empty")
            .build();

        let lookup_duration = meter
            .f64_histogram("dynamodb_env_repository.lookup.duration")
            .with_description("Duration of environment lookups in seconds")
            .with_unit("s")
            .build();

        Self {
            lookup_attempts,
            lookup_hits,
            lookup_misses,
            lookup_failures,
            empty_attributes,
            lookup_duration,
        }
    }

    /// Start a lookup timer.
    ///
    /// Pass the returned `Instant` to [`record_lookup`](Self::record_lookup).
    pub fn start_lookup(&self) -> Instant {
        self.lookup_attempts.add(1, &[]);
        Instant::now()
    }

    /// Record the end of a lookup started with [`start_lookup`](Self::start_lookup).
    pub fn record_lookup(&self, start: Instant, outcome: LookupOutcome) {
        let duration = start.elapsed().as_secs_f64();

        let counter = match outcome {
            LookupOutcome::Hit => &self.lookup_hits,
            LookupOutcome::Miss => &self.lookup_misses,
            LookupOutcome::EmptyAttribute => &self.empty_attributes,
            LookupOutcome::Failure => &self.lookup_failures,
        };
        counter.add(1, &[]);

        self.lookup_duration
            .record(duration, &[KeyValue::new("outcome", outcome.as_str())]);
    }
}
