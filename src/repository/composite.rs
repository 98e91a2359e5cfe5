//! Aggregation of several repositories into one.

use super::EnvironmentRepository;
use crate::core::LOWEST_PRECEDENCE;
use crate::environment::Environment;
use async_trait::async_trait;

/// Queries several repositories in precedence order and merges their results.
///
/// Property sources are appended in the order of the children, lowest
/// [`order`](EnvironmentRepository::order) first. Ties keep insertion order.
pub struct CompositeEnvironmentRepository {
    repositories: Vec<Box<dyn EnvironmentRepository>>,
}

impl CompositeEnvironmentRepository {
    /// Build a composite from child repositories.
    pub fn new(mut repositories: Vec<Box<dyn EnvironmentRepository>>) -> Self {
        repositories.sort_by_key(|repository| repository.order());
        Self { repositories }
    }

    /// Number of child repositories.
    pub fn len(&self) -> usize {
        self.repositories.len()
    }

    /// Whether there are no child repositories.
    pub fn is_empty(&self) -> bool {
        self.repositories.is_empty()
    }
}

impl std::fmt::Debug for CompositeEnvironmentRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let orders: Vec<i32> = self.repositories.iter().map(|r| r.order()).collect();
        f.debug_struct("CompositeEnvironmentRepository")
            .field("orders", &orders)
            .finish()
    }
}

#[async_trait]
impl EnvironmentRepository for CompositeEnvironmentRepository {
    async fn find_one(&self, application: &str, profile: &str, label: &str) -> Environment {
        let mut environment = Environment::new(application, profile, label);

        for repository in &self.repositories {
            let found = repository.find_one(application, profile, label).await;
            environment.add_all(found.into_property_sources());
        }

        environment
    }

    fn order(&self) -> i32 {
        self.repositories
            .iter()
            .map(|repository| repository.order())
            .min()
            .unwrap_or(LOWEST_PRECEDENCE)
    }
}
