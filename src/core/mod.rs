//! Repository properties, their validation and the settings loader.

mod loader;
mod properties;
mod validation;

pub use loader::{CompositeEntry, DYNAMODB_TYPE, PropertiesLoader, ServerSettings};
pub use properties::{
    DEFAULT_CONFIG_ATTRIBUTE, DEFAULT_CONNECTION_TIMEOUT_MS, DEFAULT_DELIMITER,
    DEFAULT_PARTITION_KEY, DEFAULT_TIMEOUT_MS, DynamoDbProperties, DynamoDbPropertiesBuilder,
    LOWEST_PRECEDENCE,
};
pub use validation::Validate;
