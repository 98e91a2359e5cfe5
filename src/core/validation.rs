//! Properties validation support.

use crate::error::ValidationError;

/// Trait for validating settings before they are used to wire components.
///
/// Main-phase wiring runs this on [`DynamoDbProperties`](crate::core::DynamoDbProperties)
/// and refuses to start on failure; the bootstrap phase skips it.
///
/// # Examples
///
/// ```rust
/// use dynamodb_env_repository::core::{DynamoDbProperties, Validate};
///
/// let props = DynamoDbProperties::builder().table("config_table").build();
/// assert!(props.validate().is_err()); // no region
///
/// let props = props.to_builder().region("us-east-1").build();
/// assert!(props.validate().is_ok());
/// ```
pub trait Validate {
    /// Validate the settings.
    ///
    /// # Errors
    ///
    /// Should return a `ValidationError` describing what validation failed.
    fn validate(&self) -> Result<(), ValidationError>;
}
