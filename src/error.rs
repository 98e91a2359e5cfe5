//! Error types for dynamodb-env-repository.

use std::fmt;

/// Result type alias for wiring and settings operations.
pub type Result<T> = std::result::Result<T, RepositoryError>;

/// Errors raised while loading settings or wiring repository components.
///
/// These are startup-time failures. Lookups never return them: a failing backend
/// degrades to an empty [`Environment`](crate::environment::Environment) instead.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// Failed to load settings from a source.
    #[error("Failed to load settings: {0}")]
    LoadError(String),

    /// Failed to deserialize settings.
    #[error("Failed to deserialize settings: {0}")]
    DeserializationError(String),

    /// Repository properties failed validation.
    #[error("Repository properties validation failed: {0}")]
    ValidationError(String),

    /// No region configured and the current phase has no fallback.
    #[error("No DynamoDB region configured")]
    MissingRegion,

    /// The backing-store client could not be constructed.
    #[error("Failed to build DynamoDB client: {0}")]
    ClientError(String),
}

/// Failure of a single backing-store lookup.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BackendError {
    /// The repository was built without a client handle.
    #[error("no DynamoDB client bound to repository")]
    ClientUnavailable,

    /// The configured table does not exist.
    #[error("table not found: {0}")]
    TableNotFound(String),

    /// The request was throttled by the service.
    #[error("request throttled: {0}")]
    Throttled(String),

    /// The service rejected the request (permissions, validation, internal error).
    #[error("service error: {0}")]
    Service(String),

    /// The request never got a response (DNS, connect, timeout).
    #[error("transport error: {0}")]
    Transport(String),
}

/// Validation error for repository properties.
#[derive(Debug)]
pub enum ValidationError {
    /// Custom validation error with a message.
    Custom(String),

    /// A specific field has an invalid value.
    InvalidField {
        /// The field name
        field: String,
        /// The reason why it's invalid
        reason: String,
    },

    /// Multiple validation errors occurred.
    Multiple(Vec<ValidationError>),
}

impl ValidationError {
    /// Create a custom validation error.
    pub fn custom(msg: impl Into<String>) -> Self {
        Self::Custom(msg.into())
    }

    /// Create an invalid field error.
    pub fn invalid_field(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidField {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Collapse a list of errors, returning `Ok` when it is empty.
    pub fn collect(mut errors: Vec<ValidationError>) -> std::result::Result<(), Self> {
        match errors.len() {
            0 => Ok(()),
            1 => Err(errors.remove(0)),
            _ => Err(Self::Multiple(errors)),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Custom(msg) => write!(f, "{}", msg),
            Self::InvalidField { field, reason } => {
                write!(f, "Field '{}' is invalid: {}", field, reason)
            }
            Self::Multiple(errors) => {
                writeln!(f, "Multiple validation errors:")?;
                for (i, err) in errors.iter().enumerate() {
                    writeln!(f, "  {}. {}", i + 1, err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ValidationError {}

impl From<ValidationError> for RepositoryError {
    fn from(err: ValidationError) -> Self {
        RepositoryError::ValidationError(err.to_string())
    }
}
