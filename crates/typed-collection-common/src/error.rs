//! Error types for typed-collection

use thiserror::Error;
use typed_collection_schema::ValidationErrors;

/// Result type alias for typed-collection operations
pub type Result<T> = std::result::Result<T, CollectionError>;

/// Unified error type for collection construction and storage operations
#[derive(Error, Debug, Clone)]
pub enum CollectionError {
    /// Neither a name nor an existing instance was supplied
    #[error("You must provide a name or an instance to create a collection")]
    MissingIdentifier,

    /// Both a name and an existing instance were supplied
    #[error(
        "You must provide either a name or an instance to create a collection, but not both"
    )]
    AmbiguousConstruction,

    /// Construction attempted from an untrusted client context
    #[error("Collections are not allowed on the client: {0}")]
    ForbiddenContext(String),

    /// Input failed schema validation; `field` names the offending field
    #[error("Schema validation error on '{field}': {message}")]
    SchemaValidation { field: String, message: String },

    #[error("Validation error: {0}")]
    Validation(String),

    /// Failure raised by the host storage framework
    #[error("Framework error: {0}")]
    Framework(String),

    #[error("MongoDB error: {0}")]
    MongoDB(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    /// No custom or built-in method is registered under this name
    #[error("Method not found: {0}")]
    MethodNotFound(String),
}

impl CollectionError {
    /// Returns true for the construction-parameter errors raised before any
    /// host call is made
    pub fn is_construction_error(&self) -> bool {
        matches!(
            self,
            CollectionError::MissingIdentifier
                | CollectionError::AmbiguousConstruction
                | CollectionError::ForbiddenContext(_)
                | CollectionError::Validation(_)
        )
    }

    /// Returns true if this error came from a schema check
    pub fn is_schema_error(&self) -> bool {
        matches!(self, CollectionError::SchemaValidation { .. })
    }
}

impl From<ValidationErrors> for CollectionError {
    fn from(errors: ValidationErrors) -> Self {
        let field = errors
            .as_slice()
            .first()
            .map(|e| e.field())
            .unwrap_or_default();
        let message = errors
            .as_slice()
            .iter()
            .map(|e| e.message())
            .collect::<Vec<_>>()
            .join("; ");
        CollectionError::SchemaValidation { field, message }
    }
}

// MongoDB-specific error conversions (when mongodb-errors feature is enabled)
#[cfg(feature = "mongodb-errors")]
impl From<mongodb::error::Error> for CollectionError {
    fn from(err: mongodb::error::Error) -> Self {
        CollectionError::MongoDB(err.to_string())
    }
}

#[cfg(feature = "mongodb-errors")]
impl From<bson::ser::Error> for CollectionError {
    fn from(err: bson::ser::Error) -> Self {
        CollectionError::Serialization(format!("BSON serialization error: {}", err))
    }
}

#[cfg(feature = "mongodb-errors")]
impl From<bson::de::Error> for CollectionError {
    fn from(err: bson::de::Error) -> Self {
        CollectionError::Deserialization(format!("BSON deserialization error: {}", err))
    }
}
