//! Error types for schema generation

use thiserror::Error;

/// Result type for schema operations
pub type Result<T> = std::result::Result<T, SchemaError>;

/// Schema generation errors
#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("Unsupported type: {0}")]
    UnsupportedType(String),

    #[error("targetsMany attribute missing for relation {relation} of model {model}")]
    MissingNavigationalAttribute { model: String, relation: String },

    #[error("Property {0} is a nested array; provide a jsonSchema override")]
    AmbiguousNestedArray(String),

    #[error("Model not found: {0}")]
    ModelNotFound(String),

    #[error("Invalid model name: {0:?}")]
    InvalidModelName(String),

    #[error("Invalid {relation_type} relation {model}.{relation}: {reason}")]
    InvalidRelationDefinition {
        model: String,
        relation: String,
        relation_type: String,
        reason: String,
    },

    #[error("Instance does not match schema: {}", .0.join("; "))]
    ValidationFailed(Vec<String>),

    #[error("Invalid schema format: {0}")]
    InvalidFormat(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
