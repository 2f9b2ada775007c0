//! Schema registry errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("schema not found: {0}")]
    NotFound(String),

    /// The instance did not pass validation.
    #[error("validation failed: {}", errors.join("; "))]
    ValidationFailed { errors: Vec<String> },

    #[error("schema compilation error: {0}")]
    Compile(String),

    #[error("failed to serialize instance: {0}")]
    Serialize(#[from] serde_json::Error),
}
