//! Cross-cutting error types for Tally.
//!
//! Domain-specific errors (`RosterError`, `ExtractError`, ...) live in their
//! own crates. `tally-cli` converges them through `anyhow`.

use thiserror::Error;

/// Errors that can be raised by any Tally crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Entity lookup returned no result.
    #[error("Entity not found: {entity_type} {id}")]
    NotFound { entity_type: String, id: String },

    /// A state machine transition was attempted that is not allowed.
    #[error("Invalid state transition: {entity_type} {id} from {from} to {to}")]
    InvalidTransition {
        entity_type: String,
        id: String,
        from: String,
        to: String,
    },

    /// A token could not be parsed into one of the fixed enumerations.
    #[error("Unknown {kind} value: {value}")]
    UnknownValue { kind: &'static str, value: String },

    /// Data failed validation (format, constraints).
    #[error("Validation error: {0}")]
    Validation(String),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
