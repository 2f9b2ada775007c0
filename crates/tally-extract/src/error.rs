//! Extraction error types.
//!
//! Only problems that make a whole meeting unprocessable are errors. Blocks
//! that fail to parse, unresolved names, and failed checks are reported as
//! data on the extraction report.

use std::path::PathBuf;

/// Errors that stop extraction of a single meeting.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    /// The named input was empty after normalization.
    #[error("{0} text is empty")]
    EmptyInput(&'static str),

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse pattern library: {0}")]
    LibraryParse(#[from] toml::de::Error),

    /// A pattern set is internally inconsistent.
    #[error("invalid pattern library: {0}")]
    InvalidLibrary(String),

    /// A pattern set's vocabulary produced an invalid regex.
    #[error("pattern set '{set}' failed to compile: {source}")]
    Pattern {
        set: String,
        #[source]
        source: regex::Error,
    },
}
