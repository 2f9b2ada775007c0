//! Pattern library selection.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

fn default_city() -> String {
    "default".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PatternsConfig {
    /// City whose pattern sets are preferred when selecting per meeting.
    #[serde(default = "default_city")]
    pub city: String,

    /// Optional TOML pattern library. The built-in library is used otherwise.
    #[serde(default)]
    pub library: Option<PathBuf>,
}

impl Default for PatternsConfig {
    fn default() -> Self {
        Self {
            city: default_city(),
            library: None,
        }
    }
}
