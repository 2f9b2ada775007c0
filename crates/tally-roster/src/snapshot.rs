//! Serializable roster snapshot (the on-disk TOML shape).

use std::path::Path;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tally_core::entities::{CouncilMember, MembershipTerm};

use crate::RosterError;

/// Members and their terms as maintained by roster upkeep.
///
/// ```toml
/// city = "santa-ana"
///
/// [[members]]
/// id = "tinajero"
/// name = "Tinajero"
/// aliases = ["Tinaj3ro"]
///
/// [[terms]]
/// member = "tinajero"
/// seat = "Ward 1"
/// title = "member"
/// start = "2016-12-06"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct RosterSnapshot {
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub members: Vec<CouncilMember>,
    #[serde(default)]
    pub terms: Vec<MembershipTerm>,
}

impl RosterSnapshot {
    pub fn from_toml_str(content: &str) -> Result<Self, RosterError> {
        Ok(toml::from_str(content)?)
    }

    pub fn from_path(path: &Path) -> Result<Self, RosterError> {
        let content = std::fs::read_to_string(path).map_err(|source| RosterError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }
}
