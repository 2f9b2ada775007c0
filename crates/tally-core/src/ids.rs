//! Identifier newtypes and formatting helpers.
//!
//! Identifiers are derived from input data only (roster ids, meeting
//! identity, document order) so that repeated runs produce identical output.

use std::fmt;

use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::MeetingType;

/// Stable roster identifier of a council member (e.g. `"tinajero"`).
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(transparent)]
pub struct MemberId(pub String);

impl MemberId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MemberId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Index of a motion in a meeting's append-only motion list.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(transparent)]
pub struct MotionId(pub u32);

impl fmt::Display for MotionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "m{}", self.0)
    }
}

/// Format the identity of a meeting: `{city}/{date}/{type}`.
#[must_use]
pub fn meeting_id(city: &str, date: NaiveDate, kind: MeetingType) -> String {
    format!("{city}/{}/{kind}", date.format("%Y-%m-%d"))
}

/// Format a vote record id from its meeting id and 1-based ordinal.
#[must_use]
pub fn vote_record_id(meeting_id: &str, ordinal: usize) -> String {
    format!("{meeting_id}#{ordinal}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn meeting_id_is_city_date_type() {
        let date = NaiveDate::from_ymd_opt(2021, 3, 2).unwrap();
        assert_eq!(
            meeting_id("santa-ana", date, MeetingType::Regular),
            "santa-ana/2021-03-02/regular"
        );
    }

    #[test]
    fn vote_record_id_appends_ordinal() {
        assert_eq!(vote_record_id("x/2021-01-01/special", 3), "x/2021-01-01/special#3");
    }

    #[test]
    fn motion_id_displays_with_prefix() {
        assert_eq!(MotionId(4).to_string(), "m4");
    }
}
