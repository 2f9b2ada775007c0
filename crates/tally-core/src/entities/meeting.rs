use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::MeetingType;
use crate::ids;

/// A council meeting. Identity is `(city, date, kind)`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Meeting {
    pub city: String,
    pub date: NaiveDate,
    pub kind: MeetingType,
}

impl Meeting {
    #[must_use]
    pub fn new(city: impl Into<String>, date: NaiveDate, kind: MeetingType) -> Self {
        Self {
            city: city.into(),
            date,
            kind,
        }
    }

    #[must_use]
    pub fn id(&self) -> String {
        ids::meeting_id(&self.city, self.date, self.kind)
    }
}
