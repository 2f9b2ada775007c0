use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{MotionKind, MotionStatus};
use crate::ids::MotionId;

/// A formal proposal subject to a vote.
///
/// Motions live in an append-only list per meeting. `parent` always refers
/// to a motion created earlier in the same list, so the chain is acyclic.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Motion {
    pub id: MotionId,
    pub kind: MotionKind,
    pub text: Option<String>,
    pub mover: Option<String>,
    pub seconder: Option<String>,
    pub parent: Option<MotionId>,
    pub status: MotionStatus,
    pub agenda_item: Option<String>,
}

/// Motion fields as embedded in a vote record.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct MotionSummary {
    pub mover: Option<String>,
    pub seconder: Option<String>,
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<MotionKind>,
}

impl MotionSummary {
    /// Number of the three descriptive fields that are present.
    #[must_use]
    pub fn present_fields(&self) -> u8 {
        u8::from(self.text.is_some())
            + u8::from(self.mover.is_some())
            + u8::from(self.seconder.is_some())
    }
}

impl From<&Motion> for MotionSummary {
    fn from(motion: &Motion) -> Self {
        Self {
            mover: motion.mover.clone(),
            seconder: motion.seconder.clone(),
            text: motion.text.clone(),
            kind: Some(motion.kind),
        }
    }
}
