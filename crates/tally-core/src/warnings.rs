//! Validation warnings attached to vote records.
//!
//! Warnings are data, never control flow: a record with warnings is still
//! produced, and only its quality score decides where it is routed.

use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::Position;
use crate::ids::MemberId;

/// A named check failure on a [`VoteRecord`](crate::entities::VoteRecord).
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(tag = "code", rename_all = "snake_case")]
pub enum ValidationWarning {
    /// No outcome token was found for the vote.
    MissingOutcome,
    /// Declared tally does not add up to the seats filled on the meeting date.
    SeatTotalMismatch { declared: u32, expected: u32 },
    /// Resolved member votes disagree with the declared count for a position.
    PositionCountMismatch {
        position: Position,
        declared: u32,
        resolved: u32,
    },
    /// A name token could not be mapped onto a seated member.
    UnresolvedMember { raw: String, position: Position },
    /// The same member appeared in more than one position; the first is kept.
    DuplicateMemberVote {
        member: MemberId,
        kept: Position,
        dropped: Position,
    },
    /// Seated members that appear in no position of the roll call.
    MissingSeatedMembers { members: Vec<MemberId> },
    /// A member recused on the agenda item was recorded with another position.
    RecusalConflict {
        member: MemberId,
        recorded: Position,
    },
    MissingMotionText,
    MissingMover,
    MissingSeconder,
}

impl ValidationWarning {
    /// Stable machine-readable code, identical to the serde tag.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::MissingOutcome => "missing_outcome",
            Self::SeatTotalMismatch { .. } => "seat_total_mismatch",
            Self::PositionCountMismatch { .. } => "position_count_mismatch",
            Self::UnresolvedMember { .. } => "unresolved_member",
            Self::DuplicateMemberVote { .. } => "duplicate_member_vote",
            Self::MissingSeatedMembers { .. } => "missing_seated_members",
            Self::RecusalConflict { .. } => "recusal_conflict",
            Self::MissingMotionText => "missing_motion_text",
            Self::MissingMover => "missing_mover",
            Self::MissingSeconder => "missing_seconder",
        }
    }
}

impl fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingOutcome => f.write_str("vote outcome not found"),
            Self::SeatTotalMismatch { declared, expected } => write!(
                f,
                "declared tally sums to {declared} but {expected} seats were filled"
            ),
            Self::PositionCountMismatch {
                position,
                declared,
                resolved,
            } => write!(
                f,
                "{position}: declared {declared}, resolved {resolved} member votes"
            ),
            Self::UnresolvedMember { raw, position } => {
                write!(f, "could not resolve '{raw}' ({position})")
            }
            Self::DuplicateMemberVote {
                member,
                kept,
                dropped,
            } => write!(f, "{member} listed as {kept} and {dropped}; kept {kept}"),
            Self::MissingSeatedMembers { members } => {
                let names = members
                    .iter()
                    .map(MemberId::as_str)
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(f, "seated members missing from roll call: {names}")
            }
            Self::RecusalConflict { member, recorded } => {
                write!(f, "{member} recused on this item but recorded as {recorded}")
            }
            Self::MissingMotionText => f.write_str("motion text not found"),
            Self::MissingMover => f.write_str("mover not found"),
            Self::MissingSeconder => f.write_str("seconder not found"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn code_matches_serde_tag() {
        let warnings = [
            ValidationWarning::MissingOutcome,
            ValidationWarning::SeatTotalMismatch {
                declared: 7,
                expected: 6,
            },
            ValidationWarning::UnresolvedMember {
                raw: "Xyz".into(),
                position: Position::Aye,
            },
            ValidationWarning::MissingSeconder,
        ];
        for warning in warnings {
            let value = serde_json::to_value(&warning).unwrap();
            assert_eq!(value["code"], warning.code());
        }
    }

    #[test]
    fn display_is_human_readable() {
        let warning = ValidationWarning::SeatTotalMismatch {
            declared: 7,
            expected: 6,
        };
        assert_eq!(
            warning.to_string(),
            "declared tally sums to 7 but 6 seats were filled"
        );
    }
}
