//! Status enums, positions, and meeting/title kinds for Tally.
//!
//! All enums use `snake_case` serialization via `#[serde(rename_all = "snake_case")]`.
//! Enums with a lifecycle provide `allowed_next_states()` so callers can
//! enforce valid transitions at the application layer.

use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

// ---------------------------------------------------------------------------
// MeetingType
// ---------------------------------------------------------------------------

/// Kind of council meeting. Part of the meeting identity.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum MeetingType {
    Regular,
    Special,
    Joint,
    Emergency,
}

impl MeetingType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Regular => "regular",
            Self::Special => "special",
            Self::Joint => "joint",
            Self::Emergency => "emergency",
        }
    }
}

impl fmt::Display for MeetingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MeetingType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "regular" => Ok(Self::Regular),
            "special" => Ok(Self::Special),
            "joint" => Ok(Self::Joint),
            "emergency" => Ok(Self::Emergency),
            other => Err(CoreError::UnknownValue {
                kind: "meeting type",
                value: other.to_string(),
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// Title
// ---------------------------------------------------------------------------

/// Title held by a member for the duration of a membership term.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum Title {
    Mayor,
    MayorProTem,
    Member,
}

impl Title {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Mayor => "mayor",
            Self::MayorProTem => "mayor_pro_tem",
            Self::Member => "member",
        }
    }
}

impl fmt::Display for Title {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// MotionKind
// ---------------------------------------------------------------------------

/// Kind of motion. Amendments and substitutes always carry a parent motion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum MotionKind {
    Original,
    Substitute,
    Amendment,
    Procedural,
}

impl MotionKind {
    /// Whether a motion of this kind must be nested under an open parent.
    #[must_use]
    pub const fn requires_parent(self) -> bool {
        matches!(self, Self::Substitute | Self::Amendment)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Original => "original",
            Self::Substitute => "substitute",
            Self::Amendment => "amendment",
            Self::Procedural => "procedural",
        }
    }
}

impl fmt::Display for MotionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// MotionStatus
// ---------------------------------------------------------------------------

/// Status of a motion.
///
/// ```text
/// pending → adopted
///         → failed
///         → withdrawn
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum MotionStatus {
    Pending,
    Withdrawn,
    Adopted,
    Failed,
}

impl MotionStatus {
    /// Valid next states from the current state.
    #[must_use]
    pub const fn allowed_next_states(self) -> &'static [Self] {
        match self {
            Self::Pending => &[Self::Adopted, Self::Failed, Self::Withdrawn],
            Self::Withdrawn | Self::Adopted | Self::Failed => &[],
        }
    }

    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        self.allowed_next_states().contains(&next)
    }

    #[must_use]
    pub const fn is_open(self) -> bool {
        matches!(self, Self::Pending)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Withdrawn => "withdrawn",
            Self::Adopted => "adopted",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for MotionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Outcome
// ---------------------------------------------------------------------------

/// Result of a vote. The enumeration is fixed; unknown tokens are rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Pass,
    Fail,
    Tie,
    Continued,
}

impl Outcome {
    /// Map a free-text outcome token from minutes onto the enumeration.
    ///
    /// Accepts the common synonyms found in council minutes
    /// (`carried`, `approved`, `defeated`, `tabled`, ...). Returns `None`
    /// for anything else.
    #[must_use]
    pub fn from_token(token: &str) -> Option<Self> {
        let lowered = token
            .trim()
            .trim_end_matches(['.', ',', ';', ':', '!'])
            .to_ascii_lowercase();
        match lowered.as_str() {
            "pass" | "passed" | "passes" | "carried" | "carries" | "approved" | "adopted"
            | "unanimous" | "unanimously" => Some(Self::Pass),
            "fail" | "failed" | "fails" | "defeated" | "denied" | "lost" | "died" => {
                Some(Self::Fail)
            }
            "tie" | "tied" => Some(Self::Tie),
            "continued" | "continue" | "tabled" | "deferred" | "postponed" => {
                Some(Self::Continued)
            }
            _ => None,
        }
    }

    /// Motion status a vote with this outcome leaves its motion in.
    ///
    /// A continued item means the motion to continue carried, so the motion
    /// closes as adopted. A tie fails under Robert's Rules.
    #[must_use]
    pub const fn motion_status(self) -> MotionStatus {
        match self {
            Self::Pass | Self::Continued => MotionStatus::Adopted,
            Self::Fail | Self::Tie => MotionStatus::Failed,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pass => "pass",
            Self::Fail => "fail",
            Self::Tie => "tie",
            Self::Continued => "continued",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Outcome {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_token(s).ok_or_else(|| CoreError::UnknownValue {
            kind: "outcome",
            value: s.to_string(),
        })
    }
}

// ---------------------------------------------------------------------------
// Position
// ---------------------------------------------------------------------------

/// How a single member voted. One tally bucket per variant.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum Position {
    Aye,
    No,
    Abstain,
    Absent,
    Recused,
}

impl Position {
    /// All positions in tally order.
    pub const ALL: [Self; 5] = [
        Self::Aye,
        Self::No,
        Self::Abstain,
        Self::Absent,
        Self::Recused,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Aye => "aye",
            Self::No => "no",
            Self::Abstain => "abstain",
            Self::Absent => "absent",
            Self::Recused => "recused",
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// ResolutionMethod
// ---------------------------------------------------------------------------

/// How a raw name token was mapped onto a roster member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionMethod {
    Exact,
    Alias,
    OcrCorrected,
    Fuzzy,
    /// Filled from the seated roster for a unanimous or recusal-only entry.
    Roster,
}

impl ResolutionMethod {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Exact => "exact",
            Self::Alias => "alias",
            Self::OcrCorrected => "ocr_corrected",
            Self::Fuzzy => "fuzzy",
            Self::Roster => "roster",
        }
    }
}

impl fmt::Display for ResolutionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
