use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::MotionSummary;
use crate::enums::{Outcome, Position, ResolutionMethod};
use crate::ids::{MemberId, MotionId};
use crate::warnings::ValidationWarning;

/// Numeric breakdown of a vote, one bucket per [`Position`].
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Tally {
    pub ayes: u32,
    pub noes: u32,
    pub abstain: u32,
    pub absent: u32,
    pub recused: u32,
}

impl Tally {
    #[must_use]
    pub const fn new(ayes: u32, noes: u32, abstain: u32, absent: u32, recused: u32) -> Self {
        Self {
            ayes,
            noes,
            abstain,
            absent,
            recused,
        }
    }

    /// Sum over all five buckets; compared against the seated roster size.
    ///
    /// Counts are read from OCR text, so the sum saturates at `u32::MAX`.
    #[must_use]
    pub const fn total(&self) -> u32 {
        self.ayes
            .saturating_add(self.noes)
            .saturating_add(self.abstain)
            .saturating_add(self.absent)
            .saturating_add(self.recused)
    }

    #[must_use]
    pub const fn get(&self, position: Position) -> u32 {
        match position {
            Position::Aye => self.ayes,
            Position::No => self.noes,
            Position::Abstain => self.abstain,
            Position::Absent => self.absent,
            Position::Recused => self.recused,
        }
    }

    pub const fn set(&mut self, position: Position, count: u32) {
        match position {
            Position::Aye => self.ayes = count,
            Position::No => self.noes = count,
            Position::Abstain => self.abstain = count,
            Position::Absent => self.absent = count,
            Position::Recused => self.recused = count,
        }
    }
}

/// How one member voted on one record.
///
/// Keyed by member id inside [`VoteRecord::member_votes`], which enforces at
/// most one entry per member.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct MemberVote {
    pub position: Position,
    /// Name token as it appeared in the text; `None` when filled from the roster.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_name: Option<String>,
    pub method: ResolutionMethod,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recusal_reason: Option<String>,
}

/// A name token that could not be mapped onto the date-scoped roster.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct UnresolvedName {
    pub raw: String,
    pub position: Position,
}

/// Where in the source document a record came from.
///
/// Line numbers are 1-based lines of the original (pre-normalization) text.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct SourceSpan {
    pub start_line: usize,
    pub end_line: usize,
    pub page: u32,
}

/// A single extracted vote. Immutable once validated; corrections produce a
/// new record.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct VoteRecord {
    pub id: String,
    pub meeting: String,
    pub agenda_item_number: Option<String>,
    pub title: Option<String>,
    pub motion_id: Option<MotionId>,
    pub outcome: Option<Outcome>,
    pub tally: Tally,
    pub member_votes: BTreeMap<MemberId, MemberVote>,
    pub motion: MotionSummary,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unresolved: Vec<UnresolvedName>,
    pub quality_score: u8,
    pub warnings: Vec<ValidationWarning>,
    /// Name of the pattern variant that matched the tally anchor.
    pub variant: String,
    pub source: SourceSpan,
}

impl VoteRecord {
    /// Count resolved member votes per position.
    #[must_use]
    pub fn resolved_tally(&self) -> Tally {
        let mut tally = Tally::default();
        for vote in self.member_votes.values() {
            let count = tally.get(vote.position);
            tally.set(vote.position, count.saturating_add(1));
        }
        tally
    }

    /// Members recorded with the given position, in id order.
    #[must_use]
    pub fn members_with(&self, position: Position) -> Vec<&MemberId> {
        self.member_votes
            .iter()
            .filter(|(_, vote)| vote.position == position)
            .map(|(id, _)| id)
            .collect()
    }
}
