//! Report types emitted by the extraction engine and returned as JSON by
//! the `tally` binary.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::{Meeting, Motion, SourceSpan, VoteRecord};

/// A candidate vote block that no pattern variant could parse.
///
/// Kept verbatim for manual triage and pattern-library tuning.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct UnextractedBlock {
    /// Zero-based index of the block in document order.
    pub block: usize,
    pub source: SourceSpan,
    /// The anchor lines that triggered segmentation.
    pub anchor: String,
    /// Preceding context window.
    pub context: String,
    pub reason: String,
}

/// Per-meeting counts used to tune pattern libraries between runs.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct RunSummary {
    pub blocks: usize,
    pub accepted: usize,
    pub low_confidence: usize,
    pub unextracted: usize,
}

/// Full output of extracting one meeting.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ExtractionReport {
    pub meeting: Meeting,
    pub meeting_id: String,
    /// `city@from..to` label of the pattern set selected for the meeting.
    pub pattern_set: String,
    pub expected_seats: u32,
    pub accepted: Vec<VoteRecord>,
    /// Records whose quality score fell below the configured minimum.
    pub review: Vec<VoteRecord>,
    pub unextracted: Vec<UnextractedBlock>,
    pub motions: Vec<Motion>,
    pub summary: RunSummary,
}

impl ExtractionReport {
    /// Accepted and review records interleaved back into document order.
    #[must_use]
    pub fn all_records(&self) -> Vec<&VoteRecord> {
        let mut records: Vec<&VoteRecord> =
            self.accepted.iter().chain(self.review.iter()).collect();
        records.sort_by_key(|record| record.source.start_line);
        records
    }
}

/// Outcome of one meeting in a batch run.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BatchEntry {
    Extracted {
        meeting_id: String,
        summary: RunSummary,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        report_path: Option<String>,
    },
    Failed {
        meeting_id: String,
        error: String,
    },
    /// The run was cancelled before this meeting started.
    Skipped { meeting_id: String },
}

/// Response from `tally batch`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct BatchSummary {
    pub meetings: Vec<BatchEntry>,
    pub totals: RunSummary,
    pub failed: usize,
}
