//! City-specific pattern libraries.
//!
//! A [`PatternLibrary`] is an ordered list of [`PatternSet`]s tagged by city
//! and effective date range. One set is selected per meeting before
//! extraction begins and compiled into a [`CompiledPatternSet`], which the
//! segmenter uses to find anchors and the extractor uses to read them.

mod compiled;
mod library;
pub mod names;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use compiled::{AnchorLine, CarriedLine, CompiledPatternSet, StatusTally};
pub use library::{PatternLibrary, PatternSet, TallyLabels};

/// The shapes of tally anchor the extractor can read.
///
/// Variants are always tried from most to least specific, whatever order a
/// pattern set lists them in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VariantKind {
    /// YES/NO name lists plus a `Status:` tally line.
    StatusRollCall,
    /// `Status: a-b-c-d[-e]-Outcome` on its own.
    StatusLine,
    /// `YES: n - names` / `NO: m - names` count and list lines.
    YesNoCounts,
    /// `AYES:` / `NOES:` / `ABSTAIN:` / `ABSENT:` / `RECUSED:` name lists.
    RollCall,
    /// `Motion carried 5-2` style prose.
    MotionCarried,
}

impl VariantKind {
    pub const ALL: [Self; 5] = [
        Self::StatusRollCall,
        Self::StatusLine,
        Self::YesNoCounts,
        Self::RollCall,
        Self::MotionCarried,
    ];

    /// Higher is more constrained.
    #[must_use]
    pub const fn specificity(self) -> u8 {
        match self {
            Self::StatusRollCall => 100,
            Self::StatusLine => 80,
            Self::YesNoCounts => 70,
            Self::RollCall => 60,
            Self::MotionCarried => 30,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::StatusRollCall => "status_roll_call",
            Self::StatusLine => "status_line",
            Self::YesNoCounts => "yes_no_counts",
            Self::RollCall => "roll_call",
            Self::MotionCarried => "motion_carried",
        }
    }
}

impl fmt::Display for VariantKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
