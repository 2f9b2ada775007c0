//! Pattern library loading and per-meeting set selection.

use std::path::Path;
use std::sync::LazyLock;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::VariantKind;
use crate::ExtractError;

/// City used for sets that apply when no city-specific set covers a meeting.
pub const DEFAULT_CITY: &str = "default";

static BUILTIN: LazyLock<PatternSet> = LazyLock::new(|| PatternSet {
    city: DEFAULT_CITY.to_string(),
    effective_from: None,
    effective_to: None,
    variants: VariantKind::ALL.to_vec(),
    labels: TallyLabels::default(),
});

/// Vocabulary for the tally buckets and the status line.
///
/// Missing fields in a TOML override keep their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TallyLabels {
    pub ayes: Vec<String>,
    pub noes: Vec<String>,
    pub abstain: Vec<String>,
    pub absent: Vec<String>,
    pub recused: Vec<String>,
    pub status: Vec<String>,
}

fn words(list: &[&str]) -> Vec<String> {
    list.iter().map(|word| (*word).to_string()).collect()
}

impl Default for TallyLabels {
    fn default() -> Self {
        Self {
            ayes: words(&["AYES", "AYE", "YES", "YEAS"]),
            noes: words(&["NOES", "NOS", "NO", "NAYS", "NAY"]),
            abstain: words(&[
                "ABSTAIN",
                "ABSTAINED",
                "ABSTAINING",
                "ABSTENTION",
                "ABSTENTIONS",
            ]),
            absent: words(&["ABSENT", "EXCUSED", "ABSENT/EXCUSED", "NOT PRESENT"]),
            recused: words(&["RECUSED", "RECUSAL", "RECUSALS", "CONFLICT"]),
            status: words(&["STATUS"]),
        }
    }
}

/// A versioned pattern set for one city.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternSet {
    pub city: String,
    #[serde(default)]
    pub effective_from: Option<NaiveDate>,
    #[serde(default)]
    pub effective_to: Option<NaiveDate>,
    #[serde(default = "all_variants")]
    pub variants: Vec<VariantKind>,
    #[serde(default)]
    pub labels: TallyLabels,
}

fn all_variants() -> Vec<VariantKind> {
    VariantKind::ALL.to_vec()
}

impl PatternSet {
    /// The set used when a library has nothing for the meeting.
    #[must_use]
    pub fn builtin() -> &'static Self {
        &BUILTIN
    }

    /// Inclusive on both ends; an absent bound is unbounded.
    #[must_use]
    pub fn covers(&self, date: NaiveDate) -> bool {
        self.effective_from.is_none_or(|from| from <= date)
            && self.effective_to.is_none_or(|to| date <= to)
    }

    /// Identifier written into reports, e.g. `santa-ana@2019-01-01..`.
    #[must_use]
    pub fn label(&self) -> String {
        let bound = |date: Option<NaiveDate>| date.map(|d| d.to_string()).unwrap_or_default();
        format!(
            "{}@{}..{}",
            self.city,
            bound(self.effective_from),
            bound(self.effective_to)
        )
    }

    fn check(&self) -> Result<(), ExtractError> {
        if self.variants.is_empty() {
            return Err(ExtractError::InvalidLibrary(format!(
                "set {} enables no variants",
                self.label()
            )));
        }
        if let (Some(from), Some(to)) = (self.effective_from, self.effective_to)
            && to < from
        {
            return Err(ExtractError::InvalidLibrary(format!(
                "set {} ends before it starts",
                self.label()
            )));
        }
        Ok(())
    }
}

/// An ordered collection of pattern sets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternLibrary {
    #[serde(default)]
    pub sets: Vec<PatternSet>,
}

impl PatternLibrary {
    /// A library holding only the built-in default set.
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            sets: vec![PatternSet::builtin().clone()],
        }
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ExtractError> {
        let library: Self = toml::from_str(content)?;
        for set in &library.sets {
            set.check()?;
        }
        Ok(library)
    }

    pub fn load(path: &Path) -> Result<Self, ExtractError> {
        let content = std::fs::read_to_string(path).map_err(|source| ExtractError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Pick the set for a meeting.
    ///
    /// An exact city match covering the date wins, preferring the latest
    /// `effective_from`. Otherwise a `default` city set covering the date is
    /// used, and failing that the built-in set.
    #[must_use]
    pub fn select(&self, city: &str, date: NaiveDate) -> &PatternSet {
        self.latest_covering(city, date)
            .or_else(|| self.latest_covering(DEFAULT_CITY, date))
            .unwrap_or_else(|| PatternSet::builtin())
    }

    fn latest_covering(&self, city: &str, date: NaiveDate) -> Option<&PatternSet> {
        // `max_by_key` keeps the last of equal keys, so later sets in the
        // file win ties.
        self.sets
            .iter()
            .filter(|set| set.city.eq_ignore_ascii_case(city) && set.covers(date))
            .max_by_key(|set| set.effective_from)
    }
}
