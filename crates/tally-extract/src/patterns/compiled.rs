//! A pattern set with its vocabulary compiled into regexes.

use std::sync::LazyLock;

use regex::Regex;
use tally_core::enums::{Outcome, Position};

use super::{PatternSet, VariantKind};
use crate::ExtractError;

static CARRIED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^(?:the\s+)?(?:(?:main|original|substitute|amended|amendment|procedural)\s+)?motion(?:\s+as\s+amended)?\s+(?:was\s+)?(carried|carries|passed|passes|failed|fails|adopted|approved|defeated|denied|died|tied|continued)\b(.*)$",
    )
    .expect("carried regex")
});

static STATUS_TALLY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(\d+)\s*-\s*(\d+)\s*-\s*(\d+)\s*-\s*(\d+)(?:\s*-\s*(\d+))?\s*-\s*([A-Za-z]+)",
    )
    .expect("status tally regex")
});

static COUNT_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)\b\s*(?:[-:.)]\s*)?(.*)$").expect("count prefix regex"));

static CARRIED_COUNTS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(\d{1,2})\s*-\s*(\d{1,2})(?:\s*-\s*(\d{1,2}))?(?:\s*-\s*(\d{1,2}))?\b")
        .expect("carried counts regex")
});

/// What kind of anchor a single line is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorLine {
    /// A `LABEL:` line for one tally bucket.
    Bucket(Position),
    /// A `Status:` line.
    Status,
    /// `Motion carried ...` prose.
    Carried,
}

impl AnchorLine {
    /// Status and carried lines end a vote.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Status | Self::Carried)
    }
}

/// A parsed `Status:` line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusTally {
    pub counts: [u32; 5],
    pub recused_declared: bool,
    pub outcome: Option<Outcome>,
}

/// A parsed `Motion carried ...` line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CarriedLine {
    pub outcome: Option<Outcome>,
    pub counts: Option<[u32; 4]>,
    pub unanimous: bool,
}

#[derive(Debug)]
pub struct CompiledPatternSet {
    label: String,
    variants: Vec<VariantKind>,
    buckets: Vec<(Position, Regex)>,
    status: Regex,
}

impl CompiledPatternSet {
    /// Build the label regexes for a set.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError::Pattern`] if the vocabulary does not compile.
    pub fn compile(set: &PatternSet) -> Result<Self, ExtractError> {
        let label = set.label();
        let compile = |words: &[String]| -> Result<Regex, ExtractError> {
            Regex::new(&label_regex(words)).map_err(|source| ExtractError::Pattern {
                set: label.clone(),
                source,
            })
        };

        let labels = &set.labels;
        let buckets = vec![
            (Position::Aye, compile(&labels.ayes)?),
            (Position::No, compile(&labels.noes)?),
            (Position::Abstain, compile(&labels.abstain)?),
            (Position::Absent, compile(&labels.absent)?),
            (Position::Recused, compile(&labels.recused)?),
        ];
        let status = compile(&labels.status)?;

        let mut variants = set.variants.clone();
        variants.sort_by_key(|variant| std::cmp::Reverse(variant.specificity()));
        variants.dedup();

        tracing::debug!(set = %label, variants = variants.len(), "compiled pattern set");

        Ok(Self {
            label,
            variants,
            buckets,
            status,
        })
    }

    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Enabled variants, most specific first.
    #[must_use]
    pub fn variants(&self) -> &[VariantKind] {
        &self.variants
    }

    /// Classify a cleaned line as an anchor, if it is one.
    #[must_use]
    pub fn classify(&self, line: &str) -> Option<AnchorLine> {
        if self.status.is_match(line) {
            return Some(AnchorLine::Status);
        }
        if CARRIED.is_match(line) {
            return Some(AnchorLine::Carried);
        }
        self.buckets
            .iter()
            .find(|(_, regex)| regex.is_match(line))
            .map(|(position, _)| AnchorLine::Bucket(*position))
    }

    /// Split a bucket line into its optional count and raw name list.
    #[must_use]
    pub fn bucket_line<'a>(&self, line: &'a str) -> Option<(Position, Option<u32>, &'a str)> {
        self.buckets.iter().find_map(|(position, regex)| {
            let rest = regex.captures(line)?.get(1)?.as_str().trim();
            Some(match COUNT_PREFIX.captures(rest) {
                Some(caps) => {
                    let count = caps.get(1).map(|m| parse_count(m.as_str()));
                    let names = caps.get(2).map_or("", |m| m.as_str().trim());
                    (*position, count, names)
                }
                None => (*position, None, rest),
            })
        })
    }

    /// Parse `Status: a-b-c-d[-e]-Outcome`.
    ///
    /// Returns `None` for a status line whose tally cannot be read.
    #[must_use]
    pub fn status_tally(&self, line: &str) -> Option<StatusTally> {
        let rest = self.status.captures(line)?.get(1)?.as_str().trim();
        let caps = STATUS_TALLY.captures(rest)?;
        let number = |index: usize| caps.get(index).map_or(0, |m| parse_count(m.as_str()));
        Some(StatusTally {
            counts: [number(1), number(2), number(3), number(4), number(5)],
            recused_declared: caps.get(5).is_some(),
            outcome: caps.get(6).and_then(|m| Outcome::from_token(m.as_str())),
        })
    }

    /// Parse `Motion carried 5-2` / `Motion carried unanimously`.
    #[must_use]
    pub fn carried_line(&self, line: &str) -> Option<CarriedLine> {
        let caps = CARRIED.captures(line)?;
        let verb = caps.get(1).map_or("", |m| m.as_str());
        let tail = caps.get(2).map_or("", |m| m.as_str());

        let counts = CARRIED_COUNTS.captures(tail).map(|counts| {
            let number = |index: usize| {
                counts
                    .get(index)
                    .and_then(|m| m.as_str().parse::<u32>().ok())
                    .unwrap_or(0)
            };
            [number(1), number(2), number(3), number(4)]
        });
        let unanimous = tail.to_ascii_lowercase().contains("unanimous");

        Some(CarriedLine {
            outcome: Outcome::from_token(verb),
            counts,
            unanimous,
        })
    }
}

/// `^(?:LABEL|LABEL2)\s*:\s*(.*)$`, longest label first.
/// A run of digits as a count; runs too long for `u32` saturate.
fn parse_count(digits: &str) -> u32 {
    digits.parse().unwrap_or(u32::MAX)
}

fn label_regex(words: &[String]) -> String {
    let mut sorted: Vec<&String> = words.iter().filter(|w| !w.trim().is_empty()).collect();
    sorted.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
    let alternatives: Vec<String> = sorted
        .iter()
        .map(|word| regex::escape(word.trim()).replace(' ', r"\s+"))
        .collect();
    if alternatives.is_empty() {
        // Matches nothing.
        return r"[^\s\S](.*)".to_string();
    }
    format!(r"(?i)^(?:{})\s*:\s*(.*)$", alternatives.join("|"))
}
