//! Pattern extraction: reads a block's anchor with the selected pattern set
//! and pulls motion fields from its context window.

use tally_core::entities::{MotionSummary, Tally};
use tally_core::enums::{Outcome, Position};

use crate::patterns::names::{is_unanimous_marker, split_names};
use crate::patterns::{AnchorLine, CarriedLine, CompiledPatternSet, StatusTally, VariantKind};
use crate::phrases;

/// A raw name read from a bucket list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameToken {
    pub position: Position,
    pub raw: String,
}

/// What a matching variant read from an anchor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TallyMatch {
    pub variant: VariantKind,
    pub outcome: Option<Outcome>,
    pub tally: Tally,
    /// Whether the anchor gave an explicit aye count.
    pub ayes_declared: bool,
    /// Whether the anchor gave an explicit recused count.
    pub recused_declared: bool,
    /// Names in document order.
    pub names: Vec<NameToken>,
    /// `AYES: All` or `carried unanimously`: every seated member not
    /// listed elsewhere voted aye.
    pub unanimous: bool,
}

/// Motion fields found in a context window, scanning from the anchor back.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContextFields {
    pub item_number: Option<String>,
    pub title: Option<String>,
    pub motion: MotionSummary,
    /// Last `Recommended Action:` line, a fallback for motion text.
    pub recommended_action: Option<String>,
}

#[derive(Debug)]
struct BucketEntry {
    position: Position,
    count: Option<u32>,
    list: String,
}

#[derive(Debug, Default)]
struct ParsedAnchor {
    entries: Vec<BucketEntry>,
    status: Option<StatusTally>,
    carried: Option<CarriedLine>,
}

impl ParsedAnchor {
    fn entry(&self, position: Position) -> Option<&BucketEntry> {
        self.entries.iter().find(|e| e.position == position)
    }

    fn has_names(&self) -> bool {
        self.entries.iter().any(|e| !split_names(&e.list).is_empty())
    }

    fn names(&self) -> Vec<NameToken> {
        self.entries
            .iter()
            .filter(|entry| !is_unanimous_marker(&entry.list))
            .flat_map(|entry| {
                let position = entry.position;
                split_names(&entry.list)
                    .into_iter()
                    .map(move |raw| NameToken { position, raw })
            })
            .collect()
    }

    fn unanimous_list(&self) -> bool {
        self.entry(Position::Aye)
            .is_some_and(|entry| is_unanimous_marker(&entry.list))
    }

    fn carried_outcome(&self) -> Option<Outcome> {
        self.carried.and_then(|c| c.outcome)
    }
}

/// Applies one compiled pattern set to candidate blocks.
#[derive(Debug)]
pub struct PatternExtractor<'p> {
    patterns: &'p CompiledPatternSet,
}

impl<'p> PatternExtractor<'p> {
    #[must_use]
    pub const fn new(patterns: &'p CompiledPatternSet) -> Self {
        Self { patterns }
    }

    /// Try each enabled variant, most specific first, and return the first
    /// match. `None` means the block is unextracted.
    #[must_use]
    pub fn extract(&self, anchor: &str) -> Option<TallyMatch> {
        let parsed = self.parse(anchor);
        let found = self
            .patterns
            .variants()
            .iter()
            .find_map(|&variant| Self::apply(variant, &parsed));
        match &found {
            Some(found) => tracing::debug!(variant = %found.variant, "anchor matched"),
            None => tracing::debug!(anchor, "no variant matched"),
        }
        found
    }

    /// Enabled variant names in trial order, for diagnostics.
    #[must_use]
    pub fn variants_tried(&self) -> String {
        self.patterns
            .variants()
            .iter()
            .map(|variant| variant.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn parse(&self, anchor: &str) -> ParsedAnchor {
        let mut parsed = ParsedAnchor::default();
        for line in anchor.lines().map(str::trim).filter(|l| !l.is_empty()) {
            match self.patterns.classify(line) {
                Some(AnchorLine::Status) => {
                    if parsed.status.is_none() {
                        parsed.status = self.patterns.status_tally(line);
                    }
                }
                Some(AnchorLine::Carried) => {
                    if parsed.carried.is_none() {
                        parsed.carried = self.patterns.carried_line(line);
                    }
                }
                Some(AnchorLine::Bucket(_)) => {
                    if let Some((position, count, list)) = self.patterns.bucket_line(line) {
                        parsed.entries.push(BucketEntry {
                            position,
                            count,
                            list: list.to_string(),
                        });
                    }
                }
                None => {
                    // Continuation of the previous name list.
                    if let Some(last) = parsed.entries.last_mut() {
                        last.list.push(' ');
                        last.list.push_str(line);
                    }
                }
            }
        }
        parsed
    }

    fn apply(variant: VariantKind, parsed: &ParsedAnchor) -> Option<TallyMatch> {
        match variant {
            VariantKind::StatusRollCall => {
                let status = parsed.status?;
                if !parsed.has_names() && !parsed.unanimous_list() {
                    return None;
                }
                Some(TallyMatch {
                    variant,
                    outcome: status.outcome,
                    tally: tally_from(&status.counts),
                    ayes_declared: true,
                    recused_declared: status.recused_declared
                        || parsed.entry(Position::Recused).is_some(),
                    names: parsed.names(),
                    unanimous: parsed.unanimous_list(),
                })
            }
            VariantKind::StatusLine => {
                let status = parsed.status?;
                Some(TallyMatch {
                    variant,
                    outcome: status.outcome,
                    tally: tally_from(&status.counts),
                    ayes_declared: true,
                    recused_declared: status.recused_declared,
                    names: Vec::new(),
                    unanimous: false,
                })
            }
            VariantKind::YesNoCounts => {
                parsed.entry(Position::Aye)?.count?;
                Some(Self::bucket_match(variant, parsed))
            }
            VariantKind::RollCall => {
                parsed.entry(Position::Aye)?;
                if !parsed.has_names() && !parsed.unanimous_list() {
                    return None;
                }
                Some(Self::bucket_match(variant, parsed))
            }
            VariantKind::MotionCarried => {
                let carried = parsed.carried?;
                let [ayes, noes, abstain, absent] = carried.counts.unwrap_or_default();
                Some(TallyMatch {
                    variant,
                    outcome: carried.outcome,
                    tally: Tally::new(ayes, noes, abstain, absent, 0),
                    ayes_declared: carried.counts.is_some(),
                    recused_declared: false,
                    names: Vec::new(),
                    unanimous: carried.unanimous && carried.counts.is_none(),
                })
            }
        }
    }

    /// Tally from bucket lines: explicit counts win, else the list length.
    fn bucket_match(variant: VariantKind, parsed: &ParsedAnchor) -> TallyMatch {
        let mut tally = Tally::default();
        for entry in &parsed.entries {
            let position = entry.position;
            let listed = u32::try_from(split_names(&entry.list).len()).unwrap_or(u32::MAX);
            let count = entry.count.unwrap_or(listed);
            tally.set(position, tally.get(position).saturating_add(count));
        }
        TallyMatch {
            variant,
            outcome: parsed.carried_outcome(),
            tally,
            ayes_declared: parsed
                .entry(Position::Aye)
                .is_some_and(|entry| entry.count.is_some()),
            recused_declared: parsed.entry(Position::Recused).is_some(),
            names: parsed.names(),
            unanimous: parsed.unanimous_list(),
        }
    }

    /// Scan a context window from the anchor backwards for the nearest item
    /// header and motion phrase.
    #[must_use]
    pub fn context_fields(&self, context: &str) -> ContextFields {
        let item = phrases::item_markers(context).into_iter().next_back();
        let motion = phrases::motions(context).into_iter().next_back();

        let mut summary = motion
            .map(|phrase| MotionSummary {
                kind: Some(phrase.kind()),
                mover: phrase.mover,
                seconder: phrase.seconder,
                text: phrase.text,
            })
            .unwrap_or_default();
        let recommended_action = phrases::last_recommended_action(context);
        if summary.text.is_none() {
            summary.text.clone_from(&recommended_action);
        }

        ContextFields {
            item_number: item.as_ref().map(|i| i.number.clone()),
            title: item.and_then(|i| i.title),
            motion: summary,
            recommended_action,
        }
    }
}

fn tally_from(counts: &[u32; 5]) -> Tally {
    Tally::new(counts[0], counts[1], counts[2], counts[3], counts[4])
}
