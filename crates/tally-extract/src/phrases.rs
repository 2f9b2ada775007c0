//! Procedural phrase grammar shared by the context tracker, the agenda
//! parser, and the extractor's context scan.
//!
//! Every scanner returns matches with their byte offset so callers can merge
//! them into document order.

use std::sync::LazyLock;

use regex::{Captures, Regex};
use tally_core::enums::MotionKind;

use crate::patterns::names::strip_honorific;

/// Person-name fragment: an optional title then one or two capitalised words.
/// Words are joined by spaces only, so a name never runs across a line break.
const NAME: &str = r"(?:(?i:council *member|councilm[ae]n|councilwom[ae]n|mayor +pro +tem|vice +mayor|mayor|mr\.|mrs\.|ms\.|dr\.) +)?[A-Z][A-Za-z'\-]+(?: +[A-Z][A-Za-z'\-]+)?";

static ITEM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?m)^(?:(?i:agenda\s+)?(?i:item)\s+(?i:no\.?\s*|number\s+|#\s*)?([0-9]{1,3}[A-Za-z]?(?:\.[0-9]+)?)\s*[:.)\-]?\s*(.*)|([0-9]{1,3}[A-Za-z]?)[.)]\s+([A-Z].*))$",
    )
    .expect("item regex")
});

static MOTION_SECOND_LABELS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i:motion|moved)(?:\s+(?i:by))?\s*:\s*(?P<mover>{NAME})[,;]?\s+(?i:second(?:ed)?)(?:\s+(?i:by))?\s*:\s*(?P<seconder>{NAME})"
    ))
    .expect("motion label regex")
});

static MOVED_BY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i:moved)\s+(?i:by)\s+(?P<mover>{NAME}),?\s+(?i:and\s+)?(?i:seconded)\s+(?i:by)\s+(?P<seconder>{NAME})(?:,?\s+(?P<text>(?i:to)\s+[^.\n]+))?"
    ))
    .expect("moved-by regex")
});

static NAME_MOVED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?P<mover>{NAME})\s+(?i:moved|made\s+a\s+motion)\s+(?P<text>(?i:to)\s+[^.\n]+?)(?:[,;]?\s+(?i:and\s+)?(?i:was\s+)?(?i:seconded)\s+(?i:by)\s+(?P<seconder>{NAME}))?(?:[.\n]|$)"
    ))
    .expect("name-moved regex")
});

static SECONDED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?P<seconder>{NAME})\s+(?i:seconded)(?:\s+(?i:the)\s+(?i:motion|amendment))?"
    ))
    .expect("seconded regex")
});

static WITHDRAWN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:(?:motion|amendment)\s+(?:was\s+)?withdrawn|withdr[eaw]+\s+(?:the|(?:his|her|their)\s+)?\s*(?:motion|amendment|second))\b",
    )
    .expect("withdrawn regex")
});

static RECUSED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?P<name>{NAME})\s+(?i:recused|abstained\s+due\s+to\s+a\s+conflict)(?:\s+(?i:himself|herself|themselves|themself))?(?:\s+(?i:from)\s+[^,.;\n]*?)?(?:[,;]?\s+(?i:as|due\s+to|because(?:\s+of)?|citing)\s+(?P<reason>[^.\n]+))?(?:[.\n]|$)"
    ))
    .expect("recused regex")
});

static RECOMMENDED_ACTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?im)^(?:recommended\s+action|recommendation|action)\s*:\s*(.+)$")
        .expect("recommended action regex")
});

/// An agenda-item header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemMarker {
    pub offset: usize,
    pub number: String,
    pub title: Option<String>,
}

/// A motion phrase with the parts that were present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MotionPhrase {
    pub offset: usize,
    pub end: usize,
    pub mover: Option<String>,
    pub seconder: Option<String>,
    pub text: Option<String>,
}

impl MotionPhrase {
    /// Motion kind implied by the motion text.
    #[must_use]
    pub fn kind(&self) -> MotionKind {
        classify_motion(self.text.as_deref().unwrap_or_default())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecusalPhrase {
    pub offset: usize,
    pub name: String,
    pub reason: Option<String>,
}

/// Map motion text onto a kind.
#[must_use]
pub fn classify_motion(text: &str) -> MotionKind {
    let lowered = text.to_ascii_lowercase();
    let starts = |prefixes: &[&str]| prefixes.iter().any(|p| lowered.starts_with(p));
    if lowered.contains("substitute") {
        MotionKind::Substitute
    } else if starts(&["to amend", "amend"]) || lowered.contains("amend the motion") {
        MotionKind::Amendment
    } else if starts(&[
        "to continue",
        "to table",
        "to adjourn",
        "to recess",
        "to reconsider",
        "to postpone",
        "to defer",
        "to call the question",
    ]) {
        MotionKind::Procedural
    } else {
        MotionKind::Original
    }
}

fn name_of(caps: &Captures<'_>, group: &str) -> Option<String> {
    caps.name(group)
        .map(|m| strip_honorific(m.as_str()).to_string())
        .filter(|name| !name.is_empty())
}

fn text_of(caps: &Captures<'_>, group: &str) -> Option<String> {
    caps.name(group)
        .map(|m| m.as_str().trim().trim_end_matches([',', ';', '.']).to_string())
        .filter(|text| !text.is_empty())
}

/// Agenda-item headers in document order.
#[must_use]
pub fn item_markers(text: &str) -> Vec<ItemMarker> {
    ITEM.captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let (number, title) = match caps.get(1) {
                Some(number) => (number, caps.get(2)),
                None => (caps.get(3)?, caps.get(4)),
            };
            Some(ItemMarker {
                offset: whole.start(),
                number: number.as_str().to_ascii_uppercase(),
                title: title
                    .map(|t| t.as_str().trim().trim_end_matches(['.', ':']).to_string())
                    .filter(|t| !t.is_empty()),
            })
        })
        .collect()
}

/// Motion phrases in document order; overlapping matches keep the earliest.
#[must_use]
pub fn motions(text: &str) -> Vec<MotionPhrase> {
    let mut found: Vec<MotionPhrase> = Vec::new();
    for regex in [&*MOTION_SECOND_LABELS, &*MOVED_BY, &*NAME_MOVED] {
        for caps in regex.captures_iter(text) {
            let Some(whole) = caps.get(0) else { continue };
            found.push(MotionPhrase {
                offset: whole.start(),
                end: whole.end(),
                mover: name_of(&caps, "mover"),
                seconder: name_of(&caps, "seconder"),
                text: text_of(&caps, "text"),
            });
        }
    }
    found.sort_by(|a, b| a.offset.cmp(&b.offset).then_with(|| b.end.cmp(&a.end)));

    let mut merged: Vec<MotionPhrase> = Vec::with_capacity(found.len());
    for phrase in found {
        if merged.last().is_some_and(|last| phrase.offset < last.end) {
            continue;
        }
        merged.push(phrase);
    }
    merged
}

/// Standalone `X seconded the motion` phrases outside any motion phrase.
#[must_use]
pub fn seconds(text: &str, motions: &[MotionPhrase]) -> Vec<(usize, String)> {
    SECONDED
        .captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let inside = motions
                .iter()
                .any(|m| whole.start() < m.end && m.offset < whole.end());
            if inside {
                return None;
            }
            Some((whole.start(), name_of(&caps, "seconder")?))
        })
        .collect()
}

/// Offsets of withdrawal phrases.
#[must_use]
pub fn withdrawals(text: &str) -> Vec<usize> {
    WITHDRAWN.find_iter(text).map(|m| m.start()).collect()
}

#[must_use]
pub fn recusals(text: &str) -> Vec<RecusalPhrase> {
    RECUSED
        .captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            Some(RecusalPhrase {
                offset: whole.start(),
                name: name_of(&caps, "name")?,
                reason: text_of(&caps, "reason"),
            })
        })
        .collect()
}

/// The last `Recommended Action: ...` line, used as fallback motion text.
#[must_use]
pub fn last_recommended_action(text: &str) -> Option<String> {
    RECOMMENDED_ACTION
        .captures_iter(text)
        .last()
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().trim_end_matches('.').to_string())
}
