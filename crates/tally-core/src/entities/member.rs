use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::Title;
use crate::ids::MemberId;

/// A person who has held a council seat. Never deleted; a member stops
/// being seated when their last term ends.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct CouncilMember {
    pub id: MemberId,
    /// Name as it appears in roll calls, usually the surname.
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    /// Alternate spellings, including known OCR corruptions.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,
}

/// A date range during which a member held a seat with a given title.
///
/// Both bounds are inclusive. `end == None` marks the open (current) term.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct MembershipTerm {
    pub member: MemberId,
    pub seat: String,
    pub title: Title,
    pub start: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<NaiveDate>,
}

impl MembershipTerm {
    /// Whether the term covers `date`.
    #[must_use]
    pub fn covers(&self, date: NaiveDate) -> bool {
        self.start <= date && self.end.is_none_or(|end| date <= end)
    }

    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.end.is_none()
    }

    /// Whether two terms share at least one day.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        let self_before_other = self.end.is_some_and(|end| end < other.start);
        let other_before_self = other.end.is_some_and(|end| end < self.start);
        !self_before_other && !other_before_self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn term(start: NaiveDate, end: Option<NaiveDate>) -> MembershipTerm {
        MembershipTerm {
            member: MemberId::new("phan"),
            seat: "Ward 1".into(),
            title: Title::Member,
            start,
            end,
        }
    }

    #[test]
    fn covers_is_inclusive_on_both_ends() {
        let t = term(date(2020, 12, 1), Some(date(2024, 12, 3)));
        assert!(t.covers(date(2020, 12, 1)));
        assert!(t.covers(date(2024, 12, 3)));
        assert!(!t.covers(date(2024, 12, 4)));
        assert!(!t.covers(date(2020, 11, 30)));
    }

    #[test]
    fn open_term_covers_everything_after_start() {
        let t = term(date(2023, 1, 1), None);
        assert!(t.covers(date(2040, 1, 1)));
        assert!(!t.covers(date(2021, 6, 1)));
    }

    #[test]
    fn overlap_detection() {
        let a = term(date(2016, 12, 6), Some(date(2020, 12, 1)));
        let b = term(date(2020, 12, 2), None);
        let c = term(date(2020, 12, 1), None);
        assert!(!a.overlaps(&b));
        assert!(a.overlaps(&c));
        assert!(b.overlaps(&c));
    }
}
