//! The validated, read-only roster store.

use std::collections::BTreeMap;
use std::path::Path;

use chrono::NaiveDate;
use tally_core::entities::{CouncilMember, MembershipTerm};
use tally_core::enums::Title;
use tally_core::ids::MemberId;

use crate::{RosterError, RosterSnapshot};

/// A member together with the term that seats them on a given date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeatedMember<'a> {
    pub member: &'a CouncilMember,
    pub term: &'a MembershipTerm,
}

/// Time-ranged roster lookup.
///
/// Terms are kept in one arena and indexed per member. Every lookup that
/// returns several entries orders them by seat, then member id, so callers
/// see the same order on every run.
#[derive(Debug, Clone)]
pub struct RosterStore {
    city: Option<String>,
    members: BTreeMap<MemberId, CouncilMember>,
    terms: Vec<MembershipTerm>,
    by_member: BTreeMap<MemberId, Vec<usize>>,
}

impl RosterStore {
    /// Validate a snapshot and build the store.
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant: duplicate member ids, terms for
    /// unknown members, inverted ranges, overlapping terms for one member,
    /// more than one open term for one member, or two members holding the
    /// same seat on overlapping dates.
    pub fn from_snapshot(snapshot: RosterSnapshot) -> Result<Self, RosterError> {
        let mut members = BTreeMap::new();
        for member in snapshot.members {
            if members.contains_key(&member.id) {
                return Err(RosterError::DuplicateMember(member.id));
            }
            members.insert(member.id.clone(), member);
        }

        let mut terms = snapshot.terms;
        terms.sort_by(|a, b| a.start.cmp(&b.start).then_with(|| a.member.cmp(&b.member)));

        let mut by_member: BTreeMap<MemberId, Vec<usize>> = BTreeMap::new();
        for (index, term) in terms.iter().enumerate() {
            if !members.contains_key(&term.member) {
                return Err(RosterError::UnknownMember {
                    member: term.member.clone(),
                    seat: term.seat.clone(),
                });
            }
            if let Some(end) = term.end
                && end < term.start
            {
                return Err(RosterError::InvalidRange {
                    member: term.member.clone(),
                    start: term.start,
                    end,
                });
            }
            by_member.entry(term.member.clone()).or_default().push(index);
        }

        for (member, indices) in &by_member {
            let open = indices.iter().filter(|&&i| terms[i].is_open()).count();
            if open > 1 {
                return Err(RosterError::MultipleOpenTerms(member.clone()));
            }
            for pair in indices.windows(2) {
                let (first, second) = (&terms[pair[0]], &terms[pair[1]]);
                if first.overlaps(second) {
                    return Err(RosterError::OverlappingTerms {
                        member: member.clone(),
                        first: first.start,
                        second: second.start,
                    });
                }
            }
        }

        for (i, first) in terms.iter().enumerate() {
            for second in &terms[i + 1..] {
                if first.seat == second.seat
                    && first.member != second.member
                    && first.overlaps(second)
                {
                    return Err(RosterError::SeatConflict {
                        seat: first.seat.clone(),
                        first: first.member.clone(),
                        second: second.member.clone(),
                    });
                }
            }
        }

        tracing::debug!(
            members = members.len(),
            terms = terms.len(),
            "roster validated"
        );

        Ok(Self {
            city: snapshot.city,
            members,
            terms,
            by_member,
        })
    }

    pub fn from_toml_str(content: &str) -> Result<Self, RosterError> {
        Self::from_snapshot(RosterSnapshot::from_toml_str(content)?)
    }

    /// Read and validate a TOML roster file.
    pub fn load(path: &Path) -> Result<Self, RosterError> {
        Self::from_snapshot(RosterSnapshot::from_path(path)?)
    }

    #[must_use]
    pub fn city(&self) -> Option<&str> {
        self.city.as_deref()
    }

    #[must_use]
    pub fn member(&self, id: &MemberId) -> Option<&CouncilMember> {
        self.members.get(id)
    }

    /// All members ever defined, in id order.
    pub fn members(&self) -> impl Iterator<Item = &CouncilMember> {
        self.members.values()
    }

    /// All terms, ordered by start date.
    #[must_use]
    pub fn terms(&self) -> &[MembershipTerm] {
        &self.terms
    }

    /// Terms covering `date`, ordered by seat then member id.
    #[must_use]
    pub fn active_terms(&self, date: NaiveDate) -> Vec<&MembershipTerm> {
        let mut active: Vec<&MembershipTerm> =
            self.terms.iter().filter(|term| term.covers(date)).collect();
        active.sort_by(|a, b| a.seat.cmp(&b.seat).then_with(|| a.member.cmp(&b.member)));
        active
    }

    /// Members seated on `date` with their covering term.
    #[must_use]
    pub fn seated_members(&self, date: NaiveDate) -> Vec<SeatedMember<'_>> {
        self.active_terms(date)
            .into_iter()
            .filter_map(|term| {
                self.members
                    .get(&term.member)
                    .map(|member| SeatedMember { member, term })
            })
            .collect()
    }

    /// Number of seats filled on `date`; the expected tally total.
    #[must_use]
    pub fn expected_seats(&self, date: NaiveDate) -> usize {
        self.terms.iter().filter(|term| term.covers(date)).count()
    }

    #[must_use]
    pub fn term_for(&self, member: &MemberId, date: NaiveDate) -> Option<&MembershipTerm> {
        self.by_member
            .get(member)?
            .iter()
            .map(|&index| &self.terms[index])
            .find(|term| term.covers(date))
    }

    #[must_use]
    pub fn is_seated(&self, member: &MemberId, date: NaiveDate) -> bool {
        self.term_for(member, date).is_some()
    }

    /// The member holding `title` on `date`, if exactly one does.
    #[must_use]
    pub fn holder_of(&self, title: Title, date: NaiveDate) -> Option<&CouncilMember> {
        let mut holders = self
            .active_terms(date)
            .into_iter()
            .filter(|term| term.title == title);
        let first = holders.next()?;
        if holders.next().is_some() {
            return None;
        }
        self.members.get(&first.member)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROSTER: &str = r#"
city = "santa-ana"

[[members]]
id = "sarmiento"
name = "Sarmiento"

[[members]]
id = "phan"
name = "Phan"

[[members]]
id = "solorio"
name = "Solorio"

[[terms]]
member = "sarmiento"
seat = "Mayor"
title = "mayor"
start = "2020-12-01"

[[terms]]
member = "solorio"
seat = "Ward 1"
title = "member"
start = "2016-12-06"
end = "2020-11-30"

[[terms]]
member = "phan"
seat = "Ward 1"
title = "member"
start = "2020-12-01"
"#;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn expected_seats_follow_the_date() {
        let roster = RosterStore::from_toml_str(ROSTER).unwrap();
        assert_eq!(roster.expected_seats(date(2019, 5, 1)), 1);
        assert_eq!(roster.expected_seats(date(2021, 5, 1)), 2);
    }

    #[test]
    fn seated_members_are_ordered_by_seat() {
        let roster = RosterStore::from_toml_str(ROSTER).unwrap();
        let seated = roster.seated_members(date(2021, 5, 1));
        let ids: Vec<&str> = seated.iter().map(|s| s.member.id.as_str()).collect();
        assert_eq!(ids, vec!["sarmiento", "phan"]);
    }

    #[test]
    fn term_lookup_respects_ranges() {
        let roster = RosterStore::from_toml_str(ROSTER).unwrap();
        let solorio = MemberId::new("solorio");
        assert!(roster.is_seated(&solorio, date(2020, 11, 30)));
        assert!(!roster.is_seated(&solorio, date(2020, 12, 1)));
    }

    #[test]
    fn title_holder_lookup() {
        let roster = RosterStore::from_toml_str(ROSTER).unwrap();
        let mayor = roster.holder_of(Title::Mayor, date(2022, 1, 1)).unwrap();
        assert_eq!(mayor.id.as_str(), "sarmiento");
        assert!(roster.holder_of(Title::Mayor, date(2019, 1, 1)).is_none());
    }
}
