//! Vote validation and quality scoring.
//!
//! The score is the sum of the weights of the checks that pass:
//!
//! | check                                              | weight |
//! |----------------------------------------------------|--------|
//! | outcome present                                    | 20     |
//! | declared tally total equals seats filled that date | 30     |
//! | resolved member votes match declared count, per position (5 x 7) | 35 |
//! | motion text, mover, seconder present (3 x 5)       | 15     |
//!
//! Every failed check adds a warning. Nothing here rejects a record; the
//! score alone decides whether it is accepted or sent to review.
//!
//! A bare tally with no motion at all (no open motion in the tracker and
//! nothing found in the context window) has no motion fields to check. The
//! last row is then skipped and the remaining 85 points are rescaled to 100.

use tally_core::entities::{MotionSummary, VoteRecord};
use tally_core::enums::Position;
use tally_core::warnings::ValidationWarning;

pub const OUTCOME_WEIGHT: u8 = 20;
pub const SEAT_TOTAL_WEIGHT: u8 = 30;
pub const POSITION_WEIGHT: u8 = 7;
pub const MOTION_FIELD_WEIGHT: u8 = 5;

/// Where a scored record goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Accepted,
    Review,
}

/// Score and check warnings for one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assessment {
    pub score: u8,
    pub warnings: Vec<ValidationWarning>,
}

impl Assessment {
    #[must_use]
    pub const fn route(&self, min_score: u8) -> Route {
        if self.score >= min_score {
            Route::Accepted
        } else {
            Route::Review
        }
    }
}

/// Score a record against the number of seats filled on its meeting date.
///
/// Pure: depends only on the record and `expected_seats`.
#[must_use]
pub fn assess(record: &VoteRecord, expected_seats: u32) -> Assessment {
    let mut score = 0u8;
    let mut warnings = Vec::new();

    if record.outcome.is_some() {
        score += OUTCOME_WEIGHT;
    } else {
        warnings.push(ValidationWarning::MissingOutcome);
    }

    let declared = record.tally.total();
    if declared == expected_seats {
        score += SEAT_TOTAL_WEIGHT;
    } else {
        warnings.push(ValidationWarning::SeatTotalMismatch {
            declared,
            expected: expected_seats,
        });
    }

    let resolved = record.resolved_tally();
    for position in Position::ALL {
        let (declared, resolved) = (record.tally.get(position), resolved.get(position));
        if declared == resolved {
            score += POSITION_WEIGHT;
        } else {
            warnings.push(ValidationWarning::PositionCountMismatch {
                position,
                declared,
                resolved,
            });
        }
    }

    let motion = &record.motion;
    if has_motion_context(record) {
        for (present, warning) in [
            (motion.text.is_some(), ValidationWarning::MissingMotionText),
            (motion.mover.is_some(), ValidationWarning::MissingMover),
            (motion.seconder.is_some(), ValidationWarning::MissingSeconder),
        ] {
            if present {
                score += MOTION_FIELD_WEIGHT;
            } else {
                warnings.push(warning);
            }
        }
    } else {
        score = rescale(score, 100 - 3 * MOTION_FIELD_WEIGHT);
    }

    warnings.extend(
        record
            .unresolved
            .iter()
            .map(|name| ValidationWarning::UnresolvedMember {
                raw: name.raw.clone(),
                position: name.position,
            }),
    );

    Assessment { score, warnings }
}

fn has_motion_context(record: &VoteRecord) -> bool {
    record.motion_id.is_some() || record.motion != MotionSummary::default()
}

/// Scale `score` out of `max` to a score out of 100, rounding half up.
fn rescale(score: u8, max: u8) -> u8 {
    let scaled = (u32::from(score) * 100 + u32::from(max) / 2) / u32::from(max);
    u8::try_from(scaled.min(100)).unwrap_or(100)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use tally_core::entities::{MemberVote, SourceSpan, Tally, UnresolvedName};
    use tally_core::enums::{Outcome, ResolutionMethod};
    use tally_core::ids::{MemberId, MotionId};

    use super::*;
    use pretty_assertions::assert_eq;

    fn record(ayes: &[&str], tally: Tally) -> VoteRecord {
        let member_votes: BTreeMap<MemberId, MemberVote> = ayes
            .iter()
            .map(|id| {
                (
                    MemberId::new(*id),
                    MemberVote {
                        position: Position::Aye,
                        raw_name: Some((*id).to_string()),
                        method: ResolutionMethod::Exact,
                        recusal_reason: None,
                    },
                )
            })
            .collect();
        VoteRecord {
            id: "c/2021-03-02/regular#1".into(),
            meeting: "c/2021-03-02/regular".into(),
            agenda_item_number: None,
            title: None,
            motion_id: None,
            outcome: Some(Outcome::Pass),
            tally,
            member_votes,
            motion: MotionSummary {
                mover: Some("a".into()),
                seconder: Some("b".into()),
                text: Some("to approve".into()),
                kind: None,
            },
            unresolved: Vec::new(),
            quality_score: 0,
            warnings: Vec::new(),
            variant: "roll_call".into(),
            source: SourceSpan::default(),
        }
    }

    #[test]
    fn clean_record_scores_full_marks() {
        let record = record(&["a", "b", "c"], Tally::new(3, 0, 0, 0, 0));
        let assessment = assess(&record, 3);
        assert_eq!(assessment.score, 100);
        assert!(assessment.warnings.is_empty());
        assert_eq!(assessment.route(60), Route::Accepted);
    }

    #[test]
    fn seat_mismatch_costs_thirty() {
        let record = record(&["a", "b", "c"], Tally::new(3, 0, 0, 0, 0));
        let assessment = assess(&record, 2);
        assert_eq!(assessment.score, 70);
        assert_eq!(
            assessment.warnings,
            vec![ValidationWarning::SeatTotalMismatch {
                declared: 3,
                expected: 2
            }]
        );
    }

    #[test]
    fn missing_everything_goes_to_review() {
        let mut record = record(&["a"], Tally::new(3, 0, 0, 0, 0));
        record.outcome = None;
        record.motion_id = Some(MotionId(1));
        record.motion = MotionSummary::default();
        record.unresolved = vec![UnresolvedName {
            raw: "Smiht".into(),
            position: Position::Aye,
        }];

        let assessment = assess(&record, 7);
        // Only the four untouched positions pass.
        assert_eq!(assessment.score, 4 * POSITION_WEIGHT);
        assert_eq!(assessment.route(60), Route::Review);
        let codes: Vec<&str> = assessment.warnings.iter().map(ValidationWarning::code).collect();
        assert_eq!(
            codes,
            vec![
                "missing_outcome",
                "seat_total_mismatch",
                "position_count_mismatch",
                "missing_motion_text",
                "missing_mover",
                "missing_seconder",
                "unresolved_member",
            ]
        );
    }

    #[test]
    fn bare_tally_skips_motion_fields() {
        let mut record = record(&["a", "b", "c"], Tally::new(3, 0, 0, 0, 0));
        record.motion = MotionSummary::default();
        let assessment = assess(&record, 3);
        assert_eq!(assessment.score, 100);
        assert!(assessment.warnings.is_empty());
    }

    #[test]
    fn bare_tally_rescales_failed_checks() {
        let mut record = record(&["a", "b", "c"], Tally::new(3, 0, 0, 0, 0));
        record.motion = MotionSummary::default();
        // 55 of 85 applicable points.
        let assessment = assess(&record, 2);
        assert_eq!(assessment.score, 65);
        let codes: Vec<&str> = assessment.warnings.iter().map(ValidationWarning::code).collect();
        assert_eq!(codes, vec!["seat_total_mismatch"]);
    }

    #[test]
    fn open_motion_without_fields_is_still_checked() {
        let mut record = record(&["a", "b", "c"], Tally::new(3, 0, 0, 0, 0));
        record.motion_id = Some(MotionId(1));
        record.motion = MotionSummary::default();
        assert_eq!(assess(&record, 3).score, 85);
    }

    #[test]
    fn weights_sum_to_one_hundred() {
        let total = u32::from(OUTCOME_WEIGHT)
            + u32::from(SEAT_TOTAL_WEIGHT)
            + 5 * u32::from(POSITION_WEIGHT)
            + 3 * u32::from(MOTION_FIELD_WEIGHT);
        assert_eq!(total, 100);
    }
}
