//! End-to-end extraction of representative council minutes.

use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use tally_core::entities::{Meeting, Tally, VoteRecord};
use tally_core::enums::{MeetingType, MotionKind, MotionStatus, Outcome, Position, ResolutionMethod};
use tally_core::ids::{MemberId, MotionId};
use tally_core::responses::ExtractionReport;
use tally_extract::{Engine, EngineSettings, MeetingInput, PatternLibrary};
use tally_roster::RosterStore;

const ROSTER: &str = include_str!("fixtures/roster.toml");
const AGENDA: &str = include_str!("fixtures/agenda_2021_03_02.txt");
const MINUTES: &str = include_str!("fixtures/minutes_2021_03_02.txt");

const SEVEN: [&str; 7] = [
    "bacerra",
    "hernandez",
    "lopez",
    "mendoza",
    "penaloza",
    "phan",
    "sarmiento",
];

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn roster() -> RosterStore {
    RosterStore::from_toml_str(ROSTER).unwrap()
}

fn run(roster: &RosterStore, on: NaiveDate, agenda: &str, minutes: &str) -> ExtractionReport {
    let library = PatternLibrary::builtin();
    let engine = Engine::new(roster, &library, EngineSettings::default());
    engine
        .extract(&MeetingInput {
            meeting: Meeting::new("santa-ana", on, MeetingType::Regular),
            agenda_text: agenda.to_string(),
            minutes_text: minutes.to_string(),
        })
        .unwrap()
}

fn codes(record: &VoteRecord) -> Vec<&'static str> {
    record.warnings.iter().map(|w| w.code()).collect()
}

fn voters(record: &VoteRecord, position: Position) -> Vec<&str> {
    record
        .members_with(position)
        .into_iter()
        .map(MemberId::as_str)
        .collect()
}

// ---------------------------------------------------------------------------
// Single-block scenarios
// ---------------------------------------------------------------------------

#[test]
fn clean_status_roll_call_is_accepted() {
    let roster = roster();
    let minutes = "\
Item 25
Phan moved to approve the agreement, seconded by Lopez.
YES: 7 \u{2013} Penaloza, Phan, Lopez, Bacerra, Hernandez, Mendoza, Sarmiento
NO: 0
Status: 7 \u{2013} 0 \u{2013} 0 \u{2013} 0 \u{2013} Pass";
    let report = run(&roster, date(2021, 3, 2), AGENDA, minutes);

    assert_eq!(report.expected_seats, 7);
    assert_eq!(report.accepted.len(), 1);
    assert!(report.review.is_empty());
    assert!(report.unextracted.is_empty());

    let record = &report.accepted[0];
    assert_eq!(record.id, "santa-ana/2021-03-02/regular#1");
    assert_eq!(record.variant, "status_roll_call");
    assert_eq!(record.outcome, Some(Outcome::Pass));
    assert_eq!(record.tally, Tally::new(7, 0, 0, 0, 0));
    assert_eq!(voters(record, Position::Aye), SEVEN.to_vec());
    assert!(
        record
            .member_votes
            .values()
            .all(|vote| vote.method == ResolutionMethod::Exact)
    );
    assert_eq!(record.quality_score, 100);
    assert!(record.warnings.is_empty());
    assert_eq!(record.motion.mover.as_deref(), Some("Phan"));
    assert_eq!(record.motion.seconder.as_deref(), Some("Lopez"));
    assert_eq!(
        record.title.as_deref(),
        Some("Agreement with Acme Paving for Citywide Street Resurfacing")
    );
}

#[test]
fn seven_name_status_block_alone_scores_at_least_ninety() {
    let roster = roster();
    let minutes = "\
YES: 7 \u{2013} Penaloza, Phan, Lopez, Bacerra, Hernandez, Mendoza, Sarmiento
NO: 0
Status: 7 \u{2013} 0 \u{2013} 0 \u{2013} 0 \u{2013} Pass";
    let report = run(&roster, date(2021, 3, 2), AGENDA, minutes);

    assert_eq!(report.accepted.len(), 1);
    let record = &report.accepted[0];
    assert_eq!(record.outcome, Some(Outcome::Pass));
    assert_eq!(record.tally, Tally::new(7, 0, 0, 0, 0));
    assert_eq!(voters(record, Position::Aye), SEVEN.to_vec());
    assert!(record.unresolved.is_empty());
    assert!(record.quality_score >= 90);
    // No motion anywhere near the block, so motion fields are not scored.
    assert_eq!(record.quality_score, 100);
    assert!(record.warnings.is_empty());
    assert_eq!(record.motion_id, None);
}

#[test]
fn extra_name_against_six_seats_is_flagged() {
    // Same block as the clean case, but Hernandez holds no seat here.
    let roster = RosterStore::from_toml_str(
        r#"
[[members]]
id = "sarmiento"
name = "Sarmiento"
[[members]]
id = "phan"
name = "Phan"
[[members]]
id = "penaloza"
name = "Penaloza"
[[members]]
id = "lopez"
name = "Lopez"
[[members]]
id = "bacerra"
name = "Bacerra"
[[members]]
id = "mendoza"
name = "Mendoza"

[[terms]]
member = "sarmiento"
seat = "Mayor"
title = "mayor"
start = "2020-12-01"
[[terms]]
member = "phan"
seat = "Ward 1"
title = "member"
start = "2020-12-01"
[[terms]]
member = "penaloza"
seat = "Ward 2"
title = "member"
start = "2016-12-06"
[[terms]]
member = "lopez"
seat = "Ward 3"
title = "member"
start = "2020-12-01"
[[terms]]
member = "bacerra"
seat = "Ward 4"
title = "member"
start = "2020-12-01"
[[terms]]
member = "mendoza"
seat = "Ward 6"
title = "member"
start = "2016-12-06"
"#,
    )
    .unwrap();
    let minutes = "\
Item 25
Phan moved to approve the agreement, seconded by Lopez.
YES: 7 - Penaloza, Phan, Lopez, Bacerra, Hernandez, Mendoza, Sarmiento
NO: 0
Status: 7 - 0 - 0 - 0 - Pass";
    let report = run(&roster, date(2021, 3, 2), AGENDA, minutes);

    assert_eq!(report.expected_seats, 6);
    let records = report.all_records();
    assert_eq!(records.len(), 1);
    let record = records[0];

    assert_eq!(record.tally.total(), 7);
    assert_eq!(record.member_votes.len(), 6);
    assert_eq!(record.unresolved.len(), 1);
    assert_eq!(record.unresolved[0].raw, "Hernandez");
    assert!(record.quality_score < 100);
    assert_eq!(record.quality_score, 63);
    assert_eq!(
        codes(record),
        vec![
            "seat_total_mismatch",
            "position_count_mismatch",
            "unresolved_member"
        ]
    );
}

#[test]
fn registered_alias_resolves_without_warning() {
    let roster = roster();
    let minutes = "\
Item 12. Park Renovation
Mendoza moved to approve, seconded by Penaloza.
YES: 7 - Pulido, Tinaj3ro, Penaloza, Solorio, Villegas, Iglesias, Mendoza
NO: 0
Status: 7 - 0 - 0 - 0 - Pass";
    let report = run(&roster, date(2019, 6, 4), "12. Park Renovation", minutes);

    let record = &report.accepted[0];
    let tinajero = &record.member_votes[&MemberId::new("tinajero")];
    assert_eq!(tinajero.method, ResolutionMethod::Alias);
    assert_eq!(tinajero.raw_name.as_deref(), Some("Tinaj3ro"));
    assert!(record.unresolved.is_empty());
    assert!(!codes(record).contains(&"unresolved_member"));
    assert_eq!(record.agenda_item_number.as_deref(), Some("12"));
    assert_eq!(record.title.as_deref(), Some("Park Renovation"));
}

#[test]
fn amendment_vote_attaches_to_amendment_and_reopens_parent() {
    let roster = roster();
    let minutes = "\
Item 3. Zoning Code Update
Phan moved to approve the ordinance, seconded by Lopez.
Mendoza moved to amend the motion to exempt Ward 2, seconded by Bacerra.
AYES: Mendoza, Bacerra, Penaloza, Hernandez
NOES: Phan, Lopez, Sarmiento
Motion carried 4-3.";
    let report = run(&roster, date(2021, 3, 2), AGENDA, minutes);

    let record = &report.accepted[0];
    assert_eq!(record.variant, "roll_call");
    assert_eq!(record.tally, Tally::new(4, 3, 0, 0, 0));
    assert_eq!(record.motion_id, Some(MotionId(1)));
    assert_eq!(record.motion.kind, Some(MotionKind::Amendment));
    assert_eq!(record.motion.mover.as_deref(), Some("Mendoza"));

    let [main, amendment] = report.motions.as_slice() else {
        panic!("expected two motions, got {:?}", report.motions);
    };
    assert_eq!(amendment.parent, Some(main.id));
    assert_eq!(amendment.status, MotionStatus::Adopted);
    // The main motion is open again, waiting for its own vote.
    assert_eq!(main.status, MotionStatus::Pending);
}

#[test]
fn unreadable_status_line_is_reported_not_dropped() {
    let roster = roster();
    let minutes = "\
Item 40
Status: Report received by consensus, no reportable action
Item 41
AYES: All
NOES: None
Motion carried.";
    let report = run(&roster, date(2021, 3, 2), AGENDA, minutes);

    assert_eq!(report.summary.blocks, 2);
    assert_eq!(report.unextracted.len(), 1);
    let block = &report.unextracted[0];
    assert_eq!(block.block, 0);
    assert_eq!(block.anchor, "Status: Report received by consensus, no reportable action");
    assert!(block.reason.contains("status_roll_call"));
    assert_eq!(block.source.start_line, 2);

    // The rest of the meeting is still extracted.
    let record = &report.accepted[0];
    assert_eq!(record.agenda_item_number.as_deref(), Some("41"));
    assert_eq!(record.tally.ayes, 7);
    assert!(
        record
            .member_votes
            .values()
            .all(|vote| vote.method == ResolutionMethod::Roster)
    );
}

// ---------------------------------------------------------------------------
// Full meeting
// ---------------------------------------------------------------------------

#[test]
fn full_meeting_fixture() {
    let roster = roster();
    let report = run(&roster, date(2021, 3, 2), AGENDA, MINUTES);

    assert_eq!(report.meeting_id, "santa-ana/2021-03-02/regular");
    assert_eq!(report.pattern_set, "default@..");
    assert_eq!(report.summary.blocks, 5);
    assert_eq!(report.summary.accepted, 4);
    assert_eq!(report.summary.low_confidence, 0);
    assert_eq!(report.summary.unextracted, 1);

    let items: Vec<Option<&str>> = report
        .accepted
        .iter()
        .map(|r| r.agenda_item_number.as_deref())
        .collect();
    assert_eq!(items, vec![Some("25"), Some("26"), Some("26"), Some("27")]);

    // OCR repair in the first roll call.
    let first = &report.accepted[0];
    assert_eq!(
        first.member_votes[&MemberId::new("penaloza")].raw_name.as_deref(),
        Some("Penaloza")
    );
    assert_eq!(first.source.start_line, 9);
    assert_eq!(first.source.end_line, 11);
    assert_eq!(first.source.page, 1);

    // Amendment first, then the main motion as amended.
    assert_eq!(report.accepted[1].motion_id, Some(MotionId(2)));
    assert_eq!(report.motions[2].parent, Some(MotionId(1)));
    assert_eq!(report.accepted[2].motion_id, Some(MotionId(1)));
    assert_eq!(report.accepted[2].tally, Tally::new(7, 0, 0, 0, 0));
    assert_eq!(report.accepted[2].quality_score, 100);
    assert_eq!(
        report.accepted[2].title.as_deref(),
        Some("Zoning Code Update for Accessory Dwelling Units")
    );
    let statuses: Vec<MotionStatus> = report.motions.iter().map(|m| m.status).collect();
    assert_eq!(
        statuses,
        vec![
            MotionStatus::Adopted,
            MotionStatus::Adopted,
            MotionStatus::Adopted,
            MotionStatus::Adopted
        ]
    );

    // Recusal announced in prose joins the roll call.
    let recusal = &report.accepted[3];
    assert_eq!(recusal.tally, Tally::new(6, 0, 0, 0, 1));
    let bacerra = &recusal.member_votes[&MemberId::new("bacerra")];
    assert_eq!(bacerra.position, Position::Recused);
    assert_eq!(
        bacerra.recusal_reason.as_deref(),
        Some("his employment with the library foundation")
    );
    assert_eq!(recusal.motion.mover.as_deref(), Some("Hernandez"));
    assert_eq!(codes(recusal), vec!["missing_motion_text"]);
    assert_eq!(recusal.quality_score, 95);
    assert_eq!(recusal.source.page, 2);

    assert_eq!(report.unextracted[0].block, 4);
}
