//! Roster snapshot loading and invariant enforcement.

use std::io::Write;

use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use rstest::rstest;
use tally_roster::{RosterError, RosterStore};

const MEMBERS: &str = r#"
[[members]]
id = "lopez"
name = "Lopez"

[[members]]
id = "mendoza"
name = "Mendoza"
"#;

fn roster_with(terms: &str) -> Result<RosterStore, RosterError> {
    RosterStore::from_toml_str(&format!("{MEMBERS}\n{terms}"))
}

#[rstest]
#[case::overlapping_terms(
    r#"
[[terms]]
member = "lopez"
seat = "Ward 3"
title = "member"
start = "2016-12-06"
end = "2020-12-01"

[[terms]]
member = "lopez"
seat = "Ward 3"
title = "mayor_pro_tem"
start = "2020-06-01"
end = "2022-12-01"
"#,
    "overlap"
)]
#[case::two_open_terms(
    r#"
[[terms]]
member = "lopez"
seat = "Ward 3"
title = "member"
start = "2016-12-06"

[[terms]]
member = "lopez"
seat = "Ward 4"
title = "member"
start = "2024-12-06"
"#,
    "open"
)]
#[case::inverted_range(
    r#"
[[terms]]
member = "lopez"
seat = "Ward 3"
title = "member"
start = "2020-12-01"
end = "2019-12-01"
"#,
    "before it starts"
)]
#[case::unknown_member(
    r#"
[[terms]]
member = "nobody"
seat = "Ward 9"
title = "member"
start = "2020-12-01"
"#,
    "unknown member"
)]
#[case::shared_seat(
    r#"
[[terms]]
member = "lopez"
seat = "Ward 3"
title = "member"
start = "2016-12-06"

[[terms]]
member = "mendoza"
seat = "Ward 3"
title = "member"
start = "2020-12-01"
"#,
    "held by both"
)]
fn invalid_rosters_are_rejected(#[case] terms: &str, #[case] needle: &str) {
    let error = roster_with(terms).expect_err("roster should be rejected");
    let message = error.to_string();
    assert!(
        message.contains(needle),
        "expected '{needle}' in error message: {message}"
    );
}

#[test]
fn consecutive_terms_with_title_change_are_valid() {
    let roster = roster_with(
        r#"
[[terms]]
member = "lopez"
seat = "Ward 3"
title = "member"
start = "2016-12-06"
end = "2020-12-01"

[[terms]]
member = "lopez"
seat = "Ward 3"
title = "mayor_pro_tem"
start = "2020-12-02"
"#,
    )
    .expect("roster is valid");

    let date = NaiveDate::from_ymd_opt(2021, 1, 5).unwrap();
    let term = roster
        .term_for(&"lopez".into(), date)
        .expect("lopez is seated");
    assert_eq!(term.title.as_str(), "mayor_pro_tem");
}

#[test]
fn duplicate_member_ids_are_rejected() {
    let result = RosterStore::from_toml_str(&format!("{MEMBERS}{MEMBERS}"));
    assert!(matches!(result, Err(RosterError::DuplicateMember(_))));
}

#[test]
fn loads_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        "{MEMBERS}\n[[terms]]\nmember = \"mendoza\"\nseat = \"Ward 6\"\ntitle = \"member\"\nstart = \"2018-12-04\"\n"
    )
    .unwrap();

    let roster = RosterStore::load(file.path()).expect("roster loads");
    let date = NaiveDate::from_ymd_opt(2023, 3, 7).unwrap();
    assert_eq!(roster.expected_seats(date), 1);
    assert_eq!(roster.members().count(), 2);
}

#[test]
fn missing_file_is_an_io_error() {
    let result = RosterStore::load(std::path::Path::new("/definitely/not/here.toml"));
    assert!(matches!(result, Err(RosterError::Io { .. })));
}
