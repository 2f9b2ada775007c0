use chrono::NaiveDate;
use serde::Serialize;
use tally_core::entities::MembershipTerm;
use tally_core::enums::Title;
use tally_roster::RosterStore;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::RosterCommands;
use crate::commands::shared::load_roster;
use crate::output::{Table, output_with_table};

/// Response from `tally roster check`.
#[derive(Debug, Serialize)]
struct RosterCheck {
    city: Option<String>,
    members: usize,
    terms: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    date: Option<NaiveDate>,
    /// Seats held on `date`, or every term when no date is given.
    seats: Vec<SeatRow>,
}

#[derive(Debug, Serialize)]
struct SeatRow {
    seat: String,
    member: String,
    name: String,
    title: Title,
    start: NaiveDate,
    end: Option<NaiveDate>,
}

/// Handle `tally roster`.
pub fn handle(action: &RosterCommands, flags: &GlobalFlags) -> anyhow::Result<()> {
    match action {
        RosterCommands::Check { path, date } => {
            // Loading runs every roster invariant check.
            let roster = load_roster(path)?;
            let check = check(&roster, *date);
            output_with_table(&check, flags.format, seat_table)
        }
    }
}

fn check(roster: &RosterStore, date: Option<NaiveDate>) -> RosterCheck {
    let terms: Vec<&MembershipTerm> = match date {
        Some(date) => roster.active_terms(date),
        None => roster.terms().iter().collect(),
    };
    let seats = terms
        .into_iter()
        .map(|term| SeatRow {
            seat: term.seat.clone(),
            member: term.member.to_string(),
            name: roster
                .member(&term.member)
                .map_or_else(|| term.member.to_string(), |m| m.name.clone()),
            title: term.title,
            start: term.start,
            end: term.end,
        })
        .collect();

    RosterCheck {
        city: roster.city().map(str::to_string),
        members: roster.members().count(),
        terms: roster.terms().len(),
        date,
        seats,
    }
}

fn seat_table(check: &RosterCheck) -> Table {
    let mut table = Table::new(["seat", "member", "name", "title", "start", "end"]);
    for row in &check.seats {
        table.push(vec![
            row.seat.clone(),
            row.member.clone(),
            row.name.clone(),
            row.title.to_string(),
            row.start.to_string(),
            row.end.map_or_else(|| "-".into(), |d| d.to_string()),
        ]);
    }
    table
}
