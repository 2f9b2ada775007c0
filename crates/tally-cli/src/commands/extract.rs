use anyhow::Context;
use tally_config::TallyConfig;
use tally_core::entities::Meeting;
use tally_core::responses::ExtractionReport;
use tally_extract::{Engine, EngineSettings, MeetingInput};

use crate::cli::GlobalFlags;
use crate::cli::root_commands::ExtractArgs;
use crate::commands::shared::{load_library, load_roster, meeting_city, read_text, tuned};
use crate::output::{Table, output_with_table};
use crate::progress::Progress;

/// Handle `tally extract`.
///
/// Block-level problems are part of the report; only unreadable or empty
/// input fails the command.
pub fn handle(args: &ExtractArgs, config: &TallyConfig, flags: &GlobalFlags) -> anyhow::Result<()> {
    let config = tuned(config, &args.tuning)?;
    let roster = load_roster(&args.roster)?;
    let library = load_library(&config)?;

    let city = meeting_city(args.city.as_deref(), &roster, &config);
    let input = MeetingInput {
        meeting: Meeting::new(city, args.date, args.meeting_type),
        agenda_text: read_text(&args.agenda)?,
        minutes_text: read_text(&args.minutes)?,
    };
    let meeting_id = input.meeting.id();

    let progress = Progress::spinner(&format!("extracting {meeting_id}"));
    let engine = Engine::new(&roster, &library, EngineSettings::from(&config));
    let report = match engine.extract(&input) {
        Ok(report) => report,
        Err(error) => {
            progress.abandon("extraction failed");
            return Err(error).with_context(|| format!("cannot extract {meeting_id}"));
        }
    };
    progress.clear();

    output_with_table(&report, flags.format, report_table)
}

/// One row per vote in document order, then one per unreadable block.
pub fn report_table(report: &ExtractionReport) -> Table {
    let mut table = Table::new([
        "id", "item", "outcome", "ayes", "noes", "abstain", "absent", "recused", "score", "route",
    ]);
    for record in report.all_records() {
        let route = if report.review.iter().any(|r| r.id == record.id) {
            "review"
        } else {
            "accepted"
        };
        table.push(vec![
            record.id.clone(),
            record.agenda_item_number.clone().unwrap_or_else(|| "-".into()),
            record.outcome.map_or_else(|| "-".into(), |o| o.to_string()),
            record.tally.ayes.to_string(),
            record.tally.noes.to_string(),
            record.tally.abstain.to_string(),
            record.tally.absent.to_string(),
            record.tally.recused.to_string(),
            record.quality_score.to_string(),
            route.to_string(),
        ]);
    }
    for block in &report.unextracted {
        table.push(vec![
            format!("{}@{}", report.meeting_id, block.source.start_line),
            "-".into(),
            "-".into(),
            "-".into(),
            "-".into(),
            "-".into(),
            "-".into(),
            "-".into(),
            "-".into(),
            "unextracted".into(),
        ]);
    }
    table
}
