use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::{Context, bail};
use chrono::NaiveDate;
use serde::Deserialize;
use tally_config::TallyConfig;
use tally_core::entities::Meeting;
use tally_core::enums::MeetingType;
use tally_core::responses::{BatchEntry, BatchSummary, ExtractionReport, RunSummary};
use tally_extract::{Engine, EngineSettings, MeetingInput, MeetingResult};

use crate::cli::GlobalFlags;
use crate::cli::root_commands::BatchArgs;
use crate::commands::shared::{load_library, load_roster, meeting_city, read_text, tuned};
use crate::output::{Table, output_with_table};
use crate::progress::Progress;

/// Meetings to extract, read from a TOML manifest.
///
/// ```toml
/// city = "santa-ana"
///
/// [[meeting]]
/// date = "2021-03-02"
/// type = "regular"
/// agenda = "agendas/2021-03-02.txt"
/// minutes = "minutes/2021-03-02.txt"
/// ```
///
/// Relative paths are resolved against the manifest's directory.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct Manifest {
    #[serde(default)]
    city: Option<String>,
    #[serde(default, rename = "meeting")]
    meetings: Vec<ManifestEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ManifestEntry {
    date: NaiveDate,
    #[serde(default = "regular", rename = "type")]
    kind: MeetingType,
    #[serde(default)]
    city: Option<String>,
    agenda: PathBuf,
    minutes: PathBuf,
}

const fn regular() -> MeetingType {
    MeetingType::Regular
}

impl Manifest {
    fn load(path: &Path) -> anyhow::Result<Self> {
        let content = read_text(path)?;
        toml::from_str(&content).with_context(|| format!("invalid manifest {}", path.display()))
    }
}

/// Handle `tally batch`.
pub fn handle(args: &BatchArgs, config: &TallyConfig, flags: &GlobalFlags) -> anyhow::Result<()> {
    let summary = run(args, config)?;
    output_with_table(&summary, flags.format, summary_table)?;

    if args.fail_fast && summary.failed > 0 {
        bail!("{} meeting(s) failed", summary.failed);
    }
    Ok(())
}

fn run(args: &BatchArgs, config: &TallyConfig) -> anyhow::Result<BatchSummary> {
    let config = tuned(config, &args.tuning)?;
    let roster = load_roster(&args.roster)?;
    let library = load_library(&config)?;
    let manifest = Manifest::load(&args.manifest)?;
    let base = args.manifest.parent().unwrap_or_else(|| Path::new("."));

    if let Some(out) = &args.out {
        std::fs::create_dir_all(out)
            .with_context(|| format!("failed to create output directory {}", out.display()))?;
    }

    // `None` marks a meeting handed to the engine; unreadable files fail
    // that meeting alone.
    let mut slots: Vec<Option<BatchEntry>> = Vec::with_capacity(manifest.meetings.len());
    let mut inputs = Vec::with_capacity(manifest.meetings.len());
    for entry in &manifest.meetings {
        let city = entry
            .city
            .clone()
            .or_else(|| manifest.city.clone())
            .unwrap_or_else(|| meeting_city(None, &roster, &config));
        let meeting = Meeting::new(city, entry.date, entry.kind);

        let texts = read_text(&base.join(&entry.agenda))
            .and_then(|agenda| Ok((agenda, read_text(&base.join(&entry.minutes))?)));
        match texts {
            Ok((agenda_text, minutes_text)) => {
                inputs.push(MeetingInput {
                    meeting,
                    agenda_text,
                    minutes_text,
                });
                slots.push(None);
            }
            Err(error) => {
                tracing::warn!(meeting = %meeting.id(), error = %format!("{error:#}"), "meeting input unreadable");
                slots.push(Some(BatchEntry::Failed {
                    meeting_id: meeting.id(),
                    error: format!("{error:#}"),
                }));
            }
        }
    }

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.general.parallelism)
        .build()
        .context("failed to start worker pool")?;
    let engine = Engine::new(&roster, &library, EngineSettings::from(&config));
    let cancel = AtomicBool::new(false);
    let progress = Progress::counter(inputs.len(), "extracting");

    let results = pool.install(|| {
        engine.extract_batch(&inputs, &cancel, |input, result| {
            progress.advance(&input.meeting.id());
            if args.fail_fast && matches!(result, MeetingResult::Failed(_)) {
                cancel.store(true, Ordering::Relaxed);
            }
        })
    });

    let mut finished = inputs.iter().zip(results);
    let mut meetings = Vec::with_capacity(slots.len());
    for slot in slots {
        let entry = match slot {
            Some(entry) => entry,
            None => {
                let Some((input, result)) = finished.next() else {
                    break;
                };
                finish(input, result, args.out.as_deref())?
            }
        };
        meetings.push(entry);
    }

    let mut totals = RunSummary::default();
    let mut failed = 0;
    for entry in &meetings {
        match entry {
            BatchEntry::Extracted { summary, .. } => {
                totals.blocks += summary.blocks;
                totals.accepted += summary.accepted;
                totals.low_confidence += summary.low_confidence;
                totals.unextracted += summary.unextracted;
            }
            BatchEntry::Failed { .. } => failed += 1,
            BatchEntry::Skipped { .. } => {}
        }
    }

    if failed > 0 {
        progress.abandon(&format!("{failed} failed"));
    } else {
        progress.done("done");
    }
    tracing::info!(meetings = meetings.len(), failed, "batch finished");

    Ok(BatchSummary {
        meetings,
        totals,
        failed,
    })
}

fn finish(
    input: &MeetingInput,
    result: MeetingResult,
    out: Option<&Path>,
) -> anyhow::Result<BatchEntry> {
    let meeting_id = input.meeting.id();
    Ok(match result {
        MeetingResult::Extracted(report) => {
            let report_path = out.map(|dir| write_report(dir, &report)).transpose()?;
            BatchEntry::Extracted {
                meeting_id,
                summary: report.summary,
                report_path,
            }
        }
        MeetingResult::Failed(error) => BatchEntry::Failed {
            meeting_id,
            error: error.to_string(),
        },
        MeetingResult::Skipped => BatchEntry::Skipped { meeting_id },
    })
}

fn write_report(dir: &Path, report: &ExtractionReport) -> anyhow::Result<String> {
    let meeting = &report.meeting;
    let path = dir.join(format!(
        "{}_{}_{}.json",
        meeting.city, meeting.date, meeting.kind
    ));
    let json = serde_json::to_string_pretty(report)?;
    std::fs::write(&path, json)
        .with_context(|| format!("failed to write report {}", path.display()))?;
    Ok(path.display().to_string())
}

fn summary_table(summary: &BatchSummary) -> Table {
    let mut table = Table::new([
        "meeting", "status", "blocks", "accepted", "review", "unextracted", "detail",
    ]);
    for entry in &summary.meetings {
        table.push(match entry {
            BatchEntry::Extracted {
                meeting_id,
                summary,
                report_path,
            } => vec![
                meeting_id.clone(),
                "extracted".into(),
                summary.blocks.to_string(),
                summary.accepted.to_string(),
                summary.low_confidence.to_string(),
                summary.unextracted.to_string(),
                report_path.clone().unwrap_or_else(|| "-".into()),
            ],
            BatchEntry::Failed { meeting_id, error } => vec![
                meeting_id.clone(),
                "failed".into(),
                "-".into(),
                "-".into(),
                "-".into(),
                "-".into(),
                error.clone(),
            ],
            BatchEntry::Skipped { meeting_id } => vec![meeting_id.clone(), "skipped".into()],
        });
    }
    let totals = summary.totals;
    table.push(vec![
        "total".into(),
        format!("{} failed", summary.failed),
        totals.blocks.to_string(),
        totals.accepted.to_string(),
        totals.low_confidence.to_string(),
        totals.unextracted.to_string(),
    ]);
    table
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::cli::root_commands::TuningArgs;

    const ROSTER: &str = include_str!("../../../tally-extract/tests/fixtures/roster.toml");
    const AGENDA: &str = include_str!("../../../tally-extract/tests/fixtures/agenda_2021_03_02.txt");
    const MINUTES: &str =
        include_str!("../../../tally-extract/tests/fixtures/minutes_2021_03_02.txt");

    const MANIFEST: &str = r#"
city = "santa-ana"

[[meeting]]
date = "2021-03-02"
agenda = "agenda.txt"
minutes = "minutes.txt"

[[meeting]]
date = "2021-03-16"
type = "special"
agenda = "agenda.txt"
minutes = "missing.txt"

[[meeting]]
date = "2021-04-06"
agenda = "agenda.txt"
minutes = "empty.txt"
"#;

    fn workspace() -> (tempfile::TempDir, BatchArgs) {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("roster.toml"), ROSTER).unwrap();
        std::fs::write(dir.path().join("agenda.txt"), AGENDA).unwrap();
        std::fs::write(dir.path().join("minutes.txt"), MINUTES).unwrap();
        std::fs::write(dir.path().join("empty.txt"), "\n").unwrap();
        std::fs::write(dir.path().join("batch.toml"), MANIFEST).unwrap();

        let args = BatchArgs {
            manifest: dir.path().join("batch.toml"),
            roster: dir.path().join("roster.toml"),
            out: Some(dir.path().join("reports")),
            fail_fast: false,
            tuning: TuningArgs::default(),
        };
        (dir, args)
    }

    #[test]
    fn manifest_entries_default_to_regular_meetings() {
        let manifest: Manifest = toml::from_str(MANIFEST).unwrap();
        assert_eq!(manifest.city.as_deref(), Some("santa-ana"));
        assert_eq!(manifest.meetings.len(), 3);
        assert_eq!(manifest.meetings[0].kind, MeetingType::Regular);
        assert_eq!(manifest.meetings[1].kind, MeetingType::Special);
    }

    #[test]
    fn manifest_rejects_unknown_keys() {
        let result: Result<Manifest, _> = toml::from_str("[[meeting]]\ndate = \"2021-03-02\"\nagenda = \"a\"\nminutes = \"m\"\nroom = \"B\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn batch_isolates_failures_and_writes_reports() {
        let (dir, args) = workspace();
        let summary = run(&args, &TallyConfig::default()).unwrap();

        assert_eq!(summary.meetings.len(), 3);
        assert_eq!(summary.failed, 2);

        let BatchEntry::Extracted {
            meeting_id,
            summary: counts,
            report_path: Some(path),
        } = &summary.meetings[0]
        else {
            panic!("expected an extracted meeting, got {:?}", summary.meetings[0]);
        };
        assert_eq!(meeting_id, "santa-ana/2021-03-02/regular");
        assert_eq!(counts.accepted, 4);
        assert_eq!(
            Path::new(path),
            dir.path().join("reports/santa-ana_2021-03-02_regular.json")
        );
        let written: ExtractionReport =
            serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(written.summary, *counts);

        match &summary.meetings[1] {
            BatchEntry::Failed { meeting_id, error } => {
                assert_eq!(meeting_id, "santa-ana/2021-03-16/special");
                assert!(error.contains("missing.txt"));
            }
            other => panic!("expected a failure, got {other:?}"),
        }
        assert!(matches!(
            &summary.meetings[2],
            BatchEntry::Failed { error, .. } if error == "minutes text is empty"
        ));
        assert_eq!(summary.totals, *counts);
    }
}
