use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Subcommand};
use tally_core::enums::MeetingType;

use crate::cli::subcommands::RosterCommands;

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Extract every recorded vote from one meeting's minutes.
    Extract(ExtractArgs),
    /// Extract a manifest of meetings in parallel.
    Batch(BatchArgs),
    /// Roster maintenance.
    Roster {
        #[command(subcommand)]
        action: RosterCommands,
    },
    /// Show the pattern set selected for a city and date.
    Patterns(PatternsArgs),
    /// Print a registered JSON Schema, or list the registered names.
    Schema(SchemaArgs),
}

/// Knobs shared by `extract` and `batch` that override configuration.
#[derive(Clone, Debug, Default, Args)]
pub struct TuningArgs {
    /// Pattern library TOML (overrides `patterns.library`).
    #[arg(long)]
    pub patterns: Option<PathBuf>,
    /// Minimum quality score for acceptance (0-100).
    #[arg(long)]
    pub min_score: Option<u8>,
    /// Characters of preceding text scanned for motion context.
    #[arg(long)]
    pub context_window: Option<usize>,
}

#[derive(Clone, Debug, Args)]
pub struct ExtractArgs {
    /// Agenda text file.
    #[arg(long)]
    pub agenda: PathBuf,
    /// Minutes text file.
    #[arg(long)]
    pub minutes: PathBuf,
    /// Roster TOML file.
    #[arg(long)]
    pub roster: PathBuf,
    /// Meeting date (YYYY-MM-DD).
    #[arg(long)]
    pub date: NaiveDate,
    /// Meeting type: regular, special, joint, emergency.
    #[arg(long, default_value = "regular")]
    pub meeting_type: MeetingType,
    /// City slug (defaults to the roster's city).
    #[arg(long)]
    pub city: Option<String>,
    #[command(flatten)]
    pub tuning: TuningArgs,
}

#[derive(Clone, Debug, Args)]
pub struct BatchArgs {
    /// Manifest TOML listing the meetings to extract.
    pub manifest: PathBuf,
    /// Roster TOML file.
    #[arg(long)]
    pub roster: PathBuf,
    /// Directory to write one report per meeting into.
    #[arg(long)]
    pub out: Option<PathBuf>,
    /// Stop starting new meetings after the first failure.
    #[arg(long)]
    pub fail_fast: bool,
    #[command(flatten)]
    pub tuning: TuningArgs,
}

#[derive(Clone, Debug, Args)]
pub struct PatternsArgs {
    /// City slug (defaults to `patterns.city`).
    #[arg(long)]
    pub city: Option<String>,
    /// Meeting date; without it every set in the library is listed.
    #[arg(long)]
    pub date: Option<NaiveDate>,
    /// Pattern library TOML (overrides `patterns.library`).
    #[arg(long)]
    pub patterns: Option<PathBuf>,
}

#[derive(Clone, Debug, Args)]
pub struct SchemaArgs {
    /// Schema name, e.g. `vote_record`. Omit to list names.
    pub name: Option<String>,
    /// Validate a JSON file against the named schema instead of printing it.
    #[arg(long, requires = "name")]
    pub check: Option<PathBuf>,
}
