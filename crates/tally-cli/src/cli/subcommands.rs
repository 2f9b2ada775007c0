use std::path::PathBuf;

use chrono::NaiveDate;
use clap::Subcommand;

/// `tally roster` actions.
#[derive(Clone, Debug, Subcommand)]
pub enum RosterCommands {
    /// Validate a roster file and list the seats held on a date.
    Check {
        /// Roster TOML file.
        path: PathBuf,
        /// Meeting date (YYYY-MM-DD) to list seated members for.
        #[arg(long)]
        date: Option<NaiveDate>,
    },
}
