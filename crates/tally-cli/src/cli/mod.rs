use std::path::PathBuf;

use clap::Parser;

pub mod global;
pub mod root_commands;
pub mod subcommands;

pub use global::{GlobalFlags, OutputFormat};
pub use root_commands::Commands;

/// Top-level CLI parser for the `tally` binary.
#[derive(Debug, Parser)]
#[command(
    name = "tally",
    version,
    about = "Tally - extract recorded votes from city council minutes"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format: json, table, raw
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Quiet mode (errors only, no progress)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Explicit config file, layered over project and user config
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

impl Cli {
    /// Extract ergonomic global flags struct for command handlers.
    #[must_use]
    pub fn global_flags(&self) -> GlobalFlags {
        GlobalFlags {
            format: self.format,
            quiet: self.quiet,
            verbose: self.verbose,
            config: self.config.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use chrono::NaiveDate;
    use clap::{CommandFactory, Parser};
    use tally_core::enums::MeetingType;

    use super::subcommands::RosterCommands;
    use super::{Cli, Commands, OutputFormat};

    const EXTRACT: [&str; 10] = [
        "extract",
        "--agenda",
        "agenda.txt",
        "--minutes",
        "minutes.txt",
        "--roster",
        "roster.toml",
        "--date",
        "2021-03-02",
        "--verbose",
    ];

    #[test]
    fn clap_command_tree_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_parse_before_subcommand() {
        let cli = Cli::try_parse_from(["tally", "--format", "table", "--quiet", "schema"])
            .expect("cli should parse");

        assert_eq!(cli.format, OutputFormat::Table);
        assert!(cli.quiet);
        assert!(matches!(cli.command, Commands::Schema(_)));
    }

    #[test]
    fn global_flags_parse_after_subcommand() {
        let cli = Cli::try_parse_from(
            std::iter::once("tally")
                .chain(EXTRACT)
                .chain(["--format", "raw", "--config", "tally.toml"]),
        )
        .expect("cli should parse");

        assert_eq!(cli.format, OutputFormat::Raw);
        assert!(cli.verbose);
        assert_eq!(cli.global_flags().config.as_deref(), Some(Path::new("tally.toml")));
    }

    #[test]
    fn extract_defaults_to_regular_meeting() {
        let cli = Cli::try_parse_from(std::iter::once("tally").chain(EXTRACT))
            .expect("cli should parse");

        let Commands::Extract(args) = cli.command else {
            panic!("expected extract");
        };
        assert_eq!(args.meeting_type, MeetingType::Regular);
        assert_eq!(args.date, NaiveDate::from_ymd_opt(2021, 3, 2).unwrap());
        assert!(args.city.is_none());
        assert!(args.tuning.min_score.is_none());
    }

    #[test]
    fn extract_rejects_bad_date_and_meeting_type() {
        let bad_date = std::iter::once("tally")
            .chain(EXTRACT)
            .map(|arg| if arg == "2021-03-02" { "03/02/2021" } else { arg });
        assert!(Cli::try_parse_from(bad_date).is_err());

        let bad_type = std::iter::once("tally")
            .chain(EXTRACT)
            .chain(["--meeting-type", "adjourned"]);
        assert!(Cli::try_parse_from(bad_type).is_err());
    }

    #[test]
    fn roster_check_takes_optional_date() {
        let cli = Cli::try_parse_from(["tally", "roster", "check", "roster.toml"])
            .expect("cli should parse");
        assert!(matches!(
            cli.command,
            Commands::Roster {
                action: RosterCommands::Check { date: None, .. }
            }
        ));
    }

    #[test]
    fn schema_check_requires_a_name() {
        assert!(Cli::try_parse_from(["tally", "schema", "--check", "report.json"]).is_err());
        assert!(
            Cli::try_parse_from(["tally", "schema", "vote_record", "--check", "report.json"])
                .is_ok()
        );
    }

    #[test]
    fn output_format_rejects_invalid_value() {
        let parsed = Cli::try_parse_from(["tally", "--format", "xml", "schema"]);
        assert!(parsed.is_err());
    }
}
