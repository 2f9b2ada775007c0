//! Loading helpers shared by the command handlers.

use std::path::Path;

use anyhow::Context;
use tally_config::TallyConfig;
use tally_extract::PatternLibrary;
use tally_roster::RosterStore;

use crate::cli::root_commands::TuningArgs;

/// Apply command-line overrides on top of loaded configuration.
pub fn tuned(config: &TallyConfig, tuning: &TuningArgs) -> anyhow::Result<TallyConfig> {
    let mut config = config.clone();
    if let Some(path) = &tuning.patterns {
        config.patterns.library = Some(path.clone());
    }
    if let Some(score) = tuning.min_score {
        config.extraction.min_quality_score = score;
    }
    if let Some(window) = tuning.context_window {
        config.extraction.context_window = window;
    }
    config.validate().context("invalid command-line override")?;
    Ok(config)
}

/// The configured pattern library, or the built-in one.
pub fn load_library(config: &TallyConfig) -> anyhow::Result<PatternLibrary> {
    match &config.patterns.library {
        Some(path) => PatternLibrary::load(path)
            .with_context(|| format!("failed to load pattern library {}", path.display())),
        None => Ok(PatternLibrary::builtin()),
    }
}

pub fn load_roster(path: &Path) -> anyhow::Result<RosterStore> {
    RosterStore::load(path).with_context(|| format!("invalid roster {}", path.display()))
}

pub fn read_text(path: &Path) -> anyhow::Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

/// City for a meeting: explicit flag, then the roster's city, then config.
pub fn meeting_city(explicit: Option<&str>, roster: &RosterStore, config: &TallyConfig) -> String {
    explicit
        .or_else(|| roster.city())
        .unwrap_or(config.patterns.city.as_str())
        .to_string()
}
