//! # tally-config
//!
//! Layered configuration loading for Tally using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`TALLY_*` prefix, `__` as separator)
//! 2. An explicit config file passed by the caller (`--config`)
//! 3. Project-level `.tally/config.toml`
//! 4. User-level `~/.config/tally/config.toml`
//! 5. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `TALLY_EXTRACTION__CONTEXT_WINDOW` -> `extraction.context_window`,
//! `TALLY_RESOLVER__FUZZY_THRESHOLD` -> `resolver.fuzzy_threshold`, etc.
//!
//! # Usage
//!
//! ```no_run
//! use tally_config::TallyConfig;
//!
//! let config = TallyConfig::load_with_dotenv(None).expect("config");
//! assert!(config.extraction.context_window > 0);
//! ```

mod error;
mod extraction;
mod general;
mod patterns;
mod resolver;

pub use error::ConfigError;
pub use extraction::ExtractionConfig;
pub use general::GeneralConfig;
pub use patterns::PatternsConfig;
pub use resolver::ResolverConfig;

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TallyConfig {
    #[serde(default)]
    pub extraction: ExtractionConfig,
    #[serde(default)]
    pub resolver: ResolverConfig,
    #[serde(default)]
    pub patterns: PatternsConfig,
    #[serde(default)]
    pub general: GeneralConfig,
}

impl TallyConfig {
    /// Load configuration from all sources and validate it.
    ///
    /// Does NOT call `dotenvy` -- use [`Self::load_with_dotenv`] for `.env` support.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let config: Self = Self::figment(explicit).extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration after reading a `.env` file from the current
    /// directory, if one exists.
    pub fn load_with_dotenv(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::load(explicit)
    }

    /// Build the figment provider chain.
    ///
    /// Public so tests can inspect the figment directly or add providers.
    pub fn figment(explicit: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(global_path));
        }

        let local_path = PathBuf::from(".tally/config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        if let Some(path) = explicit {
            figment = figment.merge(Toml::file(path));
        }

        figment.merge(Env::prefixed("TALLY_").split("__"))
    }

    /// Check value ranges that serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.extraction.validate()?;
        self.resolver.validate()?;
        if self.patterns.city.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "patterns.city".into(),
                reason: "must not be empty".into(),
            });
        }
        Ok(())
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("tally").join("config.toml"))
    }
}
