use std::path::Path;

use anyhow::Context;
use tally_config::TallyConfig;

use crate::cli::GlobalFlags;

/// Load layered configuration, reading a `.env` first.
///
/// A `.env` beside an explicit `--config` file takes precedence over one in
/// the current directory.
pub fn load_config(flags: &GlobalFlags) -> anyhow::Result<TallyConfig> {
    load_dotenv(flags.config.as_deref())?;

    TallyConfig::load(flags.config.as_deref()).context("failed to load tally configuration")
}

fn load_dotenv(config: Option<&Path>) -> anyhow::Result<()> {
    if let Some(dir) = config.and_then(Path::parent) {
        let env_path = dir.join(".env");
        if env_path.exists() {
            dotenvy::from_path(&env_path)
                .with_context(|| format!("failed to load dotenv file at {}", env_path.display()))?;
            return Ok(());
        }
    }

    match dotenvy::dotenv() {
        Ok(path) => {
            tracing::debug!(path = %path.display(), "loaded dotenv file");
            Ok(())
        }
        Err(error) if error.not_found() => Ok(()),
        Err(error) => Err(anyhow::anyhow!("failed to load .env: {error}")),
    }
}
