//! General application configuration.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    /// Worker threads for batch runs. `0` lets rayon pick.
    #[serde(default)]
    pub parallelism: usize,
}
