//! Segmentation and routing settings.

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Default size of the context window captured before each vote anchor.
const fn default_context_window() -> usize {
    500
}

/// Default minimum quality score for the accepted stream.
const fn default_min_quality_score() -> u8 {
    60
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ExtractionConfig {
    /// Characters of preceding text kept as context for each candidate block.
    #[serde(default = "default_context_window")]
    pub context_window: usize,

    /// Records scoring below this are routed to manual review.
    #[serde(default = "default_min_quality_score")]
    pub min_quality_score: u8,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            context_window: default_context_window(),
            min_quality_score: default_min_quality_score(),
        }
    }
}

impl ExtractionConfig {
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.context_window == 0 {
            return Err(ConfigError::InvalidValue {
                field: "extraction.context_window".into(),
                reason: "must be greater than zero".into(),
            });
        }
        if self.min_quality_score > 100 {
            return Err(ConfigError::InvalidValue {
                field: "extraction.min_quality_score".into(),
                reason: format!("{} is outside 0..=100", self.min_quality_score),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_correct() {
        let config = ExtractionConfig::default();
        assert_eq!(config.context_window, 500);
        assert_eq!(config.min_quality_score, 60);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_window_is_rejected() {
        let config = ExtractionConfig {
            context_window: 0,
            ..ExtractionConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
