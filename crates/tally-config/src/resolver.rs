//! Member name resolution settings.

use serde::{Deserialize, Serialize};

use crate::ConfigError;

const fn default_fuzzy_threshold() -> f64 {
    0.88
}

const fn default_ambiguity_margin() -> f64 {
    0.03
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ResolverConfig {
    /// Minimum Jaro-Winkler similarity for a fuzzy match to be accepted.
    #[serde(default = "default_fuzzy_threshold")]
    pub fuzzy_threshold: f64,

    /// A fuzzy winner must beat the best other member by at least this much.
    #[serde(default = "default_ambiguity_margin")]
    pub ambiguity_margin: f64,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            fuzzy_threshold: default_fuzzy_threshold(),
            ambiguity_margin: default_ambiguity_margin(),
        }
    }
}

impl ResolverConfig {
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if !(self.fuzzy_threshold > 0.0 && self.fuzzy_threshold <= 1.0) {
            return Err(ConfigError::InvalidValue {
                field: "resolver.fuzzy_threshold".into(),
                reason: format!("{} is outside (0, 1]", self.fuzzy_threshold),
            });
        }
        if !(0.0..1.0).contains(&self.ambiguity_margin) {
            return Err(ConfigError::InvalidValue {
                field: "resolver.ambiguity_margin".into(),
                reason: format!("{} is outside [0, 1)", self.ambiguity_margin),
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
        let config = ResolverConfig::default();
        assert!((config.fuzzy_threshold - 0.88).abs() < f64::EPSILON);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn threshold_above_one_is_rejected() {
        let config = ResolverConfig {
            fuzzy_threshold: 1.5,
            ..ResolverConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
