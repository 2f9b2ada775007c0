//! Integration tests for TOML and environment configuration loading.
//!
//! Uses `figment::Jail` for sandboxed files and env vars.

use figment::{
    Figment, Jail,
    providers::{Format, Serialized, Toml},
};
use pretty_assertions::assert_eq;
use tally_config::{ConfigError, TallyConfig};

#[test]
fn loads_sections_from_toml() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[extraction]
context_window = 800
min_quality_score = 70

[resolver]
fuzzy_threshold = 0.9

[patterns]
city = "santa-ana"
library = "patterns/santa-ana.toml"

[general]
parallelism = 4
"#,
        )?;

        let config: TallyConfig = Figment::from(Serialized::defaults(TallyConfig::default()))
            .merge(Toml::file("config.toml"))
            .extract()?;

        assert_eq!(config.extraction.context_window, 800);
        assert_eq!(config.extraction.min_quality_score, 70);
        assert!((config.resolver.fuzzy_threshold - 0.9).abs() < f64::EPSILON);
        assert!((config.resolver.ambiguity_margin - 0.03).abs() < f64::EPSILON);
        assert_eq!(config.patterns.city, "santa-ana");
        assert_eq!(
            config.patterns.library.as_deref(),
            Some(std::path::Path::new("patterns/santa-ana.toml"))
        );
        assert_eq!(config.general.parallelism, 4);
        Ok(())
    });
}

#[test]
fn explicit_file_overrides_project_file() {
    Jail::expect_with(|jail| {
        jail.create_dir(".tally")?;
        jail.create_file(
            ".tally/config.toml",
            "[extraction]\ncontext_window = 300\nmin_quality_score = 50\n",
        )?;
        jail.create_file("override.toml", "[extraction]\ncontext_window = 900\n")?;

        let config = TallyConfig::load(Some(std::path::Path::new("override.toml")))
            .expect("config loads");
        assert_eq!(config.extraction.context_window, 900);
        assert_eq!(config.extraction.min_quality_score, 50);
        Ok(())
    });
}

#[test]
fn env_beats_files() {
    Jail::expect_with(|jail| {
        jail.create_dir(".tally")?;
        jail.create_file(".tally/config.toml", "[patterns]\ncity = \"anaheim\"\n")?;
        jail.set_env("TALLY_PATTERNS__CITY", "santa-ana");
        jail.set_env("TALLY_EXTRACTION__MIN_QUALITY_SCORE", "75");

        let config = TallyConfig::load(None).expect("config loads");
        assert_eq!(config.patterns.city, "santa-ana");
        assert_eq!(config.extraction.min_quality_score, 75);
        Ok(())
    });
}

#[test]
fn out_of_range_values_fail_validation() {
    Jail::expect_with(|jail| {
        jail.set_env("TALLY_RESOLVER__FUZZY_THRESHOLD", "1.5");
        let result = TallyConfig::load(None);
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
        Ok(())
    });
}

#[test]
fn malformed_toml_is_a_figment_error() {
    Jail::expect_with(|jail| {
        jail.create_file("broken.toml", "[extraction\ncontext_window = ")?;
        let result = TallyConfig::load(Some(std::path::Path::new("broken.toml")));
        assert!(matches!(result, Err(ConfigError::Figment(_))));
        Ok(())
    });
}
