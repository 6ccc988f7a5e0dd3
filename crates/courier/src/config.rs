// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Mediator configuration.
//!
//! Supports both programmatic and file-based configuration. Files are TOML
//! with a single `[mediator]` table:
//!
//! ```toml
//! [mediator]
//! name = "orders"
//! catch_panics = true
//! log_validation_failures = true
//! slow_dispatch_threshold_ms = 250
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Mediator configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediatorConfig {
    /// Mediator name (for identification in logs).
    #[serde(default = "default_mediator_name")]
    pub name: String,

    /// Isolate panics raised by rules and validators.
    ///
    /// When disabled, a panicking handler unwinds through the caller.
    #[serde(default = "default_true")]
    pub catch_panics: bool,

    /// Log validation faults at `warn`.
    #[serde(default = "default_true")]
    pub log_validation_failures: bool,

    /// Log dispatches slower than this (milliseconds) at `warn`.
    #[serde(default)]
    pub slow_dispatch_threshold_ms: Option<u64>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    mediator: MediatorConfig,
}

fn default_mediator_name() -> String {
    "courier".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for MediatorConfig {
    fn default() -> Self {
        Self {
            name: default_mediator_name(),
            catch_panics: true,
            log_validation_failures: true,
            slow_dispatch_threshold_ms: None,
        }
    }
}

impl MediatorConfig {
    /// Load configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile = toml::from_str(content)?;
        file.mediator.validate()?;
        Ok(file.mediator)
    }

    /// Render as TOML, in the same layout [`from_toml_str`](Self::from_toml_str) reads.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        let file = ConfigFile {
            mediator: self.clone(),
        };
        toml::to_string(&file).map_err(|e| ConfigError::Invalid(e.to_string()))
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.name.trim().is_empty() {
            return Err(ConfigError::Invalid("Mediator name is empty".into()));
        }

        if self.slow_dispatch_threshold_ms == Some(0) {
            return Err(ConfigError::Invalid(
                "slow_dispatch_threshold_ms must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    /// Set the mediator name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Enable or disable panic isolation.
    #[must_use]
    pub fn with_catch_panics(mut self, enabled: bool) -> Self {
        self.catch_panics = enabled;
        self
    }

    /// Set the slow-dispatch warning threshold.
    ///
    /// Rounded up to whole milliseconds, never below 1 ms; saturates at
    /// `u64::MAX` milliseconds.
    #[must_use]
    pub fn with_slow_dispatch_threshold(mut self, threshold: Duration) -> Self {
        let millis = threshold.as_nanos().div_ceil(1_000_000).max(1);
        self.slow_dispatch_threshold_ms = Some(u64::try_from(millis).unwrap_or(u64::MAX));
        self
    }

    /// Slow-dispatch threshold, if configured.
    pub fn slow_dispatch_threshold(&self) -> Option<Duration> {
        self.slow_dispatch_threshold_ms.map(Duration::from_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = MediatorConfig::default();
        assert_eq!(config.name, "courier");
        assert!(config.catch_panics);
        assert!(config.log_validation_failures);
        assert_eq!(config.slow_dispatch_threshold(), None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
[mediator]
name = "orders"
catch_panics = false
log_validation_failures = false
slow_dispatch_threshold_ms = 250
"#;

        let config = MediatorConfig::from_toml_str(toml).expect("parse");
        assert_eq!(config.name, "orders");
        assert!(!config.catch_panics);
        assert!(!config.log_validation_failures);
        assert_eq!(
            config.slow_dispatch_threshold(),
            Some(Duration::from_millis(250))
        );
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let config = MediatorConfig::from_toml_str("[mediator]\nname = \"billing\"\n")
            .expect("parse");
        assert_eq!(config.name, "billing");
        assert!(config.catch_panics);

        let config = MediatorConfig::from_toml_str("").expect("empty file");
        assert_eq!(config, MediatorConfig::default());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let config = MediatorConfig::default().with_name("  ");
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let toml = "[mediator]\nslow_dispatch_threshold_ms = 0\n";
        assert!(matches!(
            MediatorConfig::from_toml_str(toml),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_parse_error() {
        let err = MediatorConfig::from_toml_str("[mediator]\ncatch_panics = \"yes\"\n")
            .expect_err("wrong type");
        assert!(matches!(err, ConfigError::Toml(_)));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().expect("tempfile");
        writeln!(file, "[mediator]\nname = \"from-disk\"").expect("write");

        let config = MediatorConfig::from_file(file.path()).expect("load");
        assert_eq!(config.name, "from-disk");

        let err = MediatorConfig::from_file(file.path().with_extension("missing"))
            .expect_err("no such file");
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_threshold_rounds_up_to_whole_millis() {
        let config =
            MediatorConfig::default().with_slow_dispatch_threshold(Duration::from_micros(500));
        assert_eq!(config.slow_dispatch_threshold_ms, Some(1));
        assert!(config.validate().is_ok());

        let config = MediatorConfig::default().with_slow_dispatch_threshold(Duration::ZERO);
        assert_eq!(config.slow_dispatch_threshold_ms, Some(1));

        let config =
            MediatorConfig::default().with_slow_dispatch_threshold(Duration::from_micros(2_001));
        assert_eq!(config.slow_dispatch_threshold_ms, Some(3));

        let config = MediatorConfig::default().with_slow_dispatch_threshold(Duration::MAX);
        assert_eq!(config.slow_dispatch_threshold_ms, Some(u64::MAX));
    }

    #[test]
    fn test_toml_round_trip() {
        let config = MediatorConfig::default()
            .with_name("rt")
            .with_catch_panics(false)
            .with_slow_dispatch_threshold(Duration::from_millis(40));

        let text = config.to_toml_string().expect("serialize");
        assert!(text.contains("[mediator]"));
        assert_eq!(MediatorConfig::from_toml_str(&text).expect("parse"), config);
    }
}
