//! Database configuration
//!
//! Every field is optional in the JSON form and falls back to its
//! default, so `{}` is a valid configuration.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::executor::IdStrategy;
use crate::observability::{LogSink, Severity};

/// Result type for configuration loading
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Configuration loading errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("Failed to read config '{path}': {reason}")]
    Io { path: String, reason: String },

    /// Config text is not valid JSON or has unknown keys
    #[error("Invalid config JSON: {0}")]
    Parse(String),
}

/// Configuration of one database instance
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatabaseConfig {
    /// Minimum severity to log (default: none, logging disabled)
    #[serde(default)]
    pub log_level: Option<Severity>,

    /// Log destination (default: "stderr")
    #[serde(default)]
    pub log_sink: LogSink,

    /// How `__ID` values are generated (default: "uuid")
    #[serde(default)]
    pub id_strategy: IdStrategy,
}

impl DatabaseConfig {
    /// Parse configuration from a JSON string
    pub fn from_json_str(text: &str) -> ConfigResult<Self> {
        serde_json::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Load configuration from a JSON file
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_json_str(&content)
    }

    /// Enable logging at `level` and above
    pub fn with_log_level(mut self, level: Severity) -> Self {
        self.log_level = Some(level);
        self
    }

    pub fn with_log_sink(mut self, sink: LogSink) -> Self {
        self.log_sink = sink;
        self
    }

    pub fn with_id_strategy(mut self, strategy: IdStrategy) -> Self {
        self.id_strategy = strategy;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = DatabaseConfig::default();
        assert_eq!(config.log_level, None);
        assert_eq!(config.log_sink, LogSink::Stderr);
        assert_eq!(config.id_strategy, IdStrategy::Uuid);
    }

    #[test]
    fn test_empty_json_uses_defaults() {
        assert_eq!(
            DatabaseConfig::from_json_str("{}").unwrap(),
            DatabaseConfig::default()
        );
    }

    #[test]
    fn test_full_json() {
        let config = DatabaseConfig::from_json_str(
            r#"{"log_level": "WARN", "log_sink": "memory", "id_strategy": "sequential"}"#,
        )
        .unwrap();
        assert_eq!(config.log_level, Some(Severity::Warn));
        assert_eq!(config.log_sink, LogSink::Memory);
        assert_eq!(config.id_strategy, IdStrategy::Sequential);
    }

    #[test]
    fn test_unknown_key_rejected() {
        let err = DatabaseConfig::from_json_str(r#"{"data_dir": "/tmp"}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"log_level": "INFO"}}"#).unwrap();

        let config = DatabaseConfig::load(file.path()).unwrap();
        assert_eq!(config.log_level, Some(Severity::Info));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = DatabaseConfig::load(&dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_builders() {
        let config = DatabaseConfig::default()
            .with_log_level(Severity::Trace)
            .with_log_sink(LogSink::Stdout)
            .with_id_strategy(IdStrategy::Sequential);
        assert_eq!(config.log_level, Some(Severity::Trace));
        assert_eq!(config.log_sink, LogSink::Stdout);
        assert_eq!(config.id_strategy, IdStrategy::Sequential);
    }
}
