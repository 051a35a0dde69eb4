//! Configuration loading and management for newsbrief.
//!
//! Loads settings from `newsbrief.toml` with environment variable overrides for
//! the worker count and log filter. Every field has a default, so a missing
//! file is not an error.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

const CONFIG_FILE: &str = "newsbrief.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("invalid value for {field}: {reason}")]
    Invalid { field: String, reason: String },
}

/// Summarisation engine tuning
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EngineConfig {
    /// Worker threads for phrase extraction; 0 picks `available_parallelism - 1`
    pub workers: usize,
    /// Capacity of both the phrase and the similarity cache
    pub cache_capacity: usize,
    /// Number of leading characters used as the phrase cache key
    pub phrase_key_chars: usize,
    /// Sentences scoring above this are treated as duplicates
    pub similarity_threshold: f64,
    /// Sentences compared per dedup batch
    pub dedup_batch_size: usize,
    /// Minimum processed/valid ratio for a full summary
    pub min_confidence: f64,
    /// Themes listed in the summary's lead line
    pub max_themes: usize,
    /// Sentences included in the summary body
    pub max_sentences: usize,
    /// Words ignored in addition to the built-in English stopwords
    pub extra_stopwords: Vec<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            workers: 0,
            cache_capacity: 1000,
            phrase_key_chars: 100,
            similarity_threshold: 0.6,
            dedup_batch_size: 10,
            min_confidence: 0.5,
            max_themes: 3,
            max_sentences: 3,
            extra_stopwords: Vec::new(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default `tracing` filter directive, e.g. "info" or "newsbrief=debug"
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub engine: EngineConfig,
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from the default location, falling back to defaults
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match Self::find_config_file() {
            Some(path) => Self::read_file(&path)?,
            None => Config::default(),
        };
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::read_file(path)?;
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    fn read_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Ok(workers) = std::env::var("NEWSBRIEF_WORKERS") {
            self.engine.workers = workers.trim().parse().map_err(|_| ConfigError::Invalid {
                field: "NEWSBRIEF_WORKERS".to_string(),
                reason: format!("expected a worker count, got {:?}", workers),
            })?;
        }
        if let Ok(level) = std::env::var("NEWSBRIEF_LOG") {
            self.logging.level = level;
        }
        Ok(())
    }

    /// Find the config file in standard locations
    fn find_config_file() -> Option<PathBuf> {
        let local_config = PathBuf::from(CONFIG_FILE);
        if local_config.exists() {
            return Some(local_config);
        }

        let home_config = dirs::home_dir()?
            .join(".config")
            .join("newsbrief")
            .join(CONFIG_FILE);
        home_config.exists().then_some(home_config)
    }

    /// Reject values the engine cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let engine = &self.engine;
        check_unit_interval("engine.similarity_threshold", engine.similarity_threshold)?;
        check_unit_interval("engine.min_confidence", engine.min_confidence)?;
        check_positive("engine.cache_capacity", engine.cache_capacity)?;
        check_positive("engine.phrase_key_chars", engine.phrase_key_chars)?;
        check_positive("engine.dedup_batch_size", engine.dedup_batch_size)?;
        Ok(())
    }
}

fn check_unit_interval(field: &str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field: field.to_string(),
            reason: format!("{} is outside [0, 1]", value),
        })
    }
}

fn check_positive(field: &str, value: usize) -> Result<(), ConfigError> {
    if value > 0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field: field.to_string(),
            reason: "must be greater than zero".to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.engine.cache_capacity, 1000);
        assert_eq!(config.engine.phrase_key_chars, 100);
        assert_eq!(config.engine.dedup_batch_size, 10);
        assert!((config.engine.similarity_threshold - 0.6).abs() < f64::EPSILON);
        assert!((config.engine.min_confidence - 0.5).abs() < f64::EPSILON);
        assert_eq!(config.logging.level, "info");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[engine]\nworkers = 2\nextra_stopwords = [\"reuters\"]\n\n[logging]\nlevel = \"debug\""
        )
        .unwrap();

        let config = Config::read_file(file.path()).unwrap();
        assert_eq!(config.engine.workers, 2);
        assert_eq!(config.engine.extra_stopwords, vec!["reuters".to_string()]);
        assert_eq!(config.engine.cache_capacity, 1000);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_parse_error() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[engine\nworkers = ").unwrap();
        assert!(matches!(
            Config::read_file(file.path()),
            Err(ConfigError::ParseError(_))
        ));
    }

    #[test]
    fn test_validate_rejects_bad_threshold() {
        let mut config = Config::default();
        config.engine.similarity_threshold = 1.5;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("similarity_threshold"));
    }

    #[test]
    fn test_validate_rejects_zero_capacity() {
        let mut config = Config::default();
        config.engine.cache_capacity = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { .. })
        ));
    }
}
