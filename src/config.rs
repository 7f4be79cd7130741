//! Shell configuration
//!
//! Settings for the interactive read loop. Values come from an optional YAML
//! file and are then overridden by command-line flags.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;
use tracing::Level;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("Invalid config: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Unknown log level: {0}")]
    InvalidLogLevel(String),

    #[error("Session terminator must not be empty")]
    EmptyTerminator,
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// How responses are written to the output stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One JSON object per line
    #[default]
    Compact,
    /// Indented JSON
    Pretty,
}

/// Read loop configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShellConfig {
    /// Line that ends the session
    pub terminator: String,
    /// Response format
    pub output: OutputFormat,
    /// Maximum tracing level written to stderr
    pub log_level: String,
    /// Blank lines produce no response when set
    pub skip_blank_lines: bool,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            terminator: "end".to_string(),
            output: OutputFormat::Compact,
            log_level: "warn".to_string(),
            skip_blank_lines: true,
        }
    }
}

impl ShellConfig {
    pub fn from_yaml_str(yaml: &str) -> ConfigResult<Self> {
        let config: ShellConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml_str(&contents)
    }

    /// Check values that serde cannot
    pub fn validate(&self) -> ConfigResult<()> {
        if self.terminator.trim().is_empty() {
            return Err(ConfigError::EmptyTerminator);
        }
        self.level()?;
        Ok(())
    }

    /// Parsed `log_level`
    pub fn level(&self) -> ConfigResult<Level> {
        Level::from_str(self.log_level.trim())
            .map_err(|_| ConfigError::InvalidLogLevel(self.log_level.clone()))
    }
}
