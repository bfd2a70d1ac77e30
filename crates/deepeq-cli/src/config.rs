use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// How results are printed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Errors that can occur while loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read config {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config syntax: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config value: {0}")]
    Invalid(String),
}

/// Leaf-comparison settings and output preferences, read from TOML.
///
/// Every field is optional in the file; missing ones take their defaults.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompareConfig {
    /// Numbers whose absolute difference is at most this compare equal.
    pub number_tolerance: f64,
    /// Compare strings case-insensitively.
    pub ignore_case: bool,
    /// Output format when `--format` is not given.
    pub format: OutputFormat,
}

impl Default for CompareConfig {
    fn default() -> Self {
        Self {
            number_tolerance: 0.0,
            ignore_case: false,
            format: OutputFormat::Text,
        }
    }
}

impl CompareConfig {
    /// A relaxed configuration for documents produced by different tools:
    /// small float noise and string case are ignored.
    pub fn lenient() -> Self {
        Self {
            number_tolerance: 1e-9,
            ignore_case: true,
            ..Default::default()
        }
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.number_tolerance.is_finite() || self.number_tolerance < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "number_tolerance must be a non-negative finite number, got {}",
                self.number_tolerance
            )));
        }
        Ok(())
    }
}
