//! CLI configuration.
//!
//! Settings are read from a TOML file: the `--config` path when given,
//! otherwise `contrail/config.toml` under the platform config directory when
//! it exists, otherwise defaults. Command-line flags override them.
//!
//! ```toml
//! dataset = "data/airline_financials.csv"
//! base = "DAL"
//! rescale = true
//! concurrency = 4
//!
//! [edgar]
//! user_agent = "Example Research research@example.com"
//! max_retries = 3
//! retry_delay = 500
//! rate_limit = 100
//! ```

use contrail_data::edgar::EdgarConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default number of carriers whose filings are fetched at once.
const DEFAULT_CONCURRENCY: usize = 4;

/// Errors that can occur while loading configuration.
#[derive(Debug, Error)]
pub(crate) enum ConfigError {
    /// The file could not be read.
    #[error("Failed to read config {path}: {source}")]
    Read {
        /// File path
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },

    /// The file is not valid TOML for [`Config`].
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// A setting is out of range.
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// CLI settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct Config {
    /// Carrier financials CSV
    pub(crate) dataset: Option<PathBuf>,
    /// Default base carrier
    pub(crate) base: Option<String>,
    /// Rescale currency and traffic to millions and unit figures to cents
    pub(crate) rescale: bool,
    /// Carriers whose filings are fetched concurrently
    pub(crate) concurrency: usize,
    /// SEC EDGAR client settings
    pub(crate) edgar: EdgarConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dataset: None,
            base: None,
            rescale: true,
            concurrency: DEFAULT_CONCURRENCY,
            edgar: EdgarConfig::default(),
        }
    }
}

impl Config {
    /// Default config file location.
    ///
    /// - Linux: `~/.config/contrail/config.toml`
    /// - macOS: `~/Library/Application Support/contrail/config.toml`
    /// - Windows: `%APPDATA%\contrail\config.toml`
    pub(crate) fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("contrail").join("config.toml"))
    }

    /// Load from an explicit path, or from the default location if present.
    pub(crate) fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::from_file(path),
            None => match Self::default_path() {
                Some(path) if path.is_file() => Self::from_file(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml(&text)?;
        tracing::debug!(path = %path.display(), "Loaded config");
        Ok(config)
    }

    /// Parse and validate TOML text.
    pub(crate) fn from_toml(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.concurrency == 0 {
            return Err(ConfigError::Invalid("concurrency must be at least 1".into()));
        }
        if self.edgar.user_agent.trim().is_empty() {
            return Err(ConfigError::Invalid("edgar.user_agent must not be empty".into()));
        }
        Ok(())
    }
}
