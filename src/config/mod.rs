//! config
//!
//! Configuration loading for consumers of the aggregator.
//!
//! The aggregation core never reads files or environment variables itself;
//! callers load a [`ForgeConfig`] (from here or elsewhere) and pass it in.
//!
//! # Locations
//!
//! Searched in order, first hit wins:
//! 1. An explicit path (e.g. `--config`)
//! 2. `$FORGESTATE_CONFIG` if set
//! 3. `$XDG_CONFIG_HOME/forgestate/config.toml`
//! 4. `~/.forgestate/config.toml`
//!
//! A missing file is not an error; defaults are used.
//!
//! # Example
//!
//! ```no_run
//! use forgestate::config::Config;
//!
//! let loaded = Config::load(None).unwrap();
//! if let Some(path) = &loaded.path {
//!     println!("using {}", path.display());
//! }
//! let config = loaded.config;
//! ```

pub mod schema;

pub use schema::{ForgeConfig, ProviderSettings, QueryLimits, TransportSettings, MAX_PAGE_SIZE};

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors from configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config{}: {message}", describe_path(.path))]
    ParseError {
        /// The file parsed, `None` for inline text
        path: Option<PathBuf>,
        message: String,
    },

    #[error("invalid config value: {0}")]
    InvalidValue(String),
}

fn describe_path(path: &Option<PathBuf>) -> String {
    path.as_ref()
        .map(|p| format!(" file '{}'", p.display()))
        .unwrap_or_default()
}

/// Result of loading configuration.
#[derive(Debug)]
pub struct ConfigLoadResult {
    /// The loaded (and validated) configuration.
    pub config: ForgeConfig,
    /// The file it came from, if any.
    pub path: Option<PathBuf>,
}

/// Configuration loader.
pub struct Config;

impl Config {
    /// Load configuration from `explicit` or the default locations.
    ///
    /// # Errors
    ///
    /// Returns an error if `explicit` cannot be read, or if a config file
    /// exists but cannot be parsed or fails validation.
    pub fn load(explicit: Option<&Path>) -> Result<ConfigLoadResult, ConfigError> {
        let path = match explicit {
            Some(path) => Some(path.to_path_buf()),
            None => Self::find_default(),
        };

        let config = match &path {
            Some(path) => Self::read(path)?,
            None => ForgeConfig::default(),
        };

        config.validate()?;
        Ok(ConfigLoadResult { config, path })
    }

    /// Parse and validate configuration from TOML text.
    pub fn from_toml_str(contents: &str) -> Result<ForgeConfig, ConfigError> {
        let config = Self::parse(contents, None)?;
        config.validate()?;
        Ok(config)
    }

    /// Canonical path of the user config file.
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".forgestate/config.toml"))
    }

    /// First existing file among the default locations.
    fn find_default() -> Option<PathBuf> {
        // 1. $FORGESTATE_CONFIG
        if let Ok(path) = std::env::var("FORGESTATE_CONFIG") {
            let path = PathBuf::from(path);
            if path.exists() {
                return Some(path);
            }
        }

        // 2. $XDG_CONFIG_HOME/forgestate/config.toml
        if let Ok(xdg_home) = std::env::var("XDG_CONFIG_HOME") {
            let path = PathBuf::from(xdg_home).join("forgestate/config.toml");
            if path.exists() {
                return Some(path);
            }
        }

        // 3. ~/.forgestate/config.toml
        Self::default_path().filter(|path| path.exists())
    }

    /// Read and parse a config file.
    fn read(path: &Path) -> Result<ForgeConfig, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        Self::parse(&contents, Some(path))
    }

    fn parse(contents: &str, path: Option<&Path>) -> Result<ForgeConfig, ConfigError> {
        toml::from_str(contents).map_err(|e| ConfigError::ParseError {
            path: path.map(Path::to_path_buf),
            message: e.to_string(),
        })
    }
}
