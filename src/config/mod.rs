//! config
//!
//! Configuration discovery and loading.
//!
//! # Locations
//!
//! The first file found wins:
//! 1. The path given with `--config` (must exist)
//! 2. `$METAX_ACCESS_CONFIG` if set
//! 3. `$XDG_CONFIG_HOME/metax-access/config.toml`
//! 4. `~/.metax.toml`
//!
//! No file at all is not an error; every setting can also be given on the
//! command line, which overrides the file (see [`MetaxConfig::merge`]).
//!
//! # Example
//!
//! ```no_run
//! use metax_access::config::Config;
//!
//! let config = Config::load(None).unwrap();
//! if let Some(url) = &config.metax().url {
//!     println!("Metax at {}", url);
//! }
//! ```

pub mod schema;

pub use schema::{ConfigFile, MetaxConfig};

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "METAX_ACCESS_CONFIG";

/// Errors from configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration file {path} not found.")]
    NotFound { path: PathBuf },

    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("invalid config value: {0}")]
    InvalidValue(String),
}

/// Loaded configuration.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Parsed file contents, defaults if no file was found
    pub file: ConfigFile,
    /// Path the configuration was loaded from
    path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from `explicit` or the default locations.
    ///
    /// # Errors
    ///
    /// - `NotFound` if `explicit` does not exist
    /// - `ReadError`/`ParseError` if a file exists but cannot be loaded
    /// - `InvalidValue` if a value fails validation
    pub fn load(explicit: Option<&Path>) -> Result<Config, ConfigError> {
        let path = Self::locate(explicit, |name| std::env::var(name).ok(), dirs::home_dir())?;
        match path {
            Some(path) => {
                let file = Self::read(&path)?;
                file.validate()?;
                tracing::debug!(path = %path.display(), "loaded configuration");
                Ok(Config {
                    file,
                    path: Some(path),
                })
            }
            None => Ok(Config::default()),
        }
    }

    /// Find the configuration file to use.
    ///
    /// `env` looks up environment variables and `home` is the user's home
    /// directory.
    fn locate(
        explicit: Option<&Path>,
        env: impl Fn(&str) -> Option<String>,
        home: Option<PathBuf>,
    ) -> Result<Option<PathBuf>, ConfigError> {
        // 1. --config
        if let Some(path) = explicit {
            if !path.is_file() {
                return Err(ConfigError::NotFound {
                    path: path.to_path_buf(),
                });
            }
            return Ok(Some(path.to_path_buf()));
        }

        // 2. $METAX_ACCESS_CONFIG
        if let Some(path) = env(CONFIG_ENV).filter(|p| !p.is_empty()) {
            let path = PathBuf::from(path);
            if path.is_file() {
                return Ok(Some(path));
            }
        }

        // 3. $XDG_CONFIG_HOME/metax-access/config.toml
        if let Some(xdg_home) = env("XDG_CONFIG_HOME").filter(|p| !p.is_empty()) {
            let path = PathBuf::from(xdg_home).join("metax-access/config.toml");
            if path.is_file() {
                return Ok(Some(path));
            }
        }

        // 4. ~/.metax.toml
        if let Some(home) = home {
            let path = home.join(".metax.toml");
            if path.is_file() {
                return Ok(Some(path));
            }
        }

        Ok(None)
    }

    /// Read and parse a config file.
    fn read(path: &Path) -> Result<ConfigFile, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;
        toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// The `[metax]` section.
    pub fn metax(&self) -> &MetaxConfig {
        &self.file.metax
    }

    /// Get the path the configuration was loaded from.
    pub fn loaded_from(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}
