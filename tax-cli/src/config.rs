use std::path::{Path, PathBuf};

use serde::Deserialize;
use tax_core::HISTORY_KEY;
use tax_core::db::StoreConfig;
pub use tax_core::db::DEFAULT_DATABASE;
use thiserror::Error;

/// Config file looked up in the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "tax-estimator.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config '{}': {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

impl ConfigError {
    pub fn path(&self) -> &Path {
        match self {
            ConfigError::Read { path, .. } | ConfigError::Parse { path, .. } => path,
        }
    }
}

/// Settings read from `tax-estimator.toml`.
///
/// Every field is optional in the file:
///
/// ```toml
/// history_key = "taxHistory"
/// brackets_file = "brackets.csv"
///
/// [store]
/// backend = "sqlite"
/// connection_string = "tax-history.db"
///
/// [logging]
/// level = "info"
/// file = "tax-estimator.log"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Key the history list is stored under.
    pub history_key: String,
    /// Optional CSV of bracket schedules applied over the built-in table.
    pub brackets_file: Option<PathBuf>,
    pub store: StoreConfig,
    pub logging: LoggingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            history_key: HISTORY_KEY.to_string(),
            brackets_file: None,
            store: StoreConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Bare level or full `EnvFilter` directive.
    pub level: String,
    /// Append-mode log file; none means stderr only.
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}

impl AppConfig {
    /// Loads configuration.
    ///
    /// With `explicit`, that file must exist. Without it,
    /// [`DEFAULT_CONFIG_FILE`] is read if present and defaults are used
    /// otherwise.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) => Self::from_path(path),
            None => {
                let path = Path::new(DEFAULT_CONFIG_FILE);
                if path.exists() {
                    Self::from_path(path)
                } else {
                    tracing::debug!("no {DEFAULT_CONFIG_FILE} found, using defaults");
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) => {
                tracing::warn!("Failed to read config at {:?}: {}", path, err);
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source: err,
                });
            }
        };

        match toml::from_str(&content) {
            Ok(config) => {
                tracing::debug!("loaded config from {:?}", path);
                Ok(config)
            }
            Err(err) => {
                tracing::warn!("Failed to parse config at {:?}: {}", path, err);
                Err(ConfigError::Parse {
                    path: path.to_path_buf(),
                    source: err,
                })
            }
        }
    }
}
