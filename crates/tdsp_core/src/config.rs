//! Environment-driven core configuration.
//!
//! # Responsibility
//! - Resolve logging, collection strictness and schema-override settings.
//!
//! # Invariants
//! - Unset or blank variables fall back to defaults.
//! - Invalid values are rejected, never silently replaced.

use crate::generator::collector::CollectMode;
use crate::logging::{default_log_level, normalize_level, normalize_log_dir, LoggingError};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const ENV_LOG_LEVEL: &str = "TDSP_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "TDSP_LOG_DIR";
pub const ENV_COLLECT_MODE: &str = "TDSP_COLLECT_MODE";
pub const ENV_SCHEMA_PATH: &str = "TDSP_SCHEMA_PATH";

/// Resolved core settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    pub log_level: &'static str,
    /// Logging stays off when unset.
    pub log_dir: Option<PathBuf>,
    pub collect_mode: CollectMode,
    /// JSON registry replacing the built-in schema.
    pub schema_path: Option<PathBuf>,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_dir: None,
            collect_mode: CollectMode::default(),
            schema_path: None,
        }
    }
}

impl CoreConfig {
    /// Reads configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads configuration through `lookup` (variable name to raw value).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |name: &str| {
            lookup(name)
                .map(|raw| raw.trim().to_string())
                .filter(|raw| !raw.is_empty())
        };
        let mut config = Self::default();

        if let Some(raw) = read(ENV_LOG_LEVEL) {
            config.log_level = normalize_level(&raw).map_err(|err| ConfigError::Logging {
                variable: ENV_LOG_LEVEL,
                source: err,
            })?;
        }
        if let Some(raw) = read(ENV_LOG_DIR) {
            config.log_dir = Some(normalize_log_dir(&raw).map_err(|err| ConfigError::Logging {
                variable: ENV_LOG_DIR,
                source: err,
            })?);
        }
        if let Some(raw) = read(ENV_COLLECT_MODE) {
            config.collect_mode = raw.parse().map_err(ConfigError::InvalidCollectMode)?;
        }
        config.schema_path = read(ENV_SCHEMA_PATH).map(PathBuf::from);
        Ok(config)
    }
}

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    Logging {
        variable: &'static str,
        source: LoggingError,
    },
    InvalidCollectMode(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Logging { variable, source } => write!(f, "{variable}: {source}"),
            Self::InvalidCollectMode(message) => write!(f, "{ENV_COLLECT_MODE}: {message}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Logging { source, .. } => Some(source),
            Self::InvalidCollectMode(_) => None,
        }
    }
}
