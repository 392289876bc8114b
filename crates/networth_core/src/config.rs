//! Process configuration for hosts embedding the core.
//!
//! Sources, highest priority first:
//! 1. `NETWORTH_*` environment variables (`NETWORTH_DB`, `NETWORTH_LOG_LEVEL`,
//!    `NETWORTH_LOG_DIR`, `NETWORTH_BUSY_TIMEOUT_MS`)
//! 2. `database.txt` in the config directory (database endpoint only)
//! 3. Built-in defaults
//!
//! # Invariants
//! - A loaded config always has a non-empty database path.
//! - Loading never opens the database.

use crate::db::DEFAULT_BUSY_TIMEOUT;
use crate::logging::default_log_level;
use figment::providers::{Env, Serialized};
use figment::Figment;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// File holding the database endpoint, relative to the config directory.
pub const DATABASE_ENDPOINT_FILE: &str = "database.txt";

pub const ENV_PREFIX: &str = "NETWORTH_";

const DATABASE_KEY: &str = "db";

#[derive(Debug)]
pub enum ConfigError {
    /// Endpoint file exists but could not be read.
    EndpointUnreadable {
        path: PathBuf,
        source: std::io::Error,
    },
    /// No endpoint file and no `NETWORTH_DB` override.
    MissingEndpoint { path: PathBuf },
    /// Endpoint resolved to an empty string.
    EmptyEndpoint,
    /// A layered value has the wrong shape (e.g. a non-numeric timeout).
    Figment(figment::Error),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EndpointUnreadable { path, source } => write!(
                f,
                "could not load database endpoint from `{}`: {source}",
                path.display()
            ),
            Self::MissingEndpoint { path } => write!(
                f,
                "no database endpoint: `{}` not found and {ENV_PREFIX}DB unset",
                path.display()
            ),
            Self::EmptyEndpoint => write!(f, "database endpoint is empty"),
            Self::Figment(err) => write!(f, "invalid configuration: {err}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::EndpointUnreadable { source, .. } => Some(source),
            Self::Figment(err) => Some(err),
            Self::MissingEndpoint { .. } | Self::EmptyEndpoint => None,
        }
    }
}

impl From<figment::Error> for ConfigError {
    fn from(value: figment::Error) -> Self {
        Self::Figment(value)
    }
}

/// Resolved process configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// SQLite file path (or `:memory:`).
    #[serde(rename = "db", skip_serializing_if = "is_unset")]
    pub database_path: PathBuf,
    pub log_level: String,
    /// Absolute log directory; `None` keeps file logging off.
    pub log_dir: Option<PathBuf>,
    pub busy_timeout_ms: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_path: PathBuf::new(),
            log_level: default_log_level().to_string(),
            log_dir: None,
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT.as_millis() as u64,
        }
    }
}

impl AppConfig {
    /// Loads config from `dir` and the process environment.
    pub fn load(dir: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let dir = dir.as_ref();
        let figment = Self::figment(dir)?;
        if !figment.contains(DATABASE_KEY) {
            return Err(ConfigError::MissingEndpoint {
                path: dir.join(DATABASE_ENDPOINT_FILE),
            });
        }

        let config: Self = figment.extract()?;
        if is_unset(&config.database_path) {
            return Err(ConfigError::EmptyEndpoint);
        }

        Ok(config)
    }

    /// Builds the provider chain: defaults, endpoint file, environment.
    pub fn figment(dir: &Path) -> Result<Figment, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        let path = dir.join(DATABASE_ENDPOINT_FILE);
        match std::fs::read_to_string(&path) {
            Ok(endpoint) => {
                figment = figment.merge(Serialized::default(DATABASE_KEY, endpoint.trim()));
            }
            Err(err) if err.kind() == ErrorKind::NotFound => {}
            Err(source) => return Err(ConfigError::EndpointUnreadable { path, source }),
        }

        Ok(figment.merge(Env::prefixed(ENV_PREFIX)))
    }

    pub fn busy_timeout(&self) -> Duration {
        Duration::from_millis(self.busy_timeout_ms)
    }
}

fn is_unset(path: &Path) -> bool {
    path.as_os_str().is_empty()
}
