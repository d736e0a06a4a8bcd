//! Process configuration for embedders and the CLI probe.
//!
//! # Responsibility
//! - Collect database, logging and backend identity settings in one place.
//!
//! # Invariants
//! - Missing settings fall back to defaults; loading never fails.
//! - Blank values are treated as missing.

use crate::db::BackendUser;
use crate::logging::default_log_level;
use std::path::PathBuf;

pub const ENV_DB_PATH: &str = "IMPULSE_DB_PATH";
pub const ENV_LOG_LEVEL: &str = "IMPULSE_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "IMPULSE_LOG_DIR";
pub const ENV_USER: &str = "IMPULSE_USER";
pub const ENV_USER_LEVEL: &str = "IMPULSE_USER_LEVEL";

const DEFAULT_USER: &str = "nobody";
const DEFAULT_USER_LEVEL: &str = "USER";

/// Settings for one process using the core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    /// SQLite database file; `None` selects an in-memory database.
    pub db_path: Option<PathBuf>,
    pub log_level: String,
    /// Absolute log directory; `None` leaves logging uninitialized.
    pub log_dir: Option<String>,
    pub backend_user: BackendUser,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            db_path: None,
            log_level: default_log_level().to_string(),
            log_dir: None,
            backend_user: BackendUser::new(DEFAULT_USER, DEFAULT_USER_LEVEL),
        }
    }
}

impl CoreConfig {
    /// Loads settings from `IMPULSE_*` environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads settings through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let defaults = Self::default();

        Self {
            db_path: read(ENV_DB_PATH).map(PathBuf::from),
            log_level: read(ENV_LOG_LEVEL).unwrap_or(defaults.log_level),
            log_dir: read(ENV_LOG_DIR),
            backend_user: BackendUser::new(
                read(ENV_USER).unwrap_or(defaults.backend_user.username),
                read(ENV_USER_LEVEL).unwrap_or(defaults.backend_user.level),
            ),
        }
    }
}
