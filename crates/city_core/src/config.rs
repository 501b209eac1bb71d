//! Core bootstrap configuration.
//!
//! # Responsibility
//! - Describe where the city database lives and how core logs.
//! - Turn that description into a ready, migrated connection.
//!
//! # Invariants
//! - An absent `db_path` means a private in-memory database.
//! - Logging is only initialised when `log_dir` is set.

use crate::db::{open_target, DbError, DbTarget};
use crate::logging::{default_log_level, init_logging};
use rusqlite::Connection;
use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const ENV_DB_PATH: &str = "CITY_CORE_DB_PATH";
pub const ENV_LOG_LEVEL: &str = "CITY_CORE_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "CITY_CORE_LOG_DIR";

/// Configuration failure while bootstrapping core.
#[derive(Debug)]
pub enum ConfigError {
    Logging(String),
    Db(DbError),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Logging(message) => write!(f, "logging setup failed: {message}"),
            Self::Db(err) => write!(f, "database setup failed: {err}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Logging(_) => None,
            Self::Db(err) => Some(err),
        }
    }
}

impl From<DbError> for ConfigError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

/// Settings needed to bring city core up.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CoreConfig {
    /// SQLite file; `None` selects an in-memory database.
    pub db_path: Option<PathBuf>,
    /// One of `trace|debug|info|warn|error`.
    pub log_level: String,
    /// Absolute directory for rolling log files.
    pub log_dir: Option<PathBuf>,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            db_path: None,
            log_level: default_log_level().to_string(),
            log_dir: None,
        }
    }
}

impl CoreConfig {
    /// Reads `CITY_CORE_*` variables from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary key lookup; blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let defaults = Self::default();

        Self {
            db_path: read(ENV_DB_PATH).map(PathBuf::from),
            log_level: read(ENV_LOG_LEVEL).unwrap_or(defaults.log_level),
            log_dir: read(ENV_LOG_DIR).map(PathBuf::from),
        }
    }

    /// Database target selected by this config.
    pub fn db_target(&self) -> DbTarget {
        match &self.db_path {
            Some(path) => DbTarget::File(path.clone()),
            None => DbTarget::Memory,
        }
    }

    /// Starts logging (when configured) and opens a migrated connection.
    pub fn open_connection(&self) -> Result<Connection, ConfigError> {
        if let Some(dir) = &self.log_dir {
            init_logging(&self.log_level, dir).map_err(ConfigError::Logging)?;
        }
        Ok(open_target(&self.db_target())?)
    }
}

#[cfg(test)]
mod tests {
    use super::{CoreConfig, ENV_DB_PATH, ENV_LOG_DIR, ENV_LOG_LEVEL};
    use crate::db::DbTarget;
    use crate::logging::default_log_level;
    use std::collections::HashMap;
    use std::path::PathBuf;

    #[test]
    fn defaults_to_memory_without_logging() {
        let config = CoreConfig::default();
        assert_eq!(config.db_target(), DbTarget::Memory);
        assert_eq!(config.log_dir, None);
        assert_eq!(config.log_level, default_log_level());
    }

    #[test]
    fn lookup_reads_known_keys_and_ignores_blank_values() {
        let vars = HashMap::from([
            (ENV_DB_PATH, "/var/lib/city/city.db"),
            (ENV_LOG_LEVEL, "warn"),
            (ENV_LOG_DIR, "  "),
        ]);
        let config = CoreConfig::from_lookup(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(
            config.db_target(),
            DbTarget::File(PathBuf::from("/var/lib/city/city.db"))
        );
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.log_dir, None);
    }

    #[test]
    fn open_connection_without_log_dir_returns_migrated_memory_db() {
        let conn = CoreConfig::default().open_connection().unwrap();
        let tables: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'city';",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(tables, 1);
    }
}
