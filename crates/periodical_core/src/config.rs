//! Runtime configuration shared by library callers and the CLI.
//!
//! # Invariants
//! - Defaults point at `articles.db` in the working directory.
//! - Without a log directory, logs go to stderr.

use crate::db::{Database, DbResult};
use crate::logging::{default_log_level, init_logging, LogTarget, LoggingError};
use std::path::PathBuf;

/// Default database file name, relative to the working directory.
pub const DEFAULT_DB_FILE: &str = "articles.db";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub db_path: PathBuf,
    pub log_level: String,
    /// Absolute directory for rolling log files.
    pub log_dir: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_FILE),
            log_level: default_log_level().to_string(),
            log_dir: None,
        }
    }
}

impl AppConfig {
    pub fn log_target(&self) -> LogTarget {
        match &self.log_dir {
            Some(dir) => LogTarget::Directory(dir.clone()),
            None => LogTarget::Stderr,
        }
    }

    pub fn init_logging(&self) -> Result<(), LoggingError> {
        init_logging(&self.log_level, self.log_target())
    }

    /// Opens the configured database, applying the schema if needed.
    pub fn open_database(&self) -> DbResult<Database> {
        Database::open(&self.db_path)
    }
}

#[cfg(test)]
mod tests {
    use super::{AppConfig, DEFAULT_DB_FILE};
    use crate::logging::LogTarget;
    use std::path::PathBuf;

    #[test]
    fn default_config_uses_articles_db_and_stderr() {
        let config = AppConfig::default();
        assert_eq!(config.db_path, PathBuf::from(DEFAULT_DB_FILE));
        assert_eq!(config.log_target(), LogTarget::Stderr);
    }

    #[test]
    fn log_dir_selects_file_target() {
        let config = AppConfig {
            log_dir: Some(PathBuf::from("/var/log/periodical")),
            ..AppConfig::default()
        };
        assert_eq!(
            config.log_target(),
            LogTarget::Directory(PathBuf::from("/var/log/periodical"))
        );
    }
}
