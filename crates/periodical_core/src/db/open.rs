//! Connection bootstrap utilities for SQLite.
//!
//! # Responsibility
//! - Remember where the database file lives.
//! - Open and configure short-lived connections on demand.
//! - Apply the schema once when the database handle is created.
//!
//! # Invariants
//! - Returned connections have `foreign_keys=ON`.
//! - `Database` never caches a connection; callers drop what they open.

use super::schema::apply_schema;
use super::{DbError, DbResult};
use log::{debug, error, info};
use rusqlite::Connection;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Handle to one SQLite database file.
///
/// Cloning is cheap and does not open anything. Each repository call uses
/// [`Database::connect`] to get its own connection and closes it on return.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Database {
    path: PathBuf,
}

impl Database {
    /// Opens (creating if needed) a database file and applies the schema.
    ///
    /// # Side effects
    /// - Creates missing parent directories.
    /// - Emits `db_open` logging events with duration and status.
    pub fn open(path: impl AsRef<Path>) -> DbResult<Self> {
        let started_at = Instant::now();
        let path = path.as_ref().to_path_buf();
        info!(
            "event=db_open module=db status=start path={}",
            path.display()
        );

        match bootstrap(&path) {
            Ok(()) => {
                info!(
                    "event=db_open module=db status=ok path={} duration_ms={}",
                    path.display(),
                    started_at.elapsed().as_millis()
                );
                Ok(Self { path })
            }
            Err(err) => {
                error!(
                    "event=db_open module=db status=error path={} duration_ms={} error_code=db_bootstrap_failed error={}",
                    path.display(),
                    started_at.elapsed().as_millis(),
                    err
                );
                Err(err)
            }
        }
    }

    /// Path of the backing database file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Opens one configured connection for a single operation.
    pub fn connect(&self) -> DbResult<Connection> {
        let conn = match Connection::open(&self.path) {
            Ok(conn) => conn,
            Err(err) => {
                error!(
                    "event=db_connect module=db status=error path={} error_code=db_open_failed error={}",
                    self.path.display(),
                    err
                );
                return Err(err.into());
            }
        };
        configure_connection(&conn)?;
        debug!(
            "event=db_connect module=db status=ok path={}",
            self.path.display()
        );
        Ok(conn)
    }
}

fn bootstrap(path: &Path) -> DbResult<()> {
    if let Some(parent) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|source| DbError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let mut conn = Connection::open(path)?;
    configure_connection(&conn)?;
    apply_schema(&mut conn)?;
    Ok(())
}

fn configure_connection(conn: &Connection) -> DbResult<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(BUSY_TIMEOUT)?;
    Ok(())
}
