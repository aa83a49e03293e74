//! SQLite connection provider and schema bootstrap entry points.
//!
//! # Responsibility
//! - Name the database file and hand out one fresh connection per operation.
//! - Apply the authors/magazines/articles schema before first use.
//! - Seed sample data for local exploration.
//!
//! # Invariants
//! - Every connection handed out has `foreign_keys=ON`, so cascades apply.
//! - No connection outlives the operation that opened it.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

mod open;
pub mod schema;
pub mod seed;

pub use open::Database;

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::Io { path, source } => {
                write!(f, "database path `{}` is unusable: {source}", path.display())
            }
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::Io { source, .. } => Some(source),
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
