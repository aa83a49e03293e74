//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts per entity.
//! - Isolate SQLite query details from callers.
//! - Report validation and operational failures as distinct error kinds.
//!
//! # Invariants
//! - Every call opens its own connection and drops it before returning.
//! - Operational failures are logged before they are returned.
//! - Read paths reject stored rows that fail model validation.

use crate::db::{Database, DbError};
use crate::model::{EntityId, EntityState, ValidationError};
use log::error;
use rusqlite::ffi::{ErrorCode, SQLITE_CONSTRAINT_UNIQUE};
use rusqlite::{Connection, Params, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod article_repo;
pub mod author_repo;
pub mod magazine_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Error returned by every repository operation.
#[derive(Debug)]
pub enum RepoError {
    /// Input failed field validation; nothing was written.
    Validation(ValidationError),
    /// Connection or generic storage failure.
    Db(DbError),
    /// A unique constraint rejected the write (duplicate author name).
    UniqueViolation(String),
    /// A referenced row does not exist.
    MissingReference { table: &'static str, id: EntityId },
    /// The entity was never saved, so it has no id to act on.
    NotPersisted(&'static str),
    /// The entity was deleted through this instance and must not be reused.
    Detached(&'static str),
    /// The targeted row no longer exists.
    NotFound { entity: &'static str, id: EntityId },
    /// A stored row cannot be turned into a valid model.
    InvalidData(String),
}

impl RepoError {
    /// True for failures that come from storage rather than caller input.
    pub fn is_operational(&self) -> bool {
        matches!(
            self,
            Self::Db(_)
                | Self::UniqueViolation(_)
                | Self::MissingReference { .. }
                | Self::NotFound { .. }
                | Self::InvalidData(_)
        )
    }

    fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::Db(_) => "db",
            Self::UniqueViolation(_) => "unique_violation",
            Self::MissingReference { .. } => "missing_reference",
            Self::NotPersisted(_) => "not_persisted",
            Self::Detached(_) => "detached",
            Self::NotFound { .. } => "not_found",
            Self::InvalidData(_) => "invalid_data",
        }
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::UniqueViolation(message) => write!(f, "unique constraint violated: {message}"),
            Self::MissingReference { table, id } => {
                write!(f, "referenced row {table}.id={id} does not exist")
            }
            Self::NotPersisted(entity) => write!(f, "{entity} has not been saved yet"),
            Self::Detached(entity) => write!(f, "{entity} was deleted and cannot be reused"),
            Self::NotFound { entity, id } => write!(f, "{entity} not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for RepoError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        match value {
            DbError::Sqlite(err) => Self::from(err),
            other => Self::Db(other),
        }
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        if let rusqlite::Error::SqliteFailure(failure, message) = &value {
            if failure.code == ErrorCode::ConstraintViolation
                && failure.extended_code == SQLITE_CONSTRAINT_UNIQUE
            {
                return Self::UniqueViolation(
                    message.clone().unwrap_or_else(|| value.to_string()),
                );
            }
        }
        Self::Db(DbError::Sqlite(value))
    }
}

/// Runs one operation on a fresh connection and logs a failure.
///
/// The connection is closed when `op` returns, whatever the outcome.
pub(crate) fn with_connection<T>(
    db: &Database,
    event: &'static str,
    op: impl FnOnce(&mut Connection) -> RepoResult<T>,
) -> RepoResult<T> {
    let result = db
        .connect()
        .map_err(RepoError::from)
        .and_then(|mut conn| op(&mut conn));

    if let Err(err) = &result {
        error!(
            "event={} module=repo status=error error_kind={} error={}",
            event,
            err.kind(),
            err
        );
    }
    result
}

/// Collects every row of a query through `parse`.
pub(crate) fn collect_rows<T, P: Params>(
    conn: &Connection,
    sql: &str,
    params: P,
    parse: impl Fn(&Row<'_>) -> RepoResult<T>,
) -> RepoResult<Vec<T>> {
    let mut stmt = conn.prepare(sql)?;
    let mut rows = stmt.query(params)?;
    let mut items = Vec::new();
    while let Some(row) = rows.next()? {
        items.push(parse(row)?);
    }
    Ok(items)
}

/// Parses the first row of a query, if any.
pub(crate) fn first_row<T, P: Params>(
    conn: &Connection,
    sql: &str,
    params: P,
    parse: impl Fn(&Row<'_>) -> RepoResult<T>,
) -> RepoResult<Option<T>> {
    let mut stmt = conn.prepare(sql)?;
    let mut rows = stmt.query(params)?;
    match rows.next()? {
        Some(row) => Ok(Some(parse(row)?)),
        None => Ok(None),
    }
}

/// Returns whether `table` has a row with this id.
pub(crate) fn row_exists(conn: &Connection, table: &'static str, id: EntityId) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        &format!("SELECT EXISTS(SELECT 1 FROM {table} WHERE id = ?1);"),
        [id],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

/// Id of a persisted entity, or the error naming why there is none.
pub(crate) fn require_id(state: EntityState, entity: &'static str) -> RepoResult<EntityId> {
    match state {
        EntityState::Persisted(id) => Ok(id),
        EntityState::New => Err(RepoError::NotPersisted(entity)),
        EntityState::Detached => Err(RepoError::Detached(entity)),
    }
}

/// Maps a stored row that fails validation to `InvalidData`.
pub(crate) fn invalid_row(table: &str, id: EntityId, err: ValidationError) -> RepoError {
    RepoError::InvalidData(format!("{table}.id={id}: {err}"))
}
