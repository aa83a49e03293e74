//! Schema bootstrap for the authors/magazines/articles tables.
//!
//! # Responsibility
//! - Create the three tables and their foreign-key indexes.
//! - Wipe table contents for reseeding and test isolation.
//!
//! # Invariants
//! - `apply_schema` is idempotent; it never drops existing data.
//! - Deleting a parent row cascades to its articles at the storage layer.

use crate::db::DbResult;
use rusqlite::Connection;

const SCHEMA_SQL: &str = include_str!("schema.sql");

/// Tables owned by this crate, children first.
pub const TABLES: [&str; 3] = ["articles", "authors", "magazines"];

/// Applies the schema on the provided connection inside one transaction.
pub fn apply_schema(conn: &mut Connection) -> DbResult<()> {
    let tx = conn.transaction()?;
    tx.execute_batch(SCHEMA_SQL)?;
    tx.commit()?;
    Ok(())
}

/// Deletes every row and resets the autoincrement counters.
///
/// Does not open a transaction; run it inside the caller's so the wipe
/// commits together with whatever follows.
pub fn clear_all(conn: &Connection) -> DbResult<()> {
    for table in TABLES {
        conn.execute(&format!("DELETE FROM {table};"), [])?;
    }
    // sqlite_sequence only exists once an AUTOINCREMENT table saw an insert.
    if table_exists(conn, "sqlite_sequence")? {
        for table in TABLES {
            conn.execute("DELETE FROM sqlite_sequence WHERE name = ?1;", [table])?;
        }
    }
    Ok(())
}

/// Returns whether a table with `name` exists in the schema.
pub fn table_exists(conn: &Connection, name: &str) -> DbResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [name],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}
