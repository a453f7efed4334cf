//! Repository layer abstractions and SQLite implementations.
//!
//! # Responsibility
//! - Define one data-access contract per stored entity.
//! - Isolate SQL details from callers (presentation forms, CLI).
//! - Translate storage constraint violations into domain integrity errors.
//!
//! # Invariants
//! - Repositories operate only on connections opened via `db::open_db`;
//!   `try_new` rejects unmigrated or truncated schemas.
//! - Deletes are idempotent: a missing row is a no-op, never an error.
//! - Cascade policy is restrict: with foreign keys ON, deleting a row that
//!   dependents still reference fails with an integrity error.

use crate::db::migrations::latest_version;
use crate::db::DbError;
use rusqlite::ffi::{
    SQLITE_CONSTRAINT_FOREIGNKEY, SQLITE_CONSTRAINT_PRIMARYKEY, SQLITE_CONSTRAINT_UNIQUE,
};
use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod department_repo;
pub mod enrollment_repo;
pub mod formation_repo;
pub mod grade_repo;
pub mod student_repo;
pub mod subject_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Generic repository error for persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    /// A save or delete violated a uniqueness or referential constraint.
    /// Recoverable: the message names the offending field or relationship
    /// and is suitable for direct display to the user.
    Integrity(String),
    /// Any other storage failure; fatal for the in-progress operation.
    Db(DbError),
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Integrity(message) => write!(f, "{message}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection has schema version {actual_version} but {expected_version} is required; open it via db::open_db"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "required table `{table}` is missing")
            }
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "required column `{table}.{column}` is missing")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Constraint category behind a SQLite `ConstraintViolation`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ConstraintKind {
    Unique,
    ForeignKey,
    Other,
}

/// Classifies a rusqlite error as a constraint violation.
///
/// Returns the constraint category plus the engine's own message, or `None`
/// when the error is not a constraint violation and must propagate as-is.
pub(crate) fn classify_constraint(err: &rusqlite::Error) -> Option<(ConstraintKind, String)> {
    match err {
        rusqlite::Error::SqliteFailure(cause, message)
            if cause.code == rusqlite::ErrorCode::ConstraintViolation =>
        {
            let kind = match cause.extended_code {
                SQLITE_CONSTRAINT_UNIQUE | SQLITE_CONSTRAINT_PRIMARYKEY => ConstraintKind::Unique,
                SQLITE_CONSTRAINT_FOREIGNKEY => ConstraintKind::ForeignKey,
                _ => ConstraintKind::Other,
            };
            let detail = message
                .clone()
                .unwrap_or_else(|| "constraint violation".to_string());
            Some((kind, detail))
        }
        _ => None,
    }
}

/// Verifies that a connection carries the current schema and the table a
/// repository depends on, with all its columns.
pub(crate) fn ensure_connection_ready(
    conn: &Connection,
    table: &'static str,
    columns: &[&'static str],
) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    if !table_exists(conn, table)? {
        return Err(RepoError::MissingRequiredTable(table));
    }

    for column in columns {
        if !table_has_column(conn, table, column)? {
            return Err(RepoError::MissingRequiredColumn { table, column });
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}
