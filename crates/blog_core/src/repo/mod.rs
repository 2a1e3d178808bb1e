//! Repository layer contracts and SQLite implementations.
//!
//! # Responsibility
//! - Define per-record data access contracts.
//! - Keep SQL details out of the service layer.
//!
//! # Invariants
//! - Write paths validate every supplied field before any SQL mutation.
//! - Read paths reject invalid persisted rows instead of masking them.
//! - A failed write leaves the store unchanged.

use crate::db::migrations::latest_version;
use crate::db::DbError;
use crate::model::validation::ValidationError;
use rusqlite::types::Value;
use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod author_repo;
pub mod post_repo;

/// Current time as Unix epoch milliseconds, evaluated by SQLite.
pub(crate) const NOW_MS_SQL: &str = "CAST((julianday('now') - 2440587.5) * 86400000 AS INTEGER)";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error shared by author and post persistence.
#[derive(Debug)]
pub enum RepoError {
    /// A supplied field value was rejected; nothing was written.
    Validation(ValidationError),
    Db(DbError),
    NotFound {
        entity: &'static str,
        id: i64,
    },
    /// A stored row violates the model rules.
    InvalidData(String),
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
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound { entity, id } => write!(f, "{entity} not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "repository requires schema version {expected_version}, got {actual_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "repository requires table `{table}`")
            }
            Self::MissingRequiredColumn { table, column } => write!(
                f,
                "repository requires column `{column}` in table `{table}`"
            ),
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
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Checks that `conn` is migrated and exposes `table` with every column.
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

    for &column in columns {
        if !table_has_column(conn, table, column)? {
            return Err(RepoError::MissingRequiredColumn { table, column });
        }
    }

    Ok(())
}

/// Appends `LIMIT`/`OFFSET` clauses and their bind values.
pub(crate) fn push_pagination(
    sql: &mut String,
    bind_values: &mut Vec<Value>,
    limit: Option<u32>,
    offset: u32,
) {
    match limit {
        Some(limit) => {
            sql.push_str(" LIMIT ?");
            bind_values.push(Value::Integer(i64::from(limit)));
        }
        None if offset > 0 => sql.push_str(" LIMIT -1"),
        None => return,
    }
    if offset > 0 {
        sql.push_str(" OFFSET ?");
        bind_values.push(Value::Integer(i64::from(offset)));
    }
}

/// Returns whether `err` is a `UNIQUE` constraint failure.
pub(crate) fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(failure, _)
            if failure.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
    )
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

#[cfg(test)]
mod tests {
    use super::{is_unique_violation, push_pagination};
    use crate::db::open_db_in_memory;
    use rusqlite::types::Value;

    #[test]
    fn unique_violation_is_recognized_and_other_failures_are_not() {
        let conn = open_db_in_memory().unwrap();
        let insert = "INSERT INTO authors (name, phone_number) VALUES ('Ada', '5551234567');";
        conn.execute(insert, []).unwrap();

        let duplicate = conn.execute(insert, []).unwrap_err();
        assert!(is_unique_violation(&duplicate));

        let check = conn
            .execute(
                "INSERT INTO posts (title, content, category, summary)
                 VALUES ('Top', 'body', 'poetry', '');",
                [],
            )
            .unwrap_err();
        assert!(!is_unique_violation(&check));
    }

    #[test]
    fn pagination_without_limit_or_offset_adds_nothing() {
        let mut sql = String::from("SELECT 1");
        let mut binds = Vec::new();
        push_pagination(&mut sql, &mut binds, None, 0);
        assert_eq!(sql, "SELECT 1");
        assert!(binds.is_empty());
    }

    #[test]
    fn pagination_with_offset_only_uses_unbounded_limit() {
        let mut sql = String::new();
        let mut binds = Vec::new();
        push_pagination(&mut sql, &mut binds, None, 3);
        assert_eq!(sql, " LIMIT -1 OFFSET ?");
        assert_eq!(binds, vec![Value::Integer(3)]);
    }

    #[test]
    fn pagination_with_limit_and_offset_binds_both() {
        let mut sql = String::new();
        let mut binds = Vec::new();
        push_pagination(&mut sql, &mut binds, Some(2), 1);
        assert_eq!(sql, " LIMIT ? OFFSET ?");
        assert_eq!(binds, vec![Value::Integer(2), Value::Integer(1)]);
    }
}
