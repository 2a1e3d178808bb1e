//! Author repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD over the `authors` table.
//! - Enforce name uniqueness with a lookup before every write that sets a
//!   name.
//!
//! # Invariants
//! - The lookup is not atomic with the write. The `UNIQUE` index on
//!   `authors.name` is the backstop, and its violation is reported as the
//!   same `Validation` error the lookup would have produced.
//! - Renaming an author to its current name is not a conflict.

use crate::model::author::{
    duplicate_name_error, validate_name as validate_name_field, Author, AuthorId, AuthorPatch,
    NewAuthor,
};
use crate::repo::{
    ensure_connection_ready, is_unique_violation, push_pagination, RepoError, RepoResult,
    NOW_MS_SQL,
};
use log::warn;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};

const AUTHOR_SELECT_SQL: &str = "SELECT
    id,
    name,
    phone_number,
    created_at,
    updated_at
FROM authors";

const AUTHOR_COLUMNS: &[&str] = &["id", "name", "phone_number", "created_at", "updated_at"];

/// Query options for listing authors, ordered by `id ASC`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthorListQuery {
    pub limit: Option<u32>,
    pub offset: u32,
}

/// Repository interface for author persistence.
pub trait AuthorRepository {
    /// Checks `name` against the field rule and against every stored author
    /// except `current`.
    fn validate_name(&self, name: &str, current: Option<AuthorId>) -> RepoResult<()>;
    fn create_author(&self, author: &NewAuthor) -> RepoResult<Author>;
    fn get_author(&self, id: AuthorId) -> RepoResult<Option<Author>>;
    fn find_author_by_name(&self, name: &str) -> RepoResult<Option<Author>>;
    fn list_authors(&self, query: &AuthorListQuery) -> RepoResult<Vec<Author>>;
    /// Applies `patch`, re-validating only the supplied fields.
    fn update_author(&self, id: AuthorId, patch: &AuthorPatch) -> RepoResult<Author>;
    fn delete_author(&self, id: AuthorId) -> RepoResult<()>;
}

/// SQLite-backed author repository.
pub struct SqliteAuthorRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteAuthorRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, "authors", AUTHOR_COLUMNS)?;
        Ok(Self { conn })
    }

    fn load(&self, id: AuthorId) -> RepoResult<Author> {
        self.get_author(id)?
            .ok_or(RepoError::NotFound { entity: "author", id })
    }

    fn map_write_error(err: rusqlite::Error, name: Option<&str>) -> RepoError {
        match name {
            Some(name) if is_unique_violation(&err) => {
                warn!(
                    "event=author_write module=repo status=conflict error_code=unique_name_race"
                );
                RepoError::Validation(duplicate_name_error(name))
            }
            _ => err.into(),
        }
    }
}

impl AuthorRepository for SqliteAuthorRepository<'_> {
    fn validate_name(&self, name: &str, current: Option<AuthorId>) -> RepoResult<()> {
        validate_name_field(name)?;

        let holder: Option<AuthorId> = self
            .conn
            .query_row(
                "SELECT id FROM authors WHERE name = ?1 LIMIT 1;",
                [name],
                |row| row.get(0),
            )
            .optional()?;

        match holder {
            Some(holder) if Some(holder) != current => Err(duplicate_name_error(name).into()),
            _ => Ok(()),
        }
    }

    fn create_author(&self, author: &NewAuthor) -> RepoResult<Author> {
        author.validate()?;
        self.validate_name(&author.name, None)?;

        self.conn
            .execute(
                "INSERT INTO authors (name, phone_number) VALUES (?1, ?2);",
                params![author.name.as_str(), author.phone_number.as_str()],
            )
            .map_err(|err| Self::map_write_error(err, Some(&author.name)))?;

        let id = self.conn.last_insert_rowid();
        self.get_author(id)?.ok_or_else(|| {
            RepoError::InvalidData(format!("inserted author {id} not found on read-back"))
        })
    }

    fn get_author(&self, id: AuthorId) -> RepoResult<Option<Author>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{AUTHOR_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        match rows.next()? {
            Some(row) => Ok(Some(parse_author_row(row)?)),
            None => Ok(None),
        }
    }

    fn find_author_by_name(&self, name: &str) -> RepoResult<Option<Author>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{AUTHOR_SELECT_SQL} WHERE name = ?1;"))?;
        let mut rows = stmt.query([name])?;
        match rows.next()? {
            Some(row) => Ok(Some(parse_author_row(row)?)),
            None => Ok(None),
        }
    }

    fn list_authors(&self, query: &AuthorListQuery) -> RepoResult<Vec<Author>> {
        let mut sql = format!("{AUTHOR_SELECT_SQL} ORDER BY id ASC");
        let mut bind_values: Vec<Value> = Vec::new();
        push_pagination(&mut sql, &mut bind_values, query.limit, query.offset);

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut authors = Vec::new();
        while let Some(row) = rows.next()? {
            authors.push(parse_author_row(row)?);
        }
        Ok(authors)
    }

    fn update_author(&self, id: AuthorId, patch: &AuthorPatch) -> RepoResult<Author> {
        patch.validate()?;
        if patch.is_empty() {
            return self.load(id);
        }
        if let Some(name) = patch.name.as_deref() {
            self.validate_name(name, Some(id))?;
        }

        let changed = self
            .conn
            .execute(
                &format!(
                    "UPDATE authors
                     SET
                        name = COALESCE(?2, name),
                        phone_number = COALESCE(?3, phone_number),
                        updated_at = {NOW_MS_SQL}
                     WHERE id = ?1;"
                ),
                params![id, patch.name.as_deref(), patch.phone_number.as_deref()],
            )
            .map_err(|err| Self::map_write_error(err, patch.name.as_deref()))?;

        if changed == 0 {
            return Err(RepoError::NotFound { entity: "author", id });
        }

        self.load(id)
    }

    fn delete_author(&self, id: AuthorId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM authors WHERE id = ?1;", [id])?;
        if changed == 0 {
            return Err(RepoError::NotFound { entity: "author", id });
        }
        Ok(())
    }
}

fn parse_author_row(row: &Row<'_>) -> RepoResult<Author> {
    let author = Author {
        id: row.get("id")?,
        name: row.get("name")?,
        phone_number: row.get("phone_number")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    };
    author.validate().map_err(|err| {
        RepoError::InvalidData(format!(
            "author {} has invalid `{}`: {err}",
            author.id,
            err.field()
        ))
    })?;
    Ok(author)
}
