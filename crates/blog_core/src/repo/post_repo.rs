//! Post repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD over the `posts` table.
//! - Map `PostCategory` to its stored string form and back.
//!
//! # Invariants
//! - Stored `category` values outside the known set surface as
//!   `RepoError::InvalidData`, never as a default category.

use crate::model::post::{validate_category, NewPost, Post, PostCategory, PostId, PostPatch};
use crate::repo::{ensure_connection_ready, push_pagination, RepoError, RepoResult, NOW_MS_SQL};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};

const POST_SELECT_SQL: &str = "SELECT
    id,
    title,
    content,
    category,
    summary,
    created_at,
    updated_at
FROM posts";

const POST_COLUMNS: &[&str] = &[
    "id",
    "title",
    "content",
    "category",
    "summary",
    "created_at",
    "updated_at",
];

/// Query options for listing posts, ordered by `id ASC`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostListQuery {
    pub category: Option<PostCategory>,
    pub limit: Option<u32>,
    pub offset: u32,
}

/// Repository interface for post persistence.
pub trait PostRepository {
    fn create_post(&self, post: &NewPost) -> RepoResult<Post>;
    fn get_post(&self, id: PostId) -> RepoResult<Option<Post>>;
    fn list_posts(&self, query: &PostListQuery) -> RepoResult<Vec<Post>>;
    /// Applies `patch`, re-validating only the supplied fields.
    fn update_post(&self, id: PostId, patch: &PostPatch) -> RepoResult<Post>;
    fn delete_post(&self, id: PostId) -> RepoResult<()>;
}

/// SQLite-backed post repository.
pub struct SqlitePostRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqlitePostRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, "posts", POST_COLUMNS)?;
        Ok(Self { conn })
    }

    fn load(&self, id: PostId) -> RepoResult<Post> {
        self.get_post(id)?
            .ok_or(RepoError::NotFound { entity: "post", id })
    }
}

impl PostRepository for SqlitePostRepository<'_> {
    fn create_post(&self, post: &NewPost) -> RepoResult<Post> {
        post.validate()?;

        self.conn.execute(
            "INSERT INTO posts (title, content, category, summary)
             VALUES (?1, ?2, ?3, ?4);",
            params![
                post.title.as_str(),
                post.content.as_str(),
                post.category.as_str(),
                post.summary.as_str(),
            ],
        )?;

        let id = self.conn.last_insert_rowid();
        self.get_post(id)?.ok_or_else(|| {
            RepoError::InvalidData(format!("inserted post {id} not found on read-back"))
        })
    }

    fn get_post(&self, id: PostId) -> RepoResult<Option<Post>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{POST_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        match rows.next()? {
            Some(row) => Ok(Some(parse_post_row(row)?)),
            None => Ok(None),
        }
    }

    fn list_posts(&self, query: &PostListQuery) -> RepoResult<Vec<Post>> {
        let mut sql = format!("{POST_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(category) = query.category {
            sql.push_str(" AND category = ?");
            bind_values.push(Value::Text(category.as_str().to_string()));
        }

        sql.push_str(" ORDER BY id ASC");
        push_pagination(&mut sql, &mut bind_values, query.limit, query.offset);

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut posts = Vec::new();
        while let Some(row) = rows.next()? {
            posts.push(parse_post_row(row)?);
        }
        Ok(posts)
    }

    fn update_post(&self, id: PostId, patch: &PostPatch) -> RepoResult<Post> {
        patch.validate()?;
        if patch.is_empty() {
            return self.load(id);
        }

        let changed = self.conn.execute(
            &format!(
                "UPDATE posts
                 SET
                    title = COALESCE(?2, title),
                    content = COALESCE(?3, content),
                    category = COALESCE(?4, category),
                    summary = COALESCE(?5, summary),
                    updated_at = {NOW_MS_SQL}
                 WHERE id = ?1;"
            ),
            params![
                id,
                patch.title.as_deref(),
                patch.content.as_deref(),
                patch.category.map(PostCategory::as_str),
                patch.summary.as_deref(),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound { entity: "post", id });
        }

        self.load(id)
    }

    fn delete_post(&self, id: PostId) -> RepoResult<()> {
        let changed = self.conn.execute("DELETE FROM posts WHERE id = ?1;", [id])?;
        if changed == 0 {
            return Err(RepoError::NotFound { entity: "post", id });
        }
        Ok(())
    }
}

fn parse_post_row(row: &Row<'_>) -> RepoResult<Post> {
    let id: PostId = row.get("id")?;
    let category_text: String = row.get("category")?;
    let category = validate_category(&category_text).map_err(|_| {
        RepoError::InvalidData(format!(
            "invalid category `{category_text}` in posts.category for post {id}"
        ))
    })?;

    let post = Post {
        id,
        title: row.get("title")?,
        content: row.get("content")?,
        category,
        summary: row.get("summary")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    };
    post.validate().map_err(|err| {
        RepoError::InvalidData(format!(
            "post {id} has invalid `{}`: {err}",
            err.field()
        ))
    })?;
    Ok(post)
}
