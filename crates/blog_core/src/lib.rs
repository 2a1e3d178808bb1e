//! Core record store for the blog: authors and posts with write-time
//! validation over SQLite.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::author::{
    validate_name, validate_phone_number, Author, AuthorId, AuthorPatch, NewAuthor,
};
pub use model::post::{
    validate_category, validate_content, validate_summary, validate_title, NewPost, Post,
    PostCategory, PostId, PostPatch,
};
pub use model::validation::ValidationError;
pub use repo::author_repo::{AuthorListQuery, AuthorRepository, SqliteAuthorRepository};
pub use repo::post_repo::{PostListQuery, PostRepository, SqlitePostRepository};
pub use repo::{RepoError, RepoResult};
pub use service::author_service::AuthorService;
pub use service::post_service::PostService;

/// Minimal health-check API.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
