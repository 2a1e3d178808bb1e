//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `blog_core` linkage and storage bootstrap from a shell.
//! - Keep output deterministic `key=value` lines for quick sanity checks.
//!
//! # Environment
//! - `BLOG_DB_PATH`: SQLite file to open; in-memory when unset.
//! - `BLOG_LOG_DIR`: absolute log directory; logging stays off when unset.
//! - `BLOG_LOG_LEVEL`: log level, defaults to the build-mode default.

use blog_core::db::migrations::latest_version;
use blog_core::db::{open_db, open_db_in_memory};
use blog_core::{
    default_log_level, init_logging, AuthorListQuery, AuthorRepository, PostListQuery,
    PostRepository, SqliteAuthorRepository, SqlitePostRepository,
};
use log::info;
use std::error::Error;
use std::process::ExitCode;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("blog_cli error={err}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    if let Ok(log_dir) = std::env::var("BLOG_LOG_DIR") {
        let level =
            std::env::var("BLOG_LOG_LEVEL").unwrap_or_else(|_| default_log_level().to_string());
        init_logging(&level, &log_dir)?;
    }

    let conn = match std::env::var("BLOG_DB_PATH") {
        Ok(path) => open_db(path)?,
        Err(_) => open_db_in_memory()?,
    };

    let authors =
        SqliteAuthorRepository::try_new(&conn)?.list_authors(&AuthorListQuery::default())?;
    let posts = SqlitePostRepository::try_new(&conn)?.list_posts(&PostListQuery::default())?;
    info!(
        "event=cli_probe module=cli status=ok authors={} posts={}",
        authors.len(),
        posts.len()
    );

    println!("blog_core ping={}", blog_core::ping());
    println!("blog_core version={}", blog_core::core_version());
    println!("blog_core schema_version={}", latest_version());
    println!("blog_core authors={}", authors.len());
    println!("blog_core posts={}", posts.len());
    Ok(())
}
