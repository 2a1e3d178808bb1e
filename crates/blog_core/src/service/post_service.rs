//! Post use-case service.
//!
//! # Responsibility
//! - Provide post entry points that accept the category as text.
//! - Log every write outcome.

use crate::model::post::{validate_category, NewPost, Post, PostId, PostPatch};
use crate::repo::post_repo::{PostListQuery, PostRepository};
use crate::repo::{RepoError, RepoResult};
use crate::service::log_write;

/// Use-case service wrapper for post persistence.
pub struct PostService<R: PostRepository> {
    repo: R,
}

impl<R: PostRepository> PostService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates a post from raw field values.
    ///
    /// # Errors
    /// `RepoError::Validation` for the first field that breaks its rule, in
    /// the order category, title, content, summary.
    pub fn create_post(
        &self,
        title: impl Into<String>,
        content: impl Into<String>,
        category: &str,
        summary: impl Into<String>,
    ) -> RepoResult<Post> {
        let result = validate_category(category)
            .and_then(|category| NewPost::new(title, content, category, summary))
            .map_err(RepoError::from)
            .and_then(|post| self.repo.create_post(&post));
        log_write("post_create", &result, |post| post.id);
        result
    }

    pub fn get_post(&self, id: PostId) -> RepoResult<Option<Post>> {
        self.repo.get_post(id)
    }

    pub fn list_posts(&self, query: &PostListQuery) -> RepoResult<Vec<Post>> {
        self.repo.list_posts(query)
    }

    /// Applies a partial update; untouched fields are not re-validated.
    pub fn update_post(&self, id: PostId, patch: &PostPatch) -> RepoResult<Post> {
        let result = self.repo.update_post(id, patch);
        log_write("post_update", &result, |post| post.id);
        result
    }

    pub fn delete_post(&self, id: PostId) -> RepoResult<()> {
        let result = self.repo.delete_post(id);
        log_write("post_delete", &result, |_| id);
        result
    }
}
