//! Author use-case service.
//!
//! # Responsibility
//! - Provide author entry points that take plain strings.
//! - Log every write outcome.
//!
//! # Invariants
//! - Every write goes through `AuthorRepository`, so name uniqueness and
//!   field rules are always enforced.

use crate::model::author::{Author, AuthorId, AuthorPatch, NewAuthor};
use crate::repo::author_repo::{AuthorListQuery, AuthorRepository};
use crate::repo::{RepoError, RepoResult};
use crate::service::log_write;

/// Use-case service wrapper for author persistence.
pub struct AuthorService<R: AuthorRepository> {
    repo: R,
}

impl<R: AuthorRepository> AuthorService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates an author. Fails with `RepoError::Validation` when a field is
    /// invalid or the name is taken.
    pub fn create_author(
        &self,
        name: impl Into<String>,
        phone_number: impl Into<String>,
    ) -> RepoResult<Author> {
        let result = NewAuthor::new(name, phone_number)
            .map_err(RepoError::from)
            .and_then(|author| self.repo.create_author(&author));
        log_write("author_create", &result, |author| author.id);
        result
    }

    pub fn get_author(&self, id: AuthorId) -> RepoResult<Option<Author>> {
        self.repo.get_author(id)
    }

    pub fn find_author_by_name(&self, name: &str) -> RepoResult<Option<Author>> {
        self.repo.find_author_by_name(name)
    }

    pub fn list_authors(&self, query: &AuthorListQuery) -> RepoResult<Vec<Author>> {
        self.repo.list_authors(query)
    }

    pub fn rename_author(&self, id: AuthorId, name: impl Into<String>) -> RepoResult<Author> {
        self.update_author(
            id,
            &AuthorPatch {
                name: Some(name.into()),
                ..AuthorPatch::default()
            },
        )
    }

    pub fn change_phone_number(
        &self,
        id: AuthorId,
        phone_number: impl Into<String>,
    ) -> RepoResult<Author> {
        self.update_author(
            id,
            &AuthorPatch {
                phone_number: Some(phone_number.into()),
                ..AuthorPatch::default()
            },
        )
    }

    /// Applies a partial update; untouched fields are not re-validated.
    pub fn update_author(&self, id: AuthorId, patch: &AuthorPatch) -> RepoResult<Author> {
        let result = self.repo.update_author(id, patch);
        log_write("author_update", &result, |author| author.id);
        result
    }

    pub fn delete_author(&self, id: AuthorId) -> RepoResult<()> {
        let result = self.repo.delete_author(id);
        log_write("author_delete", &result, |_| id);
        result
    }
}
