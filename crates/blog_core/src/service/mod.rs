//! Use-case services for authors and posts.
//!
//! # Responsibility
//! - Turn plain caller input into validated write models.
//! - Emit metadata-only log events around every write.
//!
//! # Invariants
//! - Services never bypass repository validation.
//! - Service layer remains storage-agnostic.

pub mod author_service;
pub mod post_service;

use crate::repo::{RepoError, RepoResult};
use log::{error, info, warn};

/// Logs the outcome of one write. Only ids, field names and error classes are
/// emitted.
pub(crate) fn log_write<T>(
    event: &str,
    result: &RepoResult<T>,
    record_id: impl FnOnce(&T) -> i64,
) {
    match result {
        Ok(value) => info!(
            "event={event} module=service status=ok record_id={}",
            record_id(value)
        ),
        Err(RepoError::Validation(err)) => warn!(
            "event={event} module=service status=rejected field={}",
            err.field()
        ),
        Err(RepoError::NotFound { entity, id }) => warn!(
            "event={event} module=service status=not_found entity={entity} record_id={id}"
        ),
        Err(err) => error!(
            "event={event} module=service status=error error_code={}",
            error_code(err)
        ),
    }
}

fn error_code(err: &RepoError) -> &'static str {
    match err {
        RepoError::Validation(_) => "validation",
        RepoError::Db(_) => "db_failure",
        RepoError::NotFound { .. } => "not_found",
        RepoError::InvalidData(_) => "invalid_persisted_data",
        RepoError::UninitializedConnection { .. }
        | RepoError::MissingRequiredTable(_)
        | RepoError::MissingRequiredColumn { .. } => "schema_not_ready",
    }
}
