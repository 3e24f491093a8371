pub(crate) mod engagement_repository;
pub(crate) mod friendship_repository;
pub(crate) mod post_repository;
pub(crate) mod token_repository;
pub(crate) mod user_repository;

use crate::domain::error::DomainError;

/// Postgres error codes the repositories translate into domain errors.
pub(crate) const UNIQUE_VIOLATION: &str = "23505";
pub(crate) const FOREIGN_KEY_VIOLATION: &str = "23503";

pub(crate) fn storage_error(err: sqlx::Error) -> DomainError {
    DomainError::Storage(err.to_string())
}
