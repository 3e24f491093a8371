use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::error::DomainError;

/// Append-only revocation list for credential ids (jti).
#[async_trait]
pub(crate) trait TokenRepository: Send + Sync {
    /// Records the jti as revoked. Revoking an already-revoked jti is a
    /// no-op, so a double logout does not fail.
    async fn revoke(&self, jti: &str) -> Result<(), DomainError>;
    async fn is_revoked(&self, jti: &str) -> Result<bool, DomainError>;
    /// Out-of-band maintenance: rows older than the retention window can
    /// be dropped because their tokens have long expired on their own.
    async fn purge_older_than(&self, cutoff: DateTime<Utc>) -> Result<u64, DomainError>;
}
