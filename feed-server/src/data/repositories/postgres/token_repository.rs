use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use super::storage_error;
use crate::data::token_repository::TokenRepository;
use crate::domain::error::DomainError;

#[derive(Debug, Clone)]
pub(crate) struct PostgresTokenRepository {
    pool: PgPool,
}

impl PostgresTokenRepository {
    pub(crate) fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TokenRepository for PostgresTokenRepository {
    async fn revoke(&self, jti: &str) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO revoked_tokens (jti)
            VALUES ($1)
            ON CONFLICT (jti) DO NOTHING
            "#,
        )
        .bind(jti)
        .execute(&self.pool)
        .await
        .map_err(storage_error)?;

        Ok(())
    }

    async fn is_revoked(&self, jti: &str) -> Result<bool, DomainError> {
        let exists: (bool,) =
            sqlx::query_as(r#"SELECT EXISTS(SELECT 1 FROM revoked_tokens WHERE jti = $1)"#)
                .bind(jti)
                .fetch_one(&self.pool)
                .await
                .map_err(storage_error)?;

        Ok(exists.0)
    }

    async fn purge_older_than(&self, cutoff: DateTime<Utc>) -> Result<u64, DomainError> {
        let result = sqlx::query(r#"DELETE FROM revoked_tokens WHERE revoked_at < $1"#)
            .bind(cutoff)
            .execute(&self.pool)
            .await
            .map_err(storage_error)?;

        Ok(result.rows_affected())
    }
}
