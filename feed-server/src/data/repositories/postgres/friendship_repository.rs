use async_trait::async_trait;
use sqlx::PgPool;

use super::{FOREIGN_KEY_VIOLATION, UNIQUE_VIOLATION, storage_error};
use crate::data::friendship_repository::FriendshipRepository;
use crate::domain::error::DomainError;
use crate::domain::user::UserSummary;

#[derive(Debug, Clone)]
pub(crate) struct PostgresFriendshipRepository {
    pool: PgPool,
}

impl PostgresFriendshipRepository {
    pub(crate) fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct FriendRow {
    id: i64,
    username: String,
}

#[async_trait]
impl FriendshipRepository for PostgresFriendshipRepository {
    async fn add_friendship(&self, user_id: i64, friend_id: i64) -> Result<(), DomainError> {
        // LEAST/GREATEST canonicalizes the pair so a duplicate attempt in
        // either direction hits the same unique index.
        sqlx::query(
            r#"
            INSERT INTO friendships (user_a, user_b)
            VALUES (LEAST($1, $2), GREATEST($1, $2))
            "#,
        )
        .bind(user_id)
        .bind(friend_id)
        .execute(&self.pool)
        .await
        .map_err(map_friendship_db_error)?;

        Ok(())
    }

    async fn list_friend_ids(&self, user_id: i64) -> Result<Vec<i64>, DomainError> {
        let rows: Vec<(i64,)> = sqlx::query_as(
            r#"
            SELECT CASE WHEN user_a = $1 THEN user_b ELSE user_a END
            FROM friendships
            WHERE user_a = $1 OR user_b = $1
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(storage_error)?;

        Ok(rows.into_iter().map(|(id,)| id).collect())
    }

    async fn list_friends(&self, user_id: i64) -> Result<Vec<UserSummary>, DomainError> {
        let rows = sqlx::query_as::<_, FriendRow>(
            r#"
            SELECT u.id, u.username
            FROM friendships f
            JOIN users u
              ON u.id = CASE WHEN f.user_a = $1 THEN f.user_b ELSE f.user_a END
            WHERE f.user_a = $1 OR f.user_b = $1
            ORDER BY u.username
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(storage_error)?;

        Ok(rows
            .into_iter()
            .map(|row| UserSummary {
                id: row.id,
                username: row.username,
            })
            .collect())
    }

    async fn are_friends(&self, user_id: i64, other_id: i64) -> Result<bool, DomainError> {
        let exists: (bool,) = sqlx::query_as(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM friendships
                WHERE user_a = LEAST($1, $2) AND user_b = GREATEST($1, $2)
            )
            "#,
        )
        .bind(user_id)
        .bind(other_id)
        .fetch_one(&self.pool)
        .await
        .map_err(storage_error)?;

        Ok(exists.0)
    }
}

fn map_friendship_db_error(err: sqlx::Error) -> DomainError {
    if let sqlx::Error::Database(db_err) = &err {
        match db_err.code().as_deref() {
            Some(UNIQUE_VIOLATION) => {
                return DomainError::AlreadyExists("friendship".to_string());
            }
            Some(FOREIGN_KEY_VIOLATION) => {
                return DomainError::NotFound("user".to_string());
            }
            _ => {}
        }
    }
    storage_error(err)
}
