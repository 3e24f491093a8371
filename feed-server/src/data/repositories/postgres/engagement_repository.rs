use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use super::{FOREIGN_KEY_VIOLATION, storage_error};
use crate::data::engagement_repository::{EngagementRepository, LikeToggle, NewComment};
use crate::domain::comment::Comment;
use crate::domain::error::DomainError;
use crate::domain::user::UserSummary;

#[derive(Debug, Clone)]
pub(crate) struct PostgresEngagementRepository {
    pool: PgPool,
}

impl PostgresEngagementRepository {
    pub(crate) fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct CommentRow {
    id: i64,
    post_id: i64,
    author_id: i64,
    author_username: String,
    content: String,
    created_at: DateTime<Utc>,
}

impl From<CommentRow> for Comment {
    fn from(row: CommentRow) -> Self {
        Comment {
            id: row.id,
            post_id: row.post_id,
            author: UserSummary {
                id: row.author_id,
                username: row.author_username,
            },
            content: row.content,
            created_at: row.created_at,
        }
    }
}

#[async_trait]
impl EngagementRepository for PostgresEngagementRepository {
    async fn toggle_like(&self, user_id: i64, post_id: i64) -> Result<LikeToggle, DomainError> {
        // Delete-then-insert in one transaction. If a concurrent toggle
        // wins the insert race, ON CONFLICT DO NOTHING turns the unique
        // violation into "already liked" instead of an error.
        let mut tx = self.pool.begin().await.map_err(storage_error)?;

        let deleted = sqlx::query("DELETE FROM likes WHERE user_id = $1 AND post_id = $2")
            .bind(user_id)
            .bind(post_id)
            .execute(&mut *tx)
            .await
            .map_err(storage_error)?;

        let is_liked = if deleted.rows_affected() > 0 {
            false
        } else {
            sqlx::query(
                r#"
                INSERT INTO likes (user_id, post_id)
                VALUES ($1, $2)
                ON CONFLICT (user_id, post_id) DO NOTHING
                "#,
            )
            .bind(user_id)
            .bind(post_id)
            .execute(&mut *tx)
            .await
            .map_err(map_engagement_db_error)?;
            true
        };

        let count: (i64,) = sqlx::query_as(r#"SELECT COUNT(*) FROM likes WHERE post_id = $1"#)
            .bind(post_id)
            .fetch_one(&mut *tx)
            .await
            .map_err(storage_error)?;

        tx.commit().await.map_err(storage_error)?;

        Ok(LikeToggle {
            is_liked,
            likes_count: count.0,
        })
    }

    async fn add_comment(&self, input: NewComment) -> Result<Comment, DomainError> {
        let row = sqlx::query_as::<_, CommentRow>(
            r#"
            WITH inserted AS (
                INSERT INTO comments (post_id, author_id, content)
                VALUES ($1, $2, $3)
                RETURNING id, post_id, author_id, content, created_at
            )
            SELECT i.id, i.post_id, i.author_id, u.username AS author_username,
                   i.content, i.created_at
            FROM inserted i
            JOIN users u ON u.id = i.author_id
            "#,
        )
        .bind(input.post_id)
        .bind(input.author_id)
        .bind(&input.content)
        .fetch_one(&self.pool)
        .await
        .map_err(map_engagement_db_error)?;

        Ok(Comment::from(row))
    }

    async fn list_comments(&self, post_id: i64) -> Result<Vec<Comment>, DomainError> {
        let rows = sqlx::query_as::<_, CommentRow>(
            r#"
            SELECT c.id, c.post_id, c.author_id, u.username AS author_username,
                   c.content, c.created_at
            FROM comments c
            JOIN users u ON u.id = c.author_id
            WHERE c.post_id = $1
            ORDER BY c.created_at DESC, c.id DESC
            "#,
        )
        .bind(post_id)
        .fetch_all(&self.pool)
        .await
        .map_err(storage_error)?;

        Ok(rows.into_iter().map(Comment::from).collect())
    }
}

fn map_engagement_db_error(err: sqlx::Error) -> DomainError {
    if let sqlx::Error::Database(db_err) = &err
        && db_err.code().as_deref() == Some(FOREIGN_KEY_VIOLATION)
    {
        return DomainError::NotFound("post".to_string());
    }
    storage_error(err)
}
