use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use super::{FOREIGN_KEY_VIOLATION, storage_error};
use crate::data::post_repository::{NewPost, Pagination, PostPatch, PostRepository};
use crate::domain::error::DomainError;
use crate::domain::post::{FeedPost, Post};
use crate::domain::user::UserSummary;

#[derive(Debug, Clone)]
pub(crate) struct PostgresPostRepository {
    pool: PgPool,
}

impl PostgresPostRepository {
    pub(crate) fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct PostRow {
    id: i64,
    content: String,
    image_url: Option<String>,
    author_id: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// A post joined with its author and engagement aggregates; `is_liked`
/// is computed against the viewer bound as `$1` in every query below.
#[derive(sqlx::FromRow)]
struct FeedPostRow {
    id: i64,
    content: String,
    image_url: Option<String>,
    author_id: i64,
    author_username: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    likes_count: i64,
    comments_count: i64,
    is_liked: bool,
}

const ANNOTATED_SELECT: &str = r#"
    SELECT
        p.id,
        p.content,
        p.image_url,
        p.author_id,
        u.username AS author_username,
        p.created_at,
        p.updated_at,
        (SELECT COUNT(*) FROM likes l WHERE l.post_id = p.id) AS likes_count,
        (SELECT COUNT(*) FROM comments c WHERE c.post_id = p.id) AS comments_count,
        EXISTS(
            SELECT 1 FROM likes l WHERE l.post_id = p.id AND l.user_id = $1
        ) AS is_liked
    FROM posts p
    JOIN users u ON u.id = p.author_id
"#;

impl From<FeedPostRow> for FeedPost {
    fn from(row: FeedPostRow) -> Self {
        FeedPost {
            id: row.id,
            content: row.content,
            image_url: row.image_url,
            author: UserSummary {
                id: row.author_id,
                username: row.author_username,
            },
            created_at: row.created_at,
            updated_at: row.updated_at,
            likes_count: row.likes_count,
            comments_count: row.comments_count,
            is_liked: row.is_liked,
        }
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn create_post(&self, input: NewPost) -> Result<Post, DomainError> {
        let row = sqlx::query_as::<_, PostRow>(
            r#"
            INSERT INTO posts (content, image_url, author_id)
            VALUES ($1, $2, $3)
            RETURNING id, content, image_url, author_id, created_at, updated_at
            "#,
        )
        .bind(&input.content)
        .bind(&input.image_url)
        .bind(input.author_id)
        .fetch_one(&self.pool)
        .await
        .map_err(map_post_db_error)?;

        map_row_to_post(row)
    }

    async fn get_post(&self, id: i64) -> Result<Option<Post>, DomainError> {
        let row = sqlx::query_as::<_, PostRow>(
            r#"
            SELECT id, content, image_url, author_id, created_at, updated_at
            FROM posts
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(storage_error)?;

        row.map(map_row_to_post).transpose()
    }

    async fn get_post_annotated(
        &self,
        id: i64,
        viewer_id: i64,
    ) -> Result<Option<FeedPost>, DomainError> {
        let sql = format!("{ANNOTATED_SELECT} WHERE p.id = $2");
        let row = sqlx::query_as::<_, FeedPostRow>(&sql)
            .bind(viewer_id)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(storage_error)?;

        Ok(row.map(FeedPost::from))
    }

    async fn update_post_owned(
        &self,
        post_id: i64,
        owner_id: i64,
        patch: PostPatch,
    ) -> Result<Option<Post>, DomainError> {
        let row = sqlx::query_as::<_, PostRow>(
            r#"
            UPDATE posts
            SET content = COALESCE($3, content),
                image_url = COALESCE($4, image_url),
                updated_at = NOW()
            WHERE id = $1 AND author_id = $2
            RETURNING id, content, image_url, author_id, created_at, updated_at
            "#,
        )
        .bind(post_id)
        .bind(owner_id)
        .bind(&patch.content)
        .bind(&patch.image_url)
        .fetch_optional(&self.pool)
        .await
        .map_err(storage_error)?;

        row.map(map_row_to_post).transpose()
    }

    async fn delete_post_cascading(&self, post_id: i64) -> Result<bool, DomainError> {
        // Scoped deletes instead of an engine-level cascade declaration.
        let mut tx = self.pool.begin().await.map_err(storage_error)?;

        sqlx::query("DELETE FROM likes WHERE post_id = $1")
            .bind(post_id)
            .execute(&mut *tx)
            .await
            .map_err(storage_error)?;

        sqlx::query("DELETE FROM comments WHERE post_id = $1")
            .bind(post_id)
            .execute(&mut *tx)
            .await
            .map_err(storage_error)?;

        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(post_id)
            .execute(&mut *tx)
            .await
            .map_err(storage_error)?;

        tx.commit().await.map_err(storage_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_feed(
        &self,
        viewer_id: i64,
        pagination: Pagination,
    ) -> Result<Vec<FeedPost>, DomainError> {
        let limit = pagination.page_size as i64;
        let offset = (pagination.page.saturating_sub(1) as i64) * limit;

        let sql = format!(
            "{ANNOTATED_SELECT} ORDER BY p.created_at DESC, p.id DESC LIMIT $2 OFFSET $3"
        );
        let rows = sqlx::query_as::<_, FeedPostRow>(&sql)
            .bind(viewer_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
            .map_err(storage_error)?;

        Ok(rows.into_iter().map(FeedPost::from).collect())
    }

    async fn total_posts(&self) -> Result<i64, DomainError> {
        let row: (i64,) = sqlx::query_as(r#"SELECT COUNT(*) FROM posts"#)
            .fetch_one(&self.pool)
            .await
            .map_err(storage_error)?;

        Ok(row.0)
    }

    async fn list_friends_feed(&self, viewer_id: i64) -> Result<Vec<FeedPost>, DomainError> {
        // The friendship row is stored once per unordered pair, so the
        // author must be matched from either position.
        let sql = format!(
            r#"{ANNOTATED_SELECT}
            WHERE EXISTS(
                SELECT 1 FROM friendships f
                WHERE (f.user_a = $1 AND f.user_b = p.author_id)
                   OR (f.user_b = $1 AND f.user_a = p.author_id)
            )
            ORDER BY p.created_at DESC, p.id DESC
            "#
        );
        let rows = sqlx::query_as::<_, FeedPostRow>(&sql)
            .bind(viewer_id)
            .fetch_all(&self.pool)
            .await
            .map_err(storage_error)?;

        Ok(rows.into_iter().map(FeedPost::from).collect())
    }
}

fn map_row_to_post(row: PostRow) -> Result<Post, DomainError> {
    Post::new(
        row.id,
        row.content,
        row.image_url,
        row.author_id,
        row.created_at,
        row.updated_at,
    )
    .map_err(|err| DomainError::Unexpected(err.to_string()))
}

fn map_post_db_error(err: sqlx::Error) -> DomainError {
    if let sqlx::Error::Database(db_err) = &err
        && db_err.code().as_deref() == Some(FOREIGN_KEY_VIOLATION)
    {
        return DomainError::NotFound("author".to_string());
    }
    storage_error(err)
}

#[cfg(test)]
mod tests {
    use super::ANNOTATED_SELECT;

    // `is_liked` must be computed against the bound viewer on every row,
    // never gated on whether the viewer authored the post.
    #[test]
    fn annotated_select_binds_the_viewer_unconditionally() {
        assert!(ANNOTATED_SELECT.contains("l.user_id = $1"));
        assert!(ANNOTATED_SELECT.contains("AS is_liked"));
        assert!(!ANNOTATED_SELECT.contains("author_id = $1"));
    }
}
