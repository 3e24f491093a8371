use async_trait::async_trait;

use crate::domain::comment::Comment;
use crate::domain::error::DomainError;

#[derive(Debug, Clone, Copy)]
pub(crate) struct LikeToggle {
    pub(crate) is_liked: bool,
    pub(crate) likes_count: i64,
}

#[derive(Debug, Clone)]
pub(crate) struct NewComment {
    pub(crate) post_id: i64,
    pub(crate) author_id: i64,
    pub(crate) content: String,
}

#[async_trait]
pub(crate) trait EngagementRepository: Send + Sync {
    /// Removes the (user, post) like if present, creates it otherwise.
    /// The unique index on (user_id, post_id) keeps concurrent toggles
    /// from ever producing a duplicate row.
    async fn toggle_like(&self, user_id: i64, post_id: i64) -> Result<LikeToggle, DomainError>;
    async fn add_comment(&self, input: NewComment) -> Result<Comment, DomainError>;
    /// All comments on the post, newest first.
    async fn list_comments(&self, post_id: i64) -> Result<Vec<Comment>, DomainError>;
}
