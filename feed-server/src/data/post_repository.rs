use async_trait::async_trait;

use crate::domain::error::DomainError;
use crate::domain::post::{FeedPost, Post};

#[derive(Debug, Clone)]
pub(crate) struct NewPost {
    pub(crate) content: String,
    pub(crate) image_url: Option<String>,
    pub(crate) author_id: i64,
}

#[derive(Debug, Clone)]
pub(crate) struct PostPatch {
    pub(crate) content: Option<String>,
    pub(crate) image_url: Option<String>,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct Pagination {
    pub(crate) page: u32,
    pub(crate) page_size: u32,
}

#[async_trait]
pub(crate) trait PostRepository: Send + Sync {
    async fn create_post(&self, input: NewPost) -> Result<Post, DomainError>;
    async fn get_post(&self, id: i64) -> Result<Option<Post>, DomainError>;
    /// The post with aggregates and `is_liked` computed for `viewer_id`.
    async fn get_post_annotated(
        &self,
        id: i64,
        viewer_id: i64,
    ) -> Result<Option<FeedPost>, DomainError>;
    async fn update_post_owned(
        &self,
        post_id: i64,
        owner_id: i64,
        patch: PostPatch,
    ) -> Result<Option<Post>, DomainError>;
    /// Deletes the post together with its likes and comments, as explicit
    /// scoped statements in one transaction.
    async fn delete_post_cascading(&self, post_id: i64) -> Result<bool, DomainError>;
    async fn list_feed(
        &self,
        viewer_id: i64,
        pagination: Pagination,
    ) -> Result<Vec<FeedPost>, DomainError>;
    async fn total_posts(&self) -> Result<i64, DomainError>;
    /// Posts authored by the viewer's friends, newest first.
    async fn list_friends_feed(&self, viewer_id: i64) -> Result<Vec<FeedPost>, DomainError>;
}
