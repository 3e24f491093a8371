use crate::data::post_repository::{NewPost, PostPatch, PostRepository};
use crate::domain::error::DomainError;
use crate::domain::post::{CreatePostRequest, FeedPost, Post, UpdatePostRequest};

pub(crate) struct PostService<R: PostRepository> {
    repo: R,
}

impl<R: PostRepository> PostService<R> {
    pub(crate) fn new(repo: R) -> Self {
        Self { repo }
    }

    pub(crate) async fn create_post(
        &self,
        author_id: i64,
        req: CreatePostRequest,
    ) -> Result<Post, DomainError> {
        let req = req.validate()?;

        let new_post = NewPost {
            content: req.content,
            image_url: req.image_url,
            author_id,
        };
        self.repo.create_post(new_post).await
    }

    pub(crate) async fn get_post(&self, viewer_id: i64, id: i64) -> Result<FeedPost, DomainError> {
        self.repo
            .get_post_annotated(id, viewer_id)
            .await?
            .ok_or(DomainError::NotFound(format!("post id: {id}")))
    }

    pub(crate) async fn update_post(
        &self,
        actor_user_id: i64,
        post_id: i64,
        req: UpdatePostRequest,
    ) -> Result<Post, DomainError> {
        let req = req.validate()?;

        // Missing and not-owned are reported differently, so look the
        // post up before the owner-scoped update.
        let original = self
            .repo
            .get_post(post_id)
            .await?
            .ok_or(DomainError::NotFound(format!("post id: {post_id}")))?;
        if original.author_id != actor_user_id {
            return Err(DomainError::Forbidden);
        }

        let patch = PostPatch {
            content: req.content,
            image_url: req.image_url,
        };
        self.repo
            .update_post_owned(post_id, actor_user_id, patch)
            .await?
            .ok_or(DomainError::NotFound(format!("post id: {post_id}")))
    }

    pub(crate) async fn delete_post(
        &self,
        actor_user_id: i64,
        post_id: i64,
    ) -> Result<(), DomainError> {
        let original_post = self
            .repo
            .get_post(post_id)
            .await?
            .ok_or(DomainError::NotFound(format!("post id: {post_id}")))?;

        if original_post.author_id != actor_user_id {
            return Err(DomainError::Forbidden);
        }

        let deleted = self.repo.delete_post_cascading(post_id).await?;
        if !deleted {
            return Err(DomainError::NotFound(format!("post id: {post_id}")));
        }
        Ok(())
    }
}
