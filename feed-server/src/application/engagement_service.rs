use crate::data::engagement_repository::{EngagementRepository, LikeToggle, NewComment};
use crate::data::post_repository::PostRepository;
use crate::domain::comment::{AddCommentRequest, Comment};
use crate::domain::error::DomainError;

pub(crate) struct EngagementService<E: EngagementRepository, P: PostRepository> {
    engagement: E,
    posts: P,
}

impl<E: EngagementRepository, P: PostRepository> EngagementService<E, P> {
    pub(crate) fn new(engagement: E, posts: P) -> Self {
        Self { engagement, posts }
    }

    pub(crate) async fn toggle_like(
        &self,
        user_id: i64,
        post_id: i64,
    ) -> Result<LikeToggle, DomainError> {
        self.ensure_post_exists(post_id).await?;
        self.engagement.toggle_like(user_id, post_id).await
    }

    pub(crate) async fn add_comment(
        &self,
        author_id: i64,
        post_id: i64,
        req: AddCommentRequest,
    ) -> Result<Comment, DomainError> {
        let req = req.validate()?;
        self.ensure_post_exists(post_id).await?;

        let new_comment = NewComment {
            post_id,
            author_id,
            content: req.content,
        };
        self.engagement.add_comment(new_comment).await
    }

    pub(crate) async fn list_comments(&self, post_id: i64) -> Result<Vec<Comment>, DomainError> {
        self.ensure_post_exists(post_id).await?;
        self.engagement.list_comments(post_id).await
    }

    async fn ensure_post_exists(&self, post_id: i64) -> Result<(), DomainError> {
        self.posts
            .get_post(post_id)
            .await?
            .ok_or(DomainError::NotFound(format!("post id: {post_id}")))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use chrono::Utc;

    use super::EngagementService;
    use crate::data::engagement_repository::{EngagementRepository, LikeToggle, NewComment};
    use crate::data::post_repository::{NewPost, Pagination, PostPatch, PostRepository};
    use crate::domain::comment::{AddCommentRequest, Comment};
    use crate::domain::error::DomainError;
    use crate::domain::post::{FeedPost, Post};
    use crate::domain::user::UserSummary;

    /// In-memory likes/comments with real toggle semantics.
    #[derive(Clone, Default)]
    struct FakeEngagementRepo {
        likes: Arc<Mutex<HashSet<(i64, i64)>>>,
        comments: Arc<Mutex<Vec<Comment>>>,
    }

    #[async_trait]
    impl EngagementRepository for FakeEngagementRepo {
        async fn toggle_like(&self, user_id: i64, post_id: i64) -> Result<LikeToggle, DomainError> {
            let mut likes = self.likes.lock().expect("likes mutex poisoned");
            let key = (user_id, post_id);
            let is_liked = if likes.contains(&key) {
                likes.remove(&key);
                false
            } else {
                likes.insert(key);
                true
            };
            let likes_count = likes.iter().filter(|(_, p)| *p == post_id).count() as i64;
            Ok(LikeToggle {
                is_liked,
                likes_count,
            })
        }

        async fn add_comment(&self, input: NewComment) -> Result<Comment, DomainError> {
            let mut comments = self.comments.lock().expect("comments mutex poisoned");
            let comment = Comment {
                id: comments.len() as i64 + 1,
                post_id: input.post_id,
                author: UserSummary {
                    id: input.author_id,
                    username: "commenter".to_string(),
                },
                content: input.content,
                created_at: Utc::now(),
            };
            comments.push(comment.clone());
            Ok(comment)
        }

        async fn list_comments(&self, post_id: i64) -> Result<Vec<Comment>, DomainError> {
            let comments = self.comments.lock().expect("comments mutex poisoned");
            let mut found: Vec<Comment> = comments
                .iter()
                .filter(|c| c.post_id == post_id)
                .cloned()
                .collect();
            found.reverse();
            Ok(found)
        }
    }

    #[derive(Clone)]
    struct FakePostRepo {
        existing_posts: Arc<Mutex<HashSet<i64>>>,
    }

    impl FakePostRepo {
        fn with_post(post_id: i64) -> Self {
            let mut set = HashSet::new();
            set.insert(post_id);
            Self {
                existing_posts: Arc::new(Mutex::new(set)),
            }
        }
    }

    #[async_trait]
    impl PostRepository for FakePostRepo {
        async fn create_post(&self, _input: NewPost) -> Result<Post, DomainError> {
            unimplemented!("not used by EngagementService")
        }

        async fn get_post(&self, id: i64) -> Result<Option<Post>, DomainError> {
            let exists = self
                .existing_posts
                .lock()
                .expect("existing_posts mutex poisoned")
                .contains(&id);
            if !exists {
                return Ok(None);
            }
            Ok(Some(
                Post::new(id, "content", None, 1, Utc::now(), Utc::now())
                    .expect("sample post must be valid"),
            ))
        }

        async fn get_post_annotated(
            &self,
            _id: i64,
            _viewer_id: i64,
        ) -> Result<Option<FeedPost>, DomainError> {
            Ok(None)
        }

        async fn update_post_owned(
            &self,
            _post_id: i64,
            _owner_id: i64,
            _patch: PostPatch,
        ) -> Result<Option<Post>, DomainError> {
            Ok(None)
        }

        async fn delete_post_cascading(&self, _post_id: i64) -> Result<bool, DomainError> {
            Ok(false)
        }

        async fn list_feed(
            &self,
            _viewer_id: i64,
            _pagination: Pagination,
        ) -> Result<Vec<FeedPost>, DomainError> {
            Ok(Vec::new())
        }

        async fn total_posts(&self) -> Result<i64, DomainError> {
            Ok(0)
        }

        async fn list_friends_feed(&self, _viewer_id: i64) -> Result<Vec<FeedPost>, DomainError> {
            Ok(Vec::new())
        }
    }

    fn service(post_id: i64) -> EngagementService<FakeEngagementRepo, FakePostRepo> {
        EngagementService::new(FakeEngagementRepo::default(), FakePostRepo::with_post(post_id))
    }

    #[tokio::test]
    async fn toggle_like_is_an_involution() {
        let service = service(7);

        let first = service.toggle_like(1, 7).await.expect("first toggle");
        assert!(first.is_liked);
        assert_eq!(first.likes_count, 1);

        let second = service.toggle_like(1, 7).await.expect("second toggle");
        assert!(!second.is_liked);
        assert_eq!(second.likes_count, 0);
    }

    #[tokio::test]
    async fn likes_from_different_users_accumulate() {
        let service = service(7);

        service.toggle_like(1, 7).await.expect("toggle");
        let result = service.toggle_like(2, 7).await.expect("toggle");
        assert!(result.is_liked);
        assert_eq!(result.likes_count, 2);
    }

    #[tokio::test]
    async fn toggle_like_on_missing_post_is_not_found() {
        let service = service(7);

        let err = service
            .toggle_like(1, 99)
            .await
            .expect_err("post must be missing");
        assert!(matches!(err, DomainError::NotFound(_)));
    }

    #[tokio::test]
    async fn add_comment_rejects_whitespace_content() {
        let service = service(7);

        let err = service
            .add_comment(
                1,
                7,
                AddCommentRequest {
                    content: "   ".to_string(),
                },
            )
            .await
            .expect_err("empty comment must fail");
        assert!(matches!(err, DomainError::Validation { .. }));
    }

    #[tokio::test]
    async fn comments_list_newest_first_for_any_viewer() {
        let service = service(7);

        service
            .add_comment(
                1,
                7,
                AddCommentRequest {
                    content: "first".to_string(),
                },
            )
            .await
            .expect("comment");
        service
            .add_comment(
                2,
                7,
                AddCommentRequest {
                    content: "second".to_string(),
                },
            )
            .await
            .expect("comment");

        // list_comments is not scoped to the commenting user.
        let comments = service.list_comments(7).await.expect("list");
        assert_eq!(comments.len(), 2);
        assert_eq!(comments[0].content, "second");
        assert_eq!(comments[1].content, "first");
    }
}
