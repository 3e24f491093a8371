use crate::data::friendship_repository::FriendshipRepository;
use crate::domain::error::DomainError;
use crate::domain::user::UserSummary;

pub(crate) struct FriendService<R: FriendshipRepository> {
    repo: R,
}

impl<R: FriendshipRepository> FriendService<R> {
    pub(crate) fn new(repo: R) -> Self {
        Self { repo }
    }

    pub(crate) async fn add_friend(&self, user_id: i64, friend_id: i64) -> Result<(), DomainError> {
        if user_id == friend_id {
            return Err(DomainError::Validation {
                field: "friend_id",
                message: "cannot befriend yourself",
            });
        }
        if friend_id <= 0 {
            return Err(DomainError::Validation {
                field: "friend_id",
                message: "must be > 0",
            });
        }
        self.repo.add_friendship(user_id, friend_id).await
    }

    pub(crate) async fn list_friends(&self, user_id: i64) -> Result<Vec<UserSummary>, DomainError> {
        self.repo.list_friends(user_id).await
    }

    pub(crate) async fn list_friend_ids(&self, user_id: i64) -> Result<Vec<i64>, DomainError> {
        self.repo.list_friend_ids(user_id).await
    }

    pub(crate) async fn are_friends(&self, user_id: i64, other_id: i64) -> Result<bool, DomainError> {
        self.repo.are_friends(user_id, other_id).await
    }
}
