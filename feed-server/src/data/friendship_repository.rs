use async_trait::async_trait;

use crate::domain::error::DomainError;
use crate::domain::user::UserSummary;

#[async_trait]
pub(crate) trait FriendshipRepository: Send + Sync {
    /// Stores the unordered pair once, in canonical (low id, high id) form.
    async fn add_friendship(&self, user_id: i64, friend_id: i64) -> Result<(), DomainError>;
    async fn list_friend_ids(&self, user_id: i64) -> Result<Vec<i64>, DomainError>;
    async fn list_friends(&self, user_id: i64) -> Result<Vec<UserSummary>, DomainError>;
    async fn are_friends(&self, user_id: i64, other_id: i64) -> Result<bool, DomainError>;
}
