use async_trait::async_trait;

use crate::domain::error::DomainError;
use crate::domain::user::User;

#[derive(Debug, Clone)]
pub(crate) struct UserCredentials {
    pub(crate) user: User,
    pub(crate) password_hash: String,
}

#[derive(Debug, Clone)]
pub(crate) struct NewUser {
    pub(crate) username: String,
    pub(crate) email: String,
    pub(crate) password_hash: String,
}

#[async_trait]
pub(crate) trait UserRepository: Send + Sync {
    async fn create_user(&self, input: NewUser) -> Result<User, DomainError>;
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, DomainError>;
    /// Looks the account up by username or email, whichever matches.
    async fn find_by_identifier(
        &self,
        identifier: &str,
    ) -> Result<Option<UserCredentials>, DomainError>;
    async fn email_exists(&self, email: &str) -> Result<bool, DomainError>;
    async fn username_exists(&self, username: &str) -> Result<bool, DomainError>;
}
