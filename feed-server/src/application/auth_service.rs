use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{
        Error as PasswordHashError, PasswordHash, PasswordHasher, PasswordVerifier, SaltString,
        rand_core::OsRng,
    },
};

use crate::data::token_repository::TokenRepository;
use crate::data::user_repository::{NewUser, UserRepository};
use crate::domain::error::DomainError;
use crate::domain::user::{LoginRequest, RegisterRequest, User};
use crate::infrastructure::jwt::{Claims, JwtService, TokenKind};

#[derive(Debug, Clone)]
pub(crate) struct AuthResult {
    pub(crate) user: User,
    pub(crate) access_token: String,
    pub(crate) refresh_token: String,
}

pub(crate) struct AuthService<U: UserRepository, T: TokenRepository> {
    users: U,
    tokens: T,
    jwt: JwtService,
}

impl<U: UserRepository, T: TokenRepository> AuthService<U, T> {
    const DUMMY_PASSWORD_HASH: &'static str = "$argon2id$v=19$m=19456,t=2,p=1$MDEyMzQ1Njc4OWFiY2RlZg$gwN6hT1sNdk9kI95f7n2Gl3fL0qRmBf2Ffkj2r90/0M";

    pub(crate) fn new(users: U, tokens: T, jwt: JwtService) -> Self {
        Self { users, tokens, jwt }
    }

    pub(crate) async fn register(&self, req: RegisterRequest) -> Result<AuthResult, DomainError> {
        let req = req.validate()?;

        // Availability is reported per field, email first. The unique
        // indexes stay as the backstop for concurrent registrations.
        if self.users.email_exists(&req.email).await? {
            return Err(DomainError::AlreadyExists("email".to_string()));
        }
        if self.users.username_exists(&req.username).await? {
            return Err(DomainError::AlreadyExists("username".to_string()));
        }

        let password_hash = self.hash_password(&req.password)?;

        let new_user = NewUser {
            username: req.username,
            email: req.email,
            password_hash,
        };
        let user = self.users.create_user(new_user).await?;

        self.issue_pair(user).await
    }

    pub(crate) async fn login(&self, req: LoginRequest) -> Result<AuthResult, DomainError> {
        let req = req.validate()?;

        let user_creds = match self.users.find_by_identifier(&req.identifier).await? {
            Some(user_creds) => user_creds,
            None => {
                // Verify against a dummy hash so a missing account takes
                // as long as a wrong password.
                match self.verify_password(&req.password, Self::DUMMY_PASSWORD_HASH) {
                    Ok(()) | Err(DomainError::InvalidCredentials) => {}
                    Err(err) => return Err(err),
                }
                return Err(DomainError::InvalidCredentials);
            }
        };

        self.verify_password(&req.password, &user_creds.password_hash)?;

        self.issue_pair(user_creds.user).await
    }

    /// Mints a fresh access token from a refresh token. Access tokens are
    /// rejected here, as are revoked refresh tokens.
    pub(crate) async fn refresh(&self, refresh_token: &str) -> Result<String, DomainError> {
        let claims = self
            .jwt
            .verify(refresh_token, TokenKind::Refresh)
            .map_err(|_| DomainError::InvalidCredentials)?;

        if self.tokens.is_revoked(&claims.jti).await? {
            return Err(DomainError::InvalidCredentials);
        }

        self.jwt
            .issue(claims.sub, &claims.username, TokenKind::Access)
            .map_err(|err| DomainError::Unexpected(err.to_string()))
    }

    /// Verifies an access token and checks the revocation list; every
    /// protected route goes through this.
    pub(crate) async fn authenticate(&self, token: &str) -> Result<Claims, DomainError> {
        let claims = self
            .jwt
            .verify(token, TokenKind::Access)
            .map_err(|_| DomainError::InvalidCredentials)?;

        if self.tokens.is_revoked(&claims.jti).await? {
            return Err(DomainError::InvalidCredentials);
        }

        Ok(claims)
    }

    pub(crate) async fn logout(&self, jti: &str) -> Result<(), DomainError> {
        self.tokens.revoke(jti).await
    }

    pub(crate) async fn current_user(&self, user_id: i64) -> Result<User, DomainError> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or(DomainError::NotFound(format!("user id: {user_id}")))
    }

    async fn issue_pair(&self, user: User) -> Result<AuthResult, DomainError> {
        let pair = self
            .jwt
            .issue_pair(user.id, &user.username)
            .map_err(|err| DomainError::Unexpected(err.to_string()))?;

        Ok(AuthResult {
            user,
            access_token: pair.access_token,
            refresh_token: pair.refresh_token,
        })
    }

    pub(crate) fn hash_password(&self, raw_password: &str) -> Result<String, DomainError> {
        let salt = SaltString::generate(&mut OsRng);
        let password_hash = Self::argon2()?
            .hash_password(raw_password.as_bytes(), &salt)
            .map_err(|err| DomainError::Unexpected(err.to_string()))?;
        Ok(password_hash.to_string())
    }

    pub(crate) fn verify_password(
        &self,
        raw_password: &str,
        password_hash: &str,
    ) -> Result<(), DomainError> {
        let parsed_hash = PasswordHash::new(password_hash)
            .map_err(|err| DomainError::Unexpected(err.to_string()))?;
        Self::argon2()?
            .verify_password(raw_password.as_bytes(), &parsed_hash)
            .map_err(|err| match err {
                PasswordHashError::Password => DomainError::InvalidCredentials,
                _ => DomainError::Unexpected(err.to_string()),
            })?;

        Ok(())
    }

    fn argon2() -> Result<Argon2<'static>, DomainError> {
        let params = Params::new(19 * 1024, 2, 1, None)
            .map_err(|err| DomainError::Unexpected(err.to_string()))?;
        Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use chrono::{DateTime, Utc};

    use super::AuthService;
    use crate::data::token_repository::TokenRepository;
    use crate::data::user_repository::{NewUser, UserCredentials, UserRepository};
    use crate::domain::error::DomainError;
    use crate::domain::user::{LoginRequest, RegisterRequest, User};
    use crate::infrastructure::jwt::{JwtService, TokenKind};

    #[derive(Clone)]
    struct FakeUserRepo {
        created_input: Arc<Mutex<Option<NewUser>>>,
        login_credentials: Arc<Mutex<Option<UserCredentials>>>,
        taken_emails: Arc<Mutex<HashSet<String>>>,
        taken_usernames: Arc<Mutex<HashSet<String>>>,
        create_user_out: User,
    }

    impl FakeUserRepo {
        fn new(create_user_out: User) -> Self {
            Self {
                created_input: Arc::new(Mutex::new(None)),
                login_credentials: Arc::new(Mutex::new(None)),
                taken_emails: Arc::new(Mutex::new(HashSet::new())),
                taken_usernames: Arc::new(Mutex::new(HashSet::new())),
                create_user_out,
            }
        }

        fn set_login_credentials(&self, creds: Option<UserCredentials>) {
            *self
                .login_credentials
                .lock()
                .expect("login credentials mutex poisoned") = creds;
        }

        fn mark_email_taken(&self, email: &str) {
            self.taken_emails
                .lock()
                .expect("taken emails mutex poisoned")
                .insert(email.to_string());
        }

        fn mark_username_taken(&self, username: &str) {
            self.taken_usernames
                .lock()
                .expect("taken usernames mutex poisoned")
                .insert(username.to_string());
        }

        fn take_created_input(&self) -> Option<NewUser> {
            self.created_input
                .lock()
                .expect("created input mutex poisoned")
                .take()
        }
    }

    #[async_trait]
    impl UserRepository for FakeUserRepo {
        async fn create_user(&self, input: NewUser) -> Result<User, DomainError> {
            *self
                .created_input
                .lock()
                .expect("created input mutex poisoned") = Some(input);
            Ok(self.create_user_out.clone())
        }

        async fn find_by_id(&self, _id: i64) -> Result<Option<User>, DomainError> {
            Ok(Some(self.create_user_out.clone()))
        }

        async fn find_by_identifier(
            &self,
            _identifier: &str,
        ) -> Result<Option<UserCredentials>, DomainError> {
            Ok(self
                .login_credentials
                .lock()
                .expect("login credentials mutex poisoned")
                .clone())
        }

        async fn email_exists(&self, email: &str) -> Result<bool, DomainError> {
            Ok(self
                .taken_emails
                .lock()
                .expect("taken emails mutex poisoned")
                .contains(email))
        }

        async fn username_exists(&self, username: &str) -> Result<bool, DomainError> {
            Ok(self
                .taken_usernames
                .lock()
                .expect("taken usernames mutex poisoned")
                .contains(username))
        }
    }

    #[derive(Clone, Default)]
    struct FakeTokenRepo {
        revoked: Arc<Mutex<HashSet<String>>>,
    }

    #[async_trait]
    impl TokenRepository for FakeTokenRepo {
        async fn revoke(&self, jti: &str) -> Result<(), DomainError> {
            self.revoked
                .lock()
                .expect("revoked mutex poisoned")
                .insert(jti.to_string());
            Ok(())
        }

        async fn is_revoked(&self, jti: &str) -> Result<bool, DomainError> {
            Ok(self
                .revoked
                .lock()
                .expect("revoked mutex poisoned")
                .contains(jti))
        }

        async fn purge_older_than(&self, _cutoff: DateTime<Utc>) -> Result<u64, DomainError> {
            Ok(0)
        }
    }

    fn service(repo: FakeUserRepo) -> AuthService<FakeUserRepo, FakeTokenRepo> {
        AuthService::new(repo, FakeTokenRepo::default(), test_jwt())
    }

    #[tokio::test]
    async fn register_creates_user_and_returns_token_pair() {
        let repo = FakeUserRepo::new(sample_user(1, "valid_user", "valid@example.com"));
        let service = service(repo.clone());

        let req = RegisterRequest {
            username: "  valid_user  ".to_string(),
            email: "  VALID@EXAMPLE.COM  ".to_string(),
            password: "secure-password".to_string(),
        };

        let result = service.register(req).await.expect("register must succeed");

        assert_eq!(result.user.username, "valid_user");
        assert!(!result.access_token.is_empty());
        assert!(!result.refresh_token.is_empty());
        assert_ne!(result.access_token, result.refresh_token);

        let created = repo
            .take_created_input()
            .expect("create_user must be called");
        assert_eq!(created.username, "valid_user");
        assert_eq!(created.email, "valid@example.com");
        assert!(!created.password_hash.is_empty());
        assert_ne!(created.password_hash, "secure-password");
    }

    #[tokio::test]
    async fn register_reports_email_conflict_before_username() {
        let repo = FakeUserRepo::new(sample_user(1, "valid_user", "valid@example.com"));
        repo.mark_email_taken("valid@example.com");
        repo.mark_username_taken("valid_user");
        let service = service(repo);

        let req = RegisterRequest {
            username: "valid_user".to_string(),
            email: "valid@example.com".to_string(),
            password: "secure-password".to_string(),
        };

        let err = service.register(req).await.expect_err("must conflict");
        match err {
            DomainError::AlreadyExists(resource) => assert_eq!(resource, "email"),
            _ => panic!("expected AlreadyExists"),
        }
    }

    #[tokio::test]
    async fn register_reports_username_conflict() {
        let repo = FakeUserRepo::new(sample_user(1, "valid_user", "valid@example.com"));
        repo.mark_username_taken("valid_user");
        let service = service(repo);

        let req = RegisterRequest {
            username: "valid_user".to_string(),
            email: "other@example.com".to_string(),
            password: "secure-password".to_string(),
        };

        let err = service.register(req).await.expect_err("must conflict");
        match err {
            DomainError::AlreadyExists(resource) => assert_eq!(resource, "username"),
            _ => panic!("expected AlreadyExists"),
        }
    }

    #[tokio::test]
    async fn login_returns_invalid_credentials_for_missing_user() {
        let repo = FakeUserRepo::new(sample_user(1, "valid_user", "valid@example.com"));
        repo.set_login_credentials(None);
        let service = service(repo);

        let req = LoginRequest {
            identifier: "valid_user".to_string(),
            password: "some-password".to_string(),
        };

        let err = service.login(req).await.expect_err("login must fail");
        assert!(matches!(err, DomainError::InvalidCredentials));
    }

    #[tokio::test]
    async fn login_returns_invalid_credentials_for_wrong_password() {
        let repo = FakeUserRepo::new(sample_user(1, "valid_user", "valid@example.com"));
        let service = service(repo.clone());

        let hash = service
            .hash_password("correct-password")
            .expect("hash must be created");
        repo.set_login_credentials(Some(UserCredentials {
            user: sample_user(1, "valid_user", "valid@example.com"),
            password_hash: hash,
        }));

        let req = LoginRequest {
            identifier: "valid_user".to_string(),
            password: "wrong-password".to_string(),
        };

        let err = service.login(req).await.expect_err("login must fail");
        assert!(matches!(err, DomainError::InvalidCredentials));
    }

    #[tokio::test]
    async fn registered_password_logs_in() {
        let repo = FakeUserRepo::new(sample_user(1, "valid_user", "valid@example.com"));
        let service = service(repo.clone());

        let req = RegisterRequest {
            username: "valid_user".to_string(),
            email: "valid@example.com".to_string(),
            password: "correct-password".to_string(),
        };
        service.register(req).await.expect("register must succeed");

        let created = repo
            .take_created_input()
            .expect("create_user must be called");
        repo.set_login_credentials(Some(UserCredentials {
            user: sample_user(1, "valid_user", "valid@example.com"),
            password_hash: created.password_hash,
        }));

        let result = service
            .login(LoginRequest {
                identifier: "valid@example.com".to_string(),
                password: "correct-password".to_string(),
            })
            .await
            .expect("login must succeed");
        assert_eq!(result.user.id, 1);
    }

    #[tokio::test]
    async fn refresh_rejects_access_token() {
        let repo = FakeUserRepo::new(sample_user(1, "valid_user", "valid@example.com"));
        let service = service(repo);

        let access = test_jwt()
            .issue(1, "valid_user", TokenKind::Access)
            .expect("issue");

        let err = service
            .refresh(&access)
            .await
            .expect_err("access token must not refresh");
        assert!(matches!(err, DomainError::InvalidCredentials));
    }

    #[tokio::test]
    async fn refresh_mints_access_token_from_refresh_token() {
        let repo = FakeUserRepo::new(sample_user(1, "valid_user", "valid@example.com"));
        let service = service(repo);

        let refresh = test_jwt()
            .issue(1, "valid_user", TokenKind::Refresh)
            .expect("issue");

        let access = service.refresh(&refresh).await.expect("refresh");
        let claims = test_jwt()
            .verify(&access, TokenKind::Access)
            .expect("must be a valid access token");
        assert_eq!(claims.sub, 1);
    }

    #[tokio::test]
    async fn revoked_token_is_rejected_everywhere() {
        let repo = FakeUserRepo::new(sample_user(1, "valid_user", "valid@example.com"));
        let service = service(repo);

        let access = test_jwt()
            .issue(1, "valid_user", TokenKind::Access)
            .expect("issue");
        let claims = service
            .authenticate(&access)
            .await
            .expect("token must be valid before revocation");

        service.logout(&claims.jti).await.expect("logout");

        let err = service
            .authenticate(&access)
            .await
            .expect_err("revoked token must be rejected");
        assert!(matches!(err, DomainError::InvalidCredentials));
    }

    #[tokio::test]
    async fn double_logout_is_a_noop() {
        let repo = FakeUserRepo::new(sample_user(1, "valid_user", "valid@example.com"));
        let service = service(repo);

        service.logout("some-jti").await.expect("first logout");
        service.logout("some-jti").await.expect("second logout");
    }

    #[tokio::test]
    async fn revoked_refresh_token_cannot_mint_access() {
        let repo = FakeUserRepo::new(sample_user(1, "valid_user", "valid@example.com"));
        let service = service(repo);

        let refresh = test_jwt()
            .issue(1, "valid_user", TokenKind::Refresh)
            .expect("issue");
        let claims = test_jwt()
            .verify(&refresh, TokenKind::Refresh)
            .expect("verify");

        service.logout(&claims.jti).await.expect("logout");

        let err = service
            .refresh(&refresh)
            .await
            .expect_err("revoked refresh must fail");
        assert!(matches!(err, DomainError::InvalidCredentials));
    }

    fn sample_user(id: i64, username: &str, email: &str) -> User {
        User::new(id, username.to_string(), email.to_string(), Utc::now())
            .expect("sample user must be valid")
    }

    fn test_jwt() -> JwtService {
        JwtService::new("0123456789abcdef0123456789abcdef", 3600, 86400)
    }
}
