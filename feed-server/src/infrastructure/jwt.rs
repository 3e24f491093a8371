use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub(crate) enum JwtError {
    #[error("token encode failed")]
    Encode(#[source] jsonwebtoken::errors::Error),

    #[error("token decode/validation failed")]
    Decode(#[source] jsonwebtoken::errors::Error),

    #[error("wrong token type: expected {expected}")]
    WrongType { expected: &'static str },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TokenKind {
    Access,
    Refresh,
}

impl TokenKind {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            TokenKind::Access => "access",
            TokenKind::Refresh => "refresh",
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub(crate) struct Claims {
    pub(crate) sub: i64,
    pub(crate) username: String,
    pub(crate) exp: i64,
    /// Unique token id, tracked by the revocation list.
    pub(crate) jti: String,
    pub(crate) token_type: String,
}

#[derive(Debug, Clone)]
pub(crate) struct TokenPair {
    pub(crate) access_token: String,
    pub(crate) refresh_token: String,
}

pub(crate) struct JwtService {
    secret: String,
    access_ttl_seconds: i64,
    refresh_ttl_seconds: i64,
}

impl JwtService {
    const DEFAULT_ACCESS_TTL_SECONDS: i64 = 60 * 60;
    const DEFAULT_REFRESH_TTL_SECONDS: i64 = 30 * 24 * 60 * 60;

    pub(crate) fn new(secret: &str, access_ttl_seconds: i64, refresh_ttl_seconds: i64) -> Self {
        let access_ttl_seconds = if access_ttl_seconds > 0 {
            access_ttl_seconds
        } else {
            Self::DEFAULT_ACCESS_TTL_SECONDS
        };
        let refresh_ttl_seconds = if refresh_ttl_seconds > 0 {
            refresh_ttl_seconds
        } else {
            Self::DEFAULT_REFRESH_TTL_SECONDS
        };

        JwtService {
            secret: secret.into(),
            access_ttl_seconds,
            refresh_ttl_seconds,
        }
    }

    pub(crate) fn issue(
        &self,
        user_id: i64,
        username: &str,
        kind: TokenKind,
    ) -> Result<String, JwtError> {
        let ttl = match kind {
            TokenKind::Access => self.access_ttl_seconds,
            TokenKind::Refresh => self.refresh_ttl_seconds,
        };
        let exp = (Utc::now() + Duration::seconds(ttl)).timestamp();

        let claims = Claims {
            sub: user_id,
            username: username.into(),
            exp,
            jti: Uuid::new_v4().to_string(),
            token_type: kind.as_str().to_string(),
        };

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(JwtError::Encode)
    }

    pub(crate) fn issue_pair(&self, user_id: i64, username: &str) -> Result<TokenPair, JwtError> {
        Ok(TokenPair {
            access_token: self.issue(user_id, username, TokenKind::Access)?,
            refresh_token: self.issue(user_id, username, TokenKind::Refresh)?,
        })
    }

    /// Decodes and checks signature and expiry, then enforces the token
    /// type so a refresh token can never pass as an access token (or the
    /// other way around).
    pub(crate) fn verify(&self, token: &str, expected: TokenKind) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 10;

        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .map_err(JwtError::Decode)?;

        if token_data.claims.token_type != expected.as_str() {
            return Err(JwtError::WrongType {
                expected: expected.as_str(),
            });
        }

        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::{JwtError, JwtService, TokenKind};

    fn service() -> JwtService {
        JwtService::new("0123456789abcdef0123456789abcdef", 3600, 86400)
    }

    #[test]
    fn access_token_round_trips() {
        let jwt = service();
        let token = jwt.issue(7, "alice", TokenKind::Access).expect("issue");

        let claims = jwt.verify(&token, TokenKind::Access).expect("verify");
        assert_eq!(claims.sub, 7);
        assert_eq!(claims.username, "alice");
        assert_eq!(claims.token_type, "access");
        assert!(!claims.jti.is_empty());
    }

    #[test]
    fn each_token_gets_a_unique_jti() {
        let jwt = service();
        let a = jwt.issue(7, "alice", TokenKind::Access).expect("issue");
        let b = jwt.issue(7, "alice", TokenKind::Access).expect("issue");

        let a = jwt.verify(&a, TokenKind::Access).expect("verify");
        let b = jwt.verify(&b, TokenKind::Access).expect("verify");
        assert_ne!(a.jti, b.jti);
    }

    #[test]
    fn refresh_token_is_rejected_where_access_is_expected() {
        let jwt = service();
        let refresh = jwt.issue(7, "alice", TokenKind::Refresh).expect("issue");

        let err = jwt
            .verify(&refresh, TokenKind::Access)
            .expect_err("must be rejected");
        assert!(matches!(err, JwtError::WrongType { expected: "access" }));
    }

    #[test]
    fn access_token_is_rejected_where_refresh_is_expected() {
        let jwt = service();
        let access = jwt.issue(7, "alice", TokenKind::Access).expect("issue");

        assert!(jwt.verify(&access, TokenKind::Refresh).is_err());
    }

    #[test]
    fn expired_token_is_rejected() {
        let mut issuer = service();
        // Backdate past the validation leeway.
        issuer.access_ttl_seconds = -60;
        let token = issuer.issue(7, "alice", TokenKind::Access).expect("issue");

        assert!(service().verify(&token, TokenKind::Access).is_err());
    }

    #[test]
    fn tampered_token_is_rejected() {
        let jwt = service();
        let token = jwt.issue(7, "alice", TokenKind::Access).expect("issue");
        let other = JwtService::new("ffffffffffffffffffffffffffffffff", 3600, 86400);

        assert!(other.verify(&token, TokenKind::Access).is_err());
    }
}
