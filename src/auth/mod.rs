pub mod password;
pub mod rbac;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::config::SecurityConfig;

pub use password::{hash_password, verify_password, PasswordError};

/// What a token may be used for. Checked on every decode so a reset token
/// can never stand in for an access token and vice versa.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
    Reset,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub email: String,
    pub role: i32,
    pub typ: TokenKind,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("token expired")]
    Expired,

    #[error("invalid token: {0}")]
    Invalid(String),

    #[error("token signing failed: {0}")]
    Signing(String),

    #[error("missing secret: {0}")]
    MissingSecret(&'static str),
}

struct SigningKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl SigningKeys {
    fn from_secret(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }
}

/// Issues and verifies access, refresh and password-reset tokens.
///
/// Access and reset tokens share the access secret; refresh tokens use their
/// own secret so a leaked access secret cannot mint long-lived sessions.
pub struct TokenService {
    access: SigningKeys,
    refresh: SigningKeys,
    access_ttl: Duration,
    refresh_ttl: Duration,
    reset_ttl: Duration,
}

impl TokenService {
    pub fn new(security: &SecurityConfig) -> Result<Self, TokenError> {
        if security.jwt_secret.is_empty() {
            return Err(TokenError::MissingSecret("JWT_SECRET"));
        }
        if security.jwt_refresh_secret.is_empty() {
            return Err(TokenError::MissingSecret("JWT_REFRESH_SECRET"));
        }

        Ok(Self {
            access: SigningKeys::from_secret(&security.jwt_secret),
            refresh: SigningKeys::from_secret(&security.jwt_refresh_secret),
            access_ttl: Duration::seconds(security.access_token_ttl_secs),
            refresh_ttl: Duration::seconds(security.refresh_token_ttl_secs),
            reset_ttl: Duration::seconds(security.reset_token_ttl_secs),
        })
    }

    pub fn refresh_ttl(&self) -> Duration {
        self.refresh_ttl
    }

    pub fn issue_access(&self, user_id: Uuid, email: &str, role: i32) -> Result<String, TokenError> {
        self.issue_at(TokenKind::Access, user_id, email, role, Utc::now())
    }

    pub fn issue_refresh(&self, user_id: Uuid, email: &str, role: i32) -> Result<String, TokenError> {
        self.issue_at(TokenKind::Refresh, user_id, email, role, Utc::now())
    }

    pub fn issue_reset(&self, user_id: Uuid, email: &str, role: i32) -> Result<String, TokenError> {
        self.issue_at(TokenKind::Reset, user_id, email, role, Utc::now())
    }

    /// Sign a token as if it had been issued at `issued_at`.
    pub fn issue_at(
        &self,
        kind: TokenKind,
        user_id: Uuid,
        email: &str,
        role: i32,
        issued_at: DateTime<Utc>,
    ) -> Result<String, TokenError> {
        let claims = Claims {
            sub: user_id,
            email: email.to_string(),
            role,
            typ: kind,
            iat: issued_at.timestamp(),
            exp: (issued_at + self.ttl(kind)).timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.keys(kind).encoding)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    /// Verify signature, expiry and token kind.
    pub fn verify(&self, token: &str, kind: TokenKind) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        let data = decode::<Claims>(token, &self.keys(kind).decoding, &validation).map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => TokenError::Expired,
            _ => TokenError::Invalid(e.to_string()),
        })?;

        if data.claims.typ != kind {
            return Err(TokenError::Invalid(format!(
                "expected {:?} token, got {:?}",
                kind, data.claims.typ
            )));
        }

        Ok(data.claims)
    }

    /// Mint a fresh access token from already-verified refresh claims.
    ///
    /// The role comes from the refresh token, not from the store: a demoted
    /// user keeps the old role until the refresh token itself expires.
    pub fn access_from_refresh(&self, refresh_claims: &Claims) -> Result<String, TokenError> {
        self.issue_access(refresh_claims.sub, &refresh_claims.email, refresh_claims.role)
    }

    fn keys(&self, kind: TokenKind) -> &SigningKeys {
        match kind {
            TokenKind::Access | TokenKind::Reset => &self.access,
            TokenKind::Refresh => &self.refresh,
        }
    }

    fn ttl(&self, kind: TokenKind) -> Duration {
        match kind {
            TokenKind::Access => self.access_ttl,
            TokenKind::Refresh => self.refresh_ttl,
            TokenKind::Reset => self.reset_ttl,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;

    fn service() -> TokenService {
        TokenService::new(&AppConfig::for_tests().security).unwrap()
    }

    #[test]
    fn rejects_empty_secrets() {
        let mut security = AppConfig::for_tests().security;
        security.jwt_refresh_secret.clear();
        assert!(matches!(
            TokenService::new(&security),
            Err(TokenError::MissingSecret("JWT_REFRESH_SECRET"))
        ));
    }

    #[test]
    fn access_token_round_trips_claims() {
        let tokens = service();
        let id = Uuid::new_v4();
        let token = tokens.issue_access(id, "a@example.com", 2).unwrap();

        let claims = tokens.verify(&token, TokenKind::Access).unwrap();
        assert_eq!(claims.sub, id);
        assert_eq!(claims.email, "a@example.com");
        assert_eq!(claims.role, 2);
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn refresh_token_only_verifies_with_refresh_secret() {
        let tokens = service();
        let token = tokens.issue_refresh(Uuid::new_v4(), "a@example.com", 1).unwrap();

        let claims = tokens.verify(&token, TokenKind::Refresh).unwrap();
        assert_eq!(claims.exp - claims.iat, 7 * 24 * 3600);
        assert!(matches!(tokens.verify(&token, TokenKind::Access), Err(TokenError::Invalid(_))));
    }

    #[test]
    fn reset_token_is_not_an_access_token() {
        let tokens = service();
        let token = tokens.issue_reset(Uuid::new_v4(), "a@example.com", 1).unwrap();

        assert!(tokens.verify(&token, TokenKind::Reset).is_ok());
        assert!(matches!(tokens.verify(&token, TokenKind::Access), Err(TokenError::Invalid(_))));
    }

    #[test]
    fn expired_token_is_distinguished_from_malformed() {
        let tokens = service();
        let issued = Utc::now() - Duration::hours(2);
        let expired = tokens
            .issue_at(TokenKind::Access, Uuid::new_v4(), "a@example.com", 1, issued)
            .unwrap();

        assert!(matches!(tokens.verify(&expired, TokenKind::Access), Err(TokenError::Expired)));
        assert!(matches!(tokens.verify("not.a.token", TokenKind::Access), Err(TokenError::Invalid(_))));
    }

    #[test]
    fn tampered_token_is_invalid() {
        let tokens = service();
        let mut token = tokens.issue_access(Uuid::new_v4(), "a@example.com", 1).unwrap();
        token.push('x');
        assert!(matches!(tokens.verify(&token, TokenKind::Access), Err(TokenError::Invalid(_))));
    }

    #[test]
    fn refreshed_access_token_keeps_refresh_role() {
        let tokens = service();
        let refresh = tokens.issue_refresh(Uuid::new_v4(), "a@example.com", 3).unwrap();
        let claims = tokens.verify(&refresh, TokenKind::Refresh).unwrap();

        let access = tokens.access_from_refresh(&claims).unwrap();
        let access_claims = tokens.verify(&access, TokenKind::Access).unwrap();
        assert_eq!(access_claims.role, 3);
        assert_eq!(access_claims.sub, claims.sub);
    }
}
