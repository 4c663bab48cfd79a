//! Bearer tokens.
//!
//! Access and refresh tokens are HS256-signed JWTs. The token type is
//! carried in the claims so a refresh token is never accepted where an
//! access token is expected.

use crate::user::{Role, UserAccount};
use crate::AuthError;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use nest_commerce::ids::UserId;
use serde::{Deserialize, Serialize};

/// Default access token lifetime in minutes.
pub const DEFAULT_ACCESS_TTL_MINUTES: i64 = 30;
/// Default refresh token lifetime in days.
pub const DEFAULT_REFRESH_TTL_DAYS: i64 = 7;

/// Token type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenType {
    /// Short-lived token sent with every request.
    Access,
    /// Long-lived token exchanged for new access tokens.
    Refresh,
}

impl TokenType {
    /// Get token type as string.
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenType::Access => "access",
            TokenType::Refresh => "refresh",
        }
    }
}

/// Signed token payload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Claims {
    /// User id as a string.
    pub sub: String,
    pub username: String,
    pub role: Role,
    pub typ: TokenType,
    /// Issued-at, unix seconds.
    pub iat: i64,
    /// Expiry, unix seconds.
    pub exp: i64,
    /// Random token id.
    pub jti: String,
}

impl Claims {
    /// Get the user id from `sub`.
    pub fn user_id(&self) -> Result<UserId, AuthError> {
        self.sub
            .parse::<i64>()
            .map(UserId::new)
            .map_err(|_| AuthError::InvalidToken)
    }
}

/// Tokens handed out at login and registration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
}

/// A fresh access token from a refresh.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AccessToken {
    pub access_token: String,
    pub token_type: String,
}

/// Issues and verifies tokens with one shared secret.
#[derive(Clone)]
pub struct TokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    access_ttl_secs: i64,
    refresh_ttl_secs: i64,
}

impl TokenIssuer {
    /// Create an issuer with the default lifetimes.
    pub fn new(secret: &[u8]) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            access_ttl_secs: DEFAULT_ACCESS_TTL_MINUTES * 60,
            refresh_ttl_secs: DEFAULT_REFRESH_TTL_DAYS * 24 * 60 * 60,
        }
    }

    /// Set the access token lifetime.
    pub fn with_access_ttl_minutes(mut self, minutes: i64) -> Self {
        self.access_ttl_secs = minutes * 60;
        self
    }

    /// Set the refresh token lifetime.
    pub fn with_refresh_ttl_days(mut self, days: i64) -> Self {
        self.refresh_ttl_secs = days * 24 * 60 * 60;
        self
    }

    /// Sign a token of `typ` for `user`.
    pub fn issue(&self, user: &UserAccount, typ: TokenType) -> Result<String, AuthError> {
        let now = current_timestamp();
        let ttl = match typ {
            TokenType::Access => self.access_ttl_secs,
            TokenType::Refresh => self.refresh_ttl_secs,
        };
        let claims = Claims {
            sub: user.id.to_string(),
            username: user.username.clone(),
            role: user.role,
            typ,
            iat: now,
            exp: now + ttl,
            jti: generate_token_id(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| AuthError::Internal(e.to_string()))
    }

    /// Sign an access and a refresh token for `user`.
    pub fn issue_pair(&self, user: &UserAccount) -> Result<TokenPair, AuthError> {
        Ok(TokenPair {
            access_token: self.issue(user, TokenType::Access)?,
            refresh_token: self.issue(user, TokenType::Refresh)?,
            token_type: "bearer".to_string(),
        })
    }

    /// Sign a new access token for `user`.
    pub fn issue_access(&self, user: &UserAccount) -> Result<AccessToken, AuthError> {
        Ok(AccessToken {
            access_token: self.issue(user, TokenType::Access)?,
            token_type: "bearer".to_string(),
        })
    }

    /// Check a token's signature, expiry and type.
    pub fn verify(&self, token: &str, expected: TokenType) -> Result<Claims, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        let data = decode::<Claims>(token, &self.decoding, &validation)?;
        if data.claims.typ != expected {
            return Err(AuthError::InvalidToken);
        }
        Ok(data.claims)
    }
}

/// Generate a random URL-safe token id.
fn generate_token_id() -> String {
    use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
    use rand::Rng;

    let bytes: [u8; 16] = rand::thread_rng().gen();
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Get current Unix timestamp.
fn current_timestamp() -> i64 {
    chrono::Utc::now().timestamp()
}
