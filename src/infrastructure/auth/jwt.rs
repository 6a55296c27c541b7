//! JWT token issuing and verification (HS256)

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use rand::distributions::Alphanumeric;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use tracing::warn;

use crate::domain::user::UserId;
use crate::domain::DomainError;

/// Environment variable consulted when no secret is configured
pub const JWT_SECRET_ENV: &str = "JWT_SECRET";

const GENERATED_SECRET_LENGTH: usize = 64;

/// JWT claims structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtClaims {
    /// Subject (numeric user ID)
    pub sub: String,
    /// Issued at timestamp (Unix epoch)
    pub iat: i64,
    /// Expiration timestamp (Unix epoch)
    pub exp: i64,
}

impl JwtClaims {
    /// Create claims for a user expiring after the given number of hours
    ///
    /// Fails when the expiry does not fit in a timestamp.
    pub fn new(user_id: UserId, expiration_hours: u64) -> Result<Self, DomainError> {
        let now = Utc::now();
        let exp = i64::try_from(expiration_hours)
            .ok()
            .and_then(Duration::try_hours)
            .and_then(|ttl| now.checked_add_signed(ttl))
            .ok_or_else(|| {
                DomainError::internal(format!("Token lifetime of {} hours is out of range", expiration_hours))
            })?;

        Ok(Self {
            sub: user_id.to_string(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
        })
    }

    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }

    /// Parse the subject back into a user ID
    pub fn user_id(&self) -> Result<UserId, DomainError> {
        self.sub
            .parse::<i64>()
            .map(UserId::new)
            .map_err(|_| DomainError::invalid_token("Token subject is not a user id"))
    }
}

/// Configuration for JWT service
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Secret key for signing tokens
    pub secret: String,
    /// Token expiration time in hours
    pub expiration_hours: u64,
}

impl JwtConfig {
    pub fn new(secret: impl Into<String>, expiration_hours: u64) -> Self {
        Self {
            secret: secret.into(),
            expiration_hours,
        }
    }

    /// Build a config from an optional configured secret
    ///
    /// Falls back to `JWT_SECRET`, then to a random secret. Tokens signed with
    /// a random secret stop verifying after a restart.
    pub fn resolve(configured: Option<&str>, expiration_hours: u64) -> Self {
        let from_env = std::env::var(JWT_SECRET_ENV).ok();
        Self::new(resolve_secret(configured, from_env.as_deref()), expiration_hours)
    }
}

fn resolve_secret(configured: Option<&str>, from_env: Option<&str>) -> String {
    if let Some(secret) = configured.filter(|s| !s.is_empty()) {
        return secret.to_string();
    }

    if let Some(secret) = from_env.filter(|s| !s.is_empty()) {
        return secret.to_string();
    }

    warn!("No JWT secret configured; generated a random one, sessions will not survive a restart");

    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(GENERATED_SECRET_LENGTH)
        .map(char::from)
        .collect()
}

/// A signed token and the instant it stops being valid
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Trait for session token operations
pub trait JwtGenerator: Send + Sync + Debug {
    /// Sign a token identifying the user
    fn issue_token(&self, user_id: UserId) -> Result<IssuedToken, DomainError>;

    /// Check signature and expiry and return the embedded user ID
    ///
    /// The user may have been deleted since the token was issued.
    fn verify_token(&self, token: &str) -> Result<UserId, DomainError>;

    /// Get the token expiration time in hours
    fn expiration_hours(&self) -> u64;
}

/// HS256 JWT service
#[derive(Clone)]
pub struct JwtService {
    config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl Debug for JwtService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtService")
            .field("expiration_hours", &self.config.expiration_hours)
            .field("secret", &"[hidden]")
            .finish()
    }
}

impl JwtService {
    pub fn new(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    fn decode_claims(&self, token: &str) -> Result<JwtClaims, DomainError> {
        let validation = Validation::new(Algorithm::HS256);

        decode::<JwtClaims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| DomainError::invalid_token(e.to_string()))
    }
}

impl JwtGenerator for JwtService {
    fn issue_token(&self, user_id: UserId) -> Result<IssuedToken, DomainError> {
        let claims = JwtClaims::new(user_id, self.config.expiration_hours)?;

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| DomainError::internal(format!("Failed to sign token: {}", e)))?;

        let expires_at = DateTime::from_timestamp(claims.exp, 0)
            .ok_or_else(|| DomainError::internal("Token expiry out of range"))?;

        Ok(IssuedToken { token, expires_at })
    }

    fn verify_token(&self, token: &str) -> Result<UserId, DomainError> {
        self.decode_claims(token)?.user_id()
    }

    fn expiration_hours(&self) -> u64 {
        self.config.expiration_hours
    }
}
