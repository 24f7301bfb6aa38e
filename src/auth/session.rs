use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const SESSION_COOKIE: &str = "nietu.session-token";
pub const DEFAULT_MAX_AGE_SECS: i64 = 60 * 60;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Missing session secret")]
    MissingSecret,
    #[error("Malformed session token")]
    Malformed,
    #[error("Unsupported session token algorithm")]
    UnsupportedAlgorithm,
    #[error("Invalid session token signature")]
    BadSignature,
    #[error("Session expired")]
    Expired,
    #[error("Failed to sign session token: {0}")]
    Signing(jsonwebtoken::errors::Error),
}

impl From<jsonwebtoken::errors::Error> for SessionError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        match err.kind() {
            ErrorKind::InvalidSignature => SessionError::BadSignature,
            ErrorKind::InvalidAlgorithm => SessionError::UnsupportedAlgorithm,
            ErrorKind::ExpiredSignature => SessionError::Expired,
            _ => SessionError::Malformed,
        }
    }
}

/// The claims carried by a session token. `sub` is the identity
/// provider's user ID.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct SessionClaims {
    pub sub: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub iat: i64,
    pub exp: i64,
}

impl SessionClaims {
    pub fn new(sub: &str, issued_at: DateTime<Utc>, max_age: Duration) -> Self {
        Self {
            sub: sub.to_string(),
            name: None,
            email: None,
            image: None,
            iat: issued_at.timestamp(),
            exp: (issued_at + max_age).timestamp(),
        }
    }

    pub fn name(mut self, name: Option<&str>) -> Self {
        self.name = name.map(String::from);
        self
    }

    pub fn email(mut self, email: Option<&str>) -> Self {
        self.email = email.map(String::from);
        self
    }

    pub fn image(mut self, image: Option<&str>) -> Self {
        self.image = image.map(String::from);
        self
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("Guest")
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.exp <= now.timestamp()
    }

    pub fn expires(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }
}

fn secret_bytes(secret: &str) -> Result<&[u8], SessionError> {
    if secret.is_empty() {
        return Err(SessionError::MissingSecret);
    }
    Ok(secret.as_bytes())
}

/// Sign the claims into a compact HS256 token.
pub fn sign(claims: &SessionClaims, secret: &str) -> Result<String, SessionError> {
    let key = EncodingKey::from_secret(secret_bytes(secret)?);
    encode(&Header::new(Algorithm::HS256), claims, &key).map_err(SessionError::Signing)
}

/// Verify a token's signature and expiry and return its claims.
///
/// Expiry is checked against `now` as well as the system clock so the
/// gate stays deterministic under test.
pub fn verify(token: &str, secret: &str, now: DateTime<Utc>) -> Result<SessionClaims, SessionError> {
    let key = DecodingKey::from_secret(secret_bytes(secret)?);
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;

    let claims = decode::<SessionClaims>(token.trim(), &key, &validation)?.claims;
    if claims.is_expired(now) {
        return Err(SessionError::Expired);
    }

    Ok(claims)
}
