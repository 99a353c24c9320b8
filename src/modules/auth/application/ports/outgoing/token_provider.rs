use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq)]
pub enum TokenError {
    TokenExpired,
    TokenNotYetValid,
    InvalidIssuer,
    InvalidSignature,
    MalformedToken,
    EncodingError(String),
    RandomSourceFailed(String),
}

impl fmt::Display for TokenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenError::TokenExpired => write!(f, "Token has expired"),
            TokenError::TokenNotYetValid => write!(f, "Token is not yet valid"),
            TokenError::InvalidIssuer => write!(f, "Token issuer mismatch"),
            TokenError::InvalidSignature => write!(f, "Invalid token signature"),
            TokenError::MalformedToken => write!(f, "Malformed token"),
            TokenError::EncodingError(msg) => write!(f, "Token encoding error: {}", msg),
            TokenError::RandomSourceFailed(msg) => {
                write!(f, "Random source unavailable: {}", msg)
            }
        }
    }
}
impl Error for TokenError {}

/// Claims carried by a signed access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessClaims {
    pub sub: Uuid,
    pub iss: String,
    pub exp: i64,
    pub iat: i64,
    pub nbf: i64,
}

/// Issues short-lived signed access tokens and opaque refresh tokens.
pub trait TokenProvider: Send + Sync {
    fn sign_access_token(&self, user_id: Uuid, ttl: chrono::Duration)
        -> Result<String, TokenError>;

    fn verify_access_token(&self, token: &str) -> Result<AccessClaims, TokenError>;

    /// Opaque random bearer value. Carries no claims and is only meaningful to the store.
    fn generate_refresh_token(&self) -> Result<String, TokenError>;
}
