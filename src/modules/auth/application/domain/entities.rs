use std::fmt;

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::Serialize;
use uuid::Uuid;

pub type UserId = Uuid;

// ============================================================================
// Verification Code
// ============================================================================

/// A 4-digit one-time code proving control of an email address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VerificationCode(i32);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Verification code must be between 1000 and 9999, got {0}")]
pub struct InvalidVerificationCode(pub i32);

impl VerificationCode {
    pub const MIN: i32 = 1000;
    pub const MAX: i32 = 9999;

    pub fn try_new(value: i32) -> Result<Self, InvalidVerificationCode> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(InvalidVerificationCode(value))
        }
    }

    /// Draw a uniformly distributed code from `rng`.
    pub fn random<R: Rng>(rng: &mut R) -> Self {
        Self(rng.gen_range(Self::MIN..=Self::MAX))
    }

    pub fn value(&self) -> i32 {
        self.0
    }
}

impl fmt::Display for VerificationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Identifier
// ============================================================================

/// What a caller-supplied identifier resolves against. Usernames never
/// contain '@', so the shape alone decides the column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identifier {
    Email(String),
    Username(String),
}

impl Identifier {
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.contains('@') {
            Identifier::Email(raw.to_lowercase())
        } else {
            Identifier::Username(raw.to_string())
        }
    }
}

// ============================================================================
// User
// ============================================================================

#[derive(Clone)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub username: String,
    pub password_hash: String,
    pub is_verified: bool,
    pub verification_code: Option<VerificationCode>,
    pub verification_expire_time: Option<DateTime<Utc>>,
    pub is_premium: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("username", &self.username)
            .field("password_hash", &"<redacted>")
            .field("is_verified", &self.is_verified)
            .field("verification_expire_time", &self.verification_expire_time)
            .field("is_premium", &self.is_premium)
            .finish()
    }
}

impl User {
    /// A code is usable only while `now` is strictly before its expiry.
    /// Missing code or expiry counts as expired.
    pub fn verification_window_closed(&self, now: DateTime<Utc>) -> bool {
        match (self.verification_code, self.verification_expire_time) {
            (Some(_), Some(expires_at)) => now >= expires_at,
            _ => true,
        }
    }

    pub fn code_matches(&self, candidate: i32) -> bool {
        self.verification_code
            .map(|code| code.value() == candidate)
            .unwrap_or(false)
    }

    pub fn to_public(&self, expose_verification_code: bool) -> PublicUser {
        PublicUser {
            id: self.id,
            email: self.email.clone(),
            username: self.username.clone(),
            is_verified: self.is_verified,
            is_premium: self.is_premium,
            verification_code: if expose_verification_code {
                self.verification_code.map(|c| c.value())
            } else {
                None
            },
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Data required to persist a freshly registered user.
#[derive(Clone)]
pub struct NewUser {
    pub email: String,
    pub username: String,
    pub password_hash: String,
    pub verification_code: VerificationCode,
    pub verification_expire_time: DateTime<Utc>,
}

impl fmt::Debug for NewUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewUser")
            .field("email", &self.email)
            .field("username", &self.username)
            .field("verification_expire_time", &self.verification_expire_time)
            .finish_non_exhaustive()
    }
}

/// Outward projection of a user. Never carries the password hash.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PublicUser {
    pub id: UserId,
    pub email: String,
    pub username: String,
    pub is_verified: bool,
    pub is_premium: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verification_code: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ============================================================================
// Refresh Token
// ============================================================================

#[derive(Clone, PartialEq)]
pub struct RefreshToken {
    pub token: String,
    pub user_id: UserId,
    pub expiry_time: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl fmt::Debug for RefreshToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RefreshToken")
            .field("token", &"<redacted>")
            .field("user_id", &self.user_id)
            .field("expiry_time", &self.expiry_time)
            .field("created_at", &self.created_at)
            .finish()
    }
}

impl RefreshToken {
    pub fn issue(token: String, user_id: UserId, ttl: chrono::Duration) -> Self {
        let now = Utc::now();
        Self {
            token,
            user_id,
            expiry_time: now + ttl,
            created_at: now,
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expiry_time
    }
}
