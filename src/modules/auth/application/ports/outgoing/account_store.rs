use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::auth::application::domain::entities::{NewUser, RefreshToken, User, VerificationCode};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AccountStoreError {
    #[error("Account already exists")]
    Duplicate,

    #[error("Record not found")]
    NotFound,

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Token cache error: {0}")]
    CacheError(String),
}

/// Persistence for user records and refresh-token records.
///
/// Refresh tokens are addressed by their raw bearer value; adapters decide how
/// the value is kept at rest.
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Insert a user together with its first verification code.
    /// Unique violations on email or username surface as `Duplicate`.
    async fn create_user(&self, user: NewUser) -> Result<User, AccountStoreError>;

    /// An identifier containing '@' matches the email (case-insensitive);
    /// anything else matches the username exactly.
    async fn find_user_by_identifier(
        &self,
        identifier: &str,
    ) -> Result<Option<User>, AccountStoreError>;

    /// Replace the outstanding code. The previous one stops validating.
    async fn set_verification_code(
        &self,
        user_id: Uuid,
        code: VerificationCode,
        expires_at: DateTime<Utc>,
    ) -> Result<(), AccountStoreError>;

    /// Set `is_verified` and clear the outstanding code, but only while the
    /// account is pending and `code` is still the live, unexpired code at `now`.
    /// Returns whether the account changed.
    async fn mark_verified(
        &self,
        user_id: Uuid,
        code: VerificationCode,
        now: DateTime<Utc>,
    ) -> Result<bool, AccountStoreError>;

    async fn insert_refresh_token(&self, token: &RefreshToken) -> Result<(), AccountStoreError>;

    async fn find_refresh_token(
        &self,
        token: &str,
    ) -> Result<Option<RefreshToken>, AccountStoreError>;

    /// Returns whether a record was removed.
    async fn delete_refresh_token(&self, token: &str) -> Result<bool, AccountStoreError>;

    /// Returns how many records were removed.
    async fn delete_refresh_tokens_for_user(&self, user_id: Uuid)
        -> Result<u64, AccountStoreError>;

    /// Retire every token of `user_id` and store `token` as the only live one.
    ///
    /// The default runs the two steps in sequence. Stores with transactions
    /// should override it so a failed insert keeps the old tokens.
    async fn replace_refresh_tokens_for_user(
        &self,
        user_id: Uuid,
        token: &RefreshToken,
    ) -> Result<(), AccountStoreError> {
        self.delete_refresh_tokens_for_user(user_id).await?;
        self.insert_refresh_token(token).await
    }

    /// Consume `presented` and, only if it was still live, make `next` the
    /// user's single refresh token. Returns `false` when `presented` had
    /// already been consumed or revoked; nothing is written in that case.
    async fn rotate_refresh_token(
        &self,
        presented: &str,
        next: &RefreshToken,
    ) -> Result<bool, AccountStoreError> {
        if !self.delete_refresh_token(presented).await? {
            return Ok(false);
        }
        self.replace_refresh_tokens_for_user(next.user_id, next).await?;
        Ok(true)
    }
}
