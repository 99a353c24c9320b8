use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Cached view of a refresh-token record, keyed by the token hash.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedRefreshToken {
    pub user_id: Uuid,
    pub expiry_time: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum TokenCacheError {
    #[error("Cache connection error: {0}")]
    Connection(String),

    #[error("Cache command failed: {0}")]
    Command(String),

    #[error("Cache entry could not be (de)serialized: {0}")]
    Serialization(String),
}

/// Optional lookup shortcut in front of the account store.
/// The store stays authoritative; a miss or an error means "ask the store".
#[async_trait]
pub trait TokenCache: Send + Sync {
    async fn get(&self, token_hash: &str) -> Result<Option<CachedRefreshToken>, TokenCacheError>;

    async fn put(&self, token_hash: &str, entry: &CachedRefreshToken)
        -> Result<(), TokenCacheError>;

    async fn evict(&self, token_hash: &str) -> Result<(), TokenCacheError>;

    async fn evict_user(&self, user_id: Uuid) -> Result<(), TokenCacheError>;
}
