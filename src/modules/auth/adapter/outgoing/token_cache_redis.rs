use async_trait::async_trait;
use chrono::Utc;
use deadpool_redis::{redis::AsyncCommands, Pool};

use std::sync::Arc;

use uuid::Uuid;

use crate::auth::application::ports::outgoing::{CachedRefreshToken, TokenCache, TokenCacheError};

/// Redis-backed read-through cache of live refresh tokens.
///
/// ## Redis data model
///
/// 1. **Per-token entry**
/// ```text
/// auth:refresh:token:{token_hash} -> JSON(CachedRefreshToken)
/// ```
/// - TTL = remaining lifetime of the refresh token
///
/// 2. **Per-user index (for bulk eviction on rotation)**
/// ```text
/// auth:refresh:user:{user_id} -> SET(token_hash)
/// ```
///
/// Postgres stays authoritative. A miss here only costs a database read.
#[derive(Clone)]
pub struct RedisTokenCache {
    pool: Arc<Pool>,
}

impl RedisTokenCache {
    pub fn new(pool: Arc<Pool>) -> Self {
        Self { pool }
    }

    fn token_key(token_hash: &str) -> String {
        format!("auth:refresh:token:{token_hash}")
    }

    fn user_key(user_id: Uuid) -> String {
        format!("auth:refresh:user:{user_id}")
    }

    async fn get_conn(&self) -> Result<deadpool_redis::Connection, TokenCacheError> {
        self.pool
            .get()
            .await
            .map_err(|e| TokenCacheError::Connection(format!("Pool error: {}", e)))
    }
}

#[async_trait]
impl TokenCache for RedisTokenCache {
    async fn get(&self, token_hash: &str) -> Result<Option<CachedRefreshToken>, TokenCacheError> {
        let mut conn = self.get_conn().await?;

        let raw: Option<String> = conn
            .get(Self::token_key(token_hash))
            .await
            .map_err(|e| TokenCacheError::Command(e.to_string()))?;

        raw.map(|json| {
            serde_json::from_str(&json).map_err(|e| TokenCacheError::Serialization(e.to_string()))
        })
        .transpose()
    }

    /// Caches an entry until its own expiry.
    ///
    /// ```text
    /// SET    auth:refresh:token:{hash} <json> EX <ttl>
    /// SADD   auth:refresh:user:{user_id} {hash}
    /// EXPIRE auth:refresh:user:{user_id} <ttl>
    /// ```
    ///
    /// Entries that are already expired are not written.
    async fn put(
        &self,
        token_hash: &str,
        entry: &CachedRefreshToken,
    ) -> Result<(), TokenCacheError> {
        let ttl = (entry.expiry_time - Utc::now()).num_seconds();
        if ttl <= 0 {
            return Ok(());
        }

        let json =
            serde_json::to_string(entry).map_err(|e| TokenCacheError::Serialization(e.to_string()))?;
        let user_key = Self::user_key(entry.user_id);

        let mut conn = self.get_conn().await?;

        deadpool_redis::redis::pipe()
            .atomic()
            .cmd("SET")
            .arg(Self::token_key(token_hash))
            .arg(json)
            .arg("EX")
            .arg(ttl)
            .ignore()
            .cmd("SADD")
            .arg(&user_key)
            .arg(token_hash)
            .ignore()
            .cmd("EXPIRE")
            .arg(&user_key)
            .arg(ttl)
            .ignore()
            .query_async::<()>(&mut *conn)
            .await
            .map_err(|e| TokenCacheError::Command(e.to_string()))
    }

    /// Idempotent; a missing entry is not an error.
    async fn evict(&self, token_hash: &str) -> Result<(), TokenCacheError> {
        let Some(entry) = self.get(token_hash).await? else {
            return Ok(());
        };

        let mut conn = self.get_conn().await?;

        deadpool_redis::redis::pipe()
            .atomic()
            .del(Self::token_key(token_hash))
            .ignore()
            .srem(Self::user_key(entry.user_id), token_hash)
            .ignore()
            .query_async::<()>(&mut *conn)
            .await
            .map_err(|e| TokenCacheError::Command(e.to_string()))
    }

    async fn evict_user(&self, user_id: Uuid) -> Result<(), TokenCacheError> {
        let user_key = Self::user_key(user_id);
        let mut conn = self.get_conn().await?;

        let hashes: Vec<String> = conn
            .smembers(&user_key)
            .await
            .map_err(|e| TokenCacheError::Command(e.to_string()))?;

        let mut pipe = deadpool_redis::redis::pipe();
        pipe.atomic();

        for hash in hashes {
            pipe.del(Self::token_key(&hash)).ignore();
        }

        pipe.del(&user_key).ignore();

        pipe.query_async::<()>(&mut *conn)
            .await
            .map_err(|e| TokenCacheError::Command(e.to_string()))
    }
}
