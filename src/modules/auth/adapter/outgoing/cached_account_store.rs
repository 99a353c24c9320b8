use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::auth::application::domain::entities::{NewUser, RefreshToken, User, VerificationCode};
use crate::auth::application::ports::outgoing::{
    AccountStore, AccountStoreError, CachedRefreshToken, TokenCache, TokenCacheError,
};
use crate::auth::application::services::hash_token;

/// Puts a `TokenCache` in front of the refresh-token half of an `AccountStore`.
///
/// The inner store is authoritative and decides every rotation and logout, so
/// a stale cache entry can at worst make a dead token look live to a lookup.
/// Entries are written only when a token is issued, never on the read path.
/// Removals hit the cache before the inner store and fail closed: if the cache
/// cannot be evicted the inner store is left untouched and the caller gets an
/// error to retry.
#[derive(Clone)]
pub struct CachedAccountStore {
    inner: Arc<dyn AccountStore>,
    cache: Arc<dyn TokenCache>,
}

fn cache_err(e: TokenCacheError) -> AccountStoreError {
    AccountStoreError::CacheError(e.to_string())
}

impl CachedAccountStore {
    pub fn new(inner: Arc<dyn AccountStore>, cache: Arc<dyn TokenCache>) -> Self {
        Self { inner, cache }
    }

    /// Best effort; a missing entry only costs an inner lookup.
    async fn remember(&self, token: &RefreshToken) {
        let entry = CachedRefreshToken {
            user_id: token.user_id,
            expiry_time: token.expiry_time,
            created_at: token.created_at,
        };
        if let Err(e) = self.cache.put(&hash_token(&token.token), &entry).await {
            warn!(user_id = %token.user_id, error = %e, "Failed to cache refresh token");
        }
    }
}

#[async_trait]
impl AccountStore for CachedAccountStore {
    async fn create_user(&self, user: NewUser) -> Result<User, AccountStoreError> {
        self.inner.create_user(user).await
    }

    async fn find_user_by_identifier(
        &self,
        identifier: &str,
    ) -> Result<Option<User>, AccountStoreError> {
        self.inner.find_user_by_identifier(identifier).await
    }

    async fn set_verification_code(
        &self,
        user_id: Uuid,
        code: VerificationCode,
        expires_at: DateTime<Utc>,
    ) -> Result<(), AccountStoreError> {
        self.inner
            .set_verification_code(user_id, code, expires_at)
            .await
    }

    async fn mark_verified(
        &self,
        user_id: Uuid,
        code: VerificationCode,
        now: DateTime<Utc>,
    ) -> Result<bool, AccountStoreError> {
        self.inner.mark_verified(user_id, code, now).await
    }

    async fn insert_refresh_token(&self, token: &RefreshToken) -> Result<(), AccountStoreError> {
        self.inner.insert_refresh_token(token).await?;
        self.remember(token).await;
        Ok(())
    }

    async fn find_refresh_token(
        &self,
        token: &str,
    ) -> Result<Option<RefreshToken>, AccountStoreError> {
        match self.cache.get(&hash_token(token)).await {
            Ok(Some(entry)) => {
                debug!("Refresh token cache hit");
                return Ok(Some(RefreshToken {
                    token: token.to_string(),
                    user_id: entry.user_id,
                    expiry_time: entry.expiry_time,
                    created_at: entry.created_at,
                }));
            }
            Ok(None) => {}
            Err(e) => warn!(error = %e, "Refresh token cache lookup failed"),
        }

        self.inner.find_refresh_token(token).await
    }

    async fn delete_refresh_token(&self, token: &str) -> Result<bool, AccountStoreError> {
        self.cache
            .evict(&hash_token(token))
            .await
            .map_err(cache_err)?;
        self.inner.delete_refresh_token(token).await
    }

    async fn delete_refresh_tokens_for_user(
        &self,
        user_id: Uuid,
    ) -> Result<u64, AccountStoreError> {
        self.cache.evict_user(user_id).await.map_err(cache_err)?;
        self.inner.delete_refresh_tokens_for_user(user_id).await
    }

    async fn replace_refresh_tokens_for_user(
        &self,
        user_id: Uuid,
        token: &RefreshToken,
    ) -> Result<(), AccountStoreError> {
        self.cache.evict_user(user_id).await.map_err(cache_err)?;
        self.inner
            .replace_refresh_tokens_for_user(user_id, token)
            .await?;
        self.remember(token).await;
        Ok(())
    }

    async fn rotate_refresh_token(
        &self,
        presented: &str,
        next: &RefreshToken,
    ) -> Result<bool, AccountStoreError> {
        self.cache
            .evict(&hash_token(presented))
            .await
            .map_err(cache_err)?;

        let rotated = self.inner.rotate_refresh_token(presented, next).await?;
        if rotated {
            // The rotation is committed; leftovers can no longer rotate or log out
            if let Err(e) = self.cache.evict_user(next.user_id).await {
                warn!(
                    user_id = %next.user_id,
                    error = %e,
                    "Failed to evict rotated-out refresh tokens"
                );
            }
            self.remember(next).await;
        }
        Ok(rotated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::application::domain::errors::AuthError;
    use crate::auth::application::domain::policies::LifecyclePolicy;
    use crate::auth::application::use_cases::logout_user::{
        ILogoutUseCase, LogoutRequest, LogoutUseCase,
    };
    use crate::auth::application::use_cases::refresh_token::{
        IRefreshTokenUseCase, RefreshTokenRequest, RefreshTokenUseCase,
    };
    use crate::tests::support::fakes::{FakeTokenProvider, InMemoryAccountStore, InMemoryTokenCache};
    use crate::tests::support::mocks::{MockAccountStore, MockTokenCache};
    use chrono::Duration;

    fn token(raw: &str, user_id: Uuid) -> RefreshToken {
        RefreshToken::issue(raw.to_string(), user_id, Duration::days(7))
    }

    fn refresh_use_case(store: Arc<dyn AccountStore>) -> RefreshTokenUseCase {
        RefreshTokenUseCase::new(
            store,
            Arc::new(FakeTokenProvider::default()),
            LifecyclePolicy::default(),
        )
    }

    #[tokio::test]
    async fn test_find_miss_reads_inner_without_caching() {
        let inner = Arc::new(InMemoryAccountStore::default());
        let cache = Arc::new(InMemoryTokenCache::default());
        let user_id = Uuid::new_v4();
        inner.insert_token(token("r1", user_id));

        let store = CachedAccountStore::new(inner, cache.clone());

        let found = store.find_refresh_token("r1").await.unwrap().unwrap();

        assert_eq!(found.user_id, user_id);
        assert!(!cache.contains(&hash_token("r1")));
    }

    #[tokio::test]
    async fn test_cache_hit_skips_inner_store() {
        let user_id = Uuid::new_v4();
        let cache = Arc::new(InMemoryTokenCache::default());
        cache
            .put(
                &hash_token("r1"),
                &CachedRefreshToken {
                    user_id,
                    expiry_time: Utc::now() + Duration::days(1),
                    created_at: Utc::now(),
                },
            )
            .await
            .unwrap();

        let mut inner = MockAccountStore::new();
        inner.expect_find_refresh_token().never();

        let store = CachedAccountStore::new(Arc::new(inner), cache);

        let found = store.find_refresh_token("r1").await.unwrap().unwrap();
        assert_eq!(found.token, "r1");
        assert_eq!(found.user_id, user_id);
    }

    #[tokio::test]
    async fn test_replace_evicts_old_tokens_from_cache() {
        let inner = Arc::new(InMemoryAccountStore::default());
        let cache = Arc::new(InMemoryTokenCache::default());
        let user_id = Uuid::new_v4();
        let store = CachedAccountStore::new(inner, cache.clone());

        store.insert_refresh_token(&token("r1", user_id)).await.unwrap();
        store
            .replace_refresh_tokens_for_user(user_id, &token("r2", user_id))
            .await
            .unwrap();

        assert!(!cache.contains(&hash_token("r1")));
        assert!(cache.contains(&hash_token("r2")));
        assert!(store.find_refresh_token("r1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_evicts_from_cache() {
        let inner = Arc::new(InMemoryAccountStore::default());
        let cache = Arc::new(InMemoryTokenCache::default());
        let store = CachedAccountStore::new(inner, cache.clone());
        store
            .insert_refresh_token(&token("r1", Uuid::new_v4()))
            .await
            .unwrap();

        assert!(store.delete_refresh_token("r1").await.unwrap());
        assert!(!cache.contains(&hash_token("r1")));
        assert!(store.find_refresh_token("r1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_cache_read_and_write_failures_are_swallowed() {
        let inner = Arc::new(InMemoryAccountStore::default());
        let user_id = Uuid::new_v4();
        inner.insert_token(token("r1", user_id));

        let mut cache = MockTokenCache::new();
        cache
            .expect_get()
            .returning(|_| Err(TokenCacheError::Connection("refused".into())));
        cache
            .expect_put()
            .returning(|_, _| Err(TokenCacheError::Connection("refused".into())));

        let store = CachedAccountStore::new(inner.clone(), Arc::new(cache));

        let found = store.find_refresh_token("r1").await.unwrap();
        assert_eq!(found.map(|t| t.user_id), Some(user_id));

        store.insert_refresh_token(&token("r2", user_id)).await.unwrap();
        assert_eq!(inner.tokens_for(user_id).len(), 2);
    }

    #[tokio::test]
    async fn test_failed_eviction_leaves_inner_store_untouched() {
        let inner = Arc::new(InMemoryAccountStore::default());
        let cache = Arc::new(InMemoryTokenCache::failing_evictions());
        let user_id = Uuid::new_v4();
        let store = CachedAccountStore::new(inner.clone(), cache.clone());
        store.insert_refresh_token(&token("r1", user_id)).await.unwrap();

        let deleted = store.delete_refresh_token("r1").await;
        assert!(matches!(deleted, Err(AccountStoreError::CacheError(_))));

        let rotated = store
            .rotate_refresh_token("r1", &token("r2", user_id))
            .await;
        assert!(matches!(rotated, Err(AccountStoreError::CacheError(_))));

        // Both layers still agree that r1 is the live token
        let live: Vec<String> = inner.tokens_for(user_id).into_iter().map(|t| t.token).collect();
        assert_eq!(live, vec!["r1".to_string()]);
        assert!(cache.contains(&hash_token("r1")));
    }

    #[tokio::test]
    async fn test_logout_then_refresh_with_broken_eviction_never_rotates() {
        let inner = Arc::new(InMemoryAccountStore::default());
        let cache = Arc::new(InMemoryTokenCache::failing_evictions());
        let user_id = Uuid::new_v4();
        let store: Arc<dyn AccountStore> =
            Arc::new(CachedAccountStore::new(inner.clone(), cache));
        store.insert_refresh_token(&token("r1", user_id)).await.unwrap();

        let logout = LogoutUseCase::new(store.clone())
            .execute(LogoutRequest::new("r1".into()).unwrap())
            .await;
        assert!(matches!(logout, Err(AuthError::Internal { .. })));

        let refresh = refresh_use_case(store)
            .execute(RefreshTokenRequest::new("r1".into()).unwrap())
            .await;
        assert!(refresh.is_err(), "Expected refresh to fail, got {:?}", refresh);

        let live: Vec<String> = inner.tokens_for(user_id).into_iter().map(|t| t.token).collect();
        assert_eq!(live, vec!["r1".to_string()]);
    }

    #[tokio::test]
    async fn test_stale_cache_entry_cannot_rotate_revoked_token() {
        let inner = Arc::new(InMemoryAccountStore::default());
        let cache = Arc::new(InMemoryTokenCache::default());
        let user_id = Uuid::new_v4();
        // Revoked in the inner store while the cache still holds it
        cache
            .put(
                &hash_token("revoked"),
                &CachedRefreshToken {
                    user_id,
                    expiry_time: Utc::now() + Duration::days(7),
                    created_at: Utc::now(),
                },
            )
            .await
            .unwrap();

        let store: Arc<dyn AccountStore> =
            Arc::new(CachedAccountStore::new(inner.clone(), cache.clone()));

        let result = refresh_use_case(store.clone())
            .execute(RefreshTokenRequest::new("revoked".into()).unwrap())
            .await;

        assert!(
            matches!(result, Err(AuthError::InvalidArgument(_))),
            "Expected InvalidArgument, got {:?}",
            result
        );
        assert!(inner.tokens_for(user_id).is_empty());
        assert!(!cache.contains(&hash_token("revoked")));
    }

    #[tokio::test]
    async fn test_rotate_through_cache_keeps_only_next_token() {
        let inner = Arc::new(InMemoryAccountStore::default());
        let cache = Arc::new(InMemoryTokenCache::default());
        let user_id = Uuid::new_v4();
        let store = CachedAccountStore::new(inner.clone(), cache.clone());
        store.insert_refresh_token(&token("r1", user_id)).await.unwrap();

        assert!(store
            .rotate_refresh_token("r1", &token("r2", user_id))
            .await
            .unwrap());
        assert!(!store
            .rotate_refresh_token("r1", &token("r3", user_id))
            .await
            .unwrap());

        assert!(!cache.contains(&hash_token("r1")));
        assert!(cache.contains(&hash_token("r2")));
        assert!(!cache.contains(&hash_token("r3")));
        let live: Vec<String> = inner.tokens_for(user_id).into_iter().map(|t| t.token).collect();
        assert_eq!(live, vec!["r2".to_string()]);
    }

    #[tokio::test]
    async fn test_inner_failure_is_not_cached() {
        let mut inner = MockAccountStore::new();
        inner
            .expect_insert_refresh_token()
            .returning(|_| Err(AccountStoreError::DatabaseError("down".into())));

        let cache = Arc::new(InMemoryTokenCache::default());
        let store = CachedAccountStore::new(Arc::new(inner), cache.clone());

        let result = store.insert_refresh_token(&token("r1", Uuid::new_v4())).await;

        assert!(result.is_err());
        assert!(!cache.contains(&hash_token("r1")));
    }
}
