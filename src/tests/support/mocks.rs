use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockall::mock;
use uuid::Uuid;

use crate::auth::application::domain::entities::{NewUser, RefreshToken, User, VerificationCode};
use crate::auth::application::ports::outgoing::{
    AccountStore, AccountStoreError, CachedRefreshToken, HashError, PasswordHasher, TokenCache,
    TokenCacheError,
};

mock! {
    pub AccountStore {}

    #[async_trait]
    impl AccountStore for AccountStore {
        async fn create_user(&self, user: NewUser) -> Result<User, AccountStoreError>;

        async fn find_user_by_identifier(
            &self,
            identifier: &str,
        ) -> Result<Option<User>, AccountStoreError>;

        async fn set_verification_code(
            &self,
            user_id: Uuid,
            code: VerificationCode,
            expires_at: DateTime<Utc>,
        ) -> Result<(), AccountStoreError>;

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

        async fn delete_refresh_token(&self, token: &str) -> Result<bool, AccountStoreError>;

        async fn delete_refresh_tokens_for_user(
            &self,
            user_id: Uuid,
        ) -> Result<u64, AccountStoreError>;

        async fn replace_refresh_tokens_for_user(
            &self,
            user_id: Uuid,
            token: &RefreshToken,
        ) -> Result<(), AccountStoreError>;

        async fn rotate_refresh_token(
            &self,
            presented: &str,
            next: &RefreshToken,
        ) -> Result<bool, AccountStoreError>;
    }
}

mock! {
    pub Hasher {}

    #[async_trait]
    impl PasswordHasher for Hasher {
        async fn hash_password(&self, password: &str) -> Result<String, HashError>;
        async fn verify_password(&self, password: &str, hash: &str) -> Result<bool, HashError>;
    }
}

mock! {
    pub TokenCache {}

    #[async_trait]
    impl TokenCache for TokenCache {
        async fn get(&self, token_hash: &str) -> Result<Option<CachedRefreshToken>, TokenCacheError>;

        async fn put(
            &self,
            token_hash: &str,
            entry: &CachedRefreshToken,
        ) -> Result<(), TokenCacheError>;

        async fn evict(&self, token_hash: &str) -> Result<(), TokenCacheError>;

        async fn evict_user(&self, user_id: Uuid) -> Result<(), TokenCacheError>;
    }
}
