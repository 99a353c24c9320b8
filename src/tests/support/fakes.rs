//! In-memory adapters for the outgoing ports.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use uuid::Uuid;

use crate::auth::application::domain::entities::{
    Identifier, NewUser, PublicUser, RefreshToken, User, VerificationCode,
};
use crate::auth::application::ports::outgoing::{
    AccessClaims, AccountStore, AccountStoreError, CachedRefreshToken, HashError, PasswordHasher,
    TokenCache, TokenCacheError, TokenError, TokenProvider, VerificationCodeGenerator,
};
use crate::email::application::ports::outgoing::{NotificationError, VerificationCodeNotifier};

#[derive(Default)]
struct StoreState {
    users: HashMap<Uuid, User>,
    tokens: HashMap<String, RefreshToken>,
}

/// Behaves like the Postgres store: unique email and username, case-insensitive
/// email lookup, and the default (non-transactional) token replacement.
#[derive(Default)]
pub struct InMemoryAccountStore {
    state: Mutex<StoreState>,
}

impl InMemoryAccountStore {
    pub fn insert_user(&self, user: User) {
        self.state.lock().unwrap().users.insert(user.id, user);
    }

    pub fn user(&self, id: Uuid) -> Option<User> {
        self.state.lock().unwrap().users.get(&id).cloned()
    }

    pub fn user_by_email(&self, email: &str) -> Option<User> {
        let email = email.to_lowercase();
        self.state
            .lock()
            .unwrap()
            .users
            .values()
            .find(|u| u.email == email)
            .cloned()
    }

    pub fn force_verified(&self, id: Uuid) {
        if let Some(user) = self.state.lock().unwrap().users.get_mut(&id) {
            user.is_verified = true;
        }
    }

    pub fn insert_token(&self, token: RefreshToken) {
        self.state
            .lock()
            .unwrap()
            .tokens
            .insert(token.token.clone(), token);
    }

    pub fn tokens_for(&self, user_id: Uuid) -> Vec<RefreshToken> {
        self.state
            .lock()
            .unwrap()
            .tokens
            .values()
            .filter(|t| t.user_id == user_id)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl AccountStore for InMemoryAccountStore {
    async fn create_user(&self, new_user: NewUser) -> Result<User, AccountStoreError> {
        let mut state = self.state.lock().unwrap();
        let email = new_user.email.trim().to_lowercase();

        if state
            .users
            .values()
            .any(|u| u.email == email || u.username == new_user.username)
        {
            return Err(AccountStoreError::Duplicate);
        }

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            email,
            username: new_user.username,
            password_hash: new_user.password_hash,
            is_verified: false,
            verification_code: Some(new_user.verification_code),
            verification_expire_time: Some(new_user.verification_expire_time),
            is_premium: false,
            created_at: now,
            updated_at: now,
        };
        state.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_user_by_identifier(
        &self,
        identifier: &str,
    ) -> Result<Option<User>, AccountStoreError> {
        let identifier = Identifier::parse(identifier);
        Ok(self
            .state
            .lock()
            .unwrap()
            .users
            .values()
            .find(|u| match &identifier {
                Identifier::Email(email) => &u.email == email,
                Identifier::Username(username) => &u.username == username,
            })
            .cloned())
    }

    async fn set_verification_code(
        &self,
        user_id: Uuid,
        code: VerificationCode,
        expires_at: DateTime<Utc>,
    ) -> Result<(), AccountStoreError> {
        let mut state = self.state.lock().unwrap();
        let user = state
            .users
            .get_mut(&user_id)
            .ok_or(AccountStoreError::NotFound)?;
        user.verification_code = Some(code);
        user.verification_expire_time = Some(expires_at);
        user.updated_at = Utc::now();
        Ok(())
    }

    async fn mark_verified(
        &self,
        user_id: Uuid,
        code: VerificationCode,
        now: DateTime<Utc>,
    ) -> Result<bool, AccountStoreError> {
        let mut state = self.state.lock().unwrap();
        let Some(user) = state.users.get_mut(&user_id) else {
            return Ok(false);
        };
        let pending = !user.is_verified
            && user.verification_code == Some(code)
            && user.verification_expire_time.is_some_and(|t| t > now);
        if !pending {
            return Ok(false);
        }
        user.is_verified = true;
        user.verification_code = None;
        user.verification_expire_time = None;
        user.updated_at = Utc::now();
        Ok(true)
    }

    async fn insert_refresh_token(&self, token: &RefreshToken) -> Result<(), AccountStoreError> {
        self.insert_token(token.clone());
        Ok(())
    }

    async fn find_refresh_token(
        &self,
        token: &str,
    ) -> Result<Option<RefreshToken>, AccountStoreError> {
        Ok(self.state.lock().unwrap().tokens.get(token).cloned())
    }

    async fn delete_refresh_token(&self, token: &str) -> Result<bool, AccountStoreError> {
        Ok(self.state.lock().unwrap().tokens.remove(token).is_some())
    }

    async fn delete_refresh_tokens_for_user(
        &self,
        user_id: Uuid,
    ) -> Result<u64, AccountStoreError> {
        let mut state = self.state.lock().unwrap();
        let before = state.tokens.len();
        state.tokens.retain(|_, t| t.user_id != user_id);
        Ok((before - state.tokens.len()) as u64)
    }
}

pub fn pending_user(email: &str, username: &str, code: i32, expires_in: Duration) -> User {
    let now = Utc::now();
    User {
        id: Uuid::new_v4(),
        email: email.to_string(),
        username: username.to_string(),
        password_hash: "plain:SecurePass123!".to_string(),
        is_verified: false,
        verification_code: Some(VerificationCode::try_new(code).unwrap()),
        verification_expire_time: Some(now + expires_in),
        is_premium: false,
        created_at: now,
        updated_at: now,
    }
}

pub fn verified_user(email: &str, username: &str, password_hash: &str) -> User {
    let now = Utc::now();
    User {
        id: Uuid::new_v4(),
        email: email.to_string(),
        username: username.to_string(),
        password_hash: password_hash.to_string(),
        is_verified: true,
        verification_code: None,
        verification_expire_time: None,
        is_premium: false,
        created_at: now,
        updated_at: now,
    }
}

pub fn public_user(email: &str, username: &str, is_verified: bool) -> PublicUser {
    let now = Utc::now();
    PublicUser {
        id: Uuid::new_v4(),
        email: email.to_string(),
        username: username.to_string(),
        is_verified,
        is_premium: false,
        verification_code: (!is_verified).then_some(4821),
        created_at: now,
        updated_at: now,
    }
}

/// Hashes to `plain:{password}`.
pub struct PlainTextHasher;

#[async_trait]
impl PasswordHasher for PlainTextHasher {
    async fn hash_password(&self, password: &str) -> Result<String, HashError> {
        Ok(format!("plain:{password}"))
    }

    async fn verify_password(&self, password: &str, hash: &str) -> Result<bool, HashError> {
        Ok(hash == format!("plain:{password}"))
    }
}

/// Hands out the given codes in order, then keeps repeating the last one.
pub struct SequenceCodeGenerator {
    codes: Mutex<VecDeque<i32>>,
}

impl SequenceCodeGenerator {
    pub fn new(codes: impl IntoIterator<Item = i32>) -> Self {
        let codes: VecDeque<i32> = codes.into_iter().collect();
        assert!(!codes.is_empty(), "at least one code is required");
        Self {
            codes: Mutex::new(codes),
        }
    }
}

impl VerificationCodeGenerator for SequenceCodeGenerator {
    fn next(&self) -> VerificationCode {
        let mut codes = self.codes.lock().unwrap();
        let value = if codes.len() > 1 {
            codes.pop_front().unwrap()
        } else {
            codes[0]
        };
        VerificationCode::try_new(value).unwrap()
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<(String, String, i32)>>,
    fail: bool,
}

impl RecordingNotifier {
    pub fn failing() -> Self {
        Self {
            sent: Mutex::default(),
            fail: true,
        }
    }

    /// `(email, username, code)` of every delivered message.
    pub fn sent(&self) -> Vec<(String, String, i32)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl VerificationCodeNotifier for RecordingNotifier {
    async fn send_verification_code(
        &self,
        email: &str,
        username: &str,
        code: VerificationCode,
    ) -> Result<(), NotificationError> {
        if self.fail {
            return Err(NotificationError::EmailSendingFailed(
                "mailbox unavailable".into(),
            ));
        }
        self.sent
            .lock()
            .unwrap()
            .push((email.to_string(), username.to_string(), code.value()));
        Ok(())
    }
}

/// Unsigned tokens of the form `access.{user_id}.{exp}.{n}`.
#[derive(Default)]
pub struct FakeTokenProvider {
    counter: AtomicU64,
}

impl FakeTokenProvider {
    fn next_id(&self) -> u64 {
        self.counter.fetch_add(1, Ordering::Relaxed)
    }
}

impl TokenProvider for FakeTokenProvider {
    fn sign_access_token(&self, user_id: Uuid, ttl: Duration) -> Result<String, TokenError> {
        let exp = (Utc::now() + ttl).timestamp();
        Ok(format!("access.{user_id}.{exp}.{}", self.next_id()))
    }

    fn verify_access_token(&self, token: &str) -> Result<AccessClaims, TokenError> {
        let parts: Vec<&str> = token.split('.').collect();
        let [prefix, sub, exp, _] = parts.as_slice() else {
            return Err(TokenError::MalformedToken);
        };
        if *prefix != "access" {
            return Err(TokenError::MalformedToken);
        }
        let sub = Uuid::parse_str(sub).map_err(|_| TokenError::MalformedToken)?;
        let exp: i64 = exp.parse().map_err(|_| TokenError::MalformedToken)?;
        let now = Utc::now().timestamp();
        if exp <= now {
            return Err(TokenError::TokenExpired);
        }
        Ok(AccessClaims {
            sub,
            iss: "fake".into(),
            exp,
            iat: now,
            nbf: now,
        })
    }

    fn generate_refresh_token(&self) -> Result<String, TokenError> {
        Ok(format!("refresh-{}-{}", self.next_id(), Uuid::new_v4().simple()))
    }
}

/// Mirrors the Redis cache: expired entries are never stored and
/// `evict_user` drops every entry of that user.
#[derive(Default)]
pub struct InMemoryTokenCache {
    entries: Mutex<HashMap<String, CachedRefreshToken>>,
    fail_evictions: bool,
}

impl InMemoryTokenCache {
    /// Reads and writes work; `evict` and `evict_user` always fail.
    pub fn failing_evictions() -> Self {
        Self {
            fail_evictions: true,
            ..Self::default()
        }
    }

    pub fn contains(&self, token_hash: &str) -> bool {
        self.entries.lock().unwrap().contains_key(token_hash)
    }

    fn check_evictable(&self) -> Result<(), TokenCacheError> {
        if self.fail_evictions {
            return Err(TokenCacheError::Connection("connection reset".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl TokenCache for InMemoryTokenCache {
    async fn get(&self, token_hash: &str) -> Result<Option<CachedRefreshToken>, TokenCacheError> {
        Ok(self.entries.lock().unwrap().get(token_hash).cloned())
    }

    async fn put(
        &self,
        token_hash: &str,
        entry: &CachedRefreshToken,
    ) -> Result<(), TokenCacheError> {
        if entry.expiry_time <= Utc::now() {
            return Ok(());
        }
        self.entries
            .lock()
            .unwrap()
            .insert(token_hash.to_string(), entry.clone());
        Ok(())
    }

    async fn evict(&self, token_hash: &str) -> Result<(), TokenCacheError> {
        self.check_evictable()?;
        self.entries.lock().unwrap().remove(token_hash);
        Ok(())
    }

    async fn evict_user(&self, user_id: Uuid) -> Result<(), TokenCacheError> {
        self.check_evictable()?;
        self.entries
            .lock()
            .unwrap()
            .retain(|_, e| e.user_id != user_id);
        Ok(())
    }
}
