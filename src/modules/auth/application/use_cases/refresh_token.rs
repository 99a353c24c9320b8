use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use tracing::{info, warn};

use crate::auth::application::domain::entities::RefreshToken;
use crate::auth::application::domain::errors::AuthError;
use crate::auth::application::domain::policies::LifecyclePolicy;
use crate::auth::application::ports::outgoing::{AccountStore, TokenProvider};

// ========================= Refresh Token Request =========================
/// Validated refresh token request
#[derive(Clone)]
pub struct RefreshTokenRequest {
    refresh_token: String, // Private - guaranteed non-empty
}

#[derive(Debug, Clone, PartialEq)]
pub enum RefreshTokenRequestError {
    EmptyToken,
}

impl std::fmt::Display for RefreshTokenRequestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RefreshTokenRequestError::EmptyToken => write!(f, "Refresh token cannot be empty"),
        }
    }
}

impl std::error::Error for RefreshTokenRequestError {}

impl From<RefreshTokenRequestError> for AuthError {
    fn from(error: RefreshTokenRequestError) -> Self {
        AuthError::InvalidArgument(error.to_string())
    }
}

impl std::fmt::Debug for RefreshTokenRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RefreshTokenRequest")
            .field("refresh_token", &"<redacted>")
            .finish()
    }
}

impl RefreshTokenRequest {
    pub fn new(refresh_token: String) -> Result<Self, RefreshTokenRequestError> {
        let refresh_token = refresh_token.trim();
        if refresh_token.is_empty() {
            return Err(RefreshTokenRequestError::EmptyToken);
        }

        Ok(Self {
            refresh_token: refresh_token.to_string(),
        })
    }

    pub fn refresh_token(&self) -> &str {
        &self.refresh_token
    }
}

// Custom deserialization that validates during parsing
impl<'de> Deserialize<'de> for RefreshTokenRequest {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct RefreshTokenRequestHelper {
            refresh_token: String,
        }

        let helper = RefreshTokenRequestHelper::deserialize(deserializer)?;
        RefreshTokenRequest::new(helper.refresh_token).map_err(serde::de::Error::custom)
    }
}

// ============================ Refresh Token Output =========================
#[derive(Debug, Clone, Serialize)]
pub struct RefreshTokenOutput {
    pub access_token: String,
    pub refresh_token: String,
    pub expiry_time: DateTime<Utc>,
}

// ============================ Refresh Token Use Case =============================
#[async_trait]
pub trait IRefreshTokenUseCase: Send + Sync {
    async fn execute(&self, request: RefreshTokenRequest)
        -> Result<RefreshTokenOutput, AuthError>;
}

/// Rotates a refresh token. The presented token is single-use.
#[derive(Clone)]
pub struct RefreshTokenUseCase {
    store: Arc<dyn AccountStore>,
    tokens: Arc<dyn TokenProvider>,
    policy: LifecyclePolicy,
}

impl RefreshTokenUseCase {
    pub fn new(
        store: Arc<dyn AccountStore>,
        tokens: Arc<dyn TokenProvider>,
        policy: LifecyclePolicy,
    ) -> Self {
        Self {
            store,
            tokens,
            policy,
        }
    }
}

#[async_trait]
impl IRefreshTokenUseCase for RefreshTokenUseCase {
    async fn execute(
        &self,
        request: RefreshTokenRequest,
    ) -> Result<RefreshTokenOutput, AuthError> {
        let record = self
            .store
            .find_refresh_token(request.refresh_token())
            .await
            .map_err(|e| AuthError::internal("refresh_token", e))?
            .ok_or_else(|| AuthError::InvalidArgument("Unknown refresh token".to_string()))?;

        if record.is_expired(Utc::now()) {
            // Expired records are removed whenever they are presented
            if let Err(e) = self.store.delete_refresh_token(request.refresh_token()).await {
                warn!(user_id = %record.user_id, error = %e, "Failed to delete expired refresh token");
            }
            return Err(AuthError::DeadlineExceeded(
                "Refresh token has expired".to_string(),
            ));
        }

        let access_token = self
            .tokens
            .sign_access_token(record.user_id, self.policy.access_token_ttl)
            .map_err(|e| AuthError::internal("refresh_token", e))?;

        let rotated = RefreshToken::issue(
            self.tokens
                .generate_refresh_token()
                .map_err(|e| AuthError::internal("refresh_token", e))?,
            record.user_id,
            self.policy.refresh_token_ttl,
        );

        // The store decides: a token consumed since the lookup does not rotate
        let rotated_ok = self
            .store
            .rotate_refresh_token(request.refresh_token(), &rotated)
            .await
            .map_err(|e| AuthError::internal("refresh_token", e))?;

        if !rotated_ok {
            warn!(user_id = %record.user_id, "Refresh token consumed concurrently");
            return Err(AuthError::InvalidArgument(
                "Unknown refresh token".to_string(),
            ));
        }

        info!(user_id = %record.user_id, "Refresh token rotated");

        Ok(RefreshTokenOutput {
            access_token,
            refresh_token: rotated.token,
            expiry_time: rotated.expiry_time,
        })
    }
}
