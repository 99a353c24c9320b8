use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, info};

use crate::auth::application::domain::errors::AuthError;
use crate::auth::application::ports::outgoing::AccountStore;

#[derive(Clone)]
pub struct LogoutRequest {
    refresh_token: String,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LogoutRequestError {
    #[error("Refresh token cannot be empty")]
    EmptyToken,
}

impl From<LogoutRequestError> for AuthError {
    fn from(error: LogoutRequestError) -> Self {
        AuthError::InvalidArgument(error.to_string())
    }
}

impl std::fmt::Debug for LogoutRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogoutRequest").finish_non_exhaustive()
    }
}

impl LogoutRequest {
    pub fn new(refresh_token: String) -> Result<Self, LogoutRequestError> {
        let refresh_token = refresh_token.trim();
        if refresh_token.is_empty() {
            return Err(LogoutRequestError::EmptyToken);
        }
        Ok(Self {
            refresh_token: refresh_token.to_string(),
        })
    }

    pub fn refresh_token(&self) -> &str {
        &self.refresh_token
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogoutOutput {
    pub success: bool,
    pub message: String,
}

#[async_trait]
pub trait ILogoutUseCase: Send + Sync {
    async fn execute(&self, request: LogoutRequest) -> Result<LogoutOutput, AuthError>;
}

/// Deletes exactly the presented refresh token. Idempotent.
#[derive(Clone)]
pub struct LogoutUseCase {
    store: Arc<dyn AccountStore>,
}

impl LogoutUseCase {
    pub fn new(store: Arc<dyn AccountStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl ILogoutUseCase for LogoutUseCase {
    async fn execute(&self, request: LogoutRequest) -> Result<LogoutOutput, AuthError> {
        let removed = self
            .store
            .delete_refresh_token(request.refresh_token())
            .await
            .map_err(|e| AuthError::internal("logout", e))?;

        let message = if removed {
            info!("Refresh token revoked");
            "Logged out successfully"
        } else {
            debug!("Logout with unknown or already revoked token");
            "Session already ended"
        };

        Ok(LogoutOutput {
            success: true,
            message: message.to_string(),
        })
    }
}
