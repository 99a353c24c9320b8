use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use crate::auth::application::domain::entities::{User, VerificationCode};
use crate::auth::application::domain::errors::AuthError;
use crate::auth::application::ports::outgoing::AccountStore;

#[derive(Debug, Clone)]
pub struct VerifyEmailRequest {
    identifier: String,
    code: i32,
}

impl VerifyEmailRequest {
    pub fn new(identifier: String, code: i32) -> Self {
        Self {
            identifier: identifier.trim().to_string(),
            code,
        }
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn code(&self) -> i32 {
        self.code
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VerifyEmailOutput {
    pub success: bool,
    pub message: String,
}

#[async_trait]
pub trait IVerifyUserEmailUseCase: Send + Sync {
    async fn execute(&self, request: VerifyEmailRequest) -> Result<VerifyEmailOutput, AuthError>;
}

#[derive(Clone)]
pub struct VerifyUserEmailUseCase {
    store: Arc<dyn AccountStore>,
}

impl VerifyUserEmailUseCase {
    pub fn new(store: Arc<dyn AccountStore>) -> Self {
        Self { store }
    }
}

impl VerifyUserEmailUseCase {
    async fn load(&self, identifier: &str) -> Result<User, AuthError> {
        self.store
            .find_user_by_identifier(identifier)
            .await
            .map_err(|e| AuthError::internal("verify_email", e))?
            .ok_or(AuthError::NotFound)
    }
}

/// Checks run in a fixed order: already verified, expiry, then equality.
/// An expired code never reveals whether it was correct.
fn check_pending(
    user: &User,
    code: i32,
    now: DateTime<Utc>,
) -> Result<VerificationCode, AuthError> {
    if user.is_verified {
        return Err(AuthError::AlreadyExists(
            "Email already verified".to_string(),
        ));
    }

    if user.verification_window_closed(now) {
        warn!(user_id = %user.id, "Verification attempted with expired code");
        return Err(AuthError::DeadlineExceeded(
            "Verification code has expired".to_string(),
        ));
    }

    match user.verification_code {
        Some(live) if user.code_matches(code) => Ok(live),
        _ => {
            warn!(user_id = %user.id, "Verification attempted with wrong code");
            Err(AuthError::Unauthenticated(
                "Invalid verification code".to_string(),
            ))
        }
    }
}

#[async_trait]
impl IVerifyUserEmailUseCase for VerifyUserEmailUseCase {
    async fn execute(&self, request: VerifyEmailRequest) -> Result<VerifyEmailOutput, AuthError> {
        let user = self.load(request.identifier()).await?;
        let now = Utc::now();
        let code = check_pending(&user, request.code(), now)?;

        let verified = self
            .store
            .mark_verified(user.id, code, now)
            .await
            .map_err(|e| AuthError::internal("verify_email", e))?;

        if !verified {
            // Another verify or a resend changed the row after it was read
            let current = self.load(request.identifier()).await?;
            check_pending(&current, request.code(), Utc::now())?;
            return Err(AuthError::Unauthenticated(
                "Invalid verification code".to_string(),
            ));
        }

        info!(user_id = %user.id, "Email verified");

        Ok(VerifyEmailOutput {
            success: true,
            message: "Email verified successfully".to_string(),
        })
    }
}
