use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use serde::Serialize;
use tracing::info;

use crate::auth::application::domain::errors::AuthError;
use crate::auth::application::domain::policies::LifecyclePolicy;
use crate::auth::application::ports::outgoing::{AccountStore, VerificationCodeGenerator};
use crate::email::application::ports::outgoing::VerificationCodeNotifier;

#[derive(Debug, Clone)]
pub struct SendVerifyCodeRequest {
    identifier: String,
}

impl SendVerifyCodeRequest {
    pub fn new(identifier: String) -> Self {
        Self {
            identifier: identifier.trim().to_string(),
        }
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SendVerifyCodeOutput {
    pub success: bool,
    pub message: String,
}

#[async_trait]
pub trait ISendVerifyCodeUseCase: Send + Sync {
    async fn execute(
        &self,
        request: SendVerifyCodeRequest,
    ) -> Result<SendVerifyCodeOutput, AuthError>;
}

/// Issues a fresh code for a pending account, replacing the outstanding one.
#[derive(Clone)]
pub struct SendVerifyCodeUseCase {
    store: Arc<dyn AccountStore>,
    codes: Arc<dyn VerificationCodeGenerator>,
    notifier: Arc<dyn VerificationCodeNotifier>,
    policy: LifecyclePolicy,
}

impl SendVerifyCodeUseCase {
    pub fn new(
        store: Arc<dyn AccountStore>,
        codes: Arc<dyn VerificationCodeGenerator>,
        notifier: Arc<dyn VerificationCodeNotifier>,
        policy: LifecyclePolicy,
    ) -> Self {
        Self {
            store,
            codes,
            notifier,
            policy,
        }
    }
}

#[async_trait]
impl ISendVerifyCodeUseCase for SendVerifyCodeUseCase {
    async fn execute(
        &self,
        request: SendVerifyCodeRequest,
    ) -> Result<SendVerifyCodeOutput, AuthError> {
        let user = self
            .store
            .find_user_by_identifier(request.identifier())
            .await
            .map_err(|e| AuthError::internal("send_verify_code", e))?
            .ok_or(AuthError::NotFound)?;

        // Verification is one-way; a verified account gets no new code.
        if user.is_verified {
            return Ok(SendVerifyCodeOutput {
                success: true,
                message: "Email already verified".to_string(),
            });
        }

        let code = self.codes.next();
        let expires_at = Utc::now() + self.policy.verification_code_ttl;

        self.store
            .set_verification_code(user.id, code, expires_at)
            .await
            .map_err(|e| AuthError::internal("send_verify_code", e))?;

        self.notifier
            .send_verification_code(&user.email, &user.username, code)
            .await
            .map_err(|e| AuthError::internal("send_verify_code", e))?;

        info!(user_id = %user.id, "Verification code reissued");

        Ok(SendVerifyCodeOutput {
            success: true,
            message: "Verification code sent".to_string(),
        })
    }
}
