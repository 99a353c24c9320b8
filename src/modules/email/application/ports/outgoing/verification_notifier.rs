use crate::auth::application::domain::entities::VerificationCode;

#[derive(Debug, Clone, thiserror::Error)]
pub enum NotificationError {
    #[error("Email sending failed: {0}")]
    EmailSendingFailed(String),
}

/// Delivers a verification code to the address a user registered with.
#[async_trait::async_trait]
pub trait VerificationCodeNotifier: Send + Sync {
    async fn send_verification_code(
        &self,
        email: &str,
        username: &str,
        code: VerificationCode,
    ) -> Result<(), NotificationError>;
}
