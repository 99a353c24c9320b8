use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;

use crate::auth::application::domain::entities::VerificationCode;
use crate::email::application::ports::outgoing::email_sender::EmailSender;
use crate::email::application::ports::outgoing::verification_notifier::{
    NotificationError, VerificationCodeNotifier,
};

pub const VERIFICATION_SUBJECT: &str = "Email Verification";

/// Renders verification mails and hands them to an `EmailSender`.
#[derive(Clone)]
pub struct UserEmailService {
    sender: Arc<dyn EmailSender + Send + Sync>,
    code_ttl_minutes: i64,
}

impl fmt::Debug for UserEmailService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserEmailService")
            .field("sender", &"<dyn EmailSender>")
            .field("code_ttl_minutes", &self.code_ttl_minutes)
            .finish()
    }
}

impl UserEmailService {
    pub fn new(sender: Arc<dyn EmailSender + Send + Sync>, code_ttl: chrono::Duration) -> Self {
        Self {
            sender,
            code_ttl_minutes: code_ttl.num_minutes().max(1),
        }
    }

    fn render_verification_body(&self, username: &str, code: VerificationCode) -> String {
        format!(
            "<p>Hi {username},</p>\
             <p>Your verification code is: <strong>{code}</strong></p>\
             <p>The code expires in {minutes} minutes. \
             If you did not create an account, you can ignore this email.</p>",
            username = escape_html(username),
            code = code,
            minutes = self.code_ttl_minutes,
        )
    }
}

#[async_trait]
impl VerificationCodeNotifier for UserEmailService {
    async fn send_verification_code(
        &self,
        email: &str,
        username: &str,
        code: VerificationCode,
    ) -> Result<(), NotificationError> {
        let body = self.render_verification_body(username, code);

        self.sender
            .send_email(email, VERIFICATION_SUBJECT, &body)
            .await
            .map_err(|e| NotificationError::EmailSendingFailed(e.to_string()))?;

        tracing::debug!(recipient = %email, "Verification email handed to transport");
        Ok(())
    }
}

fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}
