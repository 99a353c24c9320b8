use crate::email::application::ports::outgoing::email_sender::{EmailSendError, EmailSender};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

/// (to, subject, html_body)
pub type SentEmail = (String, String, String);

/// In-memory sender for tests and local runs without SMTP.
#[derive(Clone, Default)]
pub struct MockEmailSender {
    sent_emails: Arc<Mutex<Vec<SentEmail>>>,
}

impl MockEmailSender {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_sent_emails(&self) -> Vec<SentEmail> {
        self.sent_emails
            .lock()
            .map(|sent| sent.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl EmailSender for MockEmailSender {
    async fn send_email(
        &self,
        to: &str,
        subject: &str,
        html_body: &str,
    ) -> Result<(), EmailSendError> {
        let mut sent = self
            .sent_emails
            .lock()
            .map_err(|e| EmailSendError::TransportFailed(e.to_string()))?;
        sent.push((to.to_string(), subject.to_string(), html_body.to_string()));
        Ok(())
    }
}
