use async_trait::async_trait;
use tracing::info;

use super::{EmailError, EmailMessage, EmailProvider, SentEmail};

/// Writes messages to the log instead of sending them. Development only.
pub struct LogEmailProvider;

#[async_trait]
impl EmailProvider for LogEmailProvider {
    async fn send(&self, message: EmailMessage) -> Result<SentEmail, EmailError> {
        info!(
            to = %message.to,
            subject = %message.subject,
            "email not sent (log provider): {}",
            message.text.as_deref().unwrap_or(&message.html)
        );
        Ok(SentEmail::default())
    }
}
