use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use super::{EmailError, EmailMessage, EmailProvider, SentEmail};

const RESEND_API_URL: &str = "https://api.resend.com/emails";

/// Resend HTTP API client
pub struct ResendEmailProvider {
    http: reqwest::Client,
    api_key: String,
    from_email: String,
}

#[derive(Deserialize)]
struct ResendResponse {
    id: Option<String>,
}

impl ResendEmailProvider {
    pub fn new(http: reqwest::Client, api_key: String, from_email: String) -> Self {
        Self {
            http,
            api_key,
            from_email,
        }
    }
}

#[async_trait]
impl EmailProvider for ResendEmailProvider {
    async fn send(&self, message: EmailMessage) -> Result<SentEmail, EmailError> {
        let mut body = json!({
            "from": self.from_email,
            "to": message.to,
            "subject": message.subject,
            "html": message.html,
        });
        if let Some(text) = message.text {
            body["text"] = json!(text);
        }

        let response = self
            .http
            .post(RESEND_API_URL)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(EmailError::Provider(format!(
                "{}: {}",
                status,
                detail.chars().take(200).collect::<String>()
            )));
        }

        let parsed: ResendResponse = response.json().await?;
        Ok(SentEmail { message_id: parsed.id })
    }
}
