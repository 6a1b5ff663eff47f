//! Transactional email behind a swappable provider.

use async_trait::async_trait;
use chrono::{Datelike, Utc};
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;

use crate::config::{EmailConfig, EmailProviderKind};

pub mod log;
pub mod resend;

pub use self::log::LogEmailProvider;
pub use self::resend::ResendEmailProvider;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub html: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct SentEmail {
    pub message_id: Option<String>,
}

#[derive(Debug, Error)]
pub enum EmailError {
    #[error("email provider not configured: {0}")]
    NotConfigured(&'static str),

    #[error("email transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("email provider rejected message: {0}")]
    Provider(String),
}

#[async_trait]
pub trait EmailProvider: Send + Sync {
    async fn send(&self, message: EmailMessage) -> Result<SentEmail, EmailError>;
}

/// Select the provider named in configuration
pub fn provider_from_config(config: &EmailConfig, http: reqwest::Client) -> Result<Arc<dyn EmailProvider>, EmailError> {
    match config.provider {
        EmailProviderKind::Resend => {
            let api_key = config
                .resend_api_key
                .clone()
                .ok_or(EmailError::NotConfigured("RESEND_API_KEY"))?;
            Ok(Arc::new(ResendEmailProvider::new(http, api_key, config.from_email.clone())))
        }
        EmailProviderKind::Log => Ok(Arc::new(LogEmailProvider)),
    }
}

/// Renders PeterParts messages and hands them to the provider
#[derive(Clone)]
pub struct EmailService {
    provider: Arc<dyn EmailProvider>,
}

impl EmailService {
    pub fn new(provider: Arc<dyn EmailProvider>) -> Self {
        Self { provider }
    }

    pub async fn send_otp_email(&self, to: &str, code: &str, expires_in_minutes: i64) -> Result<SentEmail, EmailError> {
        let html = format!(
            r#"<!DOCTYPE html>
<html>
  <head><meta charset="utf-8"><title>Your Verification Code</title></head>
  <body style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto; padding: 20px;">
    <h1 style="color: #333;">Your Verification Code</h1>
    <p style="font-size: 16px; color: #666;">Use the following code to verify your email address:</p>
    <div style="background-color: #f5f5f5; padding: 20px; text-align: center; margin: 20px 0; border-radius: 8px;">
      <span style="font-size: 32px; font-weight: bold; letter-spacing: 8px; color: #333;">{code}</span>
    </div>
    <p style="font-size: 14px; color: #999;">This code will expire in {minutes} minutes.</p>
    <p style="font-size: 14px; color: #999;">If you didn't request this code, you can safely ignore this email.</p>
    <hr style="border: none; border-top: 1px solid #eee; margin: 20px 0;">
    <p style="font-size: 12px; color: #999;">&copy; {year} PeterParts. All rights reserved.</p>
  </body>
</html>"#,
            code = escape_html(code),
            minutes = expires_in_minutes,
            year = Utc::now().year(),
        );

        let text = format!(
            "Your verification code is: {}\n\nThis code will expire in {} minutes.\n\nIf you didn't request this code, you can safely ignore this email.",
            code, expires_in_minutes
        );

        self.provider
            .send(EmailMessage {
                to: to.to_string(),
                subject: "Your PeterParts Verification Code".to_string(),
                html,
                text: Some(text),
            })
            .await
    }

    /// Greets a newly signed-in user; a missing name falls back to "there"
    pub async fn send_welcome_email(&self, to: &str, name: Option<&str>) -> Result<SentEmail, EmailError> {
        let display_name = name.map(str::trim).filter(|n| !n.is_empty()).unwrap_or("there");

        let html = format!(
            r#"<!DOCTYPE html>
<html>
  <head><meta charset="utf-8"><title>Welcome to PeterParts</title></head>
  <body style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto; padding: 20px;">
    <h1 style="color: #333;">Welcome to PeterParts!</h1>
    <p style="font-size: 16px; color: #666;">Hi {name},</p>
    <p style="font-size: 16px; color: #666;">Thank you for joining PeterParts. We're excited to have you!</p>
    <p style="font-size: 16px; color: #666;">Start exploring our collection of premium Kitchenaid and Cuisinart gears and appliances.</p>
    <hr style="border: none; border-top: 1px solid #eee; margin: 20px 0;">
    <p style="font-size: 12px; color: #999;">&copy; {year} PeterParts. All rights reserved.</p>
  </body>
</html>"#,
            name = escape_html(display_name),
            year = Utc::now().year(),
        );

        let text = format!(
            "Welcome to PeterParts, {}!\n\nThank you for joining PeterParts. We're excited to have you!\n\nStart exploring our collection of premium Kitchenaid and Cuisinart gears and appliances.",
            display_name
        );

        self.provider
            .send(EmailMessage {
                to: to.to_string(),
                subject: "Welcome to PeterParts!".to_string(),
                html,
                text: Some(text),
            })
            .await
    }
}

fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}
