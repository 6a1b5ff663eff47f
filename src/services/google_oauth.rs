use serde::Deserialize;
use thiserror::Error;
use url::Url;

use crate::config::GoogleConfig;

const GOOGLE_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const GOOGLE_USERINFO_URL: &str = "https://www.googleapis.com/oauth2/v3/userinfo";

#[derive(Debug, Error)]
pub enum OAuthError {
    #[error("{0} is not set")]
    NotConfigured(&'static str),

    #[error("request to Google failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("token exchange rejected ({status}): {body}")]
    TokenExchange { status: u16, body: String },

    #[error("userinfo request rejected ({0})")]
    UserInfo(u16),
}

#[derive(Debug, Clone, Deserialize)]
pub struct GoogleTokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub expires_in: Option<u64>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub id_token: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, serde::Serialize)]
pub struct GoogleUserInfo {
    pub sub: String,
    pub email: String,
    #[serde(default)]
    pub email_verified: Option<bool>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub given_name: Option<String>,
    #[serde(default)]
    pub family_name: Option<String>,
    #[serde(default)]
    pub picture: Option<String>,
}

/// Authorization-code flow against Google's OAuth 2.0 endpoints
#[derive(Clone)]
pub struct GoogleOAuthClient {
    http: reqwest::Client,
    config: GoogleConfig,
}

impl GoogleOAuthClient {
    pub fn new(http: reqwest::Client, config: GoogleConfig) -> Self {
        Self { http, config }
    }

    fn client_id(&self) -> Result<&str, OAuthError> {
        self.config
            .client_id
            .as_deref()
            .ok_or(OAuthError::NotConfigured("GOOGLE_CLIENT_ID"))
    }

    /// Consent screen URL the browser is redirected to
    pub fn authorization_url(&self) -> Result<String, OAuthError> {
        let client_id = self.client_id()?;
        let url = Url::parse_with_params(
            GOOGLE_AUTH_URL,
            &[
                ("client_id", client_id),
                ("redirect_uri", self.config.redirect_uri.as_str()),
                ("response_type", "code"),
                ("scope", "openid email profile"),
                ("access_type", "offline"),
                ("prompt", "consent"),
            ],
        )
        .map_err(|_| OAuthError::NotConfigured("GOOGLE_AUTH_URL"))?;
        Ok(url.into())
    }

    pub async fn exchange_code(&self, code: &str) -> Result<GoogleTokenResponse, OAuthError> {
        let client_id = self.client_id()?;
        let client_secret = self
            .config
            .client_secret
            .as_deref()
            .ok_or(OAuthError::NotConfigured("GOOGLE_CLIENT_SECRET"))?;

        let response = self
            .http
            .post(GOOGLE_TOKEN_URL)
            .form(&[
                ("client_id", client_id),
                ("client_secret", client_secret),
                ("code", code),
                ("grant_type", "authorization_code"),
                ("redirect_uri", self.config.redirect_uri.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(OAuthError::TokenExchange {
                status: status.as_u16(),
                body: body.chars().take(200).collect(),
            });
        }

        Ok(response.json().await?)
    }

    pub async fn user_info(&self, access_token: &str) -> Result<GoogleUserInfo, OAuthError> {
        let response = self
            .http
            .get(GOOGLE_USERINFO_URL)
            .bearer_auth(access_token)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(OAuthError::UserInfo(status.as_u16()));
        }

        Ok(response.json().await?)
    }

    /// Exchange the callback code and fetch the signed-in user's profile
    pub async fn handle_callback(&self, code: &str) -> Result<GoogleUserInfo, OAuthError> {
        let tokens = self.exchange_code(code).await?;
        self.user_info(&tokens.access_token).await
    }
}
