use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use tracing::{debug, error, warn};

use super::signed_in;
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::services::EmailService;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CallbackParams {
    code: Option<String>,
    error: Option<String>,
}

/// GET /auth/google - send the browser to Google's consent screen
pub async fn redirect(State(state): State<AppState>) -> Result<Response, ApiError> {
    let url = state.google.authorization_url()?;
    Ok((StatusCode::FOUND, [(header::LOCATION, url)]).into_response())
}

/// GET /auth/google/callback - finish the OAuth flow and issue a session
pub async fn callback(
    State(state): State<AppState>,
    Query(params): Query<CallbackParams>,
) -> Result<Response, ApiError> {
    if let Some(reason) = params.error.as_deref() {
        debug!("Google returned error to callback: {}", reason);
    }
    let code = params
        .code
        .filter(|c| !c.trim().is_empty())
        .ok_or_else(|| ApiError::bad_request("Missing authorization code"))?;

    let profile = state.google.handle_callback(&code).await?;
    if profile.email_verified == Some(false) {
        error!("Google account {} has an unverified email", profile.sub);
        return Err(ApiError::unauthorized("Unauthorized"));
    }

    let user = AuthUser {
        id: profile.sub,
        email: profile.email,
        name: profile.name,
        picture: profile.picture,
    };
    let response = signed_in(&state, user.clone())?;

    let email = state.email.clone();
    tokio::spawn(async move { send_welcome(&email, &user).await });

    Ok(response)
}

/// Delivery problems are logged; they never undo the sign-in
pub(crate) async fn send_welcome(email: &EmailService, user: &AuthUser) {
    if let Err(e) = email.send_welcome_email(&user.email, user.name.as_deref()).await {
        warn!("Failed to send welcome email to {}: {}", user.email, e);
    }
}
