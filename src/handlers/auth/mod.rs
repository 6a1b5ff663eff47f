// Sign-in endpoints: Google OAuth, emailed one-time codes, and session inspection

pub mod google;
pub mod otp;
pub mod session;

pub use google::{callback as google_callback, redirect as google_redirect};
pub use otp::{request as otp_request, verify as otp_verify};
pub use session::{logout, me};

use axum::{
    http::header,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;

use crate::auth::session_cookie;
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::state::AppState;

/// Issue a session for `user`: token in the body and in the cookie
pub(crate) fn signed_in(state: &AppState, user: AuthUser) -> Result<Response, ApiError> {
    let token = state
        .jwt
        .sign(&user.id, &user.email, user.name.clone(), user.picture.clone())?;
    let cookie = session_cookie(&token, state.jwt.expires_in_seconds(), state.config.security.secure_cookies);

    tracing::info!("Session issued for {}", user.email);

    Ok((
        [(header::SET_COOKIE, cookie)],
        Json(json!({ "user": user, "token": token })),
    )
        .into_response())
}
