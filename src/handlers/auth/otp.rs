use axum::{
    extract::{rejection::JsonRejection, State},
    response::{Json, Response},
};
use serde_json::{json, Value};
use tracing::{debug, error};

use super::signed_in;
use crate::auth::otp::{generate_code, issue_challenge, normalize_email, verify_challenge, OTP_EXPIRES_IN_MINUTES};
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::state::AppState;

/// POST /auth/otp/request - email a six digit code, return its challenge
pub async fn request(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(body) = payload.map_err(|_| ApiError::bad_request("Invalid email"))?;
    let email = body
        .get("email")
        .and_then(Value::as_str)
        .and_then(normalize_email)
        .ok_or_else(|| ApiError::bad_request("Invalid email"))?;

    let code = generate_code();
    let challenge = issue_challenge(&state.jwt, &email, &code)?;

    state
        .email
        .send_otp_email(&email, &code, OTP_EXPIRES_IN_MINUTES)
        .await
        .map_err(|e| {
            error!("Failed to send code to {}: {}", email, e);
            ApiError::bad_gateway("Failed to send verification code")
        })?;

    debug!("Verification code sent to {}", email);
    Ok(Json(json!({
        "challenge": challenge,
        "expiresInMinutes": OTP_EXPIRES_IN_MINUTES,
    })))
}

/// POST /auth/otp/verify - exchange challenge and code for a session
pub async fn verify(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Response, ApiError> {
    let invalid = || ApiError::bad_request("Invalid verification payload");
    let Json(body) = payload.map_err(|_| invalid())?;
    let challenge = body.get("challenge").and_then(Value::as_str).ok_or_else(invalid)?;
    let code = body.get("code").and_then(Value::as_str).ok_or_else(invalid)?;

    let email = verify_challenge(&state.jwt, challenge, code).map_err(|e| {
        debug!("Code verification failed: {}", e);
        ApiError::unauthorized("Invalid or expired code")
    })?;

    signed_in(
        &state,
        AuthUser {
            id: email.clone(),
            email,
            name: None,
            picture: None,
        },
    )
}
