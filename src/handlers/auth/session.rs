use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Json},
    Extension,
};

use crate::auth::clear_session_cookie;
use crate::middleware::AuthUser;
use crate::state::AppState;

/// GET /auth/me - the signed-in user
pub async fn me(Extension(user): Extension<AuthUser>) -> Json<AuthUser> {
    Json(user)
}

/// POST /auth/logout - drop the session cookie
pub async fn logout(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::NO_CONTENT,
        [(header::SET_COOKIE, clear_session_cookie(state.config.security.secure_cookies))],
    )
}
