use axum::{
    extract::State,
    http::{header, HeaderValue, Method, StatusCode},
    middleware,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use serde_json::{json, Value};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use tracing::{error, warn};

use crate::database::DatabaseManager;
use crate::handlers::{auth, products};
use crate::middleware::jwt_auth_middleware;
use crate::state::AppState;

/// Full HTTP surface with shared layers applied
pub fn app(state: AppState) -> Router {
    let cors = cors_layer(&state.config.security.cors_origins);

    Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        .merge(product_routes())
        .merge(auth_routes(state.clone()))
        // Global middleware
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(products::product_list).post(products::product_create))
        .route(
            "/products/:id",
            get(products::product_get)
                .patch(products::product_update)
                .delete(products::product_delete),
        )
}

fn auth_routes(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/auth/me", get(auth::me))
        .route_layer(middleware::from_fn_with_state(state, jwt_auth_middleware));

    Router::new()
        .route("/auth/google", get(auth::google_redirect))
        .route("/auth/google/callback", get(auth::google_callback))
        .route("/auth/otp/request", post(auth::otp_request))
        .route("/auth/otp/verify", post(auth::otp_verify))
        .route("/auth/logout", post(auth::logout))
        .merge(protected)
}

/// Credentialed CORS for the configured origins; `*` mirrors the caller
fn cors_layer(origins: &[String]) -> CorsLayer {
    let allow_origin = if origins.iter().any(|o| o == "*") {
        AllowOrigin::mirror_request()
    } else {
        let parsed: Vec<HeaderValue> = origins
            .iter()
            .filter_map(|origin| match HeaderValue::from_str(origin) {
                Ok(value) => Some(value),
                Err(_) => {
                    warn!("Ignoring invalid CORS origin {:?}", origin);
                    None
                }
            })
            .collect();
        AllowOrigin::list(parsed)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true)
}

async fn root() -> Json<Value> {
    Json(json!({
        "name": "PeterParts API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "products": "/products[/:id]",
            "auth": "/auth/google, /auth/otp/request, /auth/otp/verify, /auth/me, /auth/logout",
            "health": "/health",
        }
    }))
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    let database = match &state.pool {
        Some(pool) => DatabaseManager::health_check(pool).await.map_err(|e| e.to_string()),
        None => Err("no database pool".to_string()),
    };

    match database {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({ "status": "ok", "timestamp": now, "database": "ok" })),
        ),
        Err(e) => {
            error!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "status": "degraded", "timestamp": now, "database": "unavailable" })),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::http::{header, HeaderName, Method, StatusCode};
    use std::sync::Arc;

    use crate::testing::{request, send, test_app, MemoryProductRepository};

    #[tokio::test]
    async fn root_names_the_service() {
        let (status, body) = request(test_app(Arc::new(MemoryProductRepository::default())), Method::GET, "/", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["name"], "PeterParts API");
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    }

    #[tokio::test]
    async fn health_without_database_is_503() {
        let (status, body) =
            request(test_app(Arc::new(MemoryProductRepository::default())), Method::GET, "/health", None).await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["database"], "unavailable");
    }

    #[tokio::test]
    async fn unknown_route_is_404() {
        let (status, _) =
            request(test_app(Arc::new(MemoryProductRepository::default())), Method::GET, "/nope", None).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn cors_allows_configured_origin_with_credentials() {
        let (status, headers, _) = send(
            test_app(Arc::new(MemoryProductRepository::default())),
            Method::OPTIONS,
            "/products",
            "",
            &[
                (header::ORIGIN, "http://localhost:5173"),
                (header::ACCESS_CONTROL_REQUEST_METHOD, "PATCH"),
            ],
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "http://localhost:5173");
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_CREDENTIALS], "true");
    }

    #[tokio::test]
    async fn cors_ignores_unknown_origin() {
        let (_, headers, _) = send(
            test_app(Arc::new(MemoryProductRepository::default())),
            Method::GET,
            "/products",
            "",
            &[(HeaderName::from_static("origin"), "https://evil.example")],
        )
        .await;

        assert!(headers.get(header::ACCESS_CONTROL_ALLOW_ORIGIN).is_none());
    }
}
