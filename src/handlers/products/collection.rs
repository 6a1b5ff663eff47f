use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde_json::Value;
use tracing::{debug, error};

use super::payload::new_product_from_json;
use super::INVALID_PAYLOAD;
use crate::database::models::Product;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

/// GET /products - list every product
pub async fn get(State(state): State<AppState>) -> ApiResult<Vec<Product>> {
    match state.products.list_products().await {
        Ok(products) => Ok(ApiResponse::success(products)),
        Err(e) => {
            error!("Failed to list products: {}", e);
            Err(ApiError::internal_server_error("Failed to list products"))
        }
    }
}

/// POST /products - create a product from a complete payload
pub async fn post(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Product> {
    let body = match payload {
        Ok(Json(body)) => body,
        Err(rejection) => {
            debug!("Rejected create body: {}", rejection);
            return Err(ApiError::bad_request(INVALID_PAYLOAD));
        }
    };

    let Some(input) = new_product_from_json(&body) else {
        debug!("Create payload failed validation");
        return Err(ApiError::bad_request(INVALID_PAYLOAD));
    };

    match state.products.create_product(input).await {
        Ok(product) => Ok(ApiResponse::created(product)),
        Err(e) => {
            error!("Failed to create product: {}", e);
            Err(ApiError::internal_server_error("Failed to create product"))
        }
    }
}
