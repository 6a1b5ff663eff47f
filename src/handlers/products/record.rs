use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use serde_json::Value;
use tracing::{debug, error};

use super::payload::product_changes_from_json;
use super::{INVALID_PAYLOAD, NOT_FOUND};
use crate::database::is_record_not_found;
use crate::database::models::Product;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

/// GET /products/:id - fetch one product
pub async fn get(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Product> {
    match state.products.get_product_by_id(&id).await {
        Ok(Some(product)) => Ok(ApiResponse::success(product)),
        Ok(None) => Err(ApiError::not_found(NOT_FOUND)),
        Err(e) => {
            error!("Failed to fetch product {}: {}", id, e);
            Err(ApiError::internal_server_error("Failed to fetch product"))
        }
    }
}

/// PATCH /products/:id - apply the supplied fields only
pub async fn patch(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Product> {
    let body = match payload {
        Ok(Json(body)) => body,
        Err(rejection) => {
            debug!("Rejected update body for {}: {}", id, rejection);
            return Err(ApiError::bad_request(INVALID_PAYLOAD));
        }
    };

    let changes = product_changes_from_json(&body).map_err(|reason| {
        debug!("Update of {} refused: {}", id, reason);
        ApiError::bad_request(reason.to_string())
    })?;

    match state.products.update_product(&id, changes).await {
        Ok(product) => Ok(ApiResponse::success(product)),
        Err(e) if is_record_not_found(&e) => Err(ApiError::not_found(NOT_FOUND)),
        Err(e) => {
            error!("Failed to update product {}: {}", id, e);
            Err(ApiError::internal_server_error("Failed to update product"))
        }
    }
}

/// DELETE /products/:id - remove a product permanently
pub async fn delete(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<()> {
    match state.products.delete_product(&id).await {
        Ok(()) => Ok(ApiResponse::no_content()),
        Err(e) if is_record_not_found(&e) => Err(ApiError::not_found(NOT_FOUND)),
        Err(e) => {
            error!("Failed to delete product {}: {}", id, e);
            Err(ApiError::internal_server_error("Failed to delete product"))
        }
    }
}
