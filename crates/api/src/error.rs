//! API error types with HTTP response mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use inventory::InventoryError;
use thiserror::Error;

/// API-level error type that maps to HTTP responses.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Bad request from the client.
    #[error("{0}")]
    BadRequest(String),

    /// Inventory operation error.
    #[error(transparent)]
    Inventory(#[from] InventoryError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Inventory(err) => inventory_error_to_response(err),
        };

        let body = serde_json::json!({ "error": message });
        (status, axum::Json(body)).into_response()
    }
}

fn inventory_error_to_response(err: InventoryError) -> (StatusCode, String) {
    match &err {
        InventoryError::ItemNotFound(_) | InventoryError::VariantNotFound(_) => {
            (StatusCode::NOT_FOUND, err.to_string())
        }
        InventoryError::OutOfStock { .. } => (StatusCode::CONFLICT, err.to_string()),
        InventoryError::Validation(_) => (StatusCode::BAD_REQUEST, err.to_string()),
        InventoryError::Store(_) => {
            tracing::error!(error = %err, "internal server error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            )
        }
    }
}
