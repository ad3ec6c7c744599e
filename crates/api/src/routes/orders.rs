//! Order endpoint: sells units of a variant.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use inventory::{InventoryStore, SellVariant, VariantId};
use serde::Deserialize;

use super::{AppState, parse_id};
use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct SellRequest {
    #[serde(alias = "variantId")]
    pub variant_id: String,
    pub quantity: i32,
}

/// POST /orders — sell `quantity` units of a variant.
///
/// Responds 200 with an empty body on success, 404 for an unknown variant and
/// 409 when stock is insufficient.
#[tracing::instrument(skip(state))]
pub async fn sell<S: InventoryStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Json(req): Json<SellRequest>,
) -> Result<StatusCode, ApiError> {
    let variant_id: VariantId = parse_id(&req.variant_id)?;

    state
        .inventory
        .sell(SellVariant::new(variant_id, req.quantity))
        .await?;

    Ok(StatusCode::OK)
}
