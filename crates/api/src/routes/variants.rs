//! Variant endpoints: read-back and the administrative stock override.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use inventory::{InventoryStore, SetVariantStock, VariantId};

use super::{AppState, VariantResponse, parse_id};
use crate::error::ApiError;

/// GET /variants/:variant_id — load a variant by ID.
#[tracing::instrument(skip(state))]
pub async fn get<S: InventoryStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(variant_id): Path<String>,
) -> Result<Json<VariantResponse>, ApiError> {
    let variant_id: VariantId = parse_id(&variant_id)?;
    let variant = state.inventory.get_variant(variant_id).await?;

    Ok(Json(variant.into()))
}

/// PATCH /variants/:variant_id/stock — overwrite stock with an absolute quantity.
///
/// The body is a bare JSON integer.
#[tracing::instrument(skip(state))]
pub async fn update_stock<S: InventoryStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(variant_id): Path<String>,
    Json(quantity): Json<i32>,
) -> Result<Json<VariantResponse>, ApiError> {
    let variant_id: VariantId = parse_id(&variant_id)?;

    let variant = state
        .inventory
        .set_variant_stock(SetVariantStock::new(variant_id, quantity))
        .await?;

    Ok(Json(variant.into()))
}
