//! Item endpoints: create, list, get, and add a variant.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use inventory::{AddVariant, CreateItem, InventoryStore, ItemId, Money, NewVariant};
use serde::Deserialize;

use super::{AppState, ItemResponse, VariantResponse, parse_id};
use crate::error::ApiError;

// -- Request types --

#[derive(Debug, Deserialize)]
pub struct CreateItemRequest {
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub variants: Vec<VariantRequest>,
}

#[derive(Debug, Deserialize)]
pub struct VariantRequest {
    pub name: String,
    pub price: Money,
    #[serde(alias = "stockQuantity")]
    pub stock_quantity: i32,
}

impl From<VariantRequest> for NewVariant {
    fn from(req: VariantRequest) -> Self {
        NewVariant::new(req.name, req.price, req.stock_quantity)
    }
}

// -- Handlers --

/// POST /items — create a new item, optionally with variants.
#[tracing::instrument(skip(state, req))]
pub async fn create<S: InventoryStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Json(req): Json<CreateItemRequest>,
) -> Result<(StatusCode, Json<ItemResponse>), ApiError> {
    let cmd = CreateItem {
        name: req.name,
        description: req.description,
        variants: req.variants.into_iter().map(NewVariant::from).collect(),
    };

    let item = state.inventory.create_item(cmd).await?;

    Ok((StatusCode::CREATED, Json(item.into())))
}

/// GET /items — list all items with their variants.
#[tracing::instrument(skip(state))]
pub async fn list<S: InventoryStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
) -> Result<Json<Vec<ItemResponse>>, ApiError> {
    let items = state.inventory.list_items().await?;

    Ok(Json(items.into_iter().map(ItemResponse::from).collect()))
}

/// GET /items/:id — load an item by ID.
#[tracing::instrument(skip(state))]
pub async fn get<S: InventoryStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> Result<Json<ItemResponse>, ApiError> {
    let item_id: ItemId = parse_id(&id)?;
    let item = state.inventory.get_item(item_id).await?;

    Ok(Json(item.into()))
}

/// POST /items/:item_id/variants — add a variant to an existing item.
#[tracing::instrument(skip(state, req))]
pub async fn add_variant<S: InventoryStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(item_id): Path<String>,
    Json(req): Json<VariantRequest>,
) -> Result<(StatusCode, Json<VariantResponse>), ApiError> {
    let item_id: ItemId = parse_id(&item_id)?;

    let variant = state
        .inventory
        .add_variant(AddVariant::new(item_id, req.into()))
        .await?;

    Ok((StatusCode::CREATED, Json(variant.into())))
}
