//! HTTP route handlers and the state they share.

pub mod health;
pub mod items;
pub mod metrics;
pub mod orders;
pub mod variants;

use std::str::FromStr;

use inventory::{InventoryService, InventoryStore, Item, Money, Variant};
use serde::Serialize;

use crate::error::ApiError;

/// Shared application state accessible from all handlers.
pub struct AppState<S: InventoryStore> {
    pub inventory: InventoryService<S>,
}

// -- Response types --

#[derive(Debug, Serialize)]
pub struct ItemResponse {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub variants: Vec<VariantResponse>,
}

#[derive(Debug, Serialize)]
pub struct VariantResponse {
    pub id: String,
    pub item_id: String,
    pub name: String,
    pub price: Money,
    pub stock_quantity: i32,
}

impl From<Item> for ItemResponse {
    fn from(item: Item) -> Self {
        Self {
            id: item.id.to_string(),
            name: item.name,
            description: item.description,
            variants: item.variants.into_iter().map(VariantResponse::from).collect(),
        }
    }
}

impl From<Variant> for VariantResponse {
    fn from(variant: Variant) -> Self {
        Self {
            id: variant.id.to_string(),
            item_id: variant.item_id.to_string(),
            name: variant.name,
            price: variant.price,
            stock_quantity: variant.stock_quantity,
        }
    }
}

/// Parses a path or body identifier, rejecting malformed values with 400.
fn parse_id<T>(id: &str) -> Result<T, ApiError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    id.parse()
        .map_err(|e| ApiError::BadRequest(format!("Invalid ID format: {e}")))
}
