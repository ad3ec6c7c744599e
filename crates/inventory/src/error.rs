//! Inventory error types.

use common::{ItemId, VariantId};
use inventory_store::{Money, StoreError};
use thiserror::Error;

/// Rejected input. Raised before anything is written.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Item name is empty or whitespace.
    #[error("Item name must not be empty")]
    EmptyItemName,

    /// Variant name is empty or whitespace.
    #[error("Variant name must not be empty")]
    EmptyVariantName,

    /// Price is below zero.
    #[error("Invalid price: {price} (must not be negative)")]
    NegativePrice { price: Money },

    /// Stock quantity is below zero.
    #[error("Invalid stock quantity: {quantity} (must not be negative)")]
    NegativeStock { quantity: i32 },

    /// Sale quantity is zero or below.
    #[error("Invalid quantity: {quantity} (must be greater than 0)")]
    NonPositiveQuantity { quantity: i32 },
}

/// Errors that can occur during inventory operations.
#[derive(Debug, Error)]
pub enum InventoryError {
    /// No item with this id exists.
    #[error("Item not found with id: {0}")]
    ItemNotFound(ItemId),

    /// No variant with this id exists.
    #[error("Variant not found with id: {0}")]
    VariantNotFound(VariantId),

    /// The variant exists but holds less stock than requested.
    #[error("Insufficient stock for variant id: {variant_id} (requested {requested})")]
    OutOfStock { variant_id: VariantId, requested: i32 },

    /// The input was rejected.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// An error occurred in the store.
    #[error("Store error: {0}")]
    Store(StoreError),
}

impl InventoryError {
    /// Returns true for either not-found variant.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            InventoryError::ItemNotFound(_) | InventoryError::VariantNotFound(_)
        )
    }
}

impl From<StoreError> for InventoryError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::ItemNotFound(id) => InventoryError::ItemNotFound(id),
            other => InventoryError::Store(other),
        }
    }
}
