//! Inventory core.
//!
//! This crate enforces the item/variant aggregate rules on top of an
//! [`InventoryStore`]:
//! - commands carrying the input for each write operation, with validation
//! - `InventoryService` exposing create-item, add-variant, set-stock and sell
//! - `InventoryError` distinguishing not-found, out-of-stock and validation failures

pub mod commands;
pub mod error;
pub mod service;

pub use commands::{AddVariant, CreateItem, SellVariant, SetVariantStock};
pub use error::{InventoryError, ValidationError};
pub use inventory_store::{
    InMemoryInventoryStore, InventoryStore, Item, ItemId, Money, NewItem, NewVariant,
    PostgresInventoryStore, StoreError, Variant, VariantId,
};
pub use service::InventoryService;
