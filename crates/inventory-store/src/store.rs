use async_trait::async_trait;

use crate::{Item, ItemId, NewItem, NewVariant, Result, Variant, VariantId};

/// Persistence contract for items and variants.
///
/// All implementations must be thread-safe (Send + Sync). The store is the
/// only synchronization point for concurrent callers: `decrement_stock` must
/// be a single indivisible check-and-update.
#[async_trait]
pub trait InventoryStore: Send + Sync {
    /// Persists a new item together with its variants.
    ///
    /// Assigns ids and timestamps. Either the item and all of its variants are
    /// stored or nothing is.
    async fn insert_item(&self, item: NewItem) -> Result<Item>;

    /// Retrieves an item with its variants.
    ///
    /// Returns None if the item doesn't exist.
    async fn find_item(&self, id: ItemId) -> Result<Option<Item>>;

    /// Retrieves every item with its variants, in creation order.
    async fn list_items(&self) -> Result<Vec<Item>>;

    /// Checks whether an item exists.
    async fn item_exists(&self, id: ItemId) -> Result<bool>;

    /// Persists a new variant bound to an existing item.
    ///
    /// Fails with `ItemNotFound` if the item doesn't exist.
    async fn insert_variant(&self, item_id: ItemId, variant: NewVariant) -> Result<Variant>;

    /// Retrieves a variant by id.
    async fn find_variant(&self, id: VariantId) -> Result<Option<Variant>>;

    /// Writes every field of a variant, inserting it if it is missing.
    ///
    /// This is a plain overwrite with no stock guard; concurrent writers are
    /// last-writer-wins.
    async fn save_variant(&self, variant: &Variant) -> Result<Variant>;

    /// Checks whether a variant exists.
    async fn variant_exists(&self, id: VariantId) -> Result<bool>;

    /// Atomically decrements stock by `quantity` if and only if the current
    /// stock is at least `quantity`.
    ///
    /// Returns the number of rows affected: 1 when the decrement happened,
    /// 0 when the variant is missing or has insufficient stock.
    async fn decrement_stock(&self, id: VariantId, quantity: i32) -> Result<u64>;
}
