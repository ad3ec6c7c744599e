//! Inventory service: the business operations over an explicitly passed store.

use common::{ItemId, VariantId};
use inventory_store::{InventoryStore, Item, Variant};

use crate::commands::{AddVariant, CreateItem, SellVariant, SetVariantStock};
use crate::error::InventoryError;

/// Service for managing items, variants and stock.
///
/// Holds no locks of its own. The store is the only synchronization point;
/// `sell` is race-free because the store executes the guarded decrement as a
/// single atomic operation.
pub struct InventoryService<S: InventoryStore> {
    store: S,
}

impl<S: InventoryStore> InventoryService<S> {
    /// Creates a new inventory service with the given store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Returns a reference to the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Creates an item and binds any supplied variants to it, in one store write.
    #[tracing::instrument(skip(self, cmd), fields(name = %cmd.name, variants = cmd.variants.len()))]
    pub async fn create_item(&self, cmd: CreateItem) -> Result<Item, InventoryError> {
        cmd.validate()?;

        let item = self.store.insert_item(cmd.into()).await?;

        metrics::counter!("inventory_items_created_total").increment(1);
        metrics::counter!("inventory_variants_created_total")
            .increment(item.variants.len() as u64);
        tracing::info!(item_id = %item.id, "item created");
        Ok(item)
    }

    /// Lists every item with its variants, in creation order.
    #[tracing::instrument(skip(self))]
    pub async fn list_items(&self) -> Result<Vec<Item>, InventoryError> {
        Ok(self.store.list_items().await?)
    }

    /// Loads an item by ID.
    #[tracing::instrument(skip(self))]
    pub async fn get_item(&self, id: ItemId) -> Result<Item, InventoryError> {
        self.store
            .find_item(id)
            .await?
            .ok_or(InventoryError::ItemNotFound(id))
    }

    /// Loads a variant by ID.
    #[tracing::instrument(skip(self))]
    pub async fn get_variant(&self, id: VariantId) -> Result<Variant, InventoryError> {
        self.store
            .find_variant(id)
            .await?
            .ok_or(InventoryError::VariantNotFound(id))
    }

    /// Adds a variant to an existing item.
    ///
    /// Nothing is written when the item doesn't exist.
    #[tracing::instrument(skip(self, cmd), fields(item_id = %cmd.item_id))]
    pub async fn add_variant(&self, cmd: AddVariant) -> Result<Variant, InventoryError> {
        cmd.validate()?;

        if !self.store.item_exists(cmd.item_id).await? {
            return Err(InventoryError::ItemNotFound(cmd.item_id));
        }

        let variant = self.store.insert_variant(cmd.item_id, cmd.variant).await?;

        metrics::counter!("inventory_variants_created_total").increment(1);
        tracing::info!(variant_id = %variant.id, "variant added");
        Ok(variant)
    }

    /// Overwrites a variant's stock with an absolute quantity.
    ///
    /// This is an administrative override: a plain read-modify-write that
    /// bypasses the guarded decrement. A concurrent `sell` on the same variant
    /// is last-writer-wins.
    #[tracing::instrument(skip(self))]
    pub async fn set_variant_stock(
        &self,
        cmd: SetVariantStock,
    ) -> Result<Variant, InventoryError> {
        cmd.validate()?;

        let mut variant = self.get_variant(cmd.variant_id).await?;
        let previous = variant.stock_quantity;
        variant.stock_quantity = cmd.quantity;
        let variant = self.store.save_variant(&variant).await?;

        metrics::counter!("inventory_stock_updates_total").increment(1);
        tracing::info!(
            variant_id = %variant.id,
            previous,
            stock = variant.stock_quantity,
            "stock overwritten"
        );
        Ok(variant)
    }

    /// Sells `quantity` units of a variant.
    ///
    /// The stock check and the decrement are one atomic store operation. Only
    /// when it affects no row is existence checked, to tell `VariantNotFound`
    /// apart from `OutOfStock`. Never retried.
    #[tracing::instrument(skip(self))]
    pub async fn sell(&self, cmd: SellVariant) -> Result<(), InventoryError> {
        if let Err(e) = cmd.validate() {
            metrics::counter!("inventory_sales_rejected_total", "reason" => "invalid").increment(1);
            return Err(e.into());
        }

        let updated = self
            .store
            .decrement_stock(cmd.variant_id, cmd.quantity)
            .await?;

        if updated > 0 {
            metrics::counter!("inventory_sales_total").increment(1);
            metrics::counter!("inventory_units_sold_total").increment(cmd.quantity as u64);
            tracing::debug!(variant_id = %cmd.variant_id, quantity = cmd.quantity, "sold");
            return Ok(());
        }

        if !self.store.variant_exists(cmd.variant_id).await? {
            metrics::counter!("inventory_sales_rejected_total", "reason" => "not_found")
                .increment(1);
            return Err(InventoryError::VariantNotFound(cmd.variant_id));
        }

        metrics::counter!("inventory_sales_rejected_total", "reason" => "out_of_stock")
            .increment(1);
        tracing::warn!(variant_id = %cmd.variant_id, quantity = cmd.quantity, "insufficient stock");
        Err(InventoryError::OutOfStock {
            variant_id: cmd.variant_id,
            requested: cmd.quantity,
        })
    }
}
