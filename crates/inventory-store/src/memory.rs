use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::{
    Item, ItemId, NewItem, NewVariant, Result, StoreError, Variant, VariantId,
    store::InventoryStore,
};

#[derive(Debug, Clone)]
struct ItemRow {
    id: ItemId,
    name: String,
    description: Option<String>,
    created_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct Tables {
    items: Vec<ItemRow>,
    variants: Vec<Variant>,
}

impl Tables {
    fn assemble(&self, row: &ItemRow) -> Item {
        Item {
            id: row.id,
            name: row.name.clone(),
            description: row.description.clone(),
            variants: self
                .variants
                .iter()
                .filter(|v| v.item_id == row.id)
                .cloned()
                .collect(),
            created_at: row.created_at,
        }
    }

    fn push_variant(&mut self, item_id: ItemId, variant: NewVariant) -> Variant {
        let variant = Variant {
            id: VariantId::new(),
            item_id,
            name: variant.name,
            price: variant.price,
            stock_quantity: variant.stock_quantity,
            created_at: Utc::now(),
        };
        self.variants.push(variant.clone());
        variant
    }
}

/// In-memory inventory store.
///
/// Provides the same interface as the PostgreSQL implementation. Every
/// mutation runs under a single write guard, which is what makes the
/// conditional decrement atomic here.
#[derive(Clone, Default)]
pub struct InMemoryInventoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryInventoryStore {
    /// Creates a new empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of items stored.
    pub async fn item_count(&self) -> usize {
        self.tables.read().await.items.len()
    }

    /// Returns the number of variants stored across all items.
    pub async fn variant_count(&self) -> usize {
        self.tables.read().await.variants.len()
    }
}

#[async_trait]
impl InventoryStore for InMemoryInventoryStore {
    async fn insert_item(&self, item: NewItem) -> Result<Item> {
        let mut tables = self.tables.write().await;

        let row = ItemRow {
            id: ItemId::new(),
            name: item.name,
            description: item.description,
            created_at: Utc::now(),
        };
        for variant in item.variants {
            tables.push_variant(row.id, variant);
        }
        tables.items.push(row.clone());

        Ok(tables.assemble(&row))
    }

    async fn find_item(&self, id: ItemId) -> Result<Option<Item>> {
        let tables = self.tables.read().await;
        Ok(tables
            .items
            .iter()
            .find(|row| row.id == id)
            .map(|row| tables.assemble(row)))
    }

    async fn list_items(&self) -> Result<Vec<Item>> {
        let tables = self.tables.read().await;
        Ok(tables.items.iter().map(|row| tables.assemble(row)).collect())
    }

    async fn item_exists(&self, id: ItemId) -> Result<bool> {
        let tables = self.tables.read().await;
        Ok(tables.items.iter().any(|row| row.id == id))
    }

    async fn insert_variant(&self, item_id: ItemId, variant: NewVariant) -> Result<Variant> {
        let mut tables = self.tables.write().await;

        // Foreign key simulation
        if !tables.items.iter().any(|row| row.id == item_id) {
            return Err(StoreError::ItemNotFound(item_id));
        }

        Ok(tables.push_variant(item_id, variant))
    }

    async fn find_variant(&self, id: VariantId) -> Result<Option<Variant>> {
        let tables = self.tables.read().await;
        Ok(tables.variants.iter().find(|v| v.id == id).cloned())
    }

    async fn save_variant(&self, variant: &Variant) -> Result<Variant> {
        let mut tables = self.tables.write().await;

        if let Some(existing) = tables.variants.iter_mut().find(|v| v.id == variant.id) {
            existing.name = variant.name.clone();
            existing.price = variant.price;
            existing.stock_quantity = variant.stock_quantity;
            return Ok(existing.clone());
        }

        if !tables.items.iter().any(|row| row.id == variant.item_id) {
            return Err(StoreError::ItemNotFound(variant.item_id));
        }
        tables.variants.push(variant.clone());
        Ok(variant.clone())
    }

    async fn variant_exists(&self, id: VariantId) -> Result<bool> {
        let tables = self.tables.read().await;
        Ok(tables.variants.iter().any(|v| v.id == id))
    }

    async fn decrement_stock(&self, id: VariantId, quantity: i32) -> Result<u64> {
        let mut tables = self.tables.write().await;

        let Some(variant) = tables.variants.iter_mut().find(|v| v.id == id) else {
            return Ok(0);
        };
        match variant.stock_quantity.checked_sub(quantity) {
            Some(remaining) if remaining >= 0 => {
                variant.stock_quantity = remaining;
                Ok(1)
            }
            _ => Ok(0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Money;

    fn widget() -> NewItem {
        NewItem::new("Widget")
            .with_description("A widget")
            .with_variant(NewVariant::new("Red", Money::from_cents(1000), 10))
            .with_variant(NewVariant::new("Blue", Money::from_cents(1200), 3))
    }

    #[tokio::test]
    async fn insert_item_assigns_ids_and_binds_variants() {
        let store = InMemoryInventoryStore::new();

        let item = store.insert_item(widget()).await.unwrap();

        assert_eq!(item.name, "Widget");
        assert_eq!(item.variants.len(), 2);
        assert!(item.variants.iter().all(|v| v.item_id == item.id));
        assert_ne!(item.variants[0].id, item.variants[1].id);
        assert_eq!(store.item_count().await, 1);
        assert_eq!(store.variant_count().await, 2);
    }

    #[tokio::test]
    async fn find_item_returns_variants_in_creation_order() {
        let store = InMemoryInventoryStore::new();
        let item = store.insert_item(widget()).await.unwrap();

        let found = store.find_item(item.id).await.unwrap().unwrap();
        assert_eq!(found, item);
        assert_eq!(found.variants[0].name, "Red");
        assert_eq!(found.variants[1].name, "Blue");
    }

    #[tokio::test]
    async fn find_item_not_found() {
        let store = InMemoryInventoryStore::new();
        assert!(store.find_item(ItemId::new()).await.unwrap().is_none());
        assert!(!store.item_exists(ItemId::new()).await.unwrap());
    }

    #[tokio::test]
    async fn list_items_in_insertion_order() {
        let store = InMemoryInventoryStore::new();
        let first = store.insert_item(NewItem::new("First")).await.unwrap();
        let second = store.insert_item(NewItem::new("Second")).await.unwrap();

        let items = store.list_items().await.unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].id, first.id);
        assert_eq!(items[1].id, second.id);
    }

    #[tokio::test]
    async fn insert_variant_requires_existing_item() {
        let store = InMemoryInventoryStore::new();
        let missing = ItemId::new();

        let result = store
            .insert_variant(missing, NewVariant::new("Red", Money::zero(), 1))
            .await;

        assert!(matches!(result, Err(StoreError::ItemNotFound(id)) if id == missing));
        assert_eq!(store.variant_count().await, 0);
    }

    #[tokio::test]
    async fn insert_variant_is_visible_through_item() {
        let store = InMemoryInventoryStore::new();
        let item = store.insert_item(NewItem::new("Widget")).await.unwrap();

        let variant = store
            .insert_variant(item.id, NewVariant::new("Green", Money::from_cents(500), 7))
            .await
            .unwrap();

        let found = store.find_item(item.id).await.unwrap().unwrap();
        assert_eq!(found.variants, vec![variant.clone()]);
        assert!(store.variant_exists(variant.id).await.unwrap());
    }

    #[tokio::test]
    async fn save_variant_overwrites_stock() {
        let store = InMemoryInventoryStore::new();
        let item = store.insert_item(widget()).await.unwrap();
        let mut variant = item.variants[0].clone();

        variant.stock_quantity = 42;
        store.save_variant(&variant).await.unwrap();

        let found = store.find_variant(variant.id).await.unwrap().unwrap();
        assert_eq!(found.stock_quantity, 42);
    }

    #[tokio::test]
    async fn decrement_stock_when_sufficient() {
        let store = InMemoryInventoryStore::new();
        let item = store.insert_item(widget()).await.unwrap();
        let id = item.variants[0].id;

        assert_eq!(store.decrement_stock(id, 4).await.unwrap(), 1);
        assert_eq!(store.decrement_stock(id, 6).await.unwrap(), 1);

        let found = store.find_variant(id).await.unwrap().unwrap();
        assert_eq!(found.stock_quantity, 0);
    }

    #[tokio::test]
    async fn decrement_stock_insufficient_leaves_stock_unchanged() {
        let store = InMemoryInventoryStore::new();
        let item = store.insert_item(widget()).await.unwrap();
        let id = item.variants[1].id;

        assert_eq!(store.decrement_stock(id, 4).await.unwrap(), 0);

        let found = store.find_variant(id).await.unwrap().unwrap();
        assert_eq!(found.stock_quantity, 3);
    }

    #[tokio::test]
    async fn decrement_stock_overflowing_quantity_affects_nothing() {
        let store = InMemoryInventoryStore::new();
        let item = store.insert_item(widget()).await.unwrap();
        let id = item.variants[1].id;

        assert_eq!(store.decrement_stock(id, i32::MIN).await.unwrap(), 0);

        let found = store.find_variant(id).await.unwrap().unwrap();
        assert_eq!(found.stock_quantity, 3);
    }

    #[tokio::test]
    async fn decrement_stock_missing_variant_affects_nothing() {
        let store = InMemoryInventoryStore::new();
        assert_eq!(store.decrement_stock(VariantId::new(), 1).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn concurrent_decrements_never_oversell() {
        let store = InMemoryInventoryStore::new();
        let item = store
            .insert_item(
                NewItem::new("Widget").with_variant(NewVariant::new("Red", Money::zero(), 50)),
            )
            .await
            .unwrap();
        let id = item.variants[0].id;

        let handles: Vec<_> = (0..100)
            .map(|_| {
                let store = store.clone();
                tokio::spawn(async move { store.decrement_stock(id, 1).await.unwrap() })
            })
            .collect();

        let mut affected = 0;
        for handle in handles {
            affected += handle.await.unwrap();
        }

        assert_eq!(affected, 50);
        let found = store.find_variant(id).await.unwrap().unwrap();
        assert_eq!(found.stock_quantity, 0);
    }
}
