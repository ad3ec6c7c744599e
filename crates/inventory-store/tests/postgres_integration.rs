//! PostgreSQL integration tests
//!
//! These tests use a shared PostgreSQL container for efficiency.
//! Run with:
//!
//! ```bash
//! cargo test -p inventory-store --test postgres_integration -- --test-threads=1
//! ```

use std::sync::Arc;

use inventory_store::{
    InventoryStore, ItemId, Money, NewItem, NewVariant, PostgresInventoryStore, StoreError,
    VariantId,
};
use sqlx::PgPool;
use testcontainers::{ContainerAsync, runners::AsyncRunner};
use testcontainers_modules::postgres::Postgres;
use tokio::sync::OnceCell;

/// Shared container info - container stays alive for all tests
struct ContainerInfo {
    #[allow(dead_code)] // Container must stay alive for tests
    container: ContainerAsync<Postgres>,
    connection_string: String,
}

/// Global shared container
static CONTAINER: OnceCell<Arc<ContainerInfo>> = OnceCell::const_new();

async fn get_container_info() -> Arc<ContainerInfo> {
    CONTAINER
        .get_or_init(|| async {
            let container = Postgres::default().start().await.unwrap();

            let host = container.get_host().await.unwrap();
            let port = container.get_host_port_ipv4(5432).await.unwrap();

            let connection_string =
                format!("postgres://postgres:postgres@{}:{}/postgres", host, port);

            let temp_pool = PgPool::connect(&connection_string).await.unwrap();

            PostgresInventoryStore::new(temp_pool.clone())
                .run_migrations()
                .await
                .unwrap();

            temp_pool.close().await;

            Arc::new(ContainerInfo {
                container,
                connection_string,
            })
        })
        .await
        .clone()
}

/// Get a fresh store with its own pool and cleared tables
async fn get_test_store() -> PostgresInventoryStore {
    let info = get_container_info().await;

    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(10)
        .connect(&info.connection_string)
        .await
        .unwrap();

    sqlx::query("TRUNCATE TABLE variants, items")
        .execute(&pool)
        .await
        .unwrap();

    PostgresInventoryStore::new(pool)
}

fn widget() -> NewItem {
    NewItem::new("Widget")
        .with_description("A widget")
        .with_variant(NewVariant::new("Red", Money::from_cents(1000), 10))
        .with_variant(NewVariant::new("Blue", Money::from_cents(1250), 3))
}

#[tokio::test]
async fn insert_and_find_item_with_variants() {
    let store = get_test_store().await;

    let item = store.insert_item(widget()).await.unwrap();
    assert_eq!(item.variants.len(), 2);
    assert!(item.variants.iter().all(|v| v.item_id == item.id));

    let found = store.find_item(item.id).await.unwrap().unwrap();
    assert_eq!(found.name, "Widget");
    assert_eq!(found.description.as_deref(), Some("A widget"));
    assert_eq!(found.variants.len(), 2);
    assert_eq!(found.variants[0].name, "Red");
    assert_eq!(found.variants[1].name, "Blue");
}

#[tokio::test]
async fn run_migrations_is_recorded_and_idempotent() {
    let store = get_test_store().await;

    store.run_migrations().await.unwrap();

    let applied: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM _sqlx_migrations WHERE success")
        .fetch_one(store.pool())
        .await
        .unwrap();
    assert_eq!(applied, 1);
}

#[tokio::test]
async fn price_round_trips_exactly() {
    let store = get_test_store().await;

    let item = store.insert_item(widget()).await.unwrap();
    let found = store.find_variant(item.variants[1].id).await.unwrap().unwrap();

    assert_eq!(found.price, Money::from_cents(1250));
    assert_eq!(found.price.to_string(), "12.50");
}

#[tokio::test]
async fn find_missing_item_returns_none() {
    let store = get_test_store().await;

    assert!(store.find_item(ItemId::new()).await.unwrap().is_none());
    assert!(!store.item_exists(ItemId::new()).await.unwrap());
}

#[tokio::test]
async fn list_items_in_creation_order_with_variants() {
    let store = get_test_store().await;

    let first = store.insert_item(NewItem::new("First")).await.unwrap();
    let second = store.insert_item(widget()).await.unwrap();

    let items = store.list_items().await.unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].id, first.id);
    assert!(items[0].variants.is_empty());
    assert_eq!(items[1].id, second.id);
    assert_eq!(items[1].variants.len(), 2);
}

#[tokio::test]
async fn insert_variant_for_missing_item_fails() {
    let store = get_test_store().await;
    let missing = ItemId::new();

    let result = store
        .insert_variant(missing, NewVariant::new("Red", Money::zero(), 1))
        .await;

    assert!(matches!(result, Err(StoreError::ItemNotFound(id)) if id == missing));
}

#[tokio::test]
async fn save_variant_overwrites_stock() {
    let store = get_test_store().await;
    let item = store.insert_item(widget()).await.unwrap();
    let mut variant = item.variants[0].clone();

    variant.stock_quantity = 99;
    let saved = store.save_variant(&variant).await.unwrap();
    assert_eq!(saved.stock_quantity, 99);

    let found = store.find_variant(variant.id).await.unwrap().unwrap();
    assert_eq!(found.stock_quantity, 99);
}

#[tokio::test]
async fn decrement_stock_guarded_by_current_stock() {
    let store = get_test_store().await;
    let item = store.insert_item(widget()).await.unwrap();
    let id = item.variants[0].id;

    assert_eq!(store.decrement_stock(id, 10).await.unwrap(), 1);
    assert_eq!(store.decrement_stock(id, 1).await.unwrap(), 0);

    let found = store.find_variant(id).await.unwrap().unwrap();
    assert_eq!(found.stock_quantity, 0);
}

#[tokio::test]
async fn decrement_stock_missing_variant() {
    let store = get_test_store().await;

    assert_eq!(store.decrement_stock(VariantId::new(), 1).await.unwrap(), 0);
    assert!(!store.variant_exists(VariantId::new()).await.unwrap());
}

#[tokio::test]
async fn stock_check_constraint_rejects_negative_values() {
    let store = get_test_store().await;
    let item = store.insert_item(widget()).await.unwrap();
    let mut variant = item.variants[0].clone();

    variant.stock_quantity = -1;
    let result = store.save_variant(&variant).await;

    assert!(matches!(result, Err(StoreError::Database(_))));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_decrements_never_oversell() {
    let store = get_test_store().await;
    let item = store
        .insert_item(NewItem::new("Widget").with_variant(NewVariant::new(
            "Red",
            Money::from_cents(100),
            19,
        )))
        .await
        .unwrap();
    let id = item.variants[0].id;

    // 10 callers want 2 units each from 19: exactly one must lose.
    let attempts = (0..10).map(|_| {
        let store = store.clone();
        async move { store.decrement_stock(id, 2).await.unwrap() }
    });
    let results = futures_util::future::join_all(attempts).await;

    assert_eq!(results.iter().filter(|&&rows| rows == 1).count(), 9);
    assert_eq!(results.iter().filter(|&&rows| rows == 0).count(), 1);

    let found = store.find_variant(id).await.unwrap().unwrap();
    assert_eq!(found.stock_quantity, 1);
}
