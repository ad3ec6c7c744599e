use std::collections::HashMap;

use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, Row, Transaction, postgres::PgRow};
use uuid::Uuid;

use crate::{
    Item, ItemId, Money, NewItem, NewVariant, Result, StoreError, Variant, VariantId,
    store::InventoryStore,
};

const FK_VARIANTS_ITEM: &str = "fk_variants_item";

/// PostgreSQL-backed inventory store.
#[derive(Clone)]
pub struct PostgresInventoryStore {
    pool: PgPool,
}

impl PostgresInventoryStore {
    /// Creates a new PostgreSQL inventory store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Gets a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Runs the database migrations.
    pub async fn run_migrations(&self) -> std::result::Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("../../migrations").run(&self.pool).await
    }

    fn row_to_variant(row: &PgRow) -> Result<Variant> {
        Ok(Variant {
            id: VariantId::from_uuid(row.try_get::<Uuid, _>("id")?),
            item_id: ItemId::from_uuid(row.try_get::<Uuid, _>("item_id")?),
            name: row.try_get("name")?,
            price: Money::new(row.try_get::<Decimal, _>("price")?),
            stock_quantity: row.try_get("stock_quantity")?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn row_to_item(row: &PgRow, variants: Vec<Variant>) -> Result<Item> {
        Ok(Item {
            id: ItemId::from_uuid(row.try_get::<Uuid, _>("id")?),
            name: row.try_get("name")?,
            description: row.try_get("description")?,
            variants,
            created_at: row.try_get("created_at")?,
        })
    }

    async fn insert_variant_in(
        tx: &mut Transaction<'_, Postgres>,
        item_id: ItemId,
        variant: NewVariant,
    ) -> Result<Variant> {
        let row = sqlx::query(
            r#"
            INSERT INTO variants (id, item_id, name, price, stock_quantity)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, item_id, name, price, stock_quantity, created_at
            "#,
        )
        .bind(VariantId::new().as_uuid())
        .bind(item_id.as_uuid())
        .bind(&variant.name)
        .bind(variant.price.amount())
        .bind(variant.stock_quantity)
        .fetch_one(&mut **tx)
        .await
        .map_err(|e| map_item_fk_violation(e, item_id))?;

        Self::row_to_variant(&row)
    }

    async fn variants_for_item(&self, item_id: ItemId) -> Result<Vec<Variant>> {
        let rows = sqlx::query(
            r#"
            SELECT id, item_id, name, price, stock_quantity, created_at
            FROM variants
            WHERE item_id = $1
            ORDER BY seq ASC
            "#,
        )
        .bind(item_id.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(Self::row_to_variant).collect()
    }
}

/// Translates a foreign key violation on the variant/item link into `ItemNotFound`.
fn map_item_fk_violation(e: sqlx::Error, item_id: ItemId) -> StoreError {
    if let sqlx::Error::Database(ref db_err) = e
        && db_err.constraint() == Some(FK_VARIANTS_ITEM)
    {
        return StoreError::ItemNotFound(item_id);
    }
    StoreError::Database(e)
}

#[async_trait]
impl InventoryStore for PostgresInventoryStore {
    async fn insert_item(&self, item: NewItem) -> Result<Item> {
        let item_id = ItemId::new();

        let mut tx = self.pool.begin().await?;

        let row = sqlx::query(
            r#"
            INSERT INTO items (id, name, description)
            VALUES ($1, $2, $3)
            RETURNING id, name, description, created_at
            "#,
        )
        .bind(item_id.as_uuid())
        .bind(&item.name)
        .bind(&item.description)
        .fetch_one(&mut *tx)
        .await?;

        let mut variants = Vec::with_capacity(item.variants.len());
        for variant in item.variants {
            variants.push(Self::insert_variant_in(&mut tx, item_id, variant).await?);
        }

        let item = Self::row_to_item(&row, variants)?;
        tx.commit().await?;

        tracing::debug!(item_id = %item.id, variants = item.variants.len(), "item inserted");
        Ok(item)
    }

    async fn find_item(&self, id: ItemId) -> Result<Option<Item>> {
        let row: Option<PgRow> = sqlx::query(
            r#"
            SELECT id, name, description, created_at
            FROM items
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => {
                let variants = self.variants_for_item(id).await?;
                Ok(Some(Self::row_to_item(&row, variants)?))
            }
            None => Ok(None),
        }
    }

    async fn list_items(&self) -> Result<Vec<Item>> {
        // Two queries instead of one per item.
        let item_rows = sqlx::query(
            r#"
            SELECT id, name, description, created_at
            FROM items
            ORDER BY seq ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let variant_rows = sqlx::query(
            r#"
            SELECT id, item_id, name, price, stock_quantity, created_at
            FROM variants
            ORDER BY seq ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let mut by_item: HashMap<ItemId, Vec<Variant>> = HashMap::new();
        for row in &variant_rows {
            let variant = Self::row_to_variant(row)?;
            by_item.entry(variant.item_id).or_default().push(variant);
        }

        item_rows
            .iter()
            .map(|row| {
                let id = ItemId::from_uuid(row.try_get::<Uuid, _>("id")?);
                Self::row_to_item(row, by_item.remove(&id).unwrap_or_default())
            })
            .collect()
    }

    async fn item_exists(&self, id: ItemId) -> Result<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM items WHERE id = $1)")
            .bind(id.as_uuid())
            .fetch_one(&self.pool)
            .await?;

        Ok(exists)
    }

    async fn insert_variant(&self, item_id: ItemId, variant: NewVariant) -> Result<Variant> {
        let mut tx = self.pool.begin().await?;
        let variant = Self::insert_variant_in(&mut tx, item_id, variant).await?;
        tx.commit().await?;
        Ok(variant)
    }

    async fn find_variant(&self, id: VariantId) -> Result<Option<Variant>> {
        let row: Option<PgRow> = sqlx::query(
            r#"
            SELECT id, item_id, name, price, stock_quantity, created_at
            FROM variants
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(Self::row_to_variant).transpose()
    }

    async fn save_variant(&self, variant: &Variant) -> Result<Variant> {
        let row = sqlx::query(
            r#"
            INSERT INTO variants (id, item_id, name, price, stock_quantity, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (id) DO UPDATE SET
                name = EXCLUDED.name,
                price = EXCLUDED.price,
                stock_quantity = EXCLUDED.stock_quantity
            RETURNING id, item_id, name, price, stock_quantity, created_at
            "#,
        )
        .bind(variant.id.as_uuid())
        .bind(variant.item_id.as_uuid())
        .bind(&variant.name)
        .bind(variant.price.amount())
        .bind(variant.stock_quantity)
        .bind(variant.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_item_fk_violation(e, variant.item_id))?;

        Self::row_to_variant(&row)
    }

    async fn variant_exists(&self, id: VariantId) -> Result<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM variants WHERE id = $1)")
                .bind(id.as_uuid())
                .fetch_one(&self.pool)
                .await?;

        Ok(exists)
    }

    async fn decrement_stock(&self, id: VariantId, quantity: i32) -> Result<u64> {
        // Single statement: the row lock taken by UPDATE makes concurrent
        // callers re-evaluate the guard against the committed stock.
        let result = sqlx::query(
            r#"
            UPDATE variants
            SET stock_quantity = stock_quantity - $2
            WHERE id = $1 AND stock_quantity >= $2
            "#,
        )
        .bind(id.as_uuid())
        .bind(quantity)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }
}
