use thiserror::Error;

use crate::ItemId;

/// Errors that can occur when interacting with the inventory store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A variant was written against an item that does not exist.
    #[error("Item not found: {0}")]
    ItemNotFound(ItemId),

    /// A database error occurred.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A database migration error occurred.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Result type for inventory store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
