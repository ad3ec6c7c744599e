pub mod error;
pub mod memory;
pub mod model;
pub mod postgres;
pub mod store;

pub use common::{ItemId, VariantId};
pub use error::{Result, StoreError};
pub use memory::InMemoryInventoryStore;
pub use model::{Item, Money, NewItem, NewVariant, Variant};
pub use postgres::PostgresInventoryStore;
pub use store::InventoryStore;
