//! Inventory commands.
//!
//! Each write operation takes a command carrying its input. `validate` checks
//! the input on its own, without touching the store.

use common::{ItemId, VariantId};
use inventory_store::{Money, NewItem, NewVariant};

use crate::error::ValidationError;

fn validate_variant(variant: &NewVariant) -> Result<(), ValidationError> {
    if variant.name.trim().is_empty() {
        return Err(ValidationError::EmptyVariantName);
    }
    if variant.price.is_negative() {
        return Err(ValidationError::NegativePrice {
            price: variant.price,
        });
    }
    if variant.stock_quantity < 0 {
        return Err(ValidationError::NegativeStock {
            quantity: variant.stock_quantity,
        });
    }
    Ok(())
}

/// Command to create a new item, optionally with its first variants.
#[derive(Debug, Clone)]
pub struct CreateItem {
    pub name: String,
    pub description: Option<String>,
    pub variants: Vec<NewVariant>,
}

impl CreateItem {
    /// Creates a new CreateItem command with no description and no variants.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            variants: Vec::new(),
        }
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Adds a variant that will be bound to the new item.
    pub fn with_variant(
        mut self,
        name: impl Into<String>,
        price: Money,
        stock_quantity: i32,
    ) -> Self {
        self.variants.push(NewVariant::new(name, price, stock_quantity));
        self
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyItemName);
        }
        self.variants.iter().try_for_each(validate_variant)
    }
}

impl From<CreateItem> for NewItem {
    fn from(cmd: CreateItem) -> Self {
        NewItem {
            name: cmd.name,
            description: cmd.description,
            variants: cmd.variants,
        }
    }
}

/// Command to add a variant to an existing item.
#[derive(Debug, Clone)]
pub struct AddVariant {
    /// The item that will own the variant.
    pub item_id: ItemId,

    /// The variant to add.
    pub variant: NewVariant,
}

impl AddVariant {
    /// Creates a new AddVariant command.
    pub fn new(item_id: ItemId, variant: NewVariant) -> Self {
        Self { item_id, variant }
    }

    /// Creates a new AddVariant command from individual fields.
    pub fn with_details(
        item_id: ItemId,
        name: impl Into<String>,
        price: Money,
        stock_quantity: i32,
    ) -> Self {
        Self {
            item_id,
            variant: NewVariant::new(name, price, stock_quantity),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_variant(&self.variant)
    }
}

/// Command to overwrite a variant's stock with an absolute value.
#[derive(Debug, Clone, Copy)]
pub struct SetVariantStock {
    pub variant_id: VariantId,
    pub quantity: i32,
}

impl SetVariantStock {
    pub fn new(variant_id: VariantId, quantity: i32) -> Self {
        Self {
            variant_id,
            quantity,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.quantity < 0 {
            return Err(ValidationError::NegativeStock {
                quantity: self.quantity,
            });
        }
        Ok(())
    }
}

/// Command to sell units of a variant.
#[derive(Debug, Clone, Copy)]
pub struct SellVariant {
    pub variant_id: VariantId,
    pub quantity: i32,
}

impl SellVariant {
    pub fn new(variant_id: VariantId, quantity: i32) -> Self {
        Self {
            variant_id,
            quantity,
        }
    }

    /// Quantity must be at least 1; the store's guard only bounds decrements.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.quantity <= 0 {
            return Err(ValidationError::NonPositiveQuantity {
                quantity: self.quantity,
            });
        }
        Ok(())
    }
}
