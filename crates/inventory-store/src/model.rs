//! Records persisted by the store: items, their variants, and money amounts.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{ItemId, VariantId};

/// Exact decimal money amount.
///
/// Serialized as a decimal string (`"10.00"`). Deserializes from a string or
/// a JSON number, keeping the number's digits and scale as written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(
    #[serde(deserialize_with = "rust_decimal::serde::arbitrary_precision::deserialize")] Decimal,
);

impl Money {
    /// Creates a money amount from a decimal value.
    pub fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Creates a money amount from a whole number of cents.
    pub fn from_cents(cents: i64) -> Self {
        Self(Decimal::new(cents, 2))
    }

    /// Returns zero money.
    pub fn zero() -> Self {
        Self(Decimal::ZERO)
    }

    /// Returns the underlying decimal amount.
    pub fn amount(&self) -> Decimal {
        self.0
    }

    /// Returns true if the amount is below zero.
    pub fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }
}

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Money {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Decimal::from_str_exact(s).map(Self)
    }
}

impl From<Decimal> for Money {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

impl From<Money> for Decimal {
    fn from(money: Money) -> Self {
        money.0
    }
}

/// A sellable variant of an item with its own price and stock count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variant {
    pub id: VariantId,
    /// Owning item. Used for lookups only; the item owns the variant.
    pub item_id: ItemId,
    pub name: String,
    pub price: Money,
    pub stock_quantity: i32,
    pub created_at: DateTime<Utc>,
}

/// A product entry owning zero or more variants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    pub description: Option<String>,
    pub variants: Vec<Variant>,
    pub created_at: DateTime<Utc>,
}

/// A variant that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewVariant {
    pub name: String,
    pub price: Money,
    pub stock_quantity: i32,
}

impl NewVariant {
    pub fn new(name: impl Into<String>, price: Money, stock_quantity: i32) -> Self {
        Self {
            name: name.into(),
            price,
            stock_quantity,
        }
    }
}

/// An item that has not been persisted yet, with the variants created alongside it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewItem {
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub variants: Vec<NewVariant>,
}

impl NewItem {
    /// Creates a new item with no description and no variants.
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

    /// Adds a variant to be created with the item.
    pub fn with_variant(mut self, variant: NewVariant) -> Self {
        self.variants.push(variant);
        self
    }
}
