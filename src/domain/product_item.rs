// Copyright (c) 2025 - Cowboy AI, Inc.
//! Product Item Value Objects
//!
//! A cart line is identified by the pair `(product_id, unit_price)`: the same
//! product added at two different prices yields two lines.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;
use uuid::Uuid;

/// Product item validation error
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ProductItemError {
    #[error("Product id must not be nil")]
    NilProductId,

    #[error("Quantity must be greater than zero")]
    ZeroQuantity,

    #[error("Unit price must be a finite, non-negative number: {0}")]
    InvalidUnitPrice(f64),
}

/// Product item with the unit price it was put in the cart at
///
/// # Invariants
/// - `product_id` is not nil
/// - `quantity` > 0
/// - `unit_price` is finite and ≥ 0
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricedProductItem {
    pub product_id: Uuid,
    pub quantity: u32,
    pub unit_price: f64,
}

impl PricedProductItem {
    /// Create a validated product item
    pub fn new(product_id: Uuid, quantity: u32, unit_price: f64) -> Result<Self, ProductItemError> {
        let item = Self {
            product_id,
            quantity,
            unit_price,
        };
        item.validate()?;
        Ok(item)
    }

    /// Check the invariants
    ///
    /// Fields are public and deserialization does not validate, so anything
    /// arriving from outside goes through here.
    pub fn validate(&self) -> Result<(), ProductItemError> {
        if self.product_id.is_nil() {
            return Err(ProductItemError::NilProductId);
        }
        if self.quantity == 0 {
            return Err(ProductItemError::ZeroQuantity);
        }
        if !self.unit_price.is_finite() || self.unit_price < 0.0 {
            return Err(ProductItemError::InvalidUnitPrice(self.unit_price));
        }
        Ok(())
    }

    /// Whether both items describe the same cart line
    pub fn same_line(&self, other: &PricedProductItem) -> bool {
        self.product_id == other.product_id && self.unit_price == other.unit_price
    }

    /// Quantity × unit price
    pub fn total_price(&self) -> f64 {
        f64::from(self.quantity) * self.unit_price
    }

    fn with_quantity(self, quantity: u32) -> Self {
        Self { quantity, ..self }
    }
}

/// Ordered collection of cart lines
///
/// Lines keep the order in which their product was first added. All operations
/// return a new collection and leave `self` untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductItems(Vec<PricedProductItem>);

impl ProductItems {
    /// Empty collection
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Merge `item` into the matching line, or append a new line
    ///
    /// A merge that would overflow the line's quantity leaves the collection
    /// unchanged; commands are rejected before such an event is emitted.
    pub fn add(&self, item: PricedProductItem) -> Self {
        self.checked_add(item).unwrap_or_else(|| {
            warn!(product_id = %item.product_id, "Ignoring add that overflows line quantity");
            self.clone()
        })
    }

    /// Merge `item` into the matching line, or `None` on quantity overflow
    pub fn checked_add(&self, item: PricedProductItem) -> Option<Self> {
        let mut lines = self.0.clone();

        match lines.iter_mut().find(|line| line.same_line(&item)) {
            Some(line) => line.quantity = line.quantity.checked_add(item.quantity)?,
            None => lines.push(item),
        }

        Some(Self(lines))
    }

    /// Subtract `item` from the matching line, dropping it at zero
    ///
    /// Removing from a line that does not exist leaves the collection as-is;
    /// over-removal is rejected before an event is ever emitted.
    pub fn remove(&self, item: PricedProductItem) -> Self {
        let lines = self
            .0
            .iter()
            .filter_map(|line| {
                if !line.same_line(&item) {
                    return Some(*line);
                }
                let remaining = line.quantity.saturating_sub(item.quantity);
                (remaining > 0).then(|| line.with_quantity(remaining))
            })
            .collect();

        Self(lines)
    }

    /// Whether a matching line holds at least `item.quantity`
    pub fn has_enough(&self, item: &PricedProductItem) -> bool {
        self.find(item)
            .is_some_and(|line| line.quantity >= item.quantity)
    }

    /// Line matching the product and price of `item`
    pub fn find(&self, item: &PricedProductItem) -> Option<&PricedProductItem> {
        self.0.iter().find(|line| line.same_line(item))
    }

    pub fn total_quantity(&self) -> u64 {
        self.0.iter().map(|line| u64::from(line.quantity)).sum()
    }

    pub fn total_amount(&self) -> f64 {
        self.0.iter().map(PricedProductItem::total_price).sum()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PricedProductItem> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[PricedProductItem] {
        &self.0
    }
}

impl From<Vec<PricedProductItem>> for ProductItems {
    fn from(lines: Vec<PricedProductItem>) -> Self {
        Self(lines)
    }
}

impl<'a> IntoIterator for &'a ProductItems {
    type Item = &'a PricedProductItem;
    type IntoIter = std::slice::Iter<'a, PricedProductItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
