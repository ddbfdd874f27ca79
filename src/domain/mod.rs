// Copyright (c) 2025 - Cowboy AI, Inc.
//! Shopping Cart Domain Models
//!
//! Value objects with validation invariants used by cart events, commands
//! and state.
//!
//! - [`PricedProductItem`] - product, quantity (> 0) and unit price (≥ 0)
//! - [`ProductItems`] - cart lines keyed by product and unit price

pub mod product_item;

pub use product_item::{PricedProductItem, ProductItemError, ProductItems};
