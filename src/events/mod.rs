// Copyright (c) 2025 - Cowboy AI, Inc.
//! Domain Events
//!
//! Events are immutable facts representing state changes that have occurred.
//!
//! # Event Sourcing Principles
//!
//! 1. **Events are immutable**: Once created, events never change
//! 2. **Events are past tense**: Named for what happened (Opened, not Open)
//! 3. **Events are ordered**: Position within a stream is the append sequence
//! 4. **Events are facts**: Evolving state from an event never fails
//!
//! # Wire Shape
//!
//! ```text
//! { "type": "ProductItemAddedToShoppingCart",
//!   "data": { "shoppingCartId": "...", "productItem": { ... } } }
//! ```
//!
//! No upcasting is performed; the schema is assumed stable.
//!
//! # Module Organization
//!
//! - [`envelope`] - Type-erased store envelopes and the [`DomainEvent`] bridge
//! - [`shopping_cart`] - ShoppingCart aggregate events

pub mod envelope;
pub mod shopping_cart;

pub use envelope::{DomainEvent, EventData, RecordedEvent};
pub use shopping_cart::{
    ProductItemAddedToShoppingCart, ProductItemRemovedFromShoppingCart, ShoppingCartCanceled,
    ShoppingCartConfirmed, ShoppingCartEvent, ShoppingCartOpened,
};
