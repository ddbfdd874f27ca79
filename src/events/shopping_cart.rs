// Copyright (c) 2025 - Cowboy AI, Inc.
//! Shopping Cart Domain Events
//!
//! All state changes to ShoppingCart aggregates are represented as immutable events.
//! - Past tense naming (ShoppingCartConfirmed, not ConfirmShoppingCart)
//! - Serialized as `{ "type": "<variant>", "data": { ...camelCase fields } }`

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::PricedProductItem;
use crate::events::envelope::DomainEvent;

/// Shopping Cart Domain Events
///
/// Each variant corresponds to a specific state change in the ShoppingCart aggregate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum ShoppingCartEvent {
    /// Cart was opened for a client
    ShoppingCartOpened(ShoppingCartOpened),

    /// Product item was added (merged by product and price)
    ProductItemAddedToShoppingCart(ProductItemAddedToShoppingCart),

    /// Product item quantity was removed
    ProductItemRemovedFromShoppingCart(ProductItemRemovedFromShoppingCart),

    /// Cart was confirmed (terminal)
    ShoppingCartConfirmed(ShoppingCartConfirmed),

    /// Cart was canceled (terminal)
    ShoppingCartCanceled(ShoppingCartCanceled),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShoppingCartOpened {
    pub shopping_cart_id: Uuid,
    pub client_id: Uuid,
    pub opened_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductItemAddedToShoppingCart {
    pub shopping_cart_id: Uuid,
    pub product_item: PricedProductItem,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductItemRemovedFromShoppingCart {
    pub shopping_cart_id: Uuid,
    pub product_item: PricedProductItem,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShoppingCartConfirmed {
    pub shopping_cart_id: Uuid,
    pub confirmed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShoppingCartCanceled {
    pub shopping_cart_id: Uuid,
    pub canceled_at: DateTime<Utc>,
}

impl ShoppingCartEvent {
    /// Cart the event belongs to
    pub fn shopping_cart_id(&self) -> Uuid {
        match self {
            ShoppingCartEvent::ShoppingCartOpened(e) => e.shopping_cart_id,
            ShoppingCartEvent::ProductItemAddedToShoppingCart(e) => e.shopping_cart_id,
            ShoppingCartEvent::ProductItemRemovedFromShoppingCart(e) => e.shopping_cart_id,
            ShoppingCartEvent::ShoppingCartConfirmed(e) => e.shopping_cart_id,
            ShoppingCartEvent::ShoppingCartCanceled(e) => e.shopping_cart_id,
        }
    }
}

impl DomainEvent for ShoppingCartEvent {
    fn event_type(&self) -> &'static str {
        match self {
            ShoppingCartEvent::ShoppingCartOpened(_) => "ShoppingCartOpened",
            ShoppingCartEvent::ProductItemAddedToShoppingCart(_) => "ProductItemAddedToShoppingCart",
            ShoppingCartEvent::ProductItemRemovedFromShoppingCart(_) => {
                "ProductItemRemovedFromShoppingCart"
            }
            ShoppingCartEvent::ShoppingCartConfirmed(_) => "ShoppingCartConfirmed",
            ShoppingCartEvent::ShoppingCartCanceled(_) => "ShoppingCartCanceled",
        }
    }
}
