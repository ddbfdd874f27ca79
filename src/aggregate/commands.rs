// Copyright (c) 2025 - Cowboy AI, Inc.
//! Commands for the ShoppingCart Aggregate
//!
//! Commands express intent and can be rejected by business rules. They are
//! never persisted.
//!
//! # Time Handling
//!
//! Commands that stamp a time carry it explicitly in `now`.
//! **NEVER call `Utc::now()` in domain logic**.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::PricedProductItem;

/// Shopping cart commands
#[derive(Debug, Clone, PartialEq)]
pub enum ShoppingCartCommand {
    OpenShoppingCart(OpenShoppingCart),
    AddProductItemToShoppingCart(AddProductItemToShoppingCart),
    RemoveProductItemFromShoppingCart(RemoveProductItemFromShoppingCart),
    ConfirmShoppingCart(ConfirmShoppingCart),
    CancelShoppingCart(CancelShoppingCart),
}

/// Open a new cart for a client
///
/// This is the only command allowed against a cart that does not exist yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenShoppingCart {
    pub shopping_cart_id: Uuid,
    pub client_id: Uuid,
    pub now: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AddProductItemToShoppingCart {
    pub shopping_cart_id: Uuid,
    pub product_item: PricedProductItem,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RemoveProductItemFromShoppingCart {
    pub shopping_cart_id: Uuid,
    pub product_item: PricedProductItem,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmShoppingCart {
    pub shopping_cart_id: Uuid,
    pub now: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CancelShoppingCart {
    pub shopping_cart_id: Uuid,
    pub now: DateTime<Utc>,
}

impl ShoppingCartCommand {
    /// Command type discriminant
    pub fn command_type(&self) -> &'static str {
        match self {
            ShoppingCartCommand::OpenShoppingCart(_) => "OpenShoppingCart",
            ShoppingCartCommand::AddProductItemToShoppingCart(_) => "AddProductItemToShoppingCart",
            ShoppingCartCommand::RemoveProductItemFromShoppingCart(_) => {
                "RemoveProductItemFromShoppingCart"
            }
            ShoppingCartCommand::ConfirmShoppingCart(_) => "ConfirmShoppingCart",
            ShoppingCartCommand::CancelShoppingCart(_) => "CancelShoppingCart",
        }
    }

    /// Cart the command targets
    pub fn shopping_cart_id(&self) -> Uuid {
        match self {
            ShoppingCartCommand::OpenShoppingCart(c) => c.shopping_cart_id,
            ShoppingCartCommand::AddProductItemToShoppingCart(c) => c.shopping_cart_id,
            ShoppingCartCommand::RemoveProductItemFromShoppingCart(c) => c.shopping_cart_id,
            ShoppingCartCommand::ConfirmShoppingCart(c) => c.shopping_cart_id,
            ShoppingCartCommand::CancelShoppingCart(c) => c.shopping_cart_id,
        }
    }
}
