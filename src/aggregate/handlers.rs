// Copyright (c) 2025 - Cowboy AI, Inc.
//! Pure Functional Command Handlers for the ShoppingCart Aggregate
//!
//! ```text
//! decide(Command, Option<State>) → Result<Vec<Event>, ShoppingCartError>
//! ```
//!
//! `None` means the cart stream does not exist. Only `OpenShoppingCart` is
//! accepted against it; every other command fails with `CART_NOT_FOUND`.
//! Every accepted command emits exactly one event.

use uuid::Uuid;

use crate::aggregate::commands::*;
use crate::aggregate::shopping_cart::ShoppingCart;
use crate::domain::{PricedProductItem, ProductItemError};
use crate::events::{
    ProductItemAddedToShoppingCart, ProductItemRemovedFromShoppingCart, ShoppingCartCanceled,
    ShoppingCartConfirmed, ShoppingCartEvent, ShoppingCartOpened,
};
use crate::state_machine::{CartLifecycleInput, StateMachine};

/// Business rule violation
///
/// `Display` renders the stable error code.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ShoppingCartError {
    /// Command targets a cart that was never opened
    #[error("CART_NOT_FOUND")]
    CartNotFound,

    /// Cart is already open (can't open twice)
    #[error("OPENED_EXISTING_CART")]
    OpenedExistingCart,

    /// Cart is confirmed or canceled
    #[error("CART_IS_ALREADY_CLOSED")]
    CartIsAlreadyClosed,

    /// No line with this product and price holds the requested quantity
    #[error("PRODUCT_ITEM_NOT_FOUND")]
    ProductItemNotFound {
        product_id: Uuid,
        requested: u32,
        available: u32,
    },

    /// Product item breaks its own invariants
    #[error("INVALID_PRODUCT_ITEM")]
    InvalidProductItem(#[source] ProductItemError),

    /// Adding would push the line quantity past `u32::MAX`
    #[error("PRODUCT_ITEM_QUANTITY_OVERFLOW")]
    QuantityOverflow {
        product_id: Uuid,
        held: u32,
        added: u32,
    },
}

impl ShoppingCartError {
    /// Stable error code
    pub fn code(&self) -> &'static str {
        match self {
            ShoppingCartError::CartNotFound => "CART_NOT_FOUND",
            ShoppingCartError::OpenedExistingCart => "OPENED_EXISTING_CART",
            ShoppingCartError::CartIsAlreadyClosed => "CART_IS_ALREADY_CLOSED",
            ShoppingCartError::ProductItemNotFound { .. } => "PRODUCT_ITEM_NOT_FOUND",
            ShoppingCartError::InvalidProductItem(_) => "INVALID_PRODUCT_ITEM",
            ShoppingCartError::QuantityOverflow { .. } => "PRODUCT_ITEM_QUANTITY_OVERFLOW",
        }
    }
}

/// Cart that has been opened, or `CART_NOT_FOUND`
fn opened_cart(state: Option<&ShoppingCart>) -> Result<&ShoppingCart, ShoppingCartError> {
    state
        .filter(|cart| cart.is_opened())
        .ok_or(ShoppingCartError::CartNotFound)
}

/// Business rule: lifecycle must allow the input
fn assert_lifecycle(cart: &ShoppingCart, input: CartLifecycleInput) -> Result<(), ShoppingCartError> {
    cart.status
        .transition(&input)
        .map(|_| ())
        .map_err(|_| ShoppingCartError::CartIsAlreadyClosed)
}

/// Business rule: item must satisfy its invariants
fn assert_valid(item: &PricedProductItem) -> Result<(), ShoppingCartError> {
    item.validate().map_err(ShoppingCartError::InvalidProductItem)
}

/// Handle OpenShoppingCart command
///
/// # Business Rules
/// - Cart must not already be opened
pub fn handle_open(
    state: Option<&ShoppingCart>,
    command: &OpenShoppingCart,
) -> Result<ShoppingCartOpened, ShoppingCartError> {
    if state.is_some_and(ShoppingCart::is_opened) {
        return Err(ShoppingCartError::OpenedExistingCart);
    }

    Ok(ShoppingCartOpened {
        shopping_cart_id: command.shopping_cart_id,
        client_id: command.client_id,
        opened_at: command.now,
    })
}

/// Handle AddProductItemToShoppingCart command
///
/// # Business Rules
/// - Cart must be opened
/// - Cart must be pending
/// - Product item must be valid
/// - Merged line quantity must fit in `u32`
pub fn handle_add_product_item(
    state: Option<&ShoppingCart>,
    command: &AddProductItemToShoppingCart,
) -> Result<ProductItemAddedToShoppingCart, ShoppingCartError> {
    let cart = opened_cart(state)?;
    assert_lifecycle(cart, CartLifecycleInput::Modify)?;

    let item = command.product_item;
    assert_valid(&item)?;
    if cart.product_items.checked_add(item).is_none() {
        return Err(ShoppingCartError::QuantityOverflow {
            product_id: item.product_id,
            held: cart.product_items.find(&item).map_or(0, |line| line.quantity),
            added: item.quantity,
        });
    }

    Ok(ProductItemAddedToShoppingCart {
        shopping_cart_id: cart.id,
        product_item: item,
    })
}

/// Handle RemoveProductItemFromShoppingCart command
///
/// # Business Rules
/// - Cart must be opened
/// - Cart must be pending
/// - Product item must be valid
/// - A line with the same product and price must hold at least the quantity
pub fn handle_remove_product_item(
    state: Option<&ShoppingCart>,
    command: &RemoveProductItemFromShoppingCart,
) -> Result<ProductItemRemovedFromShoppingCart, ShoppingCartError> {
    let cart = opened_cart(state)?;
    assert_lifecycle(cart, CartLifecycleInput::Modify)?;

    let requested = command.product_item;
    assert_valid(&requested)?;
    if !cart.product_items.has_enough(&requested) {
        return Err(ShoppingCartError::ProductItemNotFound {
            product_id: requested.product_id,
            requested: requested.quantity,
            available: cart
                .product_items
                .find(&requested)
                .map_or(0, |line| line.quantity),
        });
    }

    Ok(ProductItemRemovedFromShoppingCart {
        shopping_cart_id: cart.id,
        product_item: requested,
    })
}

/// Handle ConfirmShoppingCart command
///
/// # Business Rules
/// - Cart must be opened
/// - Cart must be pending
pub fn handle_confirm(
    state: Option<&ShoppingCart>,
    command: &ConfirmShoppingCart,
) -> Result<ShoppingCartConfirmed, ShoppingCartError> {
    let cart = opened_cart(state)?;
    assert_lifecycle(cart, CartLifecycleInput::Confirm)?;

    Ok(ShoppingCartConfirmed {
        shopping_cart_id: cart.id,
        confirmed_at: command.now,
    })
}

/// Handle CancelShoppingCart command
///
/// # Business Rules
/// - Cart must be opened
/// - Cart must be pending
pub fn handle_cancel(
    state: Option<&ShoppingCart>,
    command: &CancelShoppingCart,
) -> Result<ShoppingCartCanceled, ShoppingCartError> {
    let cart = opened_cart(state)?;
    assert_lifecycle(cart, CartLifecycleInput::Cancel)?;

    Ok(ShoppingCartCanceled {
        shopping_cart_id: cart.id,
        canceled_at: command.now,
    })
}

/// Decide which events a command produces against the current state
pub fn decide(
    command: &ShoppingCartCommand,
    state: Option<&ShoppingCart>,
) -> Result<Vec<ShoppingCartEvent>, ShoppingCartError> {
    use ShoppingCartCommand::*;

    let event = match command {
        OpenShoppingCart(c) => ShoppingCartEvent::ShoppingCartOpened(handle_open(state, c)?),
        AddProductItemToShoppingCart(c) => {
            ShoppingCartEvent::ProductItemAddedToShoppingCart(handle_add_product_item(state, c)?)
        }
        RemoveProductItemFromShoppingCart(c) => {
            ShoppingCartEvent::ProductItemRemovedFromShoppingCart(handle_remove_product_item(
                state, c,
            )?)
        }
        ConfirmShoppingCart(c) => ShoppingCartEvent::ShoppingCartConfirmed(handle_confirm(state, c)?),
        CancelShoppingCart(c) => ShoppingCartEvent::ShoppingCartCanceled(handle_cancel(state, c)?),
    };

    Ok(vec![event])
}
