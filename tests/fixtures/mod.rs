// Copyright (c) 2025 - Cowboy AI, Inc.
//! Test Fixtures for eventsourced-cart
//!
//! Deterministic ids, timestamps, commands and events shared by the
//! integration tests.
#![allow(dead_code)]

use chrono::{DateTime, Utc};
use uuid::Uuid;

use eventsourced_cart::aggregate::{
    AddProductItemToShoppingCart, CancelShoppingCart, ConfirmShoppingCart, OpenShoppingCart,
    RemoveProductItemFromShoppingCart, ShoppingCartCommand,
};
use eventsourced_cart::domain::PricedProductItem;
use eventsourced_cart::events::{
    ProductItemAddedToShoppingCart, ProductItemRemovedFromShoppingCart, ShoppingCartCanceled,
    ShoppingCartConfirmed, ShoppingCartEvent, ShoppingCartOpened,
};

pub const CART_ID: &str = "01934f4a-1000-7000-8000-000000001000";
pub const CLIENT_ID: &str = "01934f4a-2000-7000-8000-000000002000";
pub const SHOES_ID: &str = "01934f4a-3001-7000-8000-000000003001";
pub const SHIRT_ID: &str = "01934f4a-3002-7000-8000-000000003002";

// Fixed test timestamp (2026-01-19T12:00:00Z)
pub const FIXED_TIMESTAMP: &str = "2026-01-19T12:00:00Z";

pub fn parse_uuid(s: &str) -> Uuid {
    Uuid::parse_str(s).expect("Invalid UUID in test fixture")
}

pub fn fixed_timestamp() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(FIXED_TIMESTAMP)
        .expect("Invalid timestamp in test fixture")
        .with_timezone(&Utc)
}

pub fn cart_id() -> Uuid {
    parse_uuid(CART_ID)
}

pub fn client_id() -> Uuid {
    parse_uuid(CLIENT_ID)
}

/// Two pairs of shoes at 100
pub fn two_pairs_of_shoes() -> PricedProductItem {
    PricedProductItem::new(parse_uuid(SHOES_ID), 2, 100.0).expect("valid fixture item")
}

/// One pair of shoes at 100
pub fn pair_of_shoes() -> PricedProductItem {
    PricedProductItem::new(parse_uuid(SHOES_ID), 1, 100.0).expect("valid fixture item")
}

/// One t-shirt at 5
pub fn t_shirt() -> PricedProductItem {
    PricedProductItem::new(parse_uuid(SHIRT_ID), 1, 5.0).expect("valid fixture item")
}

pub fn open_command() -> OpenShoppingCart {
    OpenShoppingCart {
        shopping_cart_id: cart_id(),
        client_id: client_id(),
        now: fixed_timestamp(),
    }
}

pub fn add_command(product_item: PricedProductItem) -> AddProductItemToShoppingCart {
    AddProductItemToShoppingCart {
        shopping_cart_id: cart_id(),
        product_item,
    }
}

pub fn remove_command(product_item: PricedProductItem) -> RemoveProductItemFromShoppingCart {
    RemoveProductItemFromShoppingCart {
        shopping_cart_id: cart_id(),
        product_item,
    }
}

pub fn confirm_command() -> ConfirmShoppingCart {
    ConfirmShoppingCart {
        shopping_cart_id: cart_id(),
        now: fixed_timestamp(),
    }
}

pub fn cancel_command() -> CancelShoppingCart {
    CancelShoppingCart {
        shopping_cart_id: cart_id(),
        now: fixed_timestamp(),
    }
}

pub fn opened_event() -> ShoppingCartEvent {
    ShoppingCartEvent::ShoppingCartOpened(ShoppingCartOpened {
        shopping_cart_id: cart_id(),
        client_id: client_id(),
        opened_at: fixed_timestamp(),
    })
}

pub fn added_event(product_item: PricedProductItem) -> ShoppingCartEvent {
    ShoppingCartEvent::ProductItemAddedToShoppingCart(ProductItemAddedToShoppingCart {
        shopping_cart_id: cart_id(),
        product_item,
    })
}

pub fn removed_event(product_item: PricedProductItem) -> ShoppingCartEvent {
    ShoppingCartEvent::ProductItemRemovedFromShoppingCart(ProductItemRemovedFromShoppingCart {
        shopping_cart_id: cart_id(),
        product_item,
    })
}

pub fn confirmed_event() -> ShoppingCartEvent {
    ShoppingCartEvent::ShoppingCartConfirmed(ShoppingCartConfirmed {
        shopping_cart_id: cart_id(),
        confirmed_at: fixed_timestamp(),
    })
}

pub fn canceled_event() -> ShoppingCartEvent {
    ShoppingCartEvent::ShoppingCartCanceled(ShoppingCartCanceled {
        shopping_cart_id: cart_id(),
        canceled_at: fixed_timestamp(),
    })
}

/// Command sequence of the end-to-end scenario
pub fn scenario_commands() -> Vec<ShoppingCartCommand> {
    vec![
        ShoppingCartCommand::OpenShoppingCart(open_command()),
        ShoppingCartCommand::AddProductItemToShoppingCart(add_command(two_pairs_of_shoes())),
        ShoppingCartCommand::AddProductItemToShoppingCart(add_command(t_shirt())),
        ShoppingCartCommand::RemoveProductItemFromShoppingCart(remove_command(pair_of_shoes())),
        ShoppingCartCommand::ConfirmShoppingCart(confirm_command()),
    ]
}

/// Event sequence the scenario commands produce
pub fn scenario_events() -> Vec<ShoppingCartEvent> {
    vec![
        opened_event(),
        added_event(two_pairs_of_shoes()),
        added_event(t_shirt()),
        removed_event(pair_of_shoes()),
        confirmed_event(),
    ]
}
