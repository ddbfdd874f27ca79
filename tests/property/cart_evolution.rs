// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property-Based Tests for Cart Decision and Reconstruction
//!
//! Random command sequences are run through `decide`/`evolve`; rejected
//! commands are dropped, accepted ones contribute their events.

use chrono::{DateTime, TimeZone, Utc};
use proptest::prelude::*;
use uuid::Uuid;

use eventsourced_cart::aggregate::{
    decide, evolve, AddProductItemToShoppingCart, CancelShoppingCart, ConfirmShoppingCart,
    OpenShoppingCart, RemoveProductItemFromShoppingCart, ShoppingCart, ShoppingCartCommand,
};
use eventsourced_cart::domain::PricedProductItem;
use eventsourced_cart::event_store::{EventStoreExt, ExpectedRevision, InMemoryEventStore};
use eventsourced_cart::events::ShoppingCartEvent;

// ============================================================================
// Property Test Strategies
// ============================================================================

const PRODUCTS: [u128; 3] = [0xA1, 0xB2, 0xC3];
const PRICES: [f64; 2] = [5.0, 100.0];

fn cart_id() -> Uuid {
    Uuid::from_u128(0xCA27)
}

fn timestamp() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 19, 12, 0, 0).unwrap()
}

fn product_item() -> impl Strategy<Value = PricedProductItem> {
    (0..PRODUCTS.len(), 0..PRICES.len(), 1u32..5).prop_map(|(product, price, quantity)| {
        PricedProductItem::new(Uuid::from_u128(PRODUCTS[product]), quantity, PRICES[price])
            .unwrap()
    })
}

/// Mostly item changes, with the occasional (re)open or close
fn command() -> impl Strategy<Value = ShoppingCartCommand> {
    prop_oneof![
        1 => Just(ShoppingCartCommand::OpenShoppingCart(OpenShoppingCart {
            shopping_cart_id: cart_id(),
            client_id: Uuid::from_u128(0xC11E),
            now: timestamp(),
        })),
        6 => product_item().prop_map(|product_item| {
            ShoppingCartCommand::AddProductItemToShoppingCart(AddProductItemToShoppingCart {
                shopping_cart_id: cart_id(),
                product_item,
            })
        }),
        4 => product_item().prop_map(|product_item| {
            ShoppingCartCommand::RemoveProductItemFromShoppingCart(
                RemoveProductItemFromShoppingCart {
                    shopping_cart_id: cart_id(),
                    product_item,
                },
            )
        }),
        1 => Just(ShoppingCartCommand::ConfirmShoppingCart(ConfirmShoppingCart {
            shopping_cart_id: cart_id(),
            now: timestamp(),
        })),
        1 => Just(ShoppingCartCommand::CancelShoppingCart(CancelShoppingCart {
            shopping_cart_id: cart_id(),
            now: timestamp(),
        })),
    ]
}

fn command_sequence() -> impl Strategy<Value = Vec<ShoppingCartCommand>> {
    prop::collection::vec(command(), 0..40)
}

/// Events of every accepted command, plus the final state
fn accepted_events(
    commands: &[ShoppingCartCommand],
) -> (Option<ShoppingCart>, Vec<ShoppingCartEvent>) {
    let mut state: Option<ShoppingCart> = None;
    let mut events = Vec::new();

    for command in commands {
        if let Ok(emitted) = decide(command, state.as_ref()) {
            for event in &emitted {
                state = Some(evolve(state.unwrap_or_else(ShoppingCart::initial), event));
            }
            events.extend(emitted);
        }
    }

    (state, events)
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    /// Property: Reconstruction is deterministic
    #[test]
    fn prop_reconstruction_is_deterministic(commands in command_sequence()) {
        let (_, events) = accepted_events(&commands);

        prop_assert_eq!(
            ShoppingCart::from_events(&events),
            ShoppingCart::from_events(&events)
        );
    }

    /// Property: Incremental consistency
    ///
    /// Folding a prefix and then the rest equals folding everything at once,
    /// and equals the state tracked while deciding.
    #[test]
    fn prop_incremental_consistency(commands in command_sequence(), split in any::<prop::sample::Index>()) {
        let (tracked, events) = accepted_events(&commands);
        let at = split.index(events.len() + 1);

        let prefix = ShoppingCart::from_events(&events[..at]);
        let resumed = events[at..].iter().fold(prefix, evolve);

        let all_at_once = ShoppingCart::from_events(&events);
        prop_assert_eq!(&resumed, &all_at_once);

        if let Some(tracked) = tracked {
            prop_assert_eq!(tracked, all_at_once);
        }
    }

    /// Property: Cart lines never hold zero quantity and never repeat
    #[test]
    fn prop_lines_are_positive_and_unique(commands in command_sequence()) {
        let (_, events) = accepted_events(&commands);
        let cart = ShoppingCart::from_events(&events);
        let lines = cart.product_items.as_slice();

        prop_assert!(lines.iter().all(|line| line.quantity > 0));
        for (i, a) in lines.iter().enumerate() {
            prop_assert!(lines[i + 1..].iter().all(|b| !a.same_line(b)));
        }
    }

    /// Property: Quantity is conserved
    ///
    /// Total quantity equals added minus removed; removals are never accepted
    /// beyond what the line holds.
    #[test]
    fn prop_quantity_is_conserved(commands in command_sequence()) {
        let (_, events) = accepted_events(&commands);

        let expected = events.iter().fold(0i64, |total, event| match event {
            ShoppingCartEvent::ProductItemAddedToShoppingCart(e) => {
                total + i64::from(e.product_item.quantity)
            }
            ShoppingCartEvent::ProductItemRemovedFromShoppingCart(e) => {
                total - i64::from(e.product_item.quantity)
            }
            _ => total,
        });

        let cart = ShoppingCart::from_events(&events);
        prop_assert!(expected >= 0);
        prop_assert_eq!(cart.product_items.total_quantity() as i64, expected);
    }

    /// Property: Closed carts accept nothing
    #[test]
    fn prop_closed_cart_is_terminal(commands in command_sequence(), next in command()) {
        let (state, events) = accepted_events(&commands);

        let closed_at = events.iter().position(|event| matches!(
            event,
            ShoppingCartEvent::ShoppingCartConfirmed(_) | ShoppingCartEvent::ShoppingCartCanceled(_)
        ));

        if let Some(position) = closed_at {
            prop_assert_eq!(position, events.len() - 1, "no events after closing");
            prop_assert!(decide(&next, state.as_ref()).is_err());
        }
    }

    /// Property: The store hands back what was decided
    #[test]
    fn prop_store_round_trip_rebuilds_same_state(commands in command_sequence()) {
        let (tracked, events) = accepted_events(&commands);

        let rebuilt = tokio_test::block_on(async {
            let store = InMemoryEventStore::new();
            store
                .append_events("shopping_cart-prop", &events, ExpectedRevision::NoStream)
                .await
                .unwrap();
            store
                .aggregate_stream("shopping_cart-prop", evolve, ShoppingCart::initial)
                .await
                .unwrap()
        });

        prop_assert_eq!(rebuilt, tracked);
    }
}
