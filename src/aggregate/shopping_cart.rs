// Copyright (c) 2025 - Cowboy AI, Inc.
//! Pure Functional ShoppingCart Aggregate
//!
//! ```text
//! Events → evolve() → New State
//! ```

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::aggregate::commands::ShoppingCartCommand;
use crate::aggregate::handlers::{decide, ShoppingCartError};
use crate::aggregate::Decider;
use crate::domain::ProductItems;
use crate::events::ShoppingCartEvent;

/// Cart lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShoppingCartStatus {
    Pending,
    Confirmed,
    Canceled,
}

impl ShoppingCartStatus {
    /// Confirmed and Canceled are terminal
    pub fn is_closed(&self) -> bool {
        matches!(self, ShoppingCartStatus::Confirmed | ShoppingCartStatus::Canceled)
    }
}

impl fmt::Display for ShoppingCartStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShoppingCartStatus::Pending => write!(f, "Pending"),
            ShoppingCartStatus::Confirmed => write!(f, "Confirmed"),
            ShoppingCartStatus::Canceled => write!(f, "Canceled"),
        }
    }
}

/// Immutable ShoppingCart State
///
/// Produced only by folding events over [`ShoppingCart::initial`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShoppingCart {
    pub id: Uuid,
    pub client_id: Uuid,
    pub status: ShoppingCartStatus,
    pub product_items: ProductItems,
    pub opened_at: Option<DateTime<Utc>>,
    pub confirmed_at: Option<DateTime<Utc>>,
    pub canceled_at: Option<DateTime<Utc>>,
}

impl ShoppingCart {
    /// State before any event has been applied
    pub fn initial() -> Self {
        Self {
            id: Uuid::nil(),
            client_id: Uuid::nil(),
            status: ShoppingCartStatus::Pending,
            product_items: ProductItems::new(),
            opened_at: None,
            confirmed_at: None,
            canceled_at: None,
        }
    }

    /// Reconstruct state from an event sequence
    ///
    /// ```text
    /// State = fold(Events, initial(), evolve)
    /// ```
    pub fn from_events<'a>(events: impl IntoIterator<Item = &'a ShoppingCartEvent>) -> Self {
        super::fold(events, Self::initial(), evolve)
    }

    /// Whether a `ShoppingCartOpened` event has been applied
    pub fn is_opened(&self) -> bool {
        self.opened_at.is_some()
    }

    pub fn is_closed(&self) -> bool {
        self.status.is_closed()
    }
}

impl Default for ShoppingCart {
    fn default() -> Self {
        Self::initial()
    }
}

/// Apply event to state (pure function)
///
/// # Invariants
/// - Same event + same state = same result
/// - Never fails (events are facts that happened)
/// - Every event variant is matched; adding a variant breaks the build here
pub fn evolve(state: ShoppingCart, event: &ShoppingCartEvent) -> ShoppingCart {
    use ShoppingCartEvent::*;

    match event {
        ShoppingCartOpened(e) => ShoppingCart {
            id: e.shopping_cart_id,
            client_id: e.client_id,
            status: ShoppingCartStatus::Pending,
            product_items: ProductItems::new(),
            opened_at: Some(e.opened_at),
            confirmed_at: None,
            canceled_at: None,
        },

        ProductItemAddedToShoppingCart(e) => ShoppingCart {
            product_items: state.product_items.add(e.product_item),
            ..state
        },

        ProductItemRemovedFromShoppingCart(e) => ShoppingCart {
            product_items: state.product_items.remove(e.product_item),
            ..state
        },

        ShoppingCartConfirmed(e) => ShoppingCart {
            status: ShoppingCartStatus::Confirmed,
            confirmed_at: Some(e.confirmed_at),
            ..state
        },

        ShoppingCartCanceled(e) => ShoppingCart {
            status: ShoppingCartStatus::Canceled,
            canceled_at: Some(e.canceled_at),
            ..state
        },
    }
}

/// [`Decider`] binding for the shopping cart
#[derive(Debug, Clone, Copy, Default)]
pub struct ShoppingCartDecider;

impl Decider for ShoppingCartDecider {
    type State = ShoppingCart;
    type Command = ShoppingCartCommand;
    type Event = ShoppingCartEvent;
    type Error = ShoppingCartError;

    fn initial_state() -> ShoppingCart {
        ShoppingCart::initial()
    }

    fn evolve(state: ShoppingCart, event: &ShoppingCartEvent) -> ShoppingCart {
        evolve(state, event)
    }

    fn decide(
        command: &ShoppingCartCommand,
        state: Option<&ShoppingCart>,
    ) -> Result<Vec<ShoppingCartEvent>, ShoppingCartError> {
        decide(command, state)
    }
}
