// Copyright (c) 2025 - Cowboy AI, Inc.
//! Pure Functional Aggregates
//!
//! This module provides the functional aggregate pattern for event sourcing:
//! - Aggregates are pure functions: (Command, State) → Result<Vec<Event>, Error>
//! - State reconstruction via event folding: [Event] → State
//! - No mutations, no side effects
//!
//! # Event Sourcing Pattern
//!
//! ```text
//! Store ─read─▶ aggregate() ─state─▶ decide() ─events─▶ Store (append, revision-checked)
//! ```
//!
//! # Fold Pattern
//!
//! ```rust
//! use eventsourced_cart::aggregate::{aggregate, evolve, ShoppingCart};
//! use eventsourced_cart::events::ShoppingCartEvent;
//!
//! let events: Vec<ShoppingCartEvent> = Vec::new();
//! // An empty stream means the cart never existed
//! assert!(aggregate(&events, evolve, ShoppingCart::initial).is_none());
//! ```
//!
//! # Not Found vs. Initial State
//!
//! [`aggregate`] returns `None` for an empty stream rather than the initial
//! state, so callers can tell "never existed" from "exists, nothing changed".

use tracing::{debug, warn};

use crate::events::{DomainEvent, RecordedEvent};

pub mod commands;
pub mod handlers;
pub mod shopping_cart;

pub use commands::*;
pub use handlers::{
    decide, handle_add_product_item, handle_cancel, handle_confirm, handle_open,
    handle_remove_product_item, ShoppingCartError,
};
pub use shopping_cart::{evolve, ShoppingCart, ShoppingCartDecider, ShoppingCartStatus};

/// Binds the pure functions of one aggregate type together
///
/// The service layer is generic over this trait, so any aggregate that
/// provides these functions gets the read-decide-append cycle for free.
pub trait Decider {
    /// Aggregate state
    type State: Clone + Send + Sync;

    /// Intent accepted by [`Decider::decide`]
    type Command: Send + Sync;

    /// Facts produced by [`Decider::decide`] and consumed by [`Decider::evolve`]
    type Event: DomainEvent + Clone;

    /// Business rule violation
    type Error: std::error::Error + Send + Sync + 'static;

    /// State before the first event
    fn initial_state() -> Self::State;

    /// Apply one event
    fn evolve(state: Self::State, event: &Self::Event) -> Self::State;

    /// Validate a command against current state (`None` = aggregate absent)
    fn decide(
        command: &Self::Command,
        state: Option<&Self::State>,
    ) -> Result<Vec<Self::Event>, Self::Error>;
}

/// Left fold of `events` through `evolve`, starting at `initial`
pub fn fold<'a, S, E: 'a>(
    events: impl IntoIterator<Item = &'a E>,
    initial: S,
    evolve: impl Fn(S, &E) -> S,
) -> S {
    events.into_iter().fold(initial, evolve)
}

/// Reconstruct aggregate state, or `None` if there are no events
pub fn aggregate<'a, S, E: 'a>(
    events: impl IntoIterator<Item = &'a E>,
    evolve: impl Fn(S, &E) -> S,
    get_initial_state: impl FnOnce() -> S,
) -> Option<S> {
    let mut events = events.into_iter().peekable();
    events.peek()?;

    Some(events.fold(get_initial_state(), evolve))
}

/// Reconstruct aggregate state directly from store records
///
/// Records without a payload are skipped. Records whose payload cannot be
/// decoded are skipped with a warning; state folded so far is kept intact.
/// Returns `None` when `records` is empty (stream absent).
pub fn aggregate_recorded<'a, S, E>(
    records: impl IntoIterator<Item = &'a RecordedEvent>,
    evolve: impl Fn(S, &E) -> S,
    get_initial_state: impl FnOnce() -> S,
) -> Option<S>
where
    E: DomainEvent,
{
    let mut records = records.into_iter().peekable();
    records.peek()?;

    let state = records.fold(get_initial_state(), |state, record| {
        match E::from_recorded(record) {
            Ok(Some(event)) => evolve(state, &event),
            Ok(None) => {
                debug!(
                    stream_id = %record.stream_id,
                    revision = record.revision,
                    "Skipping record without payload"
                );
                state
            }
            Err(e) => {
                warn!(
                    stream_id = %record.stream_id,
                    revision = record.revision,
                    error = %e,
                    "Skipping undecodable record"
                );
                state
            }
        }
    });

    Some(state)
}
