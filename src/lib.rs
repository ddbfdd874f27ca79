// Copyright (c) 2025 - Cowboy AI, Inc.
//! Event-sourced shopping cart
//!
//! Pure `decide`/`evolve` functions over a shopping cart aggregate, an
//! append-only stream store with optimistic concurrency (in-memory and NATS
//! JetStream backends), and a service layer that runs the
//! read-decide-append cycle with bounded conflict retries.

pub mod aggregate;
pub mod config;
pub mod domain;
pub mod errors;
pub mod event_store;
pub mod events;
pub mod jetstream;
pub mod service;
pub mod state_machine;

// Re-export commonly used types
pub use aggregate::{decide, evolve, Decider, ShoppingCart, ShoppingCartError, ShoppingCartStatus};
pub use config::{connect_store, EventStoreConfig};
pub use errors::{StoreError, StoreResult};
pub use event_store::{EventStore, EventStoreExt, ExpectedRevision, InMemoryEventStore, NatsEventStore};
pub use events::{DomainEvent, EventData, RecordedEvent, ShoppingCartEvent};
pub use service::{RetryPolicy, ServiceError, ShoppingCartService};
