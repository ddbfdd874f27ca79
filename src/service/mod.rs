// Copyright (c) 2025 - Cowboy AI, Inc.
//! Service Layer
//!
//! Orchestrates the pure aggregate functions and the event store.
//!
//! # Architecture
//!
//! ```text
//! Client Request
//!     ↓
//! ShoppingCartService (this module)
//!     ↓
//! CommandHandler: read → aggregate → decide → append(expected revision)
//!     ↓                                          ↑
//! retry_on_conflict ── WrongExpectedRevision ────┘
//! ```
//!
//! # Example
//!
//! ```rust
//! use chrono::Utc;
//! use eventsourced_cart::aggregate::OpenShoppingCart;
//! use eventsourced_cart::event_store::InMemoryEventStore;
//! use eventsourced_cart::service::ShoppingCartService;
//! use uuid::Uuid;
//!
//! # tokio_test::block_on(async {
//! let service = ShoppingCartService::new(InMemoryEventStore::new());
//! let cart_id = Uuid::now_v7();
//!
//! service
//!     .open(OpenShoppingCart { shopping_cart_id: cart_id, client_id: Uuid::now_v7(), now: Utc::now() })
//!     .await
//!     .unwrap();
//!
//! assert!(service.get_cart(cart_id).await.unwrap().is_opened());
//! # });
//! ```

use crate::errors::StoreError;

pub mod command_handler;
pub mod retry;
pub mod shopping_cart;

pub use command_handler::{CommandHandler, CommandResult, ServiceResult};
pub use retry::{retry_on_conflict, RetryPolicy};
pub use shopping_cart::{shopping_cart_stream_id, CartResult, ShoppingCartService};

/// Service errors, generic over the aggregate's business error
#[derive(Debug, thiserror::Error)]
pub enum ServiceError<E>
where
    E: std::error::Error + 'static,
{
    /// Business rule violation
    #[error("Business rule violation: {0}")]
    Business(#[source] E),

    /// Event store error
    #[error("Event store error: {0}")]
    Store(#[from] StoreError),

    /// Conflicts kept occurring until the retry policy gave up
    #[error("Concurrency conflict persisted after {attempts} attempts: {source}")]
    RetriesExhausted {
        attempts: u32,
        #[source]
        source: StoreError,
    },
}

impl<E> ServiceError<E>
where
    E: std::error::Error + 'static,
{
    /// Business error, if this is one
    pub fn business(&self) -> Option<&E> {
        match self {
            ServiceError::Business(e) => Some(e),
            _ => None,
        }
    }

    /// Whether the failure came from a concurrent writer
    pub fn is_concurrency_conflict(&self) -> bool {
        match self {
            ServiceError::Store(e) => e.is_concurrency_conflict(),
            ServiceError::RetriesExhausted { .. } => true,
            ServiceError::Business(_) => false,
        }
    }
}
