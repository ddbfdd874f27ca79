// Copyright (c) 2025 - Cowboy AI, Inc.
//! Event Store Abstraction
//!
//! Append-only, per-stream event logs with optimistic-concurrency guarded
//! appends.
//!
//! # Architecture
//!
//! ```text
//! Command → decide() → Events → EventStore::append_to_stream(expected revision)
//!                                    ↓
//!                        read_stream() → aggregate() → State
//! ```
//!
//! # Revisions
//!
//! A stream's revision is the number of events appended to it; `0` means the
//! stream does not exist. Every append names an [`ExpectedRevision`]; when it
//! does not match, the append fails with
//! [`StoreError::WrongExpectedRevision`] and nothing is written.
//!
//! # Missing Streams
//!
//! Reading a stream that does not exist yields an empty sequence, not an
//! error. [`EventStoreExt::aggregate_stream`] turns that into `None`.
//!
//! # Example
//!
//! ```rust
//! use eventsourced_cart::event_store::{EventStore, EventStoreExt, ExpectedRevision, InMemoryEventStore};
//! use eventsourced_cart::events::EventData;
//!
//! # tokio_test::block_on(async {
//! let store = InMemoryEventStore::new();
//! let events = vec![EventData::new("Noted", serde_json::json!({ "text": "hi" }))];
//!
//! let revision = store
//!     .append_to_stream("notes-1", events, ExpectedRevision::NoStream)
//!     .await
//!     .unwrap();
//! assert_eq!(revision, 1);
//! assert_eq!(store.read_stream("notes-1").await.unwrap().len(), 1);
//! # });
//! ```

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;

use crate::aggregate::aggregate_recorded;
use crate::errors::{StoreError, StoreResult};
use crate::events::{DomainEvent, EventData, RecordedEvent};

pub mod memory;
pub mod nats;

pub use memory::InMemoryEventStore;
pub use nats::NatsEventStore;

/// Append precondition on the stream's current revision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExpectedRevision {
    /// Append unconditionally
    #[default]
    Any,

    /// Stream must not exist yet (revision 0)
    NoStream,

    /// Stream must exist (revision > 0)
    StreamExists,

    /// Stream must be at exactly this revision
    Exact(u64),
}

impl ExpectedRevision {
    /// Precondition for appending after having read `revision` events
    ///
    /// A revision of `0` maps to [`ExpectedRevision::NoStream`].
    pub fn from_revision(revision: u64) -> Self {
        if revision == 0 {
            ExpectedRevision::NoStream
        } else {
            ExpectedRevision::Exact(revision)
        }
    }

    /// Whether a stream at `current` satisfies the precondition
    pub fn matches(&self, current: u64) -> bool {
        match self {
            ExpectedRevision::Any => true,
            ExpectedRevision::NoStream => current == 0,
            ExpectedRevision::StreamExists => current > 0,
            ExpectedRevision::Exact(expected) => *expected == current,
        }
    }

    /// Fail with `WrongExpectedRevision` unless `current` satisfies the precondition
    pub fn check(&self, stream_id: &str, current: u64) -> StoreResult<()> {
        if self.matches(current) {
            return Ok(());
        }

        Err(StoreError::WrongExpectedRevision {
            stream_id: stream_id.to_string(),
            expected: *self,
            actual: current,
        })
    }
}

impl fmt::Display for ExpectedRevision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExpectedRevision::Any => write!(f, "any"),
            ExpectedRevision::NoStream => write!(f, "no stream"),
            ExpectedRevision::StreamExists => write!(f, "stream exists"),
            ExpectedRevision::Exact(revision) => write!(f, "{revision}"),
        }
    }
}

/// Event Store trait for persisting and retrieving events
///
/// Implementations must ensure:
/// - **Atomicity**: all events of one append are written, or none
/// - **Linearizability**: concurrent appends to one stream with the same
///   expected revision see at most one winner
/// - **Ordering**: events are read back in append order
#[async_trait]
pub trait EventStore: Send + Sync {
    /// Read all events of a stream in order
    ///
    /// Returns an empty vector when the stream does not exist.
    async fn read_stream(&self, stream_id: &str) -> StoreResult<Vec<RecordedEvent>>;

    /// Append events to a stream atomically
    ///
    /// # Returns
    ///
    /// The stream revision after the append (prior revision + `events.len()`).
    /// An empty batch writes nothing and returns the current revision.
    ///
    /// # Errors
    ///
    /// - `WrongExpectedRevision` if `expected_revision` doesn't match; the
    ///   stream is left untouched
    async fn append_to_stream(
        &self,
        stream_id: &str,
        events: Vec<EventData>,
        expected_revision: ExpectedRevision,
    ) -> StoreResult<u64>;

    /// Current revision of a stream (0 if it does not exist)
    async fn stream_revision(&self, stream_id: &str) -> StoreResult<u64> {
        let events = self.read_stream(stream_id).await?;
        Ok(events.last().map_or(0, |event| event.revision))
    }
}

#[async_trait]
impl<T: EventStore + ?Sized> EventStore for Arc<T> {
    async fn read_stream(&self, stream_id: &str) -> StoreResult<Vec<RecordedEvent>> {
        (**self).read_stream(stream_id).await
    }

    async fn append_to_stream(
        &self,
        stream_id: &str,
        events: Vec<EventData>,
        expected_revision: ExpectedRevision,
    ) -> StoreResult<u64> {
        (**self)
            .append_to_stream(stream_id, events, expected_revision)
            .await
    }

    async fn stream_revision(&self, stream_id: &str) -> StoreResult<u64> {
        (**self).stream_revision(stream_id).await
    }
}

/// Typed operations over any [`EventStore`]
#[async_trait]
pub trait EventStoreExt: EventStore {
    /// Read and decode all events of a stream
    ///
    /// Entries without a payload are skipped; undecodable entries fail the read.
    async fn read_events<E>(&self, stream_id: &str) -> StoreResult<Vec<E>>
    where
        E: DomainEvent,
    {
        let records = self.read_stream(stream_id).await?;

        let mut events = Vec::with_capacity(records.len());
        for record in &records {
            if let Some(event) = E::from_recorded(record)? {
                events.push(event);
            }
        }

        Ok(events)
    }

    /// Encode and append typed events
    ///
    /// All events are encoded before anything is written.
    async fn append_events<E>(
        &self,
        stream_id: &str,
        events: &[E],
        expected_revision: ExpectedRevision,
    ) -> StoreResult<u64>
    where
        E: DomainEvent,
    {
        let data = events
            .iter()
            .map(DomainEvent::to_event_data)
            .collect::<StoreResult<Vec<_>>>()?;

        self.append_to_stream(stream_id, data, expected_revision)
            .await
    }

    /// Fold a stream into state, or `None` if the stream does not exist
    async fn aggregate_stream<S, E, F, I>(
        &self,
        stream_id: &str,
        evolve: F,
        get_initial_state: I,
    ) -> StoreResult<Option<S>>
    where
        S: Send,
        E: DomainEvent,
        F: Fn(S, &E) -> S + Send,
        I: FnOnce() -> S + Send,
    {
        let records = self.read_stream(stream_id).await?;
        Ok(aggregate_recorded(&records, evolve, get_initial_state))
    }

    /// Like [`EventStoreExt::aggregate_stream`], also returning the revision read
    ///
    /// The revision is what a subsequent append should expect.
    async fn aggregate_stream_with_revision<S, E, F, I>(
        &self,
        stream_id: &str,
        evolve: F,
        get_initial_state: I,
    ) -> StoreResult<(Option<S>, u64)>
    where
        S: Send,
        E: DomainEvent,
        F: Fn(S, &E) -> S + Send,
        I: FnOnce() -> S + Send,
    {
        let records = self.read_stream(stream_id).await?;
        let revision = records.last().map_or(0, |record| record.revision);

        Ok((aggregate_recorded(&records, evolve, get_initial_state), revision))
    }
}

impl<T: EventStore + ?Sized> EventStoreExt for T {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expected_revision_matches() {
        assert!(ExpectedRevision::Any.matches(0));
        assert!(ExpectedRevision::Any.matches(9));

        assert!(ExpectedRevision::NoStream.matches(0));
        assert!(!ExpectedRevision::NoStream.matches(1));

        assert!(ExpectedRevision::StreamExists.matches(1));
        assert!(!ExpectedRevision::StreamExists.matches(0));

        assert!(ExpectedRevision::Exact(3).matches(3));
        assert!(!ExpectedRevision::Exact(3).matches(4));
        assert!(ExpectedRevision::Exact(0).matches(0));
    }

    #[test]
    fn test_from_revision() {
        assert_eq!(ExpectedRevision::from_revision(0), ExpectedRevision::NoStream);
        assert_eq!(ExpectedRevision::from_revision(4), ExpectedRevision::Exact(4));
    }

    #[test]
    fn test_check_reports_actual_revision() {
        let err = ExpectedRevision::Exact(1).check("cart-1", 2).unwrap_err();

        match err {
            StoreError::WrongExpectedRevision {
                stream_id,
                expected,
                actual,
            } => {
                assert_eq!(stream_id, "cart-1");
                assert_eq!(expected, ExpectedRevision::Exact(1));
                assert_eq!(actual, 2);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(ExpectedRevision::Any.to_string(), "any");
        assert_eq!(ExpectedRevision::NoStream.to_string(), "no stream");
        assert_eq!(ExpectedRevision::Exact(7).to_string(), "7");
    }
}
