// Copyright (c) 2025 - Cowboy AI, Inc.
//! In-Memory Event Store
//!
//! Process-local [`EventStore`] for tests and single-node use. Streams live in
//! a map behind one `RwLock`; the write lock makes check-then-append atomic, so
//! concurrent appends to the same stream are linearized.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{debug, instrument};

use crate::errors::StoreResult;
use crate::event_store::{EventStore, ExpectedRevision};
use crate::events::{EventData, RecordedEvent};

/// In-memory event store
///
/// Cloning shares the underlying streams.
#[derive(Debug, Clone, Default)]
pub struct InMemoryEventStore {
    streams: Arc<RwLock<HashMap<String, Vec<RecordedEvent>>>>,
}

impl InMemoryEventStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ids of all streams holding at least one event
    pub async fn stream_ids(&self) -> Vec<String> {
        let streams = self.streams.read().await;
        let mut ids: Vec<String> = streams.keys().cloned().collect();
        ids.sort();
        ids
    }
}

#[async_trait]
impl EventStore for InMemoryEventStore {
    #[instrument(skip(self))]
    async fn read_stream(&self, stream_id: &str) -> StoreResult<Vec<RecordedEvent>> {
        let streams = self.streams.read().await;
        let events = streams.get(stream_id).cloned().unwrap_or_default();

        debug!(count = events.len(), "Read stream");
        Ok(events)
    }

    #[instrument(skip(self, events), fields(event_count = events.len()))]
    async fn append_to_stream(
        &self,
        stream_id: &str,
        events: Vec<EventData>,
        expected_revision: ExpectedRevision,
    ) -> StoreResult<u64> {
        let mut streams = self.streams.write().await;

        let current = streams.get(stream_id).map_or(0, |stream| stream.len() as u64);
        expected_revision.check(stream_id, current)?;

        if events.is_empty() {
            return Ok(current);
        }

        let stream = streams.entry(stream_id.to_string()).or_default();
        let mut revision = current;
        for event in events {
            revision += 1;
            stream.push(RecordedEvent::new(stream_id, revision, event));
        }

        debug!(revision, "Appended to stream");
        Ok(revision)
    }

    async fn stream_revision(&self, stream_id: &str) -> StoreResult<u64> {
        let streams = self.streams.read().await;
        Ok(streams.get(stream_id).map_or(0, |stream| stream.len() as u64))
    }
}
