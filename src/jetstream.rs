// Copyright (c) 2025 - Cowboy AI, Inc.

//! JetStream configuration and setup for event streams
//!
//! Every event stream maps to one NATS subject, `<subject_prefix>.<stream_id>`,
//! inside a single JetStream stream. Each append is published as one
//! [`StoredBatch`] message, which keeps multi-event appends atomic.
//!
//! # Concurrency
//!
//! A batch is published with `Nats-Expected-Last-Subject-Sequence` set to the
//! stream sequence of the last message the writer read on that subject (0 for
//! an empty subject). JetStream rejects the publish if any other message landed
//! on the subject in between, so only one writer can claim a given revision.
//!
//! # Example
//!
//! ```rust,no_run
//! use eventsourced_cart::jetstream::{JetStreamConfig, create_event_stream};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = async_nats::connect("nats://localhost:4222").await?;
//!     let jetstream = async_nats::jetstream::new(client);
//!
//!     let config = JetStreamConfig::default();
//!     let stream = create_event_stream(jetstream, &config).await?;
//!
//!     Ok(())
//! }
//! ```

use async_nats::jetstream::{self, stream::Stream};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::warn;

use crate::errors::{StoreError, StoreResult};
use crate::events::RecordedEvent;

/// Configuration for the JetStream stream holding event streams
#[derive(Debug, Clone)]
pub struct JetStreamConfig {
    /// JetStream stream name
    pub stream_name: String,

    /// Subject prefix; the stream captures `<subject_prefix>.>`
    pub subject_prefix: String,

    /// Maximum age of messages (zero keeps events forever)
    pub max_age: Duration,

    /// Storage type (File or Memory)
    pub storage: StorageType,

    /// Number of replicas (for clustered NATS)
    pub replicas: usize,

    /// Publish deduplication window of the JetStream stream
    pub duplicate_window: Duration,
}

impl Default for JetStreamConfig {
    fn default() -> Self {
        Self {
            stream_name: "EVENT_STREAMS".to_string(),
            subject_prefix: "events".to_string(),
            max_age: Duration::ZERO,
            storage: StorageType::File,
            replicas: 1,
            duplicate_window: Duration::from_secs(120),
        }
    }
}

impl JetStreamConfig {
    /// Subject filter covering every event stream
    pub fn subject_filter(&self) -> String {
        format!("{}.>", self.subject_prefix)
    }

    /// Subject of one event stream
    ///
    /// Stream ids become a single subject token, so they must not be empty or
    /// contain `.`, `*`, `>` or whitespace.
    pub fn stream_subject(&self, stream_id: &str) -> StoreResult<String> {
        let invalid = stream_id.is_empty()
            || stream_id
                .chars()
                .any(|c| c == '.' || c == '*' || c == '>' || c.is_whitespace());

        if invalid {
            return Err(StoreError::Configuration(format!(
                "stream id '{stream_id}' is not a valid subject token"
            )));
        }

        Ok(format!("{}.{}", self.subject_prefix, stream_id))
    }
}

/// Storage type for JetStream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageType {
    /// File-based storage (persistent across restarts)
    File,
    /// Memory-based storage (faster, but lost on restart)
    Memory,
}

/// Payload of one JetStream message: every event of a single append
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredBatch {
    /// Stream revision before this batch
    pub base_revision: u64,

    /// Events in append order, revisions `base_revision + 1..`
    pub events: Vec<RecordedEvent>,
}

impl StoredBatch {
    /// Revision after this batch
    pub fn next_revision(&self) -> u64 {
        self.base_revision + self.events.len() as u64
    }
}

/// Everything read back from one event stream's subject
///
/// `last_sequence` tracks every message seen, including ones that could not be
/// decoded, since the next publish must name the subject's true last sequence.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct SubjectLog {
    batches: Vec<StoredBatch>,
    last_sequence: u64,
}

impl SubjectLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one message; undecodable payloads are skipped
    pub fn push(&mut self, stream_sequence: u64, payload: &[u8]) {
        self.last_sequence = self.last_sequence.max(stream_sequence);

        match serde_json::from_slice::<StoredBatch>(payload) {
            Ok(batch) => self.batches.push(batch),
            Err(error) => {
                warn!(stream_sequence, %error, "Skipping undecodable message");
            }
        }
    }

    /// Stream sequence of the last message on the subject (0 if none)
    pub fn last_sequence(&self) -> u64 {
        self.last_sequence
    }

    /// Current revision of the event stream
    pub fn revision(&self) -> u64 {
        self.batches
            .iter()
            .map(StoredBatch::next_revision)
            .max()
            .unwrap_or(0)
    }

    /// Every recorded event, in revision order
    pub fn into_events(mut self) -> Vec<RecordedEvent> {
        self.batches.sort_by_key(|batch| batch.base_revision);
        self.batches
            .into_iter()
            .flat_map(|batch| batch.events)
            .collect()
    }
}

/// Create the event stream, or get it if it already exists
pub async fn create_event_stream(
    jetstream: jetstream::Context,
    config: &JetStreamConfig,
) -> StoreResult<Stream> {
    let storage = match config.storage {
        StorageType::File => jetstream::stream::StorageType::File,
        StorageType::Memory => jetstream::stream::StorageType::Memory,
    };

    let stream_config = jetstream::stream::Config {
        name: config.stream_name.clone(),
        subjects: vec![config.subject_filter()],
        max_age: config.max_age,
        storage,
        num_replicas: config.replicas,
        retention: jetstream::stream::RetentionPolicy::Limits,
        duplicate_window: config.duplicate_window,
        ..Default::default()
    };

    let stream = jetstream
        .get_or_create_stream(stream_config)
        .await
        .map_err(|e| StoreError::NatsConnection(e.to_string()))?;

    Ok(stream)
}
