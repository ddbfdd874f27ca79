// Copyright (c) 2025 - Cowboy AI, Inc.
//! NATS JetStream Event Store Implementation
//!
//! Implements [`EventStore`] on top of NATS JetStream. See
//! [`crate::jetstream`] for the subject layout and how revision claims are
//! enforced through expected-last-sequence publishes.

use std::time::Duration;

use async_nats::jetstream::{self, context::PublishErrorKind, stream::Stream};
use async_nats::{header, ConnectOptions, HeaderMap};
use async_trait::async_trait;
use futures::StreamExt;
use tracing::{debug, info, instrument};

use crate::config::NatsConfig;
use crate::errors::{StoreError, StoreResult};
use crate::event_store::{EventStore, ExpectedRevision};
use crate::events::{EventData, RecordedEvent};
use crate::jetstream::{create_event_stream, JetStreamConfig, StoredBatch, SubjectLog};

/// Messages fetched per pull request when reading a stream
const BATCH_SIZE: usize = 10000;

/// NATS JetStream-backed event store
///
/// # Example
///
/// ```rust,no_run
/// use eventsourced_cart::event_store::NatsEventStore;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let store = NatsEventStore::connect("nats://localhost:4222").await?;
///     // Use store...
///     Ok(())
/// }
/// ```
pub struct NatsEventStore {
    /// NATS JetStream context
    jetstream: jetstream::Context,

    /// JetStream stream holding every event stream
    stream: Stream,

    config: JetStreamConfig,

    /// Pull request expiry; an expired fetch means the stream is drained
    fetch_expiry: Duration,
}

impl NatsEventStore {
    /// Connect to NATS with default settings and create the event stream
    pub async fn connect(nats_url: &str) -> StoreResult<Self> {
        let client = async_nats::connect(nats_url)
            .await
            .map_err(|e| StoreError::NatsConnection(e.to_string()))?;

        Self::from_client(client, JetStreamConfig::default()).await
    }

    /// Connect with custom configuration
    pub async fn connect_with_config(
        nats: &NatsConfig,
        config: JetStreamConfig,
    ) -> StoreResult<Self> {
        let connect_options = ConnectOptions::new()
            .name(&nats.name)
            .connection_timeout(nats.connect_timeout)
            .request_timeout(Some(nats.request_timeout));

        let client = async_nats::connect_with_options(nats.servers.join(","), connect_options)
            .await
            .map_err(|e| StoreError::NatsConnection(e.to_string()))?;

        info!("Connected to NATS at {:?}", nats.servers);

        Self::from_client(client, config).await
    }

    /// Build the store on an existing client
    pub async fn from_client(
        client: async_nats::Client,
        config: JetStreamConfig,
    ) -> StoreResult<Self> {
        let jetstream = jetstream::new(client);
        let stream = create_event_stream(jetstream.clone(), &config).await?;

        Ok(Self {
            jetstream,
            stream,
            config,
            fetch_expiry: Duration::from_secs(2),
        })
    }

    /// Read every message published to a stream's subject
    ///
    /// Messages that do not decode as a batch are skipped and acked.
    async fn read_subject(&self, subject: String) -> StoreResult<SubjectLog> {
        let consumer = self
            .stream
            .create_consumer(jetstream::consumer::pull::Config {
                filter_subject: subject,
                ..Default::default()
            })
            .await
            .map_err(|e| StoreError::NatsConnection(e.to_string()))?;

        let mut log = SubjectLog::new();

        loop {
            let messages_result = consumer
                .fetch()
                .max_messages(BATCH_SIZE)
                .expires(self.fetch_expiry)
                .messages()
                .await;

            // Timeout or "no messages" means the subject is drained
            let mut messages = match messages_result {
                Ok(msgs) => msgs,
                Err(e) => {
                    let err_msg = e.to_string().to_lowercase();
                    if err_msg.contains("timeout")
                        || err_msg.contains("timed out")
                        || err_msg.contains("no messages")
                    {
                        break;
                    }
                    return Err(StoreError::NatsConnection(e.to_string()));
                }
            };

            let mut batch_count = 0;

            while let Some(message) = messages.next().await {
                let msg = message.map_err(|e| StoreError::NatsConnection(e.to_string()))?;

                let stream_sequence = msg
                    .info()
                    .map_err(|e| StoreError::NatsConnection(e.to_string()))?
                    .stream_sequence;
                log.push(stream_sequence, &msg.payload);

                msg.ack()
                    .await
                    .map_err(|e| StoreError::NatsConnection(e.to_string()))?;

                batch_count += 1;
            }

            if batch_count < BATCH_SIZE {
                break;
            }
        }

        Ok(log)
    }

    /// Publish one batch, expecting `last_sequence` to still be the subject's
    /// last message
    ///
    /// Returns `false` when another message landed on the subject first.
    async fn publish_batch(
        &self,
        subject: &str,
        batch: &StoredBatch,
        last_sequence: u64,
    ) -> StoreResult<bool> {
        let payload = serde_json::to_vec(batch)?;

        let mut headers = HeaderMap::new();
        headers.insert(
            header::NATS_EXPECTED_LAST_SUBJECT_SEQUENCE,
            last_sequence.to_string().as_str(),
        );

        let ack = self
            .jetstream
            .publish_with_headers(subject.to_string(), headers, payload.into())
            .await
            .map_err(|e| StoreError::NatsPublish(e.to_string()))?
            .await;

        match ack {
            Ok(_) => Ok(true),
            Err(e) if e.kind() == PublishErrorKind::WrongLastSequence => Ok(false),
            Err(e) => Err(StoreError::NatsPublish(e.to_string())),
        }
    }
}

#[async_trait]
impl EventStore for NatsEventStore {
    #[instrument(skip(self))]
    async fn read_stream(&self, stream_id: &str) -> StoreResult<Vec<RecordedEvent>> {
        let subject = self.config.stream_subject(stream_id)?;
        let events = self.read_subject(subject).await?.into_events();

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
        let subject = self.config.stream_subject(stream_id)?;

        loop {
            let log = self.read_subject(subject.clone()).await?;
            let current = log.revision();
            expected_revision.check(stream_id, current)?;

            if events.is_empty() {
                return Ok(current);
            }

            let batch = StoredBatch {
                base_revision: current,
                events: events
                    .iter()
                    .cloned()
                    .zip(current + 1..)
                    .map(|(event, revision)| RecordedEvent::new(stream_id, revision, event))
                    .collect(),
            };

            if self.publish_batch(&subject, &batch, log.last_sequence()).await? {
                debug!(revision = batch.next_revision(), "Appended to stream");
                return Ok(batch.next_revision());
            }

            // Another writer appended between our read and publish
            if expected_revision == ExpectedRevision::Any {
                debug!("Lost revision race, re-reading stream");
                continue;
            }

            let actual = self.stream_revision(stream_id).await?;
            return Err(StoreError::WrongExpectedRevision {
                stream_id: stream_id.to_string(),
                expected: expected_revision,
                actual,
            });
        }
    }
}
