// Copyright (c) 2025 - Cowboy AI, Inc.
//! Runtime configuration
//!
//! Settings come from defaults overridden by environment variables:
//!
//! | Variable                | Meaning                                 | Default                 |
//! |-------------------------|-----------------------------------------|-------------------------|
//! | `EVENT_STORE_BACKEND`   | `memory` or `nats`                      | `memory`                |
//! | `NATS_URL`              | Comma separated server URLs             | `nats://localhost:4222` |
//! | `NATS_STREAM`           | JetStream stream name                   | `EVENT_STREAMS`         |
//! | `NATS_SUBJECT_PREFIX`   | Subject prefix for event streams        | `events`                |
//! | `ES_RETRY_MAX_ATTEMPTS` | Attempts per command on conflict        | `3`                     |
//! | `ES_RETRY_BACKOFF_MS`   | Base backoff between attempts (ms)      | `10`                    |

use std::env;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use crate::errors::{StoreError, StoreResult};
use crate::event_store::{EventStore, InMemoryEventStore, NatsEventStore};
use crate::jetstream::JetStreamConfig;
use crate::service::RetryPolicy;

/// Configuration for NATS connection
#[derive(Debug, Clone)]
pub struct NatsConfig {
    /// NATS server URLs
    pub servers: Vec<String>,
    /// Client name
    pub name: String,
    /// Connection timeout
    pub connect_timeout: Duration,
    /// Request timeout
    pub request_timeout: Duration,
}

impl Default for NatsConfig {
    fn default() -> Self {
        Self {
            servers: vec!["nats://localhost:4222".to_string()],
            name: "eventsourced-cart".to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(5),
        }
    }
}

/// Which [`EventStore`] implementation to run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StoreBackend {
    #[default]
    Memory,
    Nats,
}

impl FromStr for StoreBackend {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" | "in-memory" => Ok(StoreBackend::Memory),
            "nats" | "jetstream" => Ok(StoreBackend::Nats),
            other => Err(StoreError::Configuration(format!(
                "unknown event store backend '{other}'"
            ))),
        }
    }
}

/// Conflict retry settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryConfig {
    pub max_attempts: u32,
    pub backoff: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff: Duration::from_millis(10),
        }
    }
}

impl From<RetryConfig> for RetryPolicy {
    fn from(config: RetryConfig) -> Self {
        RetryPolicy::new(config.max_attempts, config.backoff)
    }
}

/// Top-level configuration
#[derive(Debug, Clone, Default)]
pub struct EventStoreConfig {
    pub backend: StoreBackend,
    pub nats: NatsConfig,
    pub jetstream: JetStreamConfig,
    pub retry: RetryConfig,
}

impl EventStoreConfig {
    /// Load from the process environment
    pub fn from_env() -> StoreResult<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load from an arbitrary variable lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> StoreResult<Self> {
        let mut config = Self::default();

        if let Some(backend) = lookup("EVENT_STORE_BACKEND") {
            config.backend = backend.parse()?;
        }

        if let Some(url) = lookup("NATS_URL") {
            config.nats.servers = url
                .split(',')
                .map(str::trim)
                .filter(|server| !server.is_empty())
                .map(String::from)
                .collect();

            if config.nats.servers.is_empty() {
                return Err(StoreError::Configuration("NATS_URL is empty".to_string()));
            }
        }

        if let Some(stream) = lookup("NATS_STREAM") {
            config.jetstream.stream_name = stream;
        }

        if let Some(prefix) = lookup("NATS_SUBJECT_PREFIX") {
            config.jetstream.subject_prefix = prefix;
        }

        if let Some(attempts) = lookup("ES_RETRY_MAX_ATTEMPTS") {
            config.retry.max_attempts = parse_var("ES_RETRY_MAX_ATTEMPTS", &attempts)?;
            if config.retry.max_attempts == 0 {
                return Err(StoreError::Configuration(
                    "ES_RETRY_MAX_ATTEMPTS must be at least 1".to_string(),
                ));
            }
        }

        if let Some(backoff) = lookup("ES_RETRY_BACKOFF_MS") {
            config.retry.backoff =
                Duration::from_millis(parse_var("ES_RETRY_BACKOFF_MS", &backoff)?);
        }

        Ok(config)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry.into()
    }
}

fn parse_var<T: FromStr>(key: &str, value: &str) -> StoreResult<T> {
    value
        .trim()
        .parse()
        .map_err(|_| StoreError::Configuration(format!("{key} has invalid value '{value}'")))
}

/// Build the configured event store
pub async fn connect_store(config: &EventStoreConfig) -> StoreResult<Arc<dyn EventStore>> {
    match config.backend {
        StoreBackend::Memory => {
            info!("Using in-memory event store");
            Ok(Arc::new(InMemoryEventStore::new()))
        }
        StoreBackend::Nats => {
            let store =
                NatsEventStore::connect_with_config(&config.nats, config.jetstream.clone()).await?;
            info!(stream = %config.jetstream.stream_name, "Using NATS JetStream event store");
            Ok(Arc::new(store))
        }
    }
}
