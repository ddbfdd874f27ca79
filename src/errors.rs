// Copyright (c) 2025 - Cowboy AI, Inc.
//! Error types for event store operations

use thiserror::Error;

use crate::event_store::ExpectedRevision;

/// Errors that can occur in event store operations
#[derive(Debug, Error)]
pub enum StoreError {
    /// Stream does not exist
    #[error("Stream not found: {0}")]
    NotFound(String),

    /// Append precondition failed
    #[error(
        "Wrong expected revision for stream {stream_id}: expected {expected}, current revision is {actual}"
    )]
    WrongExpectedRevision {
        stream_id: String,
        expected: ExpectedRevision,
        actual: u64,
    },

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Deserialization error
    #[error("Deserialization error: {0}")]
    Deserialization(String),

    /// NATS connection error
    #[error("NATS connection error: {0}")]
    NatsConnection(String),

    /// NATS publish error
    #[error("NATS publish error: {0}")]
    NatsPublish(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Timeout error
    #[error("Operation timed out: {0}")]
    Timeout(String),
}

impl StoreError {
    /// Stable error code surfaced to callers
    pub fn code(&self) -> &'static str {
        match self {
            StoreError::NotFound(_) => "StreamNotFound",
            StoreError::WrongExpectedRevision { .. } => "WrongExpectedRevision",
            StoreError::Serialization(_) => "Serialization",
            StoreError::Deserialization(_) => "Deserialization",
            StoreError::NatsConnection(_) => "NatsConnection",
            StoreError::NatsPublish(_) => "NatsPublish",
            StoreError::Configuration(_) => "Configuration",
            StoreError::Timeout(_) => "Timeout",
        }
    }

    /// Whether a re-read, re-decide, re-append cycle may succeed
    pub fn is_concurrency_conflict(&self) -> bool {
        matches!(self, StoreError::WrongExpectedRevision { .. })
    }
}

/// Result type for event store operations
pub type StoreResult<T> = Result<T, StoreError>;

impl From<async_nats::Error> for StoreError {
    fn from(err: async_nats::Error) -> Self {
        StoreError::NatsConnection(err.to_string())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Serialization(err.to_string())
    }
}
