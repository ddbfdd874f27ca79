// Copyright (c) 2025 - Cowboy AI, Inc.
//! Event Envelopes
//!
//! The store speaks a type-erased wire shape, `{ type, data }`, so the same
//! backend can hold any event model. [`DomainEvent`] bridges typed event enums
//! to that shape.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::errors::{StoreError, StoreResult};

/// Event to be appended to a stream
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventData {
    /// Event type discriminant (e.g. `ShoppingCartOpened`)
    #[serde(rename = "type")]
    pub event_type: String,

    /// Event payload
    pub data: Value,

    /// Optional metadata (e.g. correlation ids, user context)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
}

impl EventData {
    /// Create a new event envelope
    pub fn new(event_type: impl Into<String>, data: Value) -> Self {
        Self {
            event_type: event_type.into(),
            data,
            metadata: None,
        }
    }

    /// Add metadata to the event
    pub fn with_metadata(mut self, metadata: Value) -> Self {
        self.metadata = Some(metadata);
        self
    }
}

/// Event as read back from a stream
///
/// `data` is `None` when the store returned an entry without a payload
/// (e.g. a link to a deleted event). Such entries still count towards the
/// stream revision but are skipped during reconstruction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordedEvent {
    /// Stream this event belongs to
    pub stream_id: String,

    /// Stream revision after this event (1-based)
    pub revision: u64,

    /// Unique event ID (UUID v7 for time-ordering)
    pub event_id: Uuid,

    /// Event type discriminant
    #[serde(rename = "type")]
    pub event_type: String,

    /// Event payload
    pub data: Option<Value>,

    /// Metadata supplied on append
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,

    /// When the store recorded the event
    pub recorded_at: DateTime<Utc>,
}

impl RecordedEvent {
    /// Record `event` at `revision` of `stream_id`
    pub fn new(stream_id: impl Into<String>, revision: u64, event: EventData) -> Self {
        let data = (!event.data.is_null()).then_some(event.data);

        Self {
            stream_id: stream_id.into(),
            revision,
            event_id: Uuid::now_v7(),
            event_type: event.event_type,
            data,
            metadata: event.metadata,
            recorded_at: Utc::now(),
        }
    }

    /// Whether the entry carries nothing to decode
    pub fn is_empty(&self) -> bool {
        self.event_type.is_empty() || self.data.as_ref().map_or(true, Value::is_null)
    }
}

/// Typed domain event that can travel through the store
///
/// Implementors must serialize adjacently tagged as `{ "type": ..., "data": ... }`
/// (`#[serde(tag = "type", content = "data")]`).
pub trait DomainEvent: Serialize + DeserializeOwned + Send + Sync {
    /// Event type discriminant, identical to the serialized `type` tag
    fn event_type(&self) -> &'static str;

    /// Convert into the store's wire envelope
    fn to_event_data(&self) -> StoreResult<EventData> {
        let data = match serde_json::to_value(self)? {
            Value::Object(mut fields) => fields.remove("data").unwrap_or(Value::Null),
            other => {
                return Err(StoreError::Serialization(format!(
                    "{} did not serialize to a tagged object: {other}",
                    self.event_type()
                )))
            }
        };

        Ok(EventData::new(self.event_type(), data))
    }

    /// Decode a recorded event
    ///
    /// Returns `Ok(None)` for entries without a payload.
    fn from_recorded(record: &RecordedEvent) -> StoreResult<Option<Self>> {
        if record.is_empty() {
            return Ok(None);
        }

        let envelope = serde_json::json!({
            "type": record.event_type,
            "data": record.data,
        });

        serde_json::from_value(envelope).map(Some).map_err(|e| {
            StoreError::Deserialization(format!(
                "{} at revision {} of {}: {e}",
                record.event_type, record.revision, record.stream_id
            ))
        })
    }
}
