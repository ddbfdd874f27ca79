// Copyright (c) 2025 - Cowboy AI, Inc.
//! Generic read-decide-append cycle
//!
//! ```text
//! read_stream → aggregate → decide → append_to_stream(Exact(read revision))
//! ```

use std::marker::PhantomData;

use tracing::{debug, instrument};

use crate::aggregate::Decider;
use crate::errors::StoreResult;
use crate::event_store::{EventStore, EventStoreExt, ExpectedRevision};
use crate::service::retry::{retry_on_conflict, RetryPolicy};
use crate::service::ServiceError;

/// Result type for command handling
pub type ServiceResult<T, E> = Result<T, ServiceError<E>>;

/// Outcome of an accepted command
#[derive(Debug, Clone, PartialEq)]
pub struct CommandResult<E> {
    /// Events appended for the command
    pub events: Vec<E>,

    /// Stream revision after the append
    pub next_revision: u64,
}

/// Runs commands of one [`Decider`] against an [`EventStore`]
pub struct CommandHandler<D, S> {
    store: S,
    retry: RetryPolicy,
    _decider: PhantomData<fn() -> D>,
}

impl<D, S> CommandHandler<D, S>
where
    D: Decider,
    S: EventStore,
{
    pub fn new(store: S) -> Self {
        Self {
            store,
            retry: RetryPolicy::default(),
            _decider: PhantomData,
        }
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    /// Current state (`None` if the stream is absent) and the revision it was read at
    pub async fn load(&self, stream_id: &str) -> StoreResult<(Option<D::State>, u64)> {
        self.store
            .aggregate_stream_with_revision::<D::State, D::Event, _, _>(
                stream_id,
                D::evolve,
                D::initial_state,
            )
            .await
    }

    /// Run one read-decide-append cycle
    ///
    /// The append expects exactly the revision that was read, so a concurrent
    /// writer turns into `ServiceError::Store(WrongExpectedRevision)`.
    #[instrument(skip(self, command))]
    pub async fn handle(
        &self,
        stream_id: &str,
        command: &D::Command,
    ) -> ServiceResult<CommandResult<D::Event>, D::Error> {
        let (state, revision) = self.load(stream_id).await?;

        let events = D::decide(command, state.as_ref()).map_err(ServiceError::Business)?;

        let next_revision = self
            .store
            .append_events(stream_id, &events, ExpectedRevision::from_revision(revision))
            .await?;

        debug!(revision, next_revision, "Command handled");

        Ok(CommandResult {
            events,
            next_revision,
        })
    }

    /// [`CommandHandler::handle`] re-run on conflicts per the retry policy
    pub async fn handle_with_retry(
        &self,
        stream_id: &str,
        command: &D::Command,
    ) -> ServiceResult<CommandResult<D::Event>, D::Error> {
        retry_on_conflict(&self.retry, |_| self.handle(stream_id, command)).await
    }
}
