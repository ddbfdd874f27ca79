// Copyright (c) 2025 - Cowboy AI, Inc.
//! Bounded retry on optimistic-concurrency conflicts

use std::future::Future;
use std::time::Duration;

use tracing::warn;

use crate::service::ServiceError;

/// How often, and how patiently, a conflicting command is re-run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts including the first (at least 1)
    pub max_attempts: u32,

    /// Base delay; attempt `n` waits `n * backoff` before re-running
    pub backoff: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, backoff: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            backoff,
        }
    }

    /// Single attempt, conflicts surface immediately
    pub fn no_retry() -> Self {
        Self::new(1, Duration::ZERO)
    }

    /// Delay after failed attempt `attempt` (1-based)
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.backoff * attempt
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3, Duration::from_millis(10))
    }
}

/// Run `operation` until it succeeds, fails for a non-conflict reason, or
/// `policy.max_attempts` is used up
///
/// `operation` receives the 1-based attempt number and must redo the whole
/// read-decide-append cycle; only `WrongExpectedRevision` store errors are
/// retried. Business errors and other store errors return at once.
pub async fn retry_on_conflict<T, E, F, Fut>(
    policy: &RetryPolicy,
    mut operation: F,
) -> Result<T, ServiceError<E>>
where
    E: std::error::Error + 'static,
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, ServiceError<E>>>,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 1;

    loop {
        match operation(attempt).await {
            Err(ServiceError::Store(error)) if error.is_concurrency_conflict() => {
                if attempt >= max_attempts {
                    return Err(ServiceError::RetriesExhausted {
                        attempts: attempt,
                        source: error,
                    });
                }

                warn!(attempt, max_attempts, %error, "Concurrency conflict, retrying");
                tokio::time::sleep(policy.delay_for(attempt)).await;
                attempt += 1;
            }
            other => return other,
        }
    }
}
