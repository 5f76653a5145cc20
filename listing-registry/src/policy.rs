//! Error-handling policies attached to the two registry operations.

use std::time::Duration;

use tracing::info;

use listing_core::{ListingError, Result};

/// What an operation does with its own failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureMode {
    /// Log the failure and continue as if the operation found nothing.
    FailOpen,
    /// Propagate the failure to the caller.
    FailClosed,
}

impl FailureMode {
    /// Applies the policy to the result of an optional-value operation.
    pub fn absorb<T>(self, operation: &str, result: Result<Option<T>>) -> Result<Option<T>> {
        match (self, result) {
            (_, Ok(value)) => Ok(value),
            (FailureMode::FailOpen, Err(e)) => {
                info!(operation, error = %e, "Operation failed, continuing as if nothing was found");
                Ok(None)
            }
            (FailureMode::FailClosed, Err(e)) => Err(e),
        }
    }
}

/// Bounded retry for the submission request.
///
/// Upserts carry no idempotency key, so a retried create whose first
/// attempt did reach the registry can produce a duplicate listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 1,
            backoff: Duration::from_secs(2),
        }
    }
}

impl RetryPolicy {
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            backoff: Duration::ZERO,
        }
    }

    /// Transport failures and gateway-style 5xx responses are transient;
    /// everything else, 4xx in particular, is final.
    pub fn is_retryable(err: &ListingError) -> bool {
        match err {
            ListingError::Remote { status, .. } => matches!(status, 502..=504),
            other => other.is_transport(),
        }
    }

    /// Delay before retry number `attempt` (1-based), doubling each time.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
        self.backoff.saturating_mul(factor)
    }
}
