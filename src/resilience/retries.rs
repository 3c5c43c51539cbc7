//! Bounded retry caller.
//!
//! # Responsibilities
//! - Run an outbound call up to `max_attempts` times
//! - Accept the first response the caller's predicate approves
//! - Sleep `attempt * step` between failed attempts
//! - Hand back the last response once attempts are exhausted
//!
//! # Design Decisions
//! - A rejected response and an exhausted loop are not errors; the caller
//!   inspects [`CallOutcome::succeeded`]
//! - An `Err` from the operation is returned immediately, without retrying
//! - No sleep after the final attempt

use std::future::Future;
use std::time::Duration;

use crate::config::RetryConfig;
use crate::resilience::backoff::linear_backoff;

/// Attempts made per call unless configured otherwise.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;

/// Backoff step unless configured otherwise.
pub const DEFAULT_STEP: Duration = Duration::from_millis(200);

/// Retry limits applied to every outbound call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    step: Duration,
}

impl RetryPolicy {
    /// Create a policy. A zero attempt cap is raised to one.
    pub fn new(max_attempts: u32, step: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            step,
        }
    }

    /// Delay to wait after the given failed attempt.
    pub fn delay_after(&self, attempt: u32) -> Duration {
        linear_backoff(attempt, self.step)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ATTEMPTS, DEFAULT_STEP)
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(config: &RetryConfig) -> Self {
        Self::new(config.max_attempts, Duration::from_millis(config.step_delay_ms))
    }
}

/// Result of a retried call.
#[derive(Debug, Clone, PartialEq)]
pub struct CallOutcome<T> {
    /// The accepted response, or the last one received.
    pub response: T,
    /// Number of attempts made, between 1 and the policy cap.
    pub attempts: u32,
    /// Whether the predicate accepted `response`.
    pub succeeded: bool,
}

impl<T> CallOutcome<T> {
    pub fn is_exhausted(&self) -> bool {
        !self.succeeded
    }
}

/// Run `op` until `accept` approves its response or the policy cap is hit.
///
/// `op` receives the 1-based attempt number. Errors from `op` stop the loop
/// and are returned as-is.
pub async fn call_with_retry<T, E, F, Fut, P>(
    policy: &RetryPolicy,
    mut op: F,
    accept: P,
) -> Result<CallOutcome<T>, E>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    P: Fn(&T) -> bool,
{
    let mut attempt = 0;

    loop {
        attempt += 1;
        let response = op(attempt).await?;

        if accept(&response) {
            return Ok(CallOutcome {
                response,
                attempts: attempt,
                succeeded: true,
            });
        }

        if attempt >= policy.max_attempts {
            tracing::warn!(attempts = attempt, "Maximum number of attempts reached");
            return Ok(CallOutcome {
                response,
                attempts: attempt,
                succeeded: false,
            });
        }

        let delay = policy.delay_after(attempt);
        tracing::debug!(attempt, delay = ?delay, "Attempt rejected, backing off");
        tokio::time::sleep(delay).await;
    }
}
