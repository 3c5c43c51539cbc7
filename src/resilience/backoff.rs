//! Linear backoff.

use std::time::Duration;

/// Delay to wait after the given (1-based) failed attempt.
pub fn linear_backoff(attempt: u32, step: Duration) -> Duration {
    step.saturating_mul(attempt)
}
