//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Call to the device-management server:
//!     → retries.rs (attempt, check status marker, retry up to the cap)
//!     → backoff.rs (linear delay between failed attempts)
//! ```
//!
//! # Design Decisions
//! - Every outbound call goes through the same bounded retry loop
//! - Backoff is linear: the n-th failure waits n steps
//! - Transport errors are not retried; they abort the caller

pub mod backoff;
pub mod retries;

pub use backoff::linear_backoff;
pub use retries::{call_with_retry, CallOutcome, RetryPolicy};
