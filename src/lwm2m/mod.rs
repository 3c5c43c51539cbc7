//! Device-management server REST client.
//!
//! # Data Flow
//! ```text
//! registration handler
//!     → client.rs (build URL, send one PUT/POST, read body)
//!     → types.rs (ServerResponse with the parsed status marker)
//!     → resilience::retries decides whether to try again
//! ```
//!
//! # Design Decisions
//! - One method per call kind; each performs exactly one HTTP attempt
//! - Endpoint names are always a single percent-encoded path segment
//! - A body that is not JSON is a response without a status marker, not an error

pub mod client;
pub mod types;

pub use client::ServerClient;
pub use types::{ResourcePath, ResponseBody, ServerError, ServerResponse, STATUS_CHANGED, STATUS_CONTENT};
