//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events, daily rotated file or stdout)
//!     → metrics.rs (event and call counters)
//!
//! Consumers:
//!     → Log file on disk
//!     → Metrics endpoint (Prometheus scrape, optional)
//! ```
//!
//! # Design Decisions
//! - Every registration event runs inside a span carrying a UUID
//! - Metrics are off unless enabled in config

pub mod logging;
pub mod metrics;
