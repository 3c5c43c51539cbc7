//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Shutdown::trigger
//!
//! Shutdown (shutdown.rs):
//!     trigger → dispatcher stops between events → broker connection closed → exit
//! ```
//!
//! # Design Decisions
//! - An event in progress always runs to completion before exit

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
