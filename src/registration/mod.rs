//! Registration handling subsystem.
//!
//! # Data Flow
//! ```text
//! delivery payload (bytes)
//!     → dispatch.rs (one event at a time, per-event span)
//!     → event.rs (parse JSON, extract endpoint)
//!     → handler.rs (time sync, then each observation, in order)
//!         → lwm2m::ServerClient wrapped by resilience::call_with_retry
//! ```
//!
//! # Design Decisions
//! - An error aborts the current event only; it is logged and dropped
//! - An exhausted call is logged and the sequence moves on
//! - Nothing is kept between events

pub mod dispatch;
pub mod event;
pub mod handler;

pub use dispatch::{dispatch, DispatchStats};
pub use event::{EventError, RegistrationEvent};
pub use handler::{HandlerError, ProvisionReport, RegistrationHandler};
