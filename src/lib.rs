//! Registration-driven data collection for LwM2M clients.
//!
//! Consumes registration events from an AMQP fanout exchange and, for each
//! client, syncs its clock and starts observations through the
//! device-management server's REST API.

pub mod broker;
pub mod cli;
pub mod config;
pub mod lifecycle;
pub mod lwm2m;
pub mod observability;
pub mod registration;
pub mod resilience;

pub use config::CollectorConfig;
pub use lifecycle::Shutdown;
pub use registration::RegistrationHandler;
