//! Message broker subsystem.
//!
//! # Data Flow
//! ```text
//! BrokerConfig
//!     → consumer.rs (connect, declare fanout exchange, exclusive queue, bind)
//!     → auto-acked deliveries
//!     → registration::dispatch
//! ```
//!
//! # Design Decisions
//! - Server-named exclusive queue: it disappears with the connection
//! - Deliveries are auto-acked; a dropped event is not redelivered
//! - Broker errors end the process; no reconnect loop

pub mod consumer;

pub use consumer::{amqp_uri, BrokerError, RegistrationConsumer};
