//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (ports, attempt cap, addresses, log level)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: CollectorConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;
use tracing_subscriber::filter::LevelFilter;

use crate::config::schema::CollectorConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{0} must not be empty")]
    Empty(&'static str),

    #[error("{0} must not be 0")]
    ZeroPort(&'static str),

    #[error("retries.max_attempts must be at least 1")]
    NoAttempts,

    #[error("provisioning has nothing to do: sync_time is off and objects is empty")]
    NothingToProvision,

    #[error("observability.metrics_address '{0}' is not a socket address")]
    MetricsAddress(String),

    #[error("logging.level '{0}' is not a log level")]
    LogLevel(String),
}

/// Check a parsed configuration, collecting every error found.
pub fn validate_config(config: &CollectorConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.broker.host.trim().is_empty() {
        errors.push(ValidationError::Empty("broker.host"));
    }
    if config.broker.port == 0 {
        errors.push(ValidationError::ZeroPort("broker.port"));
    }
    if config.broker.exchange.trim().is_empty() {
        errors.push(ValidationError::Empty("broker.exchange"));
    }
    if config.server.host.trim().is_empty() {
        errors.push(ValidationError::Empty("server.host"));
    }
    if config.server.port == 0 {
        errors.push(ValidationError::ZeroPort("server.port"));
    }
    if config.retries.max_attempts == 0 {
        errors.push(ValidationError::NoAttempts);
    }
    if !config.provisioning.sync_time && config.provisioning.objects.is_empty() {
        errors.push(ValidationError::NothingToProvision);
    }
    if config.logging.level.parse::<LevelFilter>().is_err() {
        errors.push(ValidationError::LogLevel(config.logging.level.clone()));
    }
    if config.observability.metrics_enabled
        && config
            .observability
            .metrics_address
            .parse::<SocketAddr>()
            .is_err()
    {
        errors.push(ValidationError::MetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
