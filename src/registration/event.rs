//! Registration event payloads.

use serde::Deserialize;
use thiserror::Error;

/// Errors raised while reading an inbound payload.
#[derive(Debug, Error)]
pub enum EventError {
    #[error("malformed registration payload: {0}")]
    Json(#[from] serde_json::Error),

    #[error("registration payload has an empty endpoint")]
    MissingEndpoint,
}

/// A client registration notification.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RegistrationEvent {
    /// Client endpoint name.
    pub endpoint: String,

    #[serde(default, rename = "registrationId")]
    pub registration_id: Option<String>,
}

impl RegistrationEvent {
    /// Parse a JSON payload. Unknown fields are ignored.
    pub fn from_slice(payload: &[u8]) -> Result<Self, EventError> {
        let event: Self = serde_json::from_slice(payload)?;
        if event.endpoint.trim().is_empty() {
            return Err(EventError::MissingEndpoint);
        }
        Ok(event)
    }
}
