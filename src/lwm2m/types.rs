//! Resource paths, responses and error definitions.

use std::fmt;

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Marker returned by the server after a successful write.
pub const STATUS_CHANGED: &str = "CHANGED";

/// Marker returned by the server after a successful read or observe.
pub const STATUS_CONTENT: &str = "CONTENT";

/// Errors that can occur while talking to the server.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Connection, DNS or I/O failure; no response was received.
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The configured server address does not form a valid URL.
    #[error("invalid server URL: {0}")]
    Url(#[from] url::ParseError),

    /// The base URL cannot carry path segments.
    #[error("server URL cannot be a base: {0}")]
    NotABase(String),

    /// The reply body was not JSON, so it carries no status marker.
    #[error("server replied {0} without a status marker")]
    NoStatusMarker(StatusCode),
}

/// Result type for server calls.
pub type ServerResult<T> = Result<T, ServerError>;

/// `/object/instance[/resource]` on a client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResourcePath {
    pub object: u16,
    pub instance: u16,
    pub resource: Option<u16>,
}

impl ResourcePath {
    /// Device object, Current Time resource.
    pub const CURRENT_TIME: ResourcePath = ResourcePath::resource(3, 0, 13);

    pub const fn instance(object: u16, instance: u16) -> Self {
        Self {
            object,
            instance,
            resource: None,
        }
    }

    pub const fn resource(object: u16, instance: u16, resource: u16) -> Self {
        Self {
            object,
            instance,
            resource: Some(resource),
        }
    }

    /// Path segments in order.
    pub fn segments(&self) -> Vec<String> {
        let mut segments = vec![self.object.to_string(), self.instance.to_string()];
        if let Some(resource) = self.resource {
            segments.push(resource.to_string());
        }
        segments
    }
}

impl fmt::Display for ResourcePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}/{}", self.object, self.instance)?;
        if let Some(resource) = self.resource {
            write!(f, "/{}", resource)?;
        }
        Ok(())
    }
}

/// JSON body returned by the server's client API.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ResponseBody {
    /// Status marker, e.g. "CHANGED" or "CONTENT".
    pub status: String,
}

/// Body written to a single resource.
#[derive(Debug, Clone, Serialize)]
pub struct ResourceValue<'a> {
    pub id: u16,
    pub value: &'a str,
}

/// One HTTP response from the server.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerResponse {
    pub status: StatusCode,
    pub body: Option<ResponseBody>,
}

impl ServerResponse {
    /// Build a response from a status and raw body bytes.
    pub fn from_parts(status: StatusCode, bytes: &[u8]) -> Self {
        Self {
            status,
            body: serde_json::from_slice(bytes).ok(),
        }
    }

    /// Status marker from the body, if the body was JSON.
    pub fn marker(&self) -> Option<&str> {
        self.body.as_ref().map(|body| body.status.as_str())
    }

    /// HTTP 200 carrying the expected status marker.
    pub fn is_ok_with(&self, marker: &str) -> bool {
        self.status == StatusCode::OK && self.marker() == Some(marker)
    }

    /// Fail when an HTTP 200 reply has no status marker.
    ///
    /// Other statuses pass through so they can be retried.
    pub fn require_marker_if_ok(self) -> ServerResult<Self> {
        if self.status == StatusCode::OK {
            self.require_marker()
        } else {
            Ok(self)
        }
    }

    /// Fail when the reply has no status marker.
    fn require_marker(self) -> ServerResult<Self> {
        if self.body.is_none() {
            return Err(ServerError::NoStatusMarker(self.status));
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_path_display() {
        assert_eq!(ResourcePath::CURRENT_TIME.to_string(), "/3/0/13");
        assert_eq!(ResourcePath::instance(3303, 0).to_string(), "/3303/0");
        assert_eq!(ResourcePath::instance(3303, 1).segments(), vec!["3303", "1"]);
    }

    #[test]
    fn test_response_marker() {
        let response = ServerResponse::from_parts(StatusCode::OK, br#"{"status":"CONTENT","valid":true}"#);
        assert_eq!(response.marker(), Some(STATUS_CONTENT));
        assert!(response.is_ok_with(STATUS_CONTENT));
        assert!(!response.is_ok_with(STATUS_CHANGED));
    }

    #[test]
    fn test_marker_requires_http_ok() {
        let response = ServerResponse::from_parts(StatusCode::BAD_REQUEST, br#"{"status":"CONTENT"}"#);
        assert!(!response.is_ok_with(STATUS_CONTENT));
    }

    #[test]
    fn test_non_json_body_has_no_marker() {
        let response = ServerResponse::from_parts(StatusCode::NOT_FOUND, b"no registered client with id 'dev'");
        assert_eq!(response.body, None);
        assert!(!response.is_ok_with(STATUS_CONTENT));
    }

    #[test]
    fn test_ok_without_marker_rejected() {
        let response = ServerResponse::from_parts(StatusCode::OK, b"<html>ok</html>");
        assert!(matches!(
            response.require_marker_if_ok(),
            Err(ServerError::NoStatusMarker(status)) if status == StatusCode::OK
        ));
    }

    #[test]
    fn test_non_ok_without_marker_passes_until_final() {
        let response = ServerResponse::from_parts(StatusCode::NOT_FOUND, b"no registered client");
        let response = response.require_marker_if_ok().unwrap();
        assert!(matches!(
            response.require_marker(),
            Err(ServerError::NoStatusMarker(status)) if status == StatusCode::NOT_FOUND
        ));
    }

    #[test]
    fn test_json_marker_passes() {
        let response = ServerResponse::from_parts(StatusCode::OK, br#"{"status":"NOT_FOUND"}"#);
        let response = response.require_marker_if_ok().unwrap();
        assert_eq!(response.require_marker().unwrap().marker(), Some("NOT_FOUND"));
    }

    #[test]
    fn test_error_display() {
        let err = ServerError::NotABase("mailto:x".into());
        assert_eq!(err.to_string(), "server URL cannot be a base: mailto:x");

        let err = ServerError::NoStatusMarker(StatusCode::NOT_FOUND);
        assert_eq!(err.to_string(), "server replied 404 Not Found without a status marker");
    }
}
