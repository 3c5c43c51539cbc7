//! HTTP client for the server's `/api/clients/` collection.
//!
//! # Responsibilities
//! - Build client URLs from the configured server address
//! - Write the current time to a client
//! - Start observations on client objects

use reqwest::{Client, Url};

use crate::config::ServerConfig;
use crate::lwm2m::types::{ResourcePath, ResourceValue, ServerError, ServerResponse, ServerResult};

/// REST client for one device-management server.
#[derive(Debug, Clone)]
pub struct ServerClient {
    http: Client,
    base: Url,
}

impl ServerClient {
    /// Create a client for `http://{host}:{port}{api_path}`.
    pub fn new(config: &ServerConfig) -> ServerResult<Self> {
        let api_path = config.api_path.trim_matches('/');
        let base = if api_path.is_empty() {
            format!("http://{}:{}/", config.host, config.port)
        } else {
            format!("http://{}:{}/{}/", config.host, config.port, api_path)
        };

        Self::with_base_url(Url::parse(&base)?)
    }

    /// Create a client rooted at an explicit clients collection URL.
    pub fn with_base_url(base: Url) -> ServerResult<Self> {
        if base.cannot_be_a_base() {
            return Err(ServerError::NotABase(base.to_string()));
        }

        Ok(Self {
            http: Client::new(),
            base,
        })
    }

    /// URL of `path` on `endpoint`, with optional trailing segment.
    pub fn client_url(
        &self,
        endpoint: &str,
        path: &ResourcePath,
        suffix: Option<&str>,
    ) -> ServerResult<Url> {
        let mut url = self.base.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| ServerError::NotABase(self.base.to_string()))?;
            segments.pop_if_empty().push(endpoint);
            for segment in path.segments() {
                segments.push(&segment);
            }
            if let Some(suffix) = suffix {
                segments.push(suffix);
            }
        }
        Ok(url)
    }

    /// Write `now` to the client's Current Time resource.
    pub async fn write_time(&self, endpoint: &str, now: &str) -> ServerResult<ServerResponse> {
        let path = ResourcePath::CURRENT_TIME;
        let url = self.client_url(endpoint, &path, None)?;
        let body = ResourceValue {
            id: path.resource.unwrap_or_default(),
            value: now,
        };

        tracing::debug!(url = %url, value = now, "Writing current time");

        let response = self
            .http
            .put(url)
            .query(&[("format", "Text")])
            .json(&body)
            .send()
            .await?;

        Self::read(response).await
    }

    /// Start observing `/object/instance` on the client.
    pub async fn observe(
        &self,
        endpoint: &str,
        object: u16,
        instance: u16,
    ) -> ServerResult<ServerResponse> {
        let path = ResourcePath::instance(object, instance);
        let url = self.client_url(endpoint, &path, Some("observe"))?;

        tracing::debug!(url = %url, "Starting observation");

        let response = self.http.post(url).send().await?;
        Self::read(response).await
    }

    async fn read(response: reqwest::Response) -> ServerResult<ServerResponse> {
        let status = response.status();
        let bytes = response.bytes().await?;
        Ok(ServerResponse::from_parts(status, &bytes))
    }
}
