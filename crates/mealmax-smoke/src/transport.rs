//! Transport seam between the runner and the service under test.

use crate::step::{Method, RequestSpec};
use async_trait::async_trait;
use reqwest::Url;
use std::time::Instant;
use tracing::debug;

/// Sends one request and returns the raw response body.
///
/// Implementations do not interpret the body or the HTTP status; deciding
/// whether a step passed is the runner's job.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: &RequestSpec) -> Result<String, TransportError>;
}

/// Errors raised before a response body is available.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("Cannot build URL for {path} from base {base}")]
    InvalidUrl { base: String, path: String },

    #[error("Request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to read response body from {url}: {source}")]
    Body {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Raised by test doubles that have no response scripted for a request.
    #[error("No response available for {method} {path}")]
    Unscripted { method: Method, path: String },

    /// Raised by test doubles simulating a refused connection.
    #[error("Connection refused for {method} {path}")]
    Disconnected { method: Method, path: String },
}

/// `reqwest`-backed transport.
///
/// No timeout is set on the client: a hung service hangs the run, the same
/// as any other blocking smoke script.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base: Url,
}

impl HttpTransport {
    /// Creates a transport rooted at `base`.
    pub fn new(base: Url) -> Self {
        Self {
            client: reqwest::Client::new(),
            base,
        }
    }

    /// Resolves `request` against the base URL.
    ///
    /// Segments are appended after the base path and percent-encoded one by
    /// one, so a meal name containing spaces or slashes stays one segment.
    pub fn endpoint(&self, request: &RequestSpec) -> Result<Url, TransportError> {
        let invalid = || TransportError::InvalidUrl {
            base: self.base.to_string(),
            path: request.display_path(),
        };

        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|()| invalid())?
            .pop_if_empty()
            .extend(&request.segments);

        if !request.query.is_empty() {
            url.query_pairs_mut().extend_pairs(&request.query);
        }

        Ok(url)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: &RequestSpec) -> Result<String, TransportError> {
        let url = self.endpoint(request)?;
        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Delete => reqwest::Method::DELETE,
        };

        let mut builder = self.client.request(method, url.clone());
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let started = Instant::now();
        let response = builder
            .send()
            .await
            .map_err(|source| TransportError::Request {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|source| TransportError::Body {
                url: url.to_string(),
                source,
            })?;

        debug!(
            method = %request.method,
            url = %url,
            status = status.as_u16(),
            bytes = body.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Response received"
        );

        Ok(body)
    }
}
