//! Scripted in-memory transport.
//!
//! `MockTransport` answers requests from canned bodies and records every
//! request it receives, so tests can assert on exactly what a run sent.
//!
//! # Example
//!
//! ```ignore
//! use mealmax_smoke::testing::MockTransport;
//! use mealmax_smoke::{SmokeConfig, SmokeRunner};
//!
//! let transport = MockTransport::new()
//!     .respond("/health", r#"{"status": "healthy"}"#)
//!     .respond("/db-check", r#"{"database_status": "healthy"}"#)
//!     .fallback(r#"{"status": "success"}"#);
//!
//! let runner = SmokeRunner::new(SmokeConfig::default(), transport);
//! let report = runner.run(&mut Vec::new()).await?;
//! assert_eq!(runner.transport().calls().len(), report.calls());
//! ```

use crate::step::RequestSpec;
use crate::transport::{Transport, TransportError};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, PoisonError};

/// A transport that serves scripted bodies and records requests.
#[derive(Debug, Default)]
pub struct MockTransport {
    by_path: HashMap<String, String>,
    by_call: HashMap<usize, String>,
    disconnected: HashSet<String>,
    fallback: Option<String>,
    calls: Mutex<Vec<RequestSpec>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serves `body` for every request whose display path equals `path`
    /// (query included, e.g. `/leaderboard?sort=wins`).
    pub fn respond(mut self, path: impl Into<String>, body: impl Into<String>) -> Self {
        self.by_path.insert(path.into(), body.into());
        self
    }

    /// Serves `body` for any request without a more specific response.
    pub fn fallback(mut self, body: impl Into<String>) -> Self {
        self.fallback = Some(body.into());
        self
    }

    /// Serves `body` for the zero-based `index`-th call, whatever its path.
    pub fn respond_call(mut self, index: usize, body: impl Into<String>) -> Self {
        self.by_call.insert(index, body.into());
        self
    }

    /// Makes requests to `path` fail as if the connection were refused.
    pub fn disconnect(mut self, path: impl Into<String>) -> Self {
        self.disconnected.insert(path.into());
        self
    }

    /// Returns a copy of every request received, in order.
    pub fn calls(&self) -> Vec<RequestSpec> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: &RequestSpec) -> Result<String, TransportError> {
        let index = {
            let mut calls = self
                .calls
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            calls.push(request.clone());
            calls.len() - 1
        };

        let path = request.display_path();
        if let Some(body) = self.by_call.get(&index) {
            return Ok(body.clone());
        }
        if self.disconnected.contains(&path) {
            return Err(TransportError::Disconnected {
                method: request.method,
                path,
            });
        }

        self.by_path
            .get(&path)
            .or(self.fallback.as_ref())
            .cloned()
            .ok_or(TransportError::Unscripted {
                method: request.method,
                path,
            })
    }
}
