//! Recording transport for tests.
//!
//! This module is only available when the `test-utils` feature is enabled:
//!
//! ```toml
//! [dev-dependencies]
//! hec-client = { version = "...", features = ["test-utils"] }
//! ```

use std::sync::{Arc, Mutex, PoisonError};

use super::{Transport, TransportRequest, TransportResponse};
use crate::Result;

/// Transport that records every request and replies with a fixed response.
#[derive(Debug, Clone)]
pub struct MockTransport {
    response: TransportResponse,
    requests: Arc<Mutex<Vec<TransportRequest>>>,
}

impl MockTransport {
    /// Creates a transport that answers `200` with a collector-style body.
    pub fn new() -> Self {
        Self::with_response(TransportResponse::new(200, r#"{"text":"Success","code":0}"#))
    }

    /// Creates a transport that answers with the given response.
    pub fn with_response(response: TransportResponse) -> Self {
        Self {
            response,
            requests: Arc::default(),
        }
    }

    /// Creates a transport that answers with the given status and body.
    pub fn with_status(status: u16, body: impl Into<String>) -> Self {
        Self::with_response(TransportResponse::new(status, body))
    }

    /// Returns all requests received so far.
    pub fn requests(&self) -> Vec<TransportRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns the most recent request.
    pub fn last_request(&self) -> Option<TransportRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .cloned()
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl Transport for MockTransport {
    async fn post(&self, request: TransportRequest) -> Result<TransportResponse> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request);
        Ok(self.response.clone())
    }
}
