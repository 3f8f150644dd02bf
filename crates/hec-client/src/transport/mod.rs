//! HTTP transport seam.
//!
//! The client hands a fully built request to a [`Transport`] and only looks
//! at the returned status. Connection handling, TLS and timeouts belong to the
//! transport implementation.

mod config;
#[cfg(any(test, feature = "test-utils"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-utils")))]
pub mod mock;
#[cfg(feature = "reqwest")]
#[cfg_attr(docsrs, doc(cfg(feature = "reqwest")))]
pub mod reqwest;

pub use config::{DEFAULT_TIMEOUT_SECS, TransportConfig};

use crate::{Headers, Result};

/// An outbound POST of one JSON document.
#[derive(Debug, Clone)]
pub struct TransportRequest {
    /// Target URL.
    pub url: String,
    /// Headers to send, already merged.
    pub headers: Headers,
    /// UTF-8 JSON body.
    pub body: String,
}

/// Status and body returned by the collector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body, possibly empty.
    pub body: String,
}

impl TransportResponse {
    /// Creates a response with the given status and body.
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Sends requests to the collector.
///
/// Implementations return `Ok` for any response that arrived, whatever its
/// status, and an [`Error::Transport`](crate::Error::Transport) when no
/// response was received.
#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    /// Issues a single POST request.
    async fn post(&self, request: TransportRequest) -> Result<TransportResponse>;
}
