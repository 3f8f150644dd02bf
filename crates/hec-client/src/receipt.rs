//! Result of an accepted event submission.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Acknowledgement that the collector accepted a request with a 2xx status.
///
/// The response body is not interpreted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Receipt {
    /// Identifier assigned to the request for log correlation.
    pub request_id: Uuid,
    /// HTTP status code returned by the collector.
    pub status_code: u16,
    /// Timestamp when the request was initiated.
    pub started_at: Timestamp,
    /// Timestamp when the response was received.
    pub finished_at: Timestamp,
}

impl Receipt {
    /// Creates a receipt, stamping the finish time.
    pub fn new(request_id: Uuid, status_code: u16, started_at: Timestamp) -> Self {
        Self {
            request_id,
            status_code,
            started_at,
            finished_at: Timestamp::now(),
        }
    }

    /// Calculates the round-trip time.
    pub fn duration(&self) -> jiff::Span {
        self.started_at.until(self.finished_at).unwrap_or_default()
    }
}

/// Returns whether a status code means the collector accepted the request.
pub const fn is_success(status_code: u16) -> bool {
    status_code >= 200 && status_code < 300
}
