//! Structured error handling for event collector operations.

use strum::{AsRefStr, Display, EnumString, IntoStaticStr};
use thiserror::Error;

/// Type alias for boxed dynamic errors that can be sent across threads.
pub type BoxedError = Box<dyn std::error::Error + Send + Sync>;

/// Type alias for Results with our custom Error type.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Categories of errors that can occur while submitting events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(AsRefStr, Display, EnumString, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum ErrorKind {
    /// The client configuration is unusable.
    Configuration,
    /// The collector answered with a non-2xx status.
    Transmission,
    /// The transport failed before a response was received.
    Transport,
    /// The event could not be encoded as JSON.
    Serialization,
}

/// Error type for event collector operations.
#[derive(Debug, Error)]
pub enum Error {
    /// A required setting is missing or invalid.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The collector rejected the request.
    #[error("event collector responded with status {status}{}", body.as_ref().map(|b| format!(": {b}")).unwrap_or_default())]
    Transmission {
        /// HTTP status code returned by the collector.
        status: u16,
        /// Response body, when the collector sent one.
        body: Option<String>,
    },

    /// The underlying HTTP transport failed (DNS, connect, TLS, timeout).
    #[error("transport error: {message}")]
    Transport {
        /// Short description of the failure.
        message: String,
        /// Error reported by the transport.
        #[source]
        source: BoxedError,
    },

    /// The event could not be serialized.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Creates a configuration error with the given message.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Creates a transport error wrapping the given source.
    pub fn transport(message: impl Into<String>, source: impl Into<BoxedError>) -> Self {
        Self::Transport {
            message: message.into(),
            source: source.into(),
        }
    }

    /// Returns the category of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Configuration(_) => ErrorKind::Configuration,
            Self::Transmission { .. } => ErrorKind::Transmission,
            Self::Transport { .. } => ErrorKind::Transport,
            Self::Serialization(_) => ErrorKind::Serialization,
        }
    }

    /// Returns the HTTP status code of a rejected request.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Transmission { status, .. } => Some(*status),
            _ => None,
        }
    }
}
