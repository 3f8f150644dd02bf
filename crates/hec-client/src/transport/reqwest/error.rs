//! Error types for the reqwest transport.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for reqwest transport operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for reqwest transport operations.
#[derive(Debug, Error)]
pub enum Error {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Reqwest(#[from] ::reqwest::Error),
    /// CA material could not be read.
    #[error("failed to read CA certificates from {}: {source}", path.display())]
    CaRead {
        /// File or directory that was read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// No usable CA certificate was found.
    #[error("no CA certificates found at {}", .0.display())]
    NoCaCertificates(PathBuf),
}

impl From<Error> for crate::Error {
    fn from(err: Error) -> Self {
        match err {
            Error::Reqwest(e) => {
                if e.is_timeout() {
                    crate::Error::transport("Request timed out", e)
                } else if e.is_connect() {
                    crate::Error::transport("Connection failed", e)
                } else {
                    crate::Error::transport(e.to_string(), e)
                }
            }
            e @ (Error::CaRead { .. } | Error::NoCaCertificates(_)) => {
                crate::Error::configuration(e.to_string())
            }
        }
    }
}
