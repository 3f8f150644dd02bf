//! Host name and timestamp providers used to enrich requests.
//!
//! The defaults read the system host name and clock. Any
//! `Fn() -> String + Send + Sync` closure can stand in for either provider.

use std::sync::Arc;

use jiff::Timestamp;

use crate::TRACING_TARGET_CLIENT;

/// Fallback used when the system host name cannot be read.
pub const FALLBACK_HOSTNAME: &str = "localhost";

/// Produces the host name attached to requests.
pub trait HostProvider: Send + Sync {
    /// Returns the current host name.
    fn hostname(&self) -> String;
}

/// Produces the timestamp attached to requests.
pub trait TimeProvider: Send + Sync {
    /// Returns the current time as a string.
    fn timestamp(&self) -> String;
}

/// Shared host provider handle.
pub type SharedHostProvider = Arc<dyn HostProvider>;

/// Shared time provider handle.
pub type SharedTimeProvider = Arc<dyn TimeProvider>;

/// Reads the host name from the operating system.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemHostProvider;

impl HostProvider for SystemHostProvider {
    fn hostname(&self) -> String {
        match hostname::get() {
            Ok(name) => name.to_string_lossy().into_owned(),
            Err(error) => {
                tracing::warn!(
                    target: TRACING_TARGET_CLIENT,
                    error = %error,
                    fallback = FALLBACK_HOSTNAME,
                    "Failed to read system host name"
                );
                FALLBACK_HOSTNAME.to_owned()
            }
        }
    }
}

/// Formats the system clock as whole Unix epoch seconds.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemTimeProvider;

impl TimeProvider for SystemTimeProvider {
    fn timestamp(&self) -> String {
        Timestamp::now().as_second().to_string()
    }
}

impl<F> HostProvider for F
where
    F: Fn() -> String + Send + Sync,
{
    fn hostname(&self) -> String {
        self()
    }
}

impl<F> TimeProvider for F
where
    F: Fn() -> String + Send + Sync,
{
    fn timestamp(&self) -> String {
        self()
    }
}
