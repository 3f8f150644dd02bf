//! Transport configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::CertificateVerification;

/// Default timeout for HTTP requests: 30 seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Settings for the HTTP transport collaborator.
///
/// Derived from [`ClientConfig`](crate::ClientConfig) via
/// [`transport_config`](crate::ClientConfig::transport_config).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransportConfig {
    /// HTTP request timeout in seconds; zero selects the default.
    #[serde(default)]
    pub http_timeout: u64,

    /// User-Agent header to send with requests.
    #[serde(default)]
    pub user_agent: Option<String>,

    /// How the collector's certificate is verified.
    #[serde(default)]
    pub certificate_verification: CertificateVerification,
}

impl TransportConfig {
    /// Returns the effective timeout, using default if zero.
    pub fn effective_timeout(&self) -> Duration {
        if self.http_timeout == 0 {
            Duration::from_secs(DEFAULT_TIMEOUT_SECS)
        } else {
            Duration::from_secs(self.http_timeout)
        }
    }

    /// Returns the effective user agent, using default if not set.
    pub fn effective_user_agent(&self) -> String {
        self.user_agent
            .clone()
            .filter(|agent| !agent.is_empty())
            .unwrap_or_else(Self::default_user_agent)
    }

    fn default_user_agent() -> String {
        format!("hec-client/{}", env!("CARGO_PKG_VERSION"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effective_timeout_uses_default_when_zero() {
        let config = TransportConfig::default();
        assert_eq!(
            config.effective_timeout(),
            Duration::from_secs(DEFAULT_TIMEOUT_SECS)
        );

        let config = TransportConfig {
            http_timeout: 3,
            ..Default::default()
        };
        assert_eq!(config.effective_timeout(), Duration::from_secs(3));
    }

    #[test]
    fn test_effective_user_agent() {
        let config = TransportConfig::default();
        assert!(config.effective_user_agent().starts_with("hec-client/"));

        let config = TransportConfig {
            user_agent: Some("forwarder/2.0".into()),
            ..Default::default()
        };
        assert_eq!(config.effective_user_agent(), "forwarder/2.0");
    }
}
