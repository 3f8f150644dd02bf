//! Reqwest-based HTTP transport for event delivery.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use ::reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use ::reqwest::{Certificate, Client};

use super::{Error, Result};
use crate::TRACING_TARGET_TRANSPORT;
use crate::config::CertificateVerification;
use crate::transport::{Transport, TransportConfig, TransportRequest, TransportResponse};

/// File extensions loaded from a CA directory.
const CA_EXTENSIONS: [&str; 3] = ["pem", "crt", "cer"];

/// Inner transport that holds the HTTP client and configuration.
struct ReqwestTransportInner {
    http: Client,
    config: TransportConfig,
}

/// Reqwest-based transport that posts events to the collector.
///
/// Certificate verification is fixed when the transport is built: it either
/// uses the built-in roots, accepts any certificate, or trusts only the
/// certificates found at a configured path.
#[derive(Clone)]
pub struct ReqwestTransport {
    inner: Arc<ReqwestTransportInner>,
}

impl std::fmt::Debug for ReqwestTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReqwestTransport")
            .field("config", &self.inner.config)
            .finish_non_exhaustive()
    }
}

impl ReqwestTransport {
    /// Creates a new transport with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the CA material cannot be loaded or
    /// the HTTP client cannot be built.
    pub fn new(config: &TransportConfig) -> crate::Result<Self> {
        let timeout = config.effective_timeout();
        let user_agent = config.effective_user_agent();

        tracing::debug!(
            target: TRACING_TARGET_TRANSPORT,
            timeout_ms = timeout.as_millis(),
            verification = %config.certificate_verification,
            "Creating reqwest transport"
        );

        let mut builder = Client::builder().timeout(timeout).user_agent(&user_agent);

        match &config.certificate_verification {
            CertificateVerification::Enabled => {}
            CertificateVerification::Disabled => {
                tracing::warn!(
                    target: TRACING_TARGET_TRANSPORT,
                    "TLS certificate verification is disabled"
                );
                builder = builder.danger_accept_invalid_certs(true);
            }
            CertificateVerification::CaPath(path) => {
                let certificates = load_ca_certificates(path)
                    .map_err(|err| crate::Error::configuration(err.to_string()))?;

                tracing::debug!(
                    target: TRACING_TARGET_TRANSPORT,
                    path = %path.display(),
                    count = certificates.len(),
                    "Loaded CA certificates"
                );

                builder = builder.tls_built_in_root_certs(false);
                for certificate in certificates {
                    builder = builder.add_root_certificate(certificate);
                }
            }
        }

        let http = builder.build().map_err(|err| {
            crate::Error::configuration(format!("failed to create HTTP client: {err}"))
        })?;

        let inner = ReqwestTransportInner {
            http,
            config: config.clone(),
        };

        Ok(Self {
            inner: Arc::new(inner),
        })
    }

    /// Gets the underlying HTTP client.
    pub(crate) fn http(&self) -> &Client {
        &self.inner.http
    }

    /// Gets the transport configuration.
    pub fn config(&self) -> &TransportConfig {
        &self.inner.config
    }
}

#[async_trait::async_trait]
impl Transport for ReqwestTransport {
    async fn post(&self, request: TransportRequest) -> crate::Result<TransportResponse> {
        let headers = header_map(&request)?;

        let http_response = self
            .http()
            .post(&request.url)
            .headers(headers)
            .body(request.body)
            .send()
            .await
            .map_err(Error::from)?;

        let status = http_response.status().as_u16();
        let body = match http_response.text().await {
            Ok(body) => body,
            Err(error) => {
                tracing::debug!(
                    target: TRACING_TARGET_TRANSPORT,
                    status,
                    error = %error,
                    "Failed to read collector response body"
                );
                String::new()
            }
        };

        tracing::trace!(
            target: TRACING_TARGET_TRANSPORT,
            url = %request.url,
            status,
            body_len = body.len(),
            "Collector responded"
        );

        Ok(TransportResponse { status, body })
    }
}

fn header_map(request: &TransportRequest) -> crate::Result<HeaderMap> {
    let mut headers = HeaderMap::with_capacity(request.headers.len() + 1);

    for (name, value) in request.headers.iter() {
        let header_name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|err| crate::Error::transport(format!("invalid header name `{name}`"), err))?;
        let header_value = HeaderValue::from_str(value)
            .map_err(|err| crate::Error::transport(format!("invalid value for header `{name}`"), err))?;
        headers.insert(header_name, header_value);
    }

    if !headers.contains_key(CONTENT_TYPE) {
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    }

    Ok(headers)
}

/// Reads a PEM bundle file, or every certificate file in a directory.
fn load_ca_certificates(path: &Path) -> Result<Vec<Certificate>> {
    let read = |file: &Path| {
        fs::read(file).map_err(|source| Error::CaRead {
            path: file.to_path_buf(),
            source,
        })
    };

    let mut certificates = Vec::new();

    if path.is_dir() {
        let entries = fs::read_dir(path).map_err(|source| Error::CaRead {
            path: path.to_path_buf(),
            source,
        })?;

        for entry in entries {
            let file = entry
                .map_err(|source| Error::CaRead {
                    path: path.to_path_buf(),
                    source,
                })?
                .path();

            let is_certificate = file
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| CA_EXTENSIONS.iter().any(|c| ext.eq_ignore_ascii_case(c)));

            if is_certificate && file.is_file() {
                certificates.extend(Certificate::from_pem_bundle(&read(&file)?)?);
            }
        }
    } else {
        certificates.extend(Certificate::from_pem_bundle(&read(path)?)?);
    }

    if certificates.is_empty() {
        return Err(Error::NoCaCertificates(path.to_path_buf()));
    }

    Ok(certificates)
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::{ErrorKind, Headers};

    #[test]
    fn test_transport_creation() {
        let transport = ReqwestTransport::new(&TransportConfig::default()).unwrap();
        assert!(transport.config().user_agent.is_none());
    }

    #[test]
    fn test_transport_without_verification() {
        let config = TransportConfig {
            certificate_verification: CertificateVerification::Disabled,
            ..Default::default()
        };
        assert!(ReqwestTransport::new(&config).is_ok());
    }

    #[test]
    fn test_missing_ca_path_is_configuration_error() {
        let config = TransportConfig {
            certificate_verification: CertificateVerification::CaPath(PathBuf::from(
                "/nonexistent/hec-client/ca.pem",
            )),
            ..Default::default()
        };

        let error = ReqwestTransport::new(&config).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn test_empty_ca_directory_is_configuration_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("README.txt"), "not a certificate").unwrap();

        let config = TransportConfig {
            certificate_verification: CertificateVerification::CaPath(dir.path().to_path_buf()),
            ..Default::default()
        };

        let error = ReqwestTransport::new(&config).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Configuration);
    }

    const CA_FIXTURE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/ca.pem");

    #[test]
    fn test_ca_bundle_file_is_loaded() {
        let certificates = load_ca_certificates(Path::new(CA_FIXTURE)).unwrap();
        assert_eq!(certificates.len(), 1);

        let config = TransportConfig {
            certificate_verification: CertificateVerification::CaPath(PathBuf::from(CA_FIXTURE)),
            ..Default::default()
        };
        assert!(ReqwestTransport::new(&config).is_ok());
    }

    #[test]
    fn test_ca_directory_loads_certificate_extensions_only() {
        let pem = std::fs::read(CA_FIXTURE).unwrap();
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.crt"), &pem).unwrap();
        std::fs::write(dir.path().join("b.PEM"), &pem).unwrap();
        std::fs::write(dir.path().join("c.cer"), &pem).unwrap();
        std::fs::write(dir.path().join("d.txt"), &pem).unwrap();
        std::fs::write(dir.path().join("ca.key"), "not a certificate").unwrap();

        let certificates = load_ca_certificates(dir.path()).unwrap();
        assert_eq!(certificates.len(), 3);

        let config = TransportConfig {
            certificate_verification: CertificateVerification::CaPath(dir.path().to_path_buf()),
            ..Default::default()
        };
        assert!(ReqwestTransport::new(&config).is_ok());
    }

    #[test]
    fn test_header_map_adds_content_type() {
        let request = TransportRequest {
            url: "http://localhost:8088/services/collector/event".into(),
            headers: Headers::new().with("Authorization", "Splunk T1"),
            body: "{}".into(),
        };

        let headers = header_map(&request).unwrap();
        assert_eq!(headers["authorization"], "Splunk T1");
        assert_eq!(headers[CONTENT_TYPE], "application/json");
    }

    #[test]
    fn test_header_map_keeps_caller_content_type() {
        let request = TransportRequest {
            url: "http://localhost:8088/services/collector/event".into(),
            headers: Headers::new().with("content-type", "text/plain"),
            body: "{}".into(),
        };

        let headers = header_map(&request).unwrap();
        assert_eq!(headers.len(), 1);
        assert_eq!(headers[CONTENT_TYPE], "text/plain");
    }

    #[test]
    fn test_header_map_rejects_invalid_name() {
        let request = TransportRequest {
            url: "http://localhost:8088/".into(),
            headers: Headers::new().with("bad header", "x"),
            body: "{}".into(),
        };

        let error = header_map(&request).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Transport);
    }
}
