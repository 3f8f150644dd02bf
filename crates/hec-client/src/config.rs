//! Event collector client configuration.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

#[cfg(feature = "config")]
use clap::Args;
use serde::{Deserialize, Serialize};

use crate::transport::TransportConfig;
use crate::{Error, Metadata, Result};

/// Default collector host.
pub const DEFAULT_SERVER: &str = "localhost";

/// Default collector port.
pub const DEFAULT_PORT: u16 = 8088;

/// Default collector endpoint path.
pub const DEFAULT_URL_PATH: &str = "/services/collector/event";

/// Metadata fields the collector indexes by default.
pub const DEFAULT_VALID_METADATA_FIELDS: [&str; 4] = ["host", "source", "sourcetype", "time"];

/// How the transport verifies the collector's TLS certificate.
///
/// Accepts `true`/`false` or a path to a CA bundle file or a directory of
/// PEM certificates, both from configuration files and the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "VerificationRepr", into = "VerificationRepr")]
pub enum CertificateVerification {
    /// Verify against the built-in trust roots.
    #[default]
    Enabled,
    /// Accept any certificate.
    Disabled,
    /// Verify against the certificates found at this path only.
    CaPath(PathBuf),
}

impl CertificateVerification {
    /// Returns whether any verification takes place.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        !matches!(self, Self::Disabled)
    }
}

#[derive(Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum VerificationRepr {
    Flag(bool),
    Path(PathBuf),
}

impl TryFrom<VerificationRepr> for CertificateVerification {
    type Error = Error;

    fn try_from(repr: VerificationRepr) -> Result<Self> {
        match repr {
            VerificationRepr::Flag(verify) => Ok(Self::from(verify)),
            VerificationRepr::Path(path) => match path.to_str() {
                Some(text) => text.parse(),
                None => Ok(Self::CaPath(path)),
            },
        }
    }
}

impl From<CertificateVerification> for VerificationRepr {
    fn from(verification: CertificateVerification) -> Self {
        match verification {
            CertificateVerification::Enabled => Self::Flag(true),
            CertificateVerification::Disabled => Self::Flag(false),
            CertificateVerification::CaPath(path) => Self::Path(path),
        }
    }
}

impl From<bool> for CertificateVerification {
    fn from(verify: bool) -> Self {
        if verify { Self::Enabled } else { Self::Disabled }
    }
}

impl FromStr for CertificateVerification {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Err(Error::configuration(
                "certificate verification must be true, false or a path",
            ));
        }

        if s.eq_ignore_ascii_case("true") {
            Ok(Self::Enabled)
        } else if s.eq_ignore_ascii_case("false") {
            Ok(Self::Disabled)
        } else {
            Ok(Self::CaPath(PathBuf::from(s)))
        }
    }
}

impl fmt::Display for CertificateVerification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Enabled => f.write_str("true"),
            Self::Disabled => f.write_str("false"),
            Self::CaPath(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Connection parameters and per-event defaults for an
/// [`EventCollector`](crate::EventCollector).
///
/// Host and time providers are capabilities rather than settings and are
/// injected on the client itself.
#[derive(Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
pub struct ClientConfig {
    /// Event collector token
    #[cfg_attr(feature = "config", arg(long = "hec-token", env = "HEC_TOKEN"))]
    pub token: String,

    /// Collector host name, FQDN or IP address
    #[cfg_attr(
        feature = "config",
        arg(long = "hec-server", env = "HEC_SERVER", default_value = DEFAULT_SERVER)
    )]
    #[serde(default = "default_server")]
    pub server: String,

    /// Collector port
    #[cfg_attr(
        feature = "config",
        arg(long = "hec-port", env = "HEC_PORT", default_value_t = DEFAULT_PORT)
    )]
    #[serde(default = "default_port")]
    pub port: u16,

    /// Use https instead of http
    #[cfg_attr(
        feature = "config",
        arg(
            long = "hec-tls",
            env = "HEC_TLS",
            default_value_t = true,
            action = clap::ArgAction::Set
        )
    )]
    #[serde(default = "default_true")]
    pub use_tls: bool,

    /// Certificate verification: true, false, or a CA bundle/directory path
    #[cfg_attr(
        feature = "config",
        arg(long = "hec-verify", env = "HEC_VERIFY", default_value = "true")
    )]
    #[serde(default)]
    pub certificate_verification: CertificateVerification,

    /// Endpoint path on the collector
    #[cfg_attr(
        feature = "config",
        arg(long = "hec-url-path", env = "HEC_URL_PATH", default_value = DEFAULT_URL_PATH)
    )]
    #[serde(default = "default_url_path")]
    pub url_path: String,

    /// Prefix inserted between the port and the endpoint path
    #[cfg_attr(
        feature = "config",
        arg(long = "hec-url-path-prefix", env = "HEC_URL_PATH_PREFIX", default_value = "")
    )]
    #[serde(default)]
    pub url_path_prefix: String,

    /// Metadata merged into every event.
    #[cfg_attr(feature = "config", arg(skip))]
    #[serde(default)]
    pub metadata: Metadata,

    /// Headers sent with every request.
    #[cfg_attr(feature = "config", arg(skip))]
    #[serde(default)]
    pub headers: BTreeMap<String, String>,

    /// Add the local host name to every request
    #[cfg_attr(feature = "config", arg(long = "hec-add-host", env = "HEC_ADD_HOST"))]
    #[serde(default)]
    pub add_host_by_default: bool,

    /// Add the current time to every request
    #[cfg_attr(feature = "config", arg(long = "hec-add-time", env = "HEC_ADD_TIME"))]
    #[serde(default)]
    pub add_time_by_default: bool,

    /// Metadata field names the collector is expected to index.
    #[cfg_attr(feature = "config", arg(skip = default_valid_metadata_fields()))]
    #[serde(default = "default_valid_metadata_fields")]
    pub valid_metadata_fields: BTreeSet<String>,

    /// HTTP request timeout in seconds
    #[cfg_attr(
        feature = "config",
        arg(long = "hec-http-timeout", env = "HEC_HTTP_TIMEOUT", default_value = "30")
    )]
    #[serde(default = "default_timeout_secs")]
    pub http_timeout: u64,

    /// User-Agent header to send with requests
    #[cfg_attr(
        feature = "config",
        arg(long = "hec-user-agent", env = "HEC_USER_AGENT")
    )]
    #[serde(default)]
    pub user_agent: Option<String>,
}

fn default_server() -> String {
    DEFAULT_SERVER.to_owned()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_true() -> bool {
    true
}

fn default_url_path() -> String {
    DEFAULT_URL_PATH.to_owned()
}

fn default_timeout_secs() -> u64 {
    crate::transport::DEFAULT_TIMEOUT_SECS
}

fn default_valid_metadata_fields() -> BTreeSet<String> {
    DEFAULT_VALID_METADATA_FIELDS
        .into_iter()
        .map(str::to_owned)
        .collect()
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("token", &"<redacted>")
            .field("server", &self.server)
            .field("port", &self.port)
            .field("use_tls", &self.use_tls)
            .field("certificate_verification", &self.certificate_verification)
            .field("url_path", &self.url_path)
            .field("url_path_prefix", &self.url_path_prefix)
            .field("metadata", &self.metadata)
            .field("headers", &self.headers.keys().collect::<Vec<_>>())
            .field("add_host_by_default", &self.add_host_by_default)
            .field("add_time_by_default", &self.add_time_by_default)
            .field("valid_metadata_fields", &self.valid_metadata_fields)
            .field("http_timeout", &self.http_timeout)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

impl ClientConfig {
    /// Creates a configuration with the given token and all defaults
    /// (`localhost:8088`, https, verified certificates).
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            server: default_server(),
            port: DEFAULT_PORT,
            use_tls: true,
            certificate_verification: CertificateVerification::Enabled,
            url_path: default_url_path(),
            url_path_prefix: String::new(),
            metadata: Metadata::new(),
            headers: BTreeMap::new(),
            add_host_by_default: false,
            add_time_by_default: false,
            valid_metadata_fields: default_valid_metadata_fields(),
            http_timeout: default_timeout_secs(),
            user_agent: None,
        }
    }

    /// Checks the settings every client needs.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when the token is missing.
    pub fn validate(&self) -> Result<()> {
        if self.token.trim().is_empty() {
            return Err(Error::configuration("an event collector token is required"));
        }

        Ok(())
    }

    /// Returns the URL scheme selected by [`use_tls`](Self::use_tls).
    #[must_use]
    pub fn scheme(&self) -> &'static str {
        if self.use_tls { "https" } else { "http" }
    }

    /// Returns `server:port`, handy when logging target endpoints.
    pub fn address(&self) -> String {
        format!("{}:{}", self.server, self.port)
    }

    /// Returns the settings handed to the transport.
    pub fn transport_config(&self) -> TransportConfig {
        TransportConfig {
            http_timeout: self.http_timeout,
            user_agent: self.user_agent.clone(),
            certificate_verification: self.certificate_verification.clone(),
        }
    }

    /// Sets the collector host.
    #[must_use]
    pub fn with_server(mut self, server: impl Into<String>) -> Self {
        self.server = server.into();
        self
    }

    /// Sets the collector port. Defaults to 8088.
    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Selects https (`true`) or plain http (`false`).
    #[must_use]
    pub fn with_tls(mut self, use_tls: bool) -> Self {
        self.use_tls = use_tls;
        self
    }

    /// Sets how the collector's certificate is verified.
    #[must_use]
    pub fn with_certificate_verification(
        mut self,
        verification: impl Into<CertificateVerification>,
    ) -> Self {
        self.certificate_verification = verification.into();
        self
    }

    /// Sets the endpoint path.
    #[must_use]
    pub fn with_url_path(mut self, url_path: impl Into<String>) -> Self {
        self.url_path = url_path.into();
        self
    }

    /// Sets the prefix placed between the port and the endpoint path.
    #[must_use]
    pub fn with_url_path_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.url_path_prefix = prefix.into();
        self
    }

    /// Replaces the default event metadata.
    #[must_use]
    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Adds one default metadata field.
    #[must_use]
    pub fn with_metadata_field(
        mut self,
        name: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        self.metadata.insert(name.into(), value.into());
        self
    }

    /// Adds one default request header.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Adds the local host name to requests unless a call says otherwise.
    #[must_use]
    pub fn with_add_host(mut self, add_host: bool) -> Self {
        self.add_host_by_default = add_host;
        self
    }

    /// Adds the current time to requests unless a call says otherwise.
    #[must_use]
    pub fn with_add_time(mut self, add_time: bool) -> Self {
        self.add_time_by_default = add_time;
        self
    }

    /// Replaces the set of metadata fields the collector indexes.
    #[must_use]
    pub fn with_valid_metadata_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.valid_metadata_fields = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the HTTP timeout in seconds.
    #[must_use]
    pub fn with_http_timeout(mut self, timeout_secs: u64) -> Self {
        self.http_timeout = timeout_secs;
        self
    }

    /// Sets the user agent.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }
}
