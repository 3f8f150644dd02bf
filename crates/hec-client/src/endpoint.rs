//! Collector endpoint URL composition.

use std::fmt;
use std::net::Ipv6Addr;

use url::Url;

use crate::{ClientConfig, Error, Result};

/// Fully composed collector URL, computed once per client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    url: String,
}

impl Endpoint {
    /// Composes `scheme://server:port[/prefix]/path` from the configuration.
    ///
    /// Slashes between prefix and path are normalized so that exactly one
    /// separates them, whichever side carries it. A bare IPv6 server address
    /// is wrapped in brackets.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the result is not a valid URL.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let url = format!(
            "{}://{}:{}{}",
            config.scheme(),
            host(&config.server),
            config.port,
            join_path(&config.url_path_prefix, &config.url_path),
        );

        Url::parse(&url).map_err(|err| {
            Error::configuration(format!("invalid collector url `{url}`: {err}"))
        })?;

        Ok(Self { url })
    }

    /// Returns the URL exactly as composed.
    pub fn as_str(&self) -> &str {
        &self.url
    }
}

impl AsRef<str> for Endpoint {
    fn as_ref(&self) -> &str {
        &self.url
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url)
    }
}

fn host(server: &str) -> String {
    if server.parse::<Ipv6Addr>().is_ok() {
        format!("[{server}]")
    } else {
        server.to_owned()
    }
}

fn join_path(prefix: &str, path: &str) -> String {
    let mut joined = String::with_capacity(prefix.len() + path.len() + 2);

    if !prefix.is_empty() {
        if !prefix.starts_with('/') {
            joined.push('/');
        }
        joined.push_str(prefix.strip_suffix('/').unwrap_or(prefix));
    }

    if !path.starts_with('/') {
        joined.push('/');
    }
    joined.push_str(path);
    joined
}
