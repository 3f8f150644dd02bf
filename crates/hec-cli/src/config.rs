//! Command-line arguments.

use clap::Parser;
use hec_client::{ClientConfig, Headers, Metadata, SendOptions};
use serde_json::Value;

use crate::TRACING_TARGET_CONFIG;

/// Send one JSON event to an HTTP event collector.
#[derive(Debug, Parser)]
#[command(name = "hec-send", version, about)]
pub struct Cli {
    /// Collector connection settings.
    #[command(flatten)]
    pub client: ClientConfig,

    /// Event payload as JSON; plain text is sent as a JSON string
    #[arg(value_name = "EVENT")]
    pub event: String,

    /// Metadata field for this event (repeatable)
    #[arg(short = 'm', long = "metadata", value_name = "KEY=VALUE", value_parser = parse_key_value)]
    pub metadata: Vec<(String, String)>,

    /// Header for this request (repeatable)
    #[arg(short = 'H', long = "header", value_name = "NAME=VALUE", value_parser = parse_key_value)]
    pub headers: Vec<(String, String)>,

    /// Default header sent with every request (repeatable)
    #[arg(long = "hec-default-header", value_name = "NAME=VALUE", value_parser = parse_key_value)]
    pub default_headers: Vec<(String, String)>,
}

impl Cli {
    /// Returns the client configuration with the default headers applied.
    pub fn client_config(&self) -> ClientConfig {
        self.default_headers
            .iter()
            .fold(self.client.clone(), |config, (name, value)| {
                config.with_header(name, value)
            })
    }

    /// Parses the event payload, falling back to a JSON string.
    pub fn payload(&self) -> Value {
        serde_json::from_str(&self.event).unwrap_or_else(|_| Value::String(self.event.clone()))
    }

    /// Builds the per-call options from the metadata and header flags.
    pub fn send_options(&self) -> SendOptions {
        let metadata: Metadata = self
            .metadata
            .iter()
            .map(|(key, value)| (key.clone(), Value::String(value.clone())))
            .collect();
        let headers: Headers = self.headers.iter().cloned().collect();

        SendOptions::new()
            .with_metadata(metadata)
            .with_headers(headers)
    }
}

/// Logs the effective collector configuration. The token is never logged.
pub fn log_client_config(config: &ClientConfig) {
    tracing::info!(
        target: TRACING_TARGET_CONFIG,
        server = %config.server,
        port = config.port,
        use_tls = config.use_tls,
        verify = %config.certificate_verification,
        url_path_prefix = %config.url_path_prefix,
        url_path = %config.url_path,
        add_host = config.add_host_by_default,
        add_time = config.add_time_by_default,
        "collector configuration"
    );
}

fn parse_key_value(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got `{s}`"))?;

    let key = key.trim();
    if key.is_empty() {
        return Err(format!("empty key in `{s}`"));
    }

    Ok((key.to_owned(), value.to_owned()))
}
