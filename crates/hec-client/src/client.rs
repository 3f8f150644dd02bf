//! Event collector client: enrichment and transmission.

use std::fmt;
use std::sync::Arc;

use jiff::Timestamp;
use serde::Serialize;
use uuid::Uuid;

use crate::endpoint::Endpoint;
use crate::headers::base_headers;
use crate::provider::{
    HostProvider, SharedHostProvider, SharedTimeProvider, SystemHostProvider, SystemTimeProvider,
    TimeProvider,
};
use crate::receipt::is_success;
#[cfg(feature = "reqwest")]
use crate::transport::reqwest::ReqwestTransport;
use crate::transport::{Transport, TransportRequest};
use crate::{
    ClientConfig, Error, Event, Headers, Metadata, Receipt, Result, TRACING_TARGET_CLIENT,
};

/// Header that carries the host name when host enrichment is on.
pub const HOST_FIELD: &str = "host";

/// Header that carries the timestamp when time enrichment is on.
pub const TIME_FIELD: &str = "time";

/// Per-call options for [`EventCollector::send`].
///
/// Every call owns its options; nothing is shared between calls.
#[derive(Clone, Default)]
pub struct SendOptions {
    /// Metadata merged over the configured defaults.
    pub metadata: Metadata,
    /// Headers merged over the base headers.
    pub headers: Headers,
    /// Overrides [`ClientConfig::add_host_by_default`].
    pub add_host: Option<bool>,
    /// Overrides [`ClientConfig::add_time_by_default`].
    pub add_time: Option<bool>,
    /// Host provider for this call only.
    pub host_provider: Option<SharedHostProvider>,
    /// Time provider for this call only.
    pub time_provider: Option<SharedTimeProvider>,
}

impl fmt::Debug for SendOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SendOptions")
            .field("metadata", &self.metadata)
            .field("headers", &self.headers)
            .field("add_host", &self.add_host)
            .field("add_time", &self.add_time)
            .field("host_provider", &self.host_provider.is_some())
            .field("time_provider", &self.time_provider.is_some())
            .finish()
    }
}

impl SendOptions {
    /// Creates empty options that follow the client defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the per-call metadata.
    #[must_use]
    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Adds one metadata field.
    #[must_use]
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.metadata.insert(name.into(), value.into());
        self
    }

    /// Replaces the per-call headers.
    #[must_use]
    pub fn with_headers(mut self, headers: Headers) -> Self {
        self.headers = headers;
        self
    }

    /// Adds one header.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Turns host enrichment on or off for this call.
    #[must_use]
    pub fn add_host(mut self, add_host: bool) -> Self {
        self.add_host = Some(add_host);
        self
    }

    /// Turns time enrichment on or off for this call.
    #[must_use]
    pub fn add_time(mut self, add_time: bool) -> Self {
        self.add_time = Some(add_time);
        self
    }

    /// Uses the given host provider for this call.
    #[must_use]
    pub fn with_host_provider(mut self, provider: impl HostProvider + 'static) -> Self {
        self.host_provider = Some(Arc::new(provider));
        self
    }

    /// Uses the given time provider for this call.
    #[must_use]
    pub fn with_time_provider(mut self, provider: impl TimeProvider + 'static) -> Self {
        self.time_provider = Some(Arc::new(provider));
        self
    }
}

/// Client that submits events to an HTTP event collector.
///
/// The endpoint URL and base headers are computed once at construction and
/// never change afterwards, so a client can be cloned and shared freely.
/// Every send issues exactly one request; nothing is retried or batched.
///
/// # Examples
///
/// ```rust,ignore
/// use hec_client::{ClientConfig, EventCollector, SendOptions};
///
/// let config = ClientConfig::new("C4457A9C-E528-49FA-8382-D1837A24986C")
///     .with_tls(false)
///     .with_certificate_verification(false);
/// let collector = EventCollector::new(config)?;
///
/// let payload = serde_json::json!({"policy": "39", "src_ip": "127.0.0.10"});
/// collector.send(&payload, SendOptions::new().add_time(true)).await?;
/// ```
#[derive(Clone)]
pub struct EventCollector {
    config: Arc<ClientConfig>,
    endpoint: Endpoint,
    headers: Headers,
    host_provider: SharedHostProvider,
    time_provider: SharedTimeProvider,
    transport: Arc<dyn Transport>,
}

impl fmt::Debug for EventCollector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventCollector")
            .field("config", &self.config)
            .field("endpoint", &self.endpoint)
            .field("headers", &self.headers)
            .finish_non_exhaustive()
    }
}

impl EventCollector {
    /// Creates a client that delivers through a [`ReqwestTransport`].
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the token is missing, the endpoint URL
    /// is invalid, or the transport cannot be built.
    #[cfg(feature = "reqwest")]
    #[cfg_attr(docsrs, doc(cfg(feature = "reqwest")))]
    pub fn new(config: ClientConfig) -> Result<Self> {
        config.validate()?;
        let transport = ReqwestTransport::new(&config.transport_config())?;
        Self::with_transport(config, transport)
    }

    /// Creates a client that delivers through the given transport.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the token is missing or the endpoint
    /// URL is invalid.
    pub fn with_transport(config: ClientConfig, transport: impl Transport + 'static) -> Result<Self> {
        config.validate()?;

        let endpoint = Endpoint::new(&config)?;
        let headers = base_headers(&config);

        tracing::info!(
            target: TRACING_TARGET_CLIENT,
            endpoint = %endpoint,
            add_host = config.add_host_by_default,
            add_time = config.add_time_by_default,
            "Event collector client created"
        );

        Ok(Self {
            config: Arc::new(config),
            endpoint,
            headers,
            host_provider: Arc::new(SystemHostProvider),
            time_provider: Arc::new(SystemTimeProvider),
            transport: Arc::new(transport),
        })
    }

    /// Replaces the default host provider.
    #[must_use]
    pub fn with_host_provider(mut self, provider: impl HostProvider + 'static) -> Self {
        self.host_provider = Arc::new(provider);
        self
    }

    /// Replaces the default time provider.
    #[must_use]
    pub fn with_time_provider(mut self, provider: impl TimeProvider + 'static) -> Self {
        self.time_provider = Arc::new(provider);
        self
    }

    /// Gets the client configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Gets the collector endpoint URL.
    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// Gets the headers sent with every request.
    pub fn base_headers(&self) -> &Headers {
        &self.headers
    }

    /// Wraps `data` as `{ <metadata...>, "event": data }` and sends it.
    ///
    /// Metadata is the configured default metadata with the per-call
    /// metadata merged on top. When host or time enrichment is enabled, the
    /// values are added to the request headers as `host` and `time`.
    ///
    /// # Errors
    ///
    /// Returns a serialization error if `data` cannot be encoded, a
    /// transmission error for non-2xx responses, or the transport's error.
    pub async fn send<D>(&self, data: &D, options: SendOptions) -> Result<Receipt>
    where
        D: Serialize + ?Sized,
    {
        let SendOptions {
            metadata,
            mut headers,
            add_host,
            add_time,
            host_provider,
            time_provider,
        } = options;

        if add_host.unwrap_or(self.config.add_host_by_default) {
            let provider = host_provider.as_ref().unwrap_or(&self.host_provider);
            headers.insert(HOST_FIELD, provider.hostname());
        }

        if add_time.unwrap_or(self.config.add_time_by_default) {
            let provider = time_provider.as_ref().unwrap_or(&self.time_provider);
            headers.insert(TIME_FIELD, provider.timestamp());
        }

        let event = Event::from_payload(data)?
            .with_metadata(self.config.metadata.clone())
            .with_metadata(metadata);

        let unrecognized = event.unrecognized_fields(&self.config.valid_metadata_fields);
        if !unrecognized.is_empty() {
            tracing::debug!(
                target: TRACING_TARGET_CLIENT,
                fields = ?unrecognized,
                "Event carries metadata fields outside the indexed set"
            );
        }

        self.send_event(&event, headers).await
    }

    /// Serializes a fully assembled event and sends it.
    ///
    /// # Errors
    ///
    /// Returns a serialization error if the event cannot be encoded, a
    /// transmission error for non-2xx responses, or the transport's error.
    pub async fn send_event<E>(&self, event: &E, headers: Headers) -> Result<Receipt>
    where
        E: Serialize + ?Sized,
    {
        let json = serde_json::to_string(event)?;
        self.send_event_json(json, headers).await
    }

    /// Posts JSON text to the collector.
    ///
    /// `headers` are merged over the base headers; per-call values win.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Transmission`] with the status and body when the
    /// collector answers with a non-2xx status, or the transport's error
    /// when no response arrives.
    pub async fn send_event_json(
        &self,
        json: impl Into<String>,
        headers: Headers,
    ) -> Result<Receipt> {
        let request_id = Uuid::now_v7();
        let started_at = Timestamp::now();
        let body = json.into();

        tracing::debug!(
            target: TRACING_TARGET_CLIENT,
            request_id = %request_id,
            url = %self.endpoint,
            body_len = body.len(),
            "Sending event"
        );

        let request = TransportRequest {
            url: self.endpoint.as_str().to_owned(),
            headers: self.headers.clone().merged(headers),
            body,
        };

        let response = self.transport.post(request).await?;

        if !is_success(response.status) {
            return Err(Error::Transmission {
                status: response.status,
                body: (!response.body.is_empty()).then_some(response.body),
            });
        }

        let receipt = Receipt::new(request_id, response.status, started_at);

        tracing::debug!(
            target: TRACING_TARGET_CLIENT,
            request_id = %request_id,
            status_code = receipt.status_code,
            "Event accepted"
        );

        Ok(receipt)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use super::*;
    use crate::ErrorKind;
    use crate::transport::mock::MockTransport;

    fn local_config(token: &str) -> ClientConfig {
        ClientConfig::new(token)
            .with_server("localhost")
            .with_port(8088)
            .with_tls(false)
    }

    fn collector(config: ClientConfig) -> (EventCollector, MockTransport) {
        let transport = MockTransport::new();
        let collector = EventCollector::with_transport(config, transport.clone()).unwrap();
        (collector, transport)
    }

    fn body(transport: &MockTransport) -> Value {
        let request = transport.last_request().unwrap();
        serde_json::from_str(&request.body).unwrap()
    }

    #[tokio::test]
    async fn test_end_to_end_send() {
        let (collector, transport) = collector(local_config("T1"));

        let receipt = collector
            .send(&json!({"src_ip": "127.0.0.10"}), SendOptions::new())
            .await
            .unwrap();
        assert_eq!(receipt.status_code, 200);

        let request = transport.last_request().unwrap();
        assert_eq!(request.url, "http://localhost:8088/services/collector/event");
        assert_eq!(request.headers.get("Authorization"), Some("Splunk T1"));
        assert_eq!(body(&transport), json!({"event": {"src_ip": "127.0.0.10"}}));
    }

    #[test]
    fn test_missing_token_is_rejected() {
        let error = EventCollector::with_transport(local_config(""), MockTransport::new())
            .unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Configuration);
    }

    #[tokio::test]
    async fn test_call_metadata_overrides_defaults() {
        let config = local_config("T1")
            .with_metadata_field("sourcetype", "default")
            .with_metadata_field("source", "app");
        let (collector, transport) = collector(config);

        let payload = json!({"policy": "39"});
        let options = SendOptions::new()
            .with_field("sourcetype", "override")
            .with_field("time", "1700000000");
        collector.send(&payload, options).await.unwrap();

        assert_eq!(
            body(&transport),
            json!({
                "source": "app",
                "sourcetype": "override",
                "time": "1700000000",
                "event": {"policy": "39"}
            })
        );
    }

    #[tokio::test]
    async fn test_metadata_does_not_leak_between_calls() {
        let (collector, transport) = collector(local_config("T1"));

        collector
            .send("first", SendOptions::new().with_field("source", "one"))
            .await
            .unwrap();
        collector.send("second", SendOptions::new()).await.unwrap();

        assert_eq!(body(&transport), json!({"event": "second"}));
        assert_eq!(transport.requests().len(), 2);
    }

    #[tokio::test]
    async fn test_host_and_time_go_into_headers() {
        let (collector, transport) = collector(local_config("T1"));
        let collector = collector
            .with_host_provider(|| "web-01".to_string())
            .with_time_provider(|| "1700000000".to_string());

        collector
            .send(&json!({"a": 1}), SendOptions::new().add_host(true).add_time(true))
            .await
            .unwrap();

        let request = transport.last_request().unwrap();
        assert_eq!(request.headers.get(HOST_FIELD), Some("web-01"));
        assert_eq!(request.headers.get(TIME_FIELD), Some("1700000000"));
        assert_eq!(body(&transport), json!({"event": {"a": 1}}));
    }

    #[tokio::test]
    async fn test_enrichment_follows_config_defaults() {
        let config = local_config("T1").with_add_host(true);
        let (collector, transport) = collector(config);
        let collector = collector.with_host_provider(|| "configured".to_string());

        collector.send("x", SendOptions::new()).await.unwrap();
        let request = transport.last_request().unwrap();
        assert_eq!(request.headers.get(HOST_FIELD), Some("configured"));
        assert!(!request.headers.contains(TIME_FIELD));

        collector
            .send("x", SendOptions::new().add_host(false))
            .await
            .unwrap();
        let request = transport.last_request().unwrap();
        assert!(!request.headers.contains(HOST_FIELD));
    }

    #[tokio::test]
    async fn test_per_call_provider_wins() {
        let (collector, transport) = collector(local_config("T1"));
        let collector = collector.with_time_provider(|| "configured".to_string());

        let options = SendOptions::new()
            .add_time(true)
            .with_time_provider(|| "per-call".to_string());
        collector.send("x", options).await.unwrap();

        let request = transport.last_request().unwrap();
        assert_eq!(request.headers.get(TIME_FIELD), Some("per-call"));
    }

    #[tokio::test]
    async fn test_call_headers_override_base() {
        let config = local_config("T1").with_header("X-Source", "base");
        let (collector, transport) = collector(config);

        let headers = Headers::new()
            .with("x-source", "call")
            .with("authorization", "Splunk T2");
        collector.send_event(&Event::new(1), headers).await.unwrap();

        let request = transport.last_request().unwrap();
        assert_eq!(request.headers.len(), 2);
        assert_eq!(request.headers.get("X-Source"), Some("call"));
        assert_eq!(request.headers.get("Authorization"), Some("Splunk T2"));

        // Base headers are untouched by per-call overrides.
        assert_eq!(
            collector.base_headers().get("Authorization"),
            Some("Splunk T1")
        );
    }

    #[tokio::test]
    async fn test_send_event_json_sends_text_verbatim() {
        let (collector, transport) = collector(local_config("T1"));

        let json = r#"{"event":"raw","sourcetype":"manual"}"#;
        collector
            .send_event_json(json, Headers::new())
            .await
            .unwrap();

        assert_eq!(transport.last_request().unwrap().body, json);
    }

    #[tokio::test]
    async fn test_server_error_becomes_transmission_error() {
        let transport = MockTransport::with_status(500, r#"{"text":"Internal server error","code":9}"#);
        let collector = EventCollector::with_transport(local_config("T1"), transport).unwrap();

        let error = collector
            .send_event_json("{}", Headers::new())
            .await
            .unwrap_err();

        assert_eq!(error.kind(), ErrorKind::Transmission);
        assert_eq!(error.status(), Some(500));
        match error {
            Error::Transmission { body, .. } => {
                assert!(body.unwrap().contains("Internal server error"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_status_boundaries() {
        for status in [200, 201, 204, 299] {
            let transport = MockTransport::with_status(status, "");
            let collector = EventCollector::with_transport(local_config("T1"), transport).unwrap();
            let receipt = collector.send_event_json("{}", Headers::new()).await.unwrap();
            assert_eq!(receipt.status_code, status);
        }

        for status in [199, 301, 400, 403, 503] {
            let transport = MockTransport::with_status(status, "");
            let collector = EventCollector::with_transport(local_config("T1"), transport).unwrap();
            let error = collector
                .send_event_json("{}", Headers::new())
                .await
                .unwrap_err();
            assert_eq!(error.status(), Some(status));
            assert!(matches!(error, Error::Transmission { body: None, .. }));
        }
    }

    #[tokio::test]
    async fn test_endpoint_is_stable_across_calls() {
        let config = local_config("T1").with_url_path_prefix("proxy/");
        let (collector, transport) = collector(config);

        collector.send("a", SendOptions::new()).await.unwrap();
        collector.send("b", SendOptions::new()).await.unwrap();

        let urls: Vec<String> = transport.requests().into_iter().map(|r| r.url).collect();
        assert_eq!(
            urls,
            vec![
                "http://localhost:8088/proxy/services/collector/event".to_string(),
                "http://localhost:8088/proxy/services/collector/event".to_string(),
            ]
        );
        assert_eq!(collector.endpoint().as_str(), urls[0]);
    }
}
