#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod client;
mod config;
mod endpoint;
mod error;
mod event;
mod headers;
mod provider;
mod receipt;

pub mod transport;

pub use client::{EventCollector, HOST_FIELD, SendOptions, TIME_FIELD};
pub use config::{
    CertificateVerification, ClientConfig, DEFAULT_PORT, DEFAULT_SERVER, DEFAULT_URL_PATH,
    DEFAULT_VALID_METADATA_FIELDS,
};
pub use endpoint::Endpoint;
pub use error::{BoxedError, Error, ErrorKind, Result};
pub use event::{EVENT_KEY, Event, Metadata};
pub use headers::{AUTHORIZATION, AUTHORIZATION_SCHEME, Headers, base_headers};
pub use provider::{
    HostProvider, SharedHostProvider, SharedTimeProvider, SystemHostProvider, SystemTimeProvider,
    TimeProvider,
};
pub use receipt::Receipt;

/// Tracing target for client operations.
pub const TRACING_TARGET_CLIENT: &str = "hec_client::client";

/// Tracing target for transport operations.
pub const TRACING_TARGET_TRANSPORT: &str = "hec_client::transport";
