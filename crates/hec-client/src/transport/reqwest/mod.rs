//! Reqwest-based HTTP transport.
//!
//! This module provides a reqwest-based implementation of the [`Transport`] trait.
//!
//! # Example
//!
//! ```rust,ignore
//! use hec_client::transport::reqwest::ReqwestTransport;
//! use hec_client::{ClientConfig, EventCollector};
//!
//! let config = ClientConfig::new("C4457A9C-E528-49FA-8382-D1837A24986C");
//! let transport = ReqwestTransport::new(&config.transport_config())?;
//! let collector = EventCollector::with_transport(config, transport)?;
//! ```
//!
//! [`Transport`]: super::Transport

mod client;
mod error;

pub use client::ReqwestTransport;
pub use error::{Error, Result};
