#![forbid(unsafe_code)]

mod config;

use std::process;

use anyhow::Context;
use clap::Parser;
use hec_client::EventCollector;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::{Cli, log_client_config};

// Tracing target constants
pub const TRACING_TARGET_STARTUP: &str = "hec_cli::startup";
pub const TRACING_TARGET_SEND: &str = "hec_cli::send";
pub const TRACING_TARGET_CONFIG: &str = "hec_cli::config";

#[tokio::main]
async fn main() {
    let Err(error) = run().await else {
        process::exit(0);
    };

    if tracing::enabled!(tracing::Level::ERROR) {
        tracing::error!(
            target: TRACING_TARGET_SEND,
            error = %format!("{error:#}"),
            "failed to send event"
        );
    } else {
        eprintln!("Error: {error:#}");
    }

    process::exit(1);
}

/// Main application entry point.
async fn run() -> anyhow::Result<()> {
    #[cfg(feature = "dotenv")]
    load_dotenv();

    let cli = Cli::parse();

    init_tracing();
    log_startup_info();

    let config = cli.client_config();
    log_client_config(&config);

    let collector = EventCollector::new(config).context("invalid collector configuration")?;

    let receipt = collector
        .send(&cli.payload(), cli.send_options())
        .await
        .with_context(|| format!("failed to send event to {}", collector.endpoint()))?;

    tracing::info!(
        target: TRACING_TARGET_SEND,
        request_id = %receipt.request_id,
        status_code = receipt.status_code,
        duration = %receipt.duration(),
        "event accepted"
    );

    Ok(())
}

/// Loads variables from a `.env` file when one exists.
#[cfg(feature = "dotenv")]
fn load_dotenv() {
    if let Err(error) = dotenvy::dotenv()
        && !error.not_found()
    {
        eprintln!("Warning: failed to load .env file: {error}");
    }
}

/// Initializes tracing with environment-based filtering.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Logs startup information.
fn log_startup_info() {
    tracing::debug!(
        target: TRACING_TARGET_STARTUP,
        version = env!("CARGO_PKG_VERSION"),
        pid = process::id(),
        dotenv = cfg!(feature = "dotenv"),
        "starting hec-send"
    );
}
