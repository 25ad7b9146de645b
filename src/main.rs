//! Kiosk Gateway
//!
//! Forwarding gateway between the health-kiosk web client and its backend.
//!
//! # Architecture Overview
//!
//! ```text
//!                        ┌───────────────────────────────────────────────┐
//!                        │                 KIOSK GATEWAY                 │
//!   Kiosk browser        │  ┌──────────┐   ┌──────────┐   ┌───────────┐  │
//!   ─────────────────────┼─▶│   http   │──▶│ body +   │──▶│ routing   │  │
//!                        │  │  server  │   │ headers  │   │ (deadline)│  │
//!                        │  └──────────┘   └──────────┘   └─────┬─────┘  │
//!                        │                                      ▼        │
//!                        │  ┌──────────┐   ┌──────────┐   ┌───────────┐  │
//!   ◀────────────────────┼──│ relay /  │◀──│ classify │◀──│ upstream  │◀─┼── Backend
//!                        │  │ barcode  │   │  errors  │   │ forwarder │  │   service
//!                        │  └──────────┘   └──────────┘   └───────────┘  │
//!                        └───────────────────────────────────────────────┘
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use kiosk_gateway::config::{self, loader};
use kiosk_gateway::lifecycle::signals;
use kiosk_gateway::observability::{logging, metrics};
use kiosk_gateway::HttpServer;

#[derive(Parser)]
#[command(name = "kiosk-gateway")]
#[command(about = "Forwarding gateway between the health kiosk and its backend", long_about = None)]
struct Cli {
    /// TOML configuration file. Defaults plus environment are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the listener bind address.
    #[arg(short, long)]
    bind: Option<String>,

    /// Override the backend base URL (takes precedence over BACKEND_URL).
    #[arg(long)]
    backend_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => loader::load_config(path)?,
        None => loader::load_from_env()?,
    };
    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind;
    }
    if let Some(url) = cli.backend_url {
        config.backend.base_url = url;
    }
    config::validation::validate_config(&config).map_err(config::ConfigError::Validation)?;

    logging::init(&config.observability.log_level);
    tracing::info!("kiosk-gateway v{} starting", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        bind_address = %config.listener.bind_address,
        backend = %config.backend.base_url,
        default_timeout_ms = config.timeouts.default_ms,
        barcode_timeout_ms = config.timeouts.barcode_ms,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        let addr: SocketAddr = config.observability.metrics_address.parse()?;
        metrics::init_metrics(addr);
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    HttpServer::new(config)
        .run(listener, signals::wait_for_signal())
        .await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
