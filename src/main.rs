//! Product catalog service (v1)
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ──────────────▶ request id ─▶ trace ─▶ X-API-Key ─▶ RouteTable ─▶ handler
//!                                              │ 401                      │
//!                                              ▼                          ▼
//!     Client Response ◀──────────── ApiError / JSON formatter ◀──── ProductStore
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use product_catalog::config::load_config;
use product_catalog::lifecycle::{signals, Shutdown};
use product_catalog::observability::{logging, metrics};
use product_catalog::ApiServer;

#[derive(Parser)]
#[command(name = "product-catalog")]
#[command(about = "In-memory product catalog API", long_about = None)]
struct Args {
    /// TOML configuration file.
    #[arg(short, long, env = "CATALOG_CONFIG")]
    config: Option<PathBuf>,

    /// Listening port, overriding config and PORT.
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // .env first so CATALOG_CONFIG, PORT and API_KEY can come from it
    let _ = dotenvy::dotenv();
    let args = Args::parse();

    let config = load_config(args.config.as_deref(), args.port)?;

    logging::init(&config.observability)?;
    tracing::info!("product-catalog v{} starting", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        bind_address = %config.listener.bind_address(),
        seed = config.catalog.seed,
        request_timeout_secs = config.limits.request_timeout_secs,
        "Configuration loaded"
    );
    if config.auth.api_key.is_none() {
        tracing::warn!("No API key configured; every /api request will be rejected");
    }

    if config.observability.metrics_enabled {
        if let Some(addr) = config.observability.metrics_socket_addr() {
            metrics::init_metrics(addr)?;
        }
    }

    let listener = TcpListener::bind(config.listener.bind_address()).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        signals::wait_for_termination().await;
        shutdown.trigger();
    });

    ApiServer::new(config).run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
