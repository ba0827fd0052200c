//! News Gateway (v1)
//!
//! API gateway in front of the news, comment and moderation services,
//! built with Tokio and Axum.
//!
//! # Architecture Overview
//!
//! ```text
//!                        ┌──────────────────────────────────────────────┐
//!                        │                 NEWS GATEWAY                 │
//!   Client Request       │  ┌────────────┐   ┌──────────┐               │
//!   ─────────────────────┼─▶│ correlation│──▶│ handlers │               │
//!                        │  │ middleware │   └────┬─────┘               │
//!                        │  └─────┬──────┘        │                     │
//!                        │        │ audit    ┌────┴─────────┐           │
//!                        │        ▼          │ fan-out /    │           │
//!                        │   logfile.txt     │ pagination   │           │
//!                        │                   └────┬─────────┘           │
//!   Client Response      │                        ▼                     │
//!   ◀────────────────────┼──────────────── upstream client ─────────────┼──▶ news :8081
//!                        │                 (request_id, deadline)       │──▶ comments :8082
//!                        │                                              │──▶ moderation :8083
//!                        └──────────────────────────────────────────────┘
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use news_gateway::config::{load_config, validate_config, ConfigError, GatewayConfig};
use news_gateway::http::GatewayServer;
use news_gateway::lifecycle::{wait_for_termination, Shutdown};
use news_gateway::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "news-gateway")]
#[command(about = "API gateway for the news, comment and moderation services", long_about = None)]
struct Args {
    /// TOML configuration file. Defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the listener bind address.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => GatewayConfig::default(),
    };
    if let Some(bind) = args.bind {
        config.listener.bind_address = bind;
        validate_config(&config).map_err(ConfigError::Validation)?;
    }

    logging::init(&config.observability.log_level);

    tracing::info!("news-gateway v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        page_size = config.pagination.page_size,
        upstream_deadline_ms = config.timeouts.upstream_ms,
        audit_enabled = config.audit.enabled,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse::<SocketAddr>() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(e) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                error = %e,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let server = GatewayServer::new(config).await?;

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        wait_for_termination().await;
        shutdown.trigger();
    });

    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
