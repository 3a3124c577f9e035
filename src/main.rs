//! fieldgate binary entry point.
//!
//! Startup order: config → logging → metrics → bind → serve. Any startup
//! error is fatal; per-request errors never are.

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use fieldgate::config::{load_config, ProxyConfig};
use fieldgate::lifecycle::Shutdown;
use fieldgate::observability::{logging, metrics};
use fieldgate::HttpServer;

#[derive(Parser)]
#[command(name = "fieldgate")]
#[command(about = "Classification-aware reverse proxy for embedded field devices", long_about = None)]
struct Cli {
    /// Path to the TOML configuration file. Defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ProxyConfig::default(),
    };

    logging::init(&config.observability);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        bind_address = %config.listener.bind_address,
        mode = config.mode.as_str(),
        target = %config.upstream.url,
        "fieldgate starting"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(e) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                error = %e,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config)?;
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
