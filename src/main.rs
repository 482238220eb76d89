//! proxy-forward
//!
//! Standalone host for the forwarding middleware.
//!
//! ```text
//! client ──▶ request id ──▶ trace ──▶ ProxyForward ──┬─▶ upstream named by the trigger header
//!                                                    └─▶ downstream (pass-through) or 404
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use proxy_forward::config::loader::load_config;
use proxy_forward::config::watcher::ConfigWatcher;
use proxy_forward::config::ProxyConfig;
use proxy_forward::lifecycle::signals::spawn_signal_listener;
use proxy_forward::observability::{logging, metrics};
use proxy_forward::{HttpServer, Shutdown};

#[derive(Parser)]
#[command(name = "proxy-forward")]
#[command(about = "Forward requests to the URL named in a trigger header", long_about = None)]
struct Cli {
    /// TOML configuration file. Defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the listener bind address.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ProxyConfig::default(),
    };
    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind;
    }

    logging::init_logging(&config.observability);
    tracing::info!("proxy-forward v{} starting", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        bind_address = %config.listener.bind_address,
        forwarder = %config.forward.name,
        trigger_header = %config.forward.trigger_header,
        overrides = config.forward.headers.len(),
        downstream = ?config.downstream.url,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    // Hot reload of header overrides; the watcher must outlive the server.
    let (config_updates, _watcher) = match &cli.config {
        Some(path) => {
            let (watcher, updates) = ConfigWatcher::new(path);
            (updates, Some(watcher.run()?))
        }
        None => (mpsc::unbounded_channel().1, None),
    };

    let listener = TcpListener::bind(&config.listener.bind_address).await?;

    let shutdown = Shutdown::new();
    spawn_signal_listener(shutdown.clone());

    let server = HttpServer::new(config);
    server.run(listener, config_updates, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
