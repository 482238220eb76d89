//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the pass-through handler
//! - Wire up middleware (request ID, tracing, forwarding)
//! - Serve on a listener until shutdown
//! - Apply configuration updates to the forwarder

use std::sync::Arc;

use axum::{routing::any, Router};
use tokio::net::TcpListener;
use tokio::sync::{broadcast, mpsc};
use tower_http::trace::TraceLayer;
use url::Url;

use crate::config::ProxyConfig;
use crate::forward::{Forwarder, HttpUpstream, ProxyForwardLayer, Upstream};
use crate::http::passthrough::{passthrough_handler, PassthroughState};
use crate::http::request::request_id_layers;

/// HTTP server hosting the forwarding middleware.
pub struct HttpServer {
    router: Router,
    config: ProxyConfig,
    forwarder: Arc<Forwarder>,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: ProxyConfig) -> Self {
        Self::with_upstream(config, HttpUpstream::new())
    }

    /// Create a server whose forwarder sends through `upstream`.
    pub fn with_upstream(config: ProxyConfig, upstream: impl Upstream) -> Self {
        let forwarder = Arc::new(Forwarder::new(&config.forward, upstream));

        // Validated by the loader; a bad URL here only disables pass-through.
        let downstream = config.downstream.url.as_deref().and_then(|raw| {
            Url::parse(raw)
                .inspect_err(|e| tracing::warn!(url = %raw, error = %e, "Ignoring invalid downstream url"))
                .ok()
        });

        let router = Self::build_router(PassthroughState::new(downstream), forwarder.clone());
        Self {
            router,
            config,
            forwarder,
        }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(state: PassthroughState, forwarder: Arc<Forwarder>) -> Router {
        Router::new()
            .route("/{*path}", any(passthrough_handler))
            .route("/", any(passthrough_handler))
            .with_state(state)
            .layer(ProxyForwardLayer::new(forwarder))
            .layer(TraceLayer::new_for_http())
            .layer(request_id_layers())
    }

    /// The full application, for serving or driving in-process.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub fn forwarder(&self) -> &Arc<Forwarder> {
        &self.forwarder
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ProxyConfig {
        &self.config
    }

    /// Run the server, accepting connections on the given listener.
    ///
    /// Returns after `shutdown` fires and in-flight requests have drained.
    pub async fn run(
        self,
        listener: TcpListener,
        mut config_updates: mpsc::UnboundedReceiver<ProxyConfig>,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            forwarder = %self.forwarder.name(),
            trigger_header = %self.forwarder.trigger_header(),
            "HTTP server starting"
        );

        let forwarder = self.forwarder.clone();
        let reloader = tokio::spawn(async move {
            while let Some(config) = config_updates.recv().await {
                if !config
                    .forward
                    .trigger_header
                    .eq_ignore_ascii_case(forwarder.trigger_header().as_str())
                {
                    tracing::warn!(
                        trigger_header = %config.forward.trigger_header,
                        "Trigger header change requires a restart, keeping current one"
                    );
                }
                forwarder.reload_overrides(&config.forward.headers);
            }
        });

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        reloader.abort();
        tracing::info!("HTTP server stopped");
        Ok(())
    }
}
