//! Conditional request-forwarding middleware.
//!
//! Requests carrying a forwarding directive (by default the `Location`
//! header) are replayed against the URL it names, with a configured set of
//! headers injected or removed, and the upstream response is relayed back
//! verbatim. Everything else passes through to the next handler.
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use axum::{routing::get, Router};
//! use proxy_forward::config::ForwardConfig;
//! use proxy_forward::forward::{Forwarder, HttpUpstream, ProxyForwardLayer};
//!
//! let mut config = ForwardConfig::default();
//! config.headers.insert("X-Api-Key".into(), "secret".into());
//!
//! let forwarder = Arc::new(Forwarder::new(&config, HttpUpstream::new()));
//! let app: Router = Router::new()
//!     .route("/", get(|| async { "not forwarded" }))
//!     .layer(ProxyForwardLayer::new(forwarder));
//! ```

pub mod config;
pub mod forward;
pub mod http;
pub mod lifecycle;
pub mod observability;

pub use config::schema::ProxyConfig;
pub use forward::{Forwarder, ProxyForward, ProxyForwardLayer};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
