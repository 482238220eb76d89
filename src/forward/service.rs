//! The forwarding middleware.
//!
//! # Data Flow
//! ```text
//! inbound request
//!     → ForwardDirective::from_headers (trigger header)
//!         absent/empty → downstream service, untouched
//!         present      → buffer body → build outbound → merge headers
//!                        → Upstream::execute → relay headers, status, body
//! ```
//!
//! # Design Decisions
//! - The override table sits behind an `ArcSwap`; a request takes one
//!   snapshot up front and a reload replaces the whole table
//! - Every failure before relay produces exactly one error response
//! - A failure while streaming the upstream body only truncates the response

use std::collections::HashMap;
use std::convert::Infallible;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Instant;

use arc_swap::ArcSwap;
use axum::body::Body;
use axum::http::{HeaderName, Request};
use axum::response::{IntoResponse, Response};
use futures_util::future::BoxFuture;
use futures_util::TryStreamExt;
use tower::{Layer, Service};
use url::Url;

use crate::config::ForwardConfig;
use crate::forward::body::buffer_body;
use crate::forward::directive::{ForwardDirective, DEFAULT_TRIGGER_HEADER};
use crate::forward::error::ForwardError;
use crate::forward::headers::{outbound_headers, relay_headers, HeaderOverrides};
use crate::forward::upstream::{HttpUpstream, Upstream};
use crate::observability::metrics;

/// Decision, replay and relay logic shared by every request.
pub struct Forwarder {
    name: String,
    trigger: HeaderName,
    overrides: ArcSwap<HeaderOverrides>,
    max_body_size: usize,
    upstream: Arc<dyn Upstream>,
}

impl Forwarder {
    /// Build a forwarder from its configuration. Never fails.
    pub fn new(config: &ForwardConfig, upstream: impl Upstream) -> Self {
        let trigger = HeaderName::from_bytes(config.trigger_header.as_bytes()).unwrap_or_else(|e| {
            tracing::warn!(
                trigger_header = %config.trigger_header,
                error = %e,
                "Invalid trigger header, using {}",
                DEFAULT_TRIGGER_HEADER
            );
            HeaderName::from_static("location")
        });

        let overrides = HeaderOverrides::from_config(&config.headers);
        tracing::debug!(
            forwarder = %config.name,
            trigger_header = %trigger,
            overrides = overrides.len(),
            "Forwarder created"
        );

        Self {
            name: config.name.clone(),
            trigger,
            overrides: ArcSwap::from_pointee(overrides),
            max_body_size: config.max_body_size.unwrap_or(usize::MAX),
            upstream: Arc::new(upstream),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn trigger_header(&self) -> &HeaderName {
        &self.trigger
    }

    /// Current override table snapshot.
    pub fn overrides(&self) -> Arc<HeaderOverrides> {
        self.overrides.load_full()
    }

    /// Atomically replace the override table.
    ///
    /// Requests already in flight keep the table they started with.
    pub fn reload_overrides(&self, headers: &HashMap<String, String>) {
        let overrides = HeaderOverrides::from_config(headers);
        tracing::info!(forwarder = %self.name, overrides = overrides.len(), "Header overrides reloaded");
        self.overrides.store(Arc::new(overrides));
    }

    /// The forwarding directive carried by `req`, if any.
    pub fn directive<B>(&self, req: &Request<B>) -> Option<ForwardDirective> {
        ForwardDirective::from_headers(req.headers(), &self.trigger)
    }

    /// Replay `req` against the directive's target and relay the answer.
    pub async fn forward(&self, req: Request<Body>, directive: ForwardDirective) -> Response {
        let start = Instant::now();

        match self.try_forward(req, &directive).await {
            Ok(response) => {
                metrics::record_forward("forwarded", start);
                response
            }
            Err(e) => {
                tracing::error!(
                    forwarder = %self.name,
                    target = %directive.as_str(),
                    error = %e,
                    "Forwarding failed"
                );
                metrics::record_forward(e.outcome(), start);
                e.into_response()
            }
        }
    }

    async fn try_forward(
        &self,
        mut req: Request<Body>,
        directive: &ForwardDirective,
    ) -> Result<Response, ForwardError> {
        let overrides = self.overrides.load_full();

        tracing::info!(
            forwarder = %self.name,
            method = %req.method(),
            target = %directive.as_str(),
            "Forwarding request"
        );

        let body = buffer_body(&mut req, self.max_body_size).await?;

        let target = directive.target()?;
        let mut outbound = Request::builder()
            .method(req.method().clone())
            .uri(target.as_str())
            .body(body)
            .map_err(|e| ForwardError::BuildRequest(e.to_string()))?;

        *outbound.headers_mut() = outbound_headers(req.headers(), &overrides);

        let upstream = self
            .upstream
            .execute(outbound)
            .await
            .map_err(ForwardError::Transport)?;

        tracing::debug!(
            forwarder = %self.name,
            target = %target,
            status = %upstream.status(),
            "Upstream responded"
        );

        Ok(self.relay(upstream, target))
    }

    /// Headers first, then status, then the streamed body.
    fn relay(&self, upstream: Response, target: Url) -> Response {
        let (parts, body) = upstream.into_parts();

        let forwarder = self.name.clone();
        let stream = body.into_data_stream().inspect_err(move |e| {
            tracing::error!(
                forwarder = %forwarder,
                target = %target,
                error = %e,
                "Failed to relay upstream body"
            );
            metrics::record_relay_failure();
        });

        let mut response = Response::new(Body::from_stream(stream));
        relay_headers(response.headers_mut(), &parts.headers);
        *response.status_mut() = parts.status;
        response
    }
}

/// [`Layer`] that wraps a downstream service in [`ProxyForward`].
#[derive(Clone)]
pub struct ProxyForwardLayer {
    forwarder: Arc<Forwarder>,
}

impl ProxyForwardLayer {
    pub fn new(forwarder: Arc<Forwarder>) -> Self {
        Self { forwarder }
    }
}

impl<S> Layer<S> for ProxyForwardLayer {
    type Service = ProxyForward<S>;

    fn layer(&self, inner: S) -> Self::Service {
        ProxyForward::with_forwarder(inner, self.forwarder.clone())
    }
}

/// Forwards requests carrying the trigger header; hands the rest to `inner`.
#[derive(Clone)]
pub struct ProxyForward<S> {
    inner: S,
    forwarder: Arc<Forwarder>,
}

impl<S> ProxyForward<S> {
    /// Wrap `next` with a forwarder named `name`, using the default HTTP client.
    pub fn new(next: S, config: &ForwardConfig, name: impl Into<String>) -> Self {
        let config = ForwardConfig {
            name: name.into(),
            ..config.clone()
        };
        Self::with_forwarder(next, Arc::new(Forwarder::new(&config, HttpUpstream::new())))
    }

    pub fn with_forwarder(inner: S, forwarder: Arc<Forwarder>) -> Self {
        Self { inner, forwarder }
    }

    pub fn forwarder(&self) -> &Arc<Forwarder> {
        &self.forwarder
    }
}

impl<S> Service<Request<Body>> for ProxyForward<S>
where
    S: Service<Request<Body>, Response = Response, Error = Infallible> + Clone + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = Response;
    type Error = Infallible;
    type Future = BoxFuture<'static, Result<Response, Infallible>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        match self.forwarder.directive(&req) {
            None => {
                tracing::debug!(
                    forwarder = %self.forwarder.name(),
                    method = %req.method(),
                    path = %req.uri().path(),
                    "No forwarding directive, passing through"
                );
                // Use the instance that was driven to readiness.
                let clone = self.inner.clone();
                let mut inner = std::mem::replace(&mut self.inner, clone);
                let start = Instant::now();
                Box::pin(async move {
                    let response = inner.call(req).await;
                    metrics::record_forward("passthrough", start);
                    response
                })
            }
            Some(directive) => {
                let forwarder = self.forwarder.clone();
                Box::pin(async move { Ok::<_, Infallible>(forwarder.forward(req, directive).await) })
            }
        }
    }
}
