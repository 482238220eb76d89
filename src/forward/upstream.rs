//! Outbound HTTP client seam.
//!
//! # Responsibilities
//! - Execute one fully built request against the upstream
//! - Return the upstream response with a streaming body, or a transport error
//!
//! # Design Decisions
//! - Upstream error statuses (4xx/5xx) are responses, not errors
//! - No retries and no timeout beyond the client's defaults
//! - The returned future owns the call: dropping it aborts the request

use axum::body::{Body, Bytes};
use axum::http::{Request, Response};
use futures_util::future::BoxFuture;
use tower::BoxError;

/// Executes outbound requests for the forwarder.
pub trait Upstream: Send + Sync + 'static {
    fn execute(&self, request: Request<Bytes>) -> BoxFuture<'static, Result<Response<Body>, BoxError>>;
}

/// Default [`Upstream`] backed by a shared [`reqwest::Client`].
///
/// Redirects are followed per reqwest's default policy.
#[derive(Clone, Default)]
pub struct HttpUpstream {
    client: reqwest::Client,
}

impl HttpUpstream {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl Upstream for HttpUpstream {
    fn execute(&self, request: Request<Bytes>) -> BoxFuture<'static, Result<Response<Body>, BoxError>> {
        let client = self.client.clone();
        Box::pin(async move {
            let request = reqwest::Request::try_from(request)?;
            let upstream = client.execute(request).await?;

            let mut response = Response::builder().status(upstream.status());
            if let Some(headers) = response.headers_mut() {
                *headers = upstream.headers().clone();
            }

            let response = response.body(Body::from_stream(upstream.bytes_stream()))?;
            Ok::<_, BoxError>(response)
        })
    }
}
