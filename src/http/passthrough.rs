//! Handler for requests without a forwarding directive.
//!
//! # Responsibilities
//! - Relay the request unchanged to the configured downstream
//! - Answer 404 when no downstream is configured
//!
//! # Design Decisions
//! - Path and query are kept; only scheme and authority are rewritten
//! - Transport failures map to 502, downstream statuses are relayed as-is

use axum::{
    body::Body,
    extract::State,
    http::{uri::PathAndQuery, Request, StatusCode, Uri, Version},
    response::{IntoResponse, Response},
};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use url::Url;

/// State for the pass-through handler.
#[derive(Clone)]
pub struct PassthroughState {
    pub downstream: Option<Url>,
    pub client: Client<HttpConnector, Body>,
}

impl PassthroughState {
    pub fn new(downstream: Option<Url>) -> Self {
        let client = Client::builder(TokioExecutor::new()).build(HttpConnector::new());
        Self { downstream, client }
    }
}

/// Rebase `uri` onto `base`, keeping the request path and query.
pub fn downstream_uri(base: &Url, uri: &Uri) -> Result<Uri, axum::http::Error> {
    let path_and_query = uri
        .path_and_query()
        .map(PathAndQuery::as_str)
        .unwrap_or("/");
    let joined = format!("{}{}", base.as_str().trim_end_matches('/'), path_and_query);
    Ok(joined.parse::<Uri>()?)
}

pub async fn passthrough_handler(
    State(state): State<PassthroughState>,
    request: Request<Body>,
) -> Response {
    let Some(base) = &state.downstream else {
        return (StatusCode::NOT_FOUND, "No forwarding directive").into_response();
    };

    let (mut parts, body) = request.into_parts();
    parts.uri = match downstream_uri(base, &parts.uri) {
        Ok(uri) => uri,
        Err(e) => {
            tracing::error!(error = %e, "Failed to build downstream URI");
            return (StatusCode::INTERNAL_SERVER_ERROR, "Invalid downstream URI").into_response();
        }
    };
    parts.version = Version::HTTP_11;

    tracing::debug!(uri = %parts.uri, method = %parts.method, "Passing request downstream");

    match state.client.request(Request::from_parts(parts, body)).await {
        Ok(response) => {
            let (parts, body) = response.into_parts();
            Response::from_parts(parts, Body::new(body))
        }
        Err(e) => {
            tracing::error!(error = %e, "Downstream error");
            (StatusCode::BAD_GATEWAY, "Downstream request failed").into_response()
        }
    }
}
