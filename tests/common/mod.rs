//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{HeaderMap, Method, StatusCode, Uri},
    response::IntoResponse,
    routing::any,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use proxy_forward::config::ProxyConfig;
use proxy_forward::forward::HttpUpstream;
use proxy_forward::{HttpServer, Shutdown};

/// What a mock server saw for one request.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub uri: Uri,
    pub headers: HeaderMap,
    pub body: Bytes,
}

pub type Recorder = Arc<Mutex<Vec<RecordedRequest>>>;

/// A running mock server.
pub struct MockServer {
    pub addr: SocketAddr,
    pub requests: Recorder,
}

impl MockServer {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub fn recorded(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

fn record(recorder: &Recorder, method: Method, uri: Uri, headers: HeaderMap, body: Bytes) {
    recorder.lock().unwrap().push(RecordedRequest {
        method,
        uri,
        headers,
        body,
    });
}

async fn echo(
    State(recorder): State<Recorder>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> impl IntoResponse {
    record(&recorder, method, uri, headers, body.clone());
    (
        StatusCode::OK,
        [("x-upstream", "mock"), ("x-empty", "")],
        body,
    )
}

async fn with_status(
    State(recorder): State<Recorder>,
    Path(code): Path<u16>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> impl IntoResponse {
    record(&recorder, method, uri, headers, body);
    let status = StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, [("x-upstream-status", code.to_string())], format!("status {code}"))
}

/// Start a mock server that records every request.
///
/// `/status/{code}` answers with that status; every other path echoes the
/// request body back with status 200.
pub async fn start_mock_upstream() -> MockServer {
    let requests: Recorder = Arc::new(Mutex::new(Vec::new()));
    let app = Router::new()
        .route("/status/{code}", any(with_status))
        .route("/", any(echo))
        .route("/{*path}", any(echo))
        .with_state(requests.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    MockServer { addr, requests }
}

/// An address nothing is listening on.
pub async fn closed_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}

/// A running proxy under test.
pub struct TestProxy {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
    pub config_updates: mpsc::UnboundedSender<ProxyConfig>,
}

impl TestProxy {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for TestProxy {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Client that never goes through a system proxy.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .no_proxy()
        .pool_max_idle_per_host(0)
        .build()
        .unwrap()
}

/// Start the proxy on an ephemeral port.
pub async fn start_proxy(config: ProxyConfig) -> TestProxy {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let (config_updates, updates_rx) = mpsc::unbounded_channel();
    let server = HttpServer::with_upstream(config, HttpUpstream::with_client(client()));
    let server_shutdown = shutdown.subscribe();

    tokio::spawn(async move {
        let _ = server.run(listener, updates_rx, server_shutdown).await;
    });

    // Listener is already bound; give the accept loop a moment.
    tokio::time::sleep(Duration::from_millis(50)).await;

    TestProxy {
        addr,
        shutdown,
        config_updates,
    }
}

pub fn config_with_headers(headers: &[(&str, &str)]) -> ProxyConfig {
    let mut config = ProxyConfig::default();
    for (name, value) in headers {
        config
            .forward
            .headers
            .insert(name.to_string(), value.to_string());
    }
    config
}
