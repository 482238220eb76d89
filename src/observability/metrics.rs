//! Metrics collection and exposition.
//!
//! # Metrics
//! - `proxy_forward_requests_total` (counter): requests by outcome
//!   (passthrough, forwarded, body_error, build_error, transport_error)
//! - `proxy_forward_duration_seconds` (histogram): handling latency by outcome
//! - `proxy_forward_relay_failures_total` (counter): upstream bodies cut short
//!
//! Recording is a no-op until a recorder is installed.

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and serve it on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Record one handled request.
pub fn record_forward(outcome: &'static str, start: Instant) {
    counter!("proxy_forward_requests_total", "outcome" => outcome).increment(1);
    histogram!("proxy_forward_duration_seconds", "outcome" => outcome)
        .record(start.elapsed().as_secs_f64());
}

/// Record an upstream body that failed mid-relay.
pub fn record_relay_failure() {
    counter!("proxy_forward_relay_failures_total").increment(1);
}
