//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Forwarder and server produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → stdout (fmt layer)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Structured logging: fields, not interpolated strings
//! - Request ID (x-request-id) is forwarded with the inbound headers
//! - Metrics are cheap (atomic increments)

pub mod logging;
pub mod metrics;
