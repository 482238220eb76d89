//! Conditional request forwarding.
//!
//! # Data Flow
//! ```text
//! inbound request
//!     → directive.rs (trigger header present and non-empty?)
//!     → body.rs (buffer once, restore a fresh body)
//!     → headers.rs (inbound headers, then overrides; empty value = delete)
//!     → upstream.rs (execute via HTTP client)
//!     → service.rs (relay headers, status, body back to the caller)
//! ```
//!
//! # Design Decisions
//! - Upstream 4xx/5xx are relayed as-is; only transport failures become 502
//! - No retries, no timeouts beyond the HTTP client defaults
//! - Cancellation follows the inbound request: dropping it drops the outbound call

pub mod body;
pub mod directive;
pub mod error;
pub mod headers;
pub mod service;
pub mod upstream;

pub use directive::{ForwardDirective, DEFAULT_TRIGGER_HEADER};
pub use error::ForwardError;
pub use headers::HeaderOverrides;
pub use service::{Forwarder, ProxyForward, ProxyForwardLayer};
pub use upstream::{HttpUpstream, Upstream};
