//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ProxyConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Forwarding middleware settings.
    pub forward: ForwardConfig,

    /// Where requests without a forwarding directive go.
    pub downstream: DownstreamConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Forwarding middleware configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ForwardConfig {
    /// Identifier used in logs.
    pub name: String,

    /// Header whose value names the forwarding target.
    pub trigger_header: String,

    /// Headers forced onto every forwarded request.
    /// An empty value removes the header instead.
    pub headers: HashMap<String, String>,

    /// Largest inbound body accepted for forwarding, in bytes.
    /// Unlimited when unset.
    pub max_body_size: Option<usize>,
}

impl Default for ForwardConfig {
    fn default() -> Self {
        Self {
            name: "proxy-forward".to_string(),
            trigger_header: crate::forward::DEFAULT_TRIGGER_HEADER.to_string(),
            headers: HashMap::new(),
            max_body_size: None,
        }
    }
}

/// Pass-through target configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct DownstreamConfig {
    /// Base URL (e.g., "http://127.0.0.1:3000"). Requests without a
    /// forwarding directive get 404 when unset.
    pub url: Option<String>,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
