//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Header names and values in the override table are representable
//! - Override names are unique once case is ignored
//! - Addresses parse, the downstream URL is absolute http
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ProxyConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;
use std::net::SocketAddr;

use axum::http::{HeaderName, HeaderValue};
use thiserror::Error;
use url::Url;

use crate::config::schema::ProxyConfig;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("invalid listener address {0:?}")]
    BindAddress(String),

    #[error("invalid trigger header name {0:?}")]
    TriggerHeader(String),

    #[error("invalid override header name {0:?}")]
    HeaderName(String),

    #[error("invalid value for override header {0:?}")]
    HeaderValue(String),

    #[error("override header {0:?} is configured more than once (names are case-insensitive)")]
    DuplicateHeader(String),

    #[error("invalid downstream url {0:?}: {1}")]
    DownstreamUrl(String, String),

    #[error("invalid metrics address {0:?}")]
    MetricsAddress(String),
}

/// Check every semantic rule and collect all failures.
pub fn validate_config(config: &ProxyConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(config.listener.bind_address.clone()));
    }

    if HeaderName::from_bytes(config.forward.trigger_header.as_bytes()).is_err() {
        errors.push(ValidationError::TriggerHeader(config.forward.trigger_header.clone()));
    }

    let mut names: Vec<_> = config.forward.headers.keys().collect();
    names.sort();
    let mut seen = HashSet::with_capacity(names.len());
    for name in names {
        if !seen.insert(name.to_ascii_lowercase()) {
            errors.push(ValidationError::DuplicateHeader(name.clone()));
        }
        if HeaderName::from_bytes(name.as_bytes()).is_err() {
            errors.push(ValidationError::HeaderName(name.clone()));
        }
        if HeaderValue::from_str(&config.forward.headers[name]).is_err() {
            errors.push(ValidationError::HeaderValue(name.clone()));
        }
    }

    if let Some(raw) = &config.downstream.url {
        match Url::parse(raw) {
            Ok(url) if url.scheme() == "http" => {}
            Ok(url) => errors.push(ValidationError::DownstreamUrl(
                raw.clone(),
                format!("unsupported scheme {}", url.scheme()),
            )),
            Err(e) => errors.push(ValidationError::DownstreamUrl(raw.clone(), e.to_string())),
        }
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::MetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
