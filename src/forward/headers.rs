//! Header override table and the outbound header merge.
//!
//! # Responsibilities
//! - Convert the configured `name -> value` mapping into a [`HeaderMap`]
//! - Apply a header set onto an outbound request (set, or delete on empty)
//!
//! # Design Decisions
//! - One helper ([`merge_headers`]) serves both the inbound copy pass and the
//!   override pass, so precedence is decided purely by call order
//! - An empty configured value is kept in the table; it means "remove"

use std::collections::HashMap;

use axum::http::{header, HeaderMap, HeaderName, HeaderValue};

/// Headers that describe the inbound message framing. The HTTP client
/// recomputes them for the outbound message, so they are not copied over.
const FRAMING_HEADERS: [HeaderName; 3] = [
    header::HOST,
    header::CONTENT_LENGTH,
    header::TRANSFER_ENCODING,
];

/// Fixed set of headers injected, forced or deleted on every forwarded request.
#[derive(Debug, Clone, Default)]
pub struct HeaderOverrides {
    headers: HeaderMap,
}

impl HeaderOverrides {
    /// Build the table from a configuration mapping.
    ///
    /// Never fails: entries whose name or value cannot be carried in an HTTP
    /// header are dropped with a warning.
    pub fn from_config(config: &HashMap<String, String>) -> Self {
        let mut headers = HeaderMap::with_capacity(config.len());

        for (name, value) in config {
            let name = match HeaderName::from_bytes(name.as_bytes()) {
                Ok(n) => n,
                Err(e) => {
                    tracing::warn!(header = %name, error = %e, "Skipping override with invalid name");
                    continue;
                }
            };
            let value = match HeaderValue::from_str(value) {
                Ok(v) => v,
                Err(e) => {
                    tracing::warn!(header = %name, error = %e, "Skipping override with invalid value");
                    continue;
                }
            };
            headers.insert(name, value);
        }

        Self { headers }
    }

    /// The single-valued table. Empty values mark deletions.
    pub fn as_header_map(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn len(&self) -> usize {
        self.headers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }
}

/// Apply every `(name, value)` pair of `source` onto `target`.
///
/// An empty value removes the header from `target`; anything else replaces
/// whatever `target` held for that name. Repeated names in `source` are
/// applied in order, so the last one decides.
pub fn merge_headers(target: &mut HeaderMap, source: &HeaderMap) {
    for (name, value) in source {
        if value.is_empty() {
            target.remove(name);
        } else {
            target.insert(name.clone(), value.clone());
        }
    }
}

/// Build the outbound header set: inbound headers first, overrides second.
pub fn outbound_headers(inbound: &HeaderMap, overrides: &HeaderOverrides) -> HeaderMap {
    let mut inbound = inbound.clone();
    for name in &FRAMING_HEADERS {
        inbound.remove(name);
    }

    let mut outbound = HeaderMap::with_capacity(inbound.len() + overrides.len());
    merge_headers(&mut outbound, &inbound);
    merge_headers(&mut outbound, overrides.as_header_map());
    outbound
}

/// Copy upstream response headers onto the caller's response.
///
/// Plain "set" semantics: empty upstream values are legitimate and are kept.
pub fn relay_headers(target: &mut HeaderMap, upstream: &HeaderMap) {
    for (name, value) in upstream {
        target.insert(name.clone(), value.clone());
    }
}
