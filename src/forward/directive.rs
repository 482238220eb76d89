//! Forwarding directive extraction.

use axum::http::{HeaderMap, HeaderName, HeaderValue};
use url::Url;

use crate::forward::error::ForwardError;

/// Header checked when no trigger header is configured.
pub const DEFAULT_TRIGGER_HEADER: &str = "Location";

/// The destination named by the trigger header of one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForwardDirective {
    raw: HeaderValue,
}

impl ForwardDirective {
    /// Read the directive from a request's headers.
    ///
    /// A missing header and an empty value both mean "pass through".
    pub fn from_headers(headers: &HeaderMap, trigger: &HeaderName) -> Option<Self> {
        headers
            .get(trigger)
            .filter(|v| !v.is_empty())
            .map(|v| Self { raw: v.clone() })
    }

    /// The destination as sent by the client.
    pub fn as_str(&self) -> &str {
        self.raw.to_str().unwrap_or("<non-ascii>")
    }

    /// Parse the destination as an absolute URL.
    pub fn target(&self) -> Result<Url, ForwardError> {
        let raw = self
            .raw
            .to_str()
            .map_err(|e| ForwardError::BuildRequest(format!("trigger header is not visible ASCII: {e}")))?;
        let url = Url::parse(raw)
            .map_err(|e| ForwardError::BuildRequest(format!("invalid target URL {raw:?}: {e}")))?;

        if url.cannot_be_a_base() {
            return Err(ForwardError::BuildRequest(format!(
                "target URL {raw:?} is not a hierarchical URL"
            )));
        }
        Ok(url)
    }
}
