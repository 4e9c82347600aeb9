//! Join URL origin resolution.
//!
//! The origin for a new session's join URL is chosen in this order:
//!
//! 1. The request's `Origin` header, trailing slash trimmed
//! 2. The origin of the request's `Referer` URL
//! 3. The configured default origin
//!
//! A `Referer` that cannot be parsed as an absolute URL falls straight
//! through to the default; it is never reported to the caller.

use axum::http::header::{HeaderName, ORIGIN, REFERER};
use axum::http::{HeaderMap, Uri};
use tracing::debug;

/// Request-derived hints for the join URL origin.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OriginHints {
    /// Value of the `Origin` header.
    pub origin: Option<String>,

    /// Value of the `Referer` header.
    pub referer: Option<String>,
}

impl OriginHints {
    /// Extract hints from request headers. Empty or non-UTF-8 values are
    /// treated as absent.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let read = |name: HeaderName| {
            headers
                .get(name)
                .and_then(|value| value.to_str().ok())
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .map(str::to_string)
        };

        Self {
            origin: read(ORIGIN),
            referer: read(REFERER),
        }
    }

    pub fn with_origin(origin: impl Into<String>) -> Self {
        Self {
            origin: Some(origin.into()),
            referer: None,
        }
    }

    pub fn with_referer(referer: impl Into<String>) -> Self {
        Self {
            origin: None,
            referer: Some(referer.into()),
        }
    }
}

/// Pick the origin for a join URL.
pub fn resolve_origin(hints: &OriginHints, default_origin: &str) -> String {
    if let Some(origin) = hints.origin.as_deref() {
        let trimmed = origin.trim_end_matches('/');
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    if let Some(referer) = hints.referer.as_deref() {
        match origin_from_url(referer) {
            Some(origin) => return origin,
            None => debug!(
                target: "sr.services.origin",
                "Unparseable Referer, using default origin"
            ),
        }
    }

    default_origin.trim_end_matches('/').to_string()
}

/// Extract `scheme://host[:port]` from an absolute URL.
///
/// Scheme and host are lowercased and the scheme's default port is dropped.
/// Returns `None` for relative or malformed URLs.
pub fn origin_from_url(url: &str) -> Option<String> {
    // Fragments never reach the server in a Referer, but tolerate them
    let without_fragment = url.split('#').next().unwrap_or(url);
    let uri: Uri = without_fragment.parse().ok()?;

    let scheme = uri.scheme_str()?.to_ascii_lowercase();
    let host = uri.host().filter(|h| !h.is_empty())?.to_ascii_lowercase();

    let default_port = match scheme.as_str() {
        "http" => Some(80),
        "https" => Some(443),
        _ => None,
    };

    match uri.port_u16() {
        Some(port) if Some(port) != default_port => {
            Some(format!("{}://{}:{}", scheme, host, port))
        }
        _ => Some(format!("{}://{}", scheme, host)),
    }
}
