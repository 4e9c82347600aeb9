//! Metrics definitions for the Session Registry.
//!
//! All metrics follow Prometheus naming conventions:
//! - `sr_` prefix for Session Registry
//! - `_total` suffix for counters
//! - `_seconds` suffix for duration histograms
//!
//! # Cardinality
//!
//! Labels are bounded to prevent cardinality explosion:
//! - `method`: HTTP methods
//! - `endpoint`: parameterized paths (session identifiers are replaced)
//! - `status`: 3 values (success, error, timeout)
//! - `operation`: bounded by code (insert_session, find_session, ...)
//! - `result`: 2 values for lookups (found, not_found)

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use std::time::Duration;

/// Initialize Prometheus metrics recorder and return the handle
/// for serving metrics via HTTP.
///
/// Must be called before any metrics are recorded.
///
/// # Errors
///
/// Returns error if Prometheus recorder fails to install (e.g., already installed).
pub fn init_metrics_recorder() -> Result<PrometheusHandle, String> {
    PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Prefix("sr_http_request".to_string()),
            &[
                0.005, 0.010, 0.025, 0.050, 0.100, 0.150, 0.200, 0.300, 0.500, 1.000, 2.000,
            ],
        )
        .map_err(|e| format!("Failed to set HTTP request buckets: {e}"))?
        .set_buckets_for_metric(
            Matcher::Prefix("sr_db_query".to_string()),
            &[
                0.001, 0.002, 0.005, 0.010, 0.020, 0.050, 0.100, 0.250, 0.500, 1.000,
            ],
        )
        .map_err(|e| format!("Failed to set DB query buckets: {e}"))?
        .install_recorder()
        .map_err(|e| format!("Failed to install Prometheus recorder: {e}"))
}

// ============================================================================
// HTTP Request Metrics
// ============================================================================

/// Record HTTP request completion
///
/// Metric: `sr_http_requests_total`, `sr_http_request_duration_seconds`
/// Labels: `method`, `endpoint`, `status`
pub fn record_http_request(method: &str, endpoint: &str, status_code: u16, duration: Duration) {
    let normalized_endpoint = normalize_endpoint(endpoint);
    let status = categorize_status_code(status_code);

    histogram!("sr_http_request_duration_seconds",
        "method" => method.to_string(),
        "endpoint" => normalized_endpoint.clone(),
        "status" => status.to_string()
    )
    .record(duration.as_secs_f64());

    counter!("sr_http_requests_total",
        "method" => method.to_string(),
        "endpoint" => normalized_endpoint,
        "status_code" => status_code.to_string()
    )
    .increment(1);
}

/// Categorize HTTP status code into success/error/timeout
fn categorize_status_code(status_code: u16) -> &'static str {
    match status_code {
        200..=299 => "success",
        408 | 504 => "timeout",
        _ => "error",
    }
}

/// Normalize endpoint path to prevent label cardinality explosion
///
/// Session identifiers are replaced with `{id}`; unknown paths collapse to
/// `/other`.
fn normalize_endpoint(path: &str) -> String {
    match path {
        "/" | "/health" | "/ready" | "/metrics" | "/api/sessions" | "/api/sessions/create" => {
            path.to_string()
        }
        "/api/sessions/" => "/api/sessions".to_string(),
        _ => match path.strip_prefix("/api/sessions/") {
            Some(rest) if !rest.is_empty() && !rest.contains('/') => {
                "/api/sessions/{id}".to_string()
            }
            _ => "/other".to_string(),
        },
    }
}

// ============================================================================
// Session Store Metrics
// ============================================================================

/// Record a session store operation.
///
/// Metric: `sr_db_query_duration_seconds`, `sr_db_queries_total`
/// Labels: `operation`, `status`
pub fn record_db_query(operation: &'static str, status: &'static str, duration: Duration) {
    histogram!("sr_db_query_duration_seconds",
        "operation" => operation,
        "status" => status
    )
    .record(duration.as_secs_f64());

    counter!("sr_db_queries_total",
        "operation" => operation,
        "status" => status
    )
    .increment(1);
}

// ============================================================================
// Registry Metrics
// ============================================================================

/// Record a successfully created session.
///
/// Metric: `sr_sessions_created_total`
pub fn record_session_created() {
    counter!("sr_sessions_created_total").increment(1);
}

/// Record a session lookup outcome.
///
/// Metric: `sr_session_lookups_total`
/// Labels: `result` (found, not_found)
pub fn record_session_lookup(found: bool) {
    let result = if found { "found" } else { "not_found" };
    counter!("sr_session_lookups_total", "result" => result).increment(1);
}
