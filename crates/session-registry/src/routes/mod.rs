//! HTTP routes for the Session Registry.
//!
//! Defines the Axum router and application state.

use crate::config::Config;
use crate::handlers;
use crate::middleware::http_metrics_middleware;
use crate::services::SessionRegistry;
use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Session registry over the configured store.
    pub registry: SessionRegistry,

    /// Service configuration.
    pub config: Config,
}

/// Build the application routes.
///
/// Creates an Axum router with:
/// - `/health` - Liveness probe (simple "OK")
/// - `/ready` - Readiness probe (session store ping)
/// - `/metrics` - Prometheus metrics endpoint
/// - `POST /api/sessions/create` - Create a session (GET is a lookup of `create`)
/// - `GET /api/sessions/:unique_id` - Look up a session
/// - `GET /api/sessions` - List sessions
/// - Permissive CORS, TraceLayer, HTTP metrics and a 30 second timeout
pub fn build_routes(state: Arc<AppState>, metrics_handle: PrometheusHandle) -> Router {
    let operational_routes = Router::new()
        .route("/health", get(handlers::health_check))
        .route("/ready", get(handlers::readiness_check))
        .with_state(state.clone());

    let metrics_routes = Router::new()
        .route("/metrics", get(handlers::metrics_handler))
        .with_state(metrics_handle);

    let session_routes = Router::new()
        .route("/api/sessions", get(handlers::list_sessions))
        .route("/api/sessions/", get(handlers::list_sessions))
        .route(
            "/api/sessions/create",
            post(handlers::create_session).get(handlers::get_create_segment),
        )
        .route("/api/sessions/:unique_id", get(handlers::get_session))
        .with_state(state);

    // Layer order (bottom-to-top execution):
    // 1. TimeoutLayer - Timeout the request (innermost)
    // 2. TraceLayer - Log request details
    // 3. CorsLayer - Answer preflights, add CORS headers
    // 4. http_metrics_middleware - Record ALL responses (outermost)
    operational_routes
        .merge(metrics_routes)
        .merge(session_routes)
        .layer(TimeoutLayer::new(Duration::from_secs(30)))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .layer(middleware::from_fn(http_metrics_middleware))
}
