//! HTTP request handlers for the Session Registry.

pub mod health;
pub mod metrics;
pub mod sessions;

pub use health::{health_check, readiness_check};
pub use metrics::metrics_handler;
pub use sessions::{create_session, get_create_segment, get_session, list_sessions};
