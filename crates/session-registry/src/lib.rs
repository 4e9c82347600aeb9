//! Session Registry Service Library
//!
//! Issues live session records for streaming rooms: an operator creates a
//! session and receives a shareable join URL embedding a unique identifier;
//! participants resolve that identifier back to the session.
//!
//! # Architecture
//!
//! Handler -> Service -> Repository:
//!
//! ```text
//! routes/mod.rs -> handlers/*.rs -> services/registry.rs -> repositories/*.rs
//! ```
//!
//! # Modules
//!
//! - `config` - Service configuration from environment
//! - `errors` - Error types with HTTP status code mapping
//! - `handlers` - HTTP request handlers
//! - `middleware` - HTTP metrics middleware
//! - `models` - Session record and HTTP shapes
//! - `observability` - Prometheus metrics
//! - `repositories` - `SessionStore` trait with PostgreSQL and in-memory stores
//! - `routes` - Axum router setup
//! - `services` - Session registry and origin resolution

pub mod config;
pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod observability;
pub mod repositories;
pub mod routes;
pub mod services;
