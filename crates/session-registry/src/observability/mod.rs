//! Observability module for the Session Registry.
//!
//! Provides metrics definitions and instrumentation helpers.

pub mod metrics;
