//! # Session Registry Test Utilities
//!
//! Shared test utilities for the Session Registry service.
//!
//! This crate provides:
//! - Server test harness (`TestRegistryServer` for E2E tests)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use sr_test_utils::*;
//!
//! #[tokio::test]
//! async fn test_example() -> anyhow::Result<()> {
//!     let server = TestRegistryServer::spawn_in_memory().await?;
//!
//!     let response = reqwest::Client::new()
//!         .post(format!("{}/api/sessions/create", server.url()))
//!         .send()
//!         .await?;
//!
//!     assert_eq!(response.status(), 201);
//!     Ok(())
//! }
//! ```

pub mod server_harness;

// Re-export commonly used items
pub use server_harness::*;
