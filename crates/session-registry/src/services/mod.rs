//! Service layer for the Session Registry.
//!
//! # Components
//!
//! - `origin` - Join URL origin resolution from request headers
//! - `registry` - Session creation, lookup and listing

pub mod origin;
pub mod registry;

pub use origin::OriginHints;
pub use registry::SessionRegistry;
