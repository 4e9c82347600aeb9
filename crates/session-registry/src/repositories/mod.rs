//! Repository layer for the Session Registry.
//!
//! `SessionStore` is the storage seam the registry is built on. Two
//! implementations exist:
//!
//! - [`PgSessionStore`] - PostgreSQL via sqlx (production)
//! - [`InMemorySessionStore`] - process-local map (tests, test harness)

pub mod memory;
pub mod sessions;

pub use memory::InMemorySessionStore;
pub use sessions::PgSessionStore;

use crate::errors::SrError;
use crate::models::{NewSession, Page, SessionRecord};
use async_trait::async_trait;

/// Durable storage for session records.
///
/// Implementations must enforce uniqueness of `unique_id`: inserting a
/// duplicate fails with [`SrError::DuplicateIdentifier`] and never replaces
/// the existing record.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Persist a new session and return the stored record, including its
    /// storage-assigned key and timestamps.
    async fn insert(&self, session: &NewSession) -> Result<SessionRecord, SrError>;

    /// Exact-match lookup on the public identifier.
    async fn find_by_unique_id(&self, unique_id: &str) -> Result<Option<SessionRecord>, SrError>;

    /// List sessions. An unbounded page returns every record in storage
    /// order; a bounded page is ordered by creation time.
    async fn list(&self, page: Page) -> Result<Vec<SessionRecord>, SrError>;

    /// Verify the store is reachable.
    async fn ping(&self) -> Result<(), SrError>;

    /// Release the store's resources. Further calls fail.
    async fn close(&self);
}
