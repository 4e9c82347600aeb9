//! Session registry.
//!
//! Mints session identifiers, composes join URLs and fronts the
//! [`SessionStore`]. The store is injected at construction; the registry
//! holds no other state.

use crate::errors::SrError;
use crate::models::{NewSession, Page, SessionRecord, SessionRole};
use crate::observability::metrics;
use crate::repositories::SessionStore;
use crate::services::origin::{resolve_origin, OriginHints};
use ring::rand::{SecureRandom, SystemRandom};
use std::sync::Arc;
use tracing::{info, instrument};

/// Path segment preceding the identifier in a join URL.
pub const JOIN_PATH: &str = "session";

/// Registry of live sessions.
#[derive(Clone)]
pub struct SessionRegistry {
    store: Arc<dyn SessionStore>,
    default_origin: String,
}

impl SessionRegistry {
    /// Create a registry over `store`, falling back to `default_origin` when a
    /// request carries no usable origin.
    pub fn new(store: Arc<dyn SessionStore>, default_origin: impl Into<String>) -> Self {
        let default_origin = default_origin.into().trim_end_matches('/').to_string();
        Self {
            store,
            default_origin,
        }
    }

    pub fn default_origin(&self) -> &str {
        &self.default_origin
    }

    /// Create and persist a new admin session.
    ///
    /// Storage failures, including an identifier collision, are returned as
    /// is; the registry never retries.
    #[instrument(skip_all, name = "sr.registry.create_session")]
    pub async fn create_session(&self, hints: &OriginHints) -> Result<SessionRecord, SrError> {
        let unique_id = generate_session_id()?;
        let origin = resolve_origin(hints, &self.default_origin);

        let new_session = NewSession {
            role: SessionRole::Admin,
            user_url: compose_join_url(&origin, &unique_id),
            unique_id,
        };

        let record = self.store.insert(&new_session).await?;

        metrics::record_session_created();
        info!(
            target: "sr.services.registry",
            unique_id = %record.unique_id,
            origin = %origin,
            "Session created"
        );

        Ok(record)
    }

    /// Look up a session by its public identifier.
    ///
    /// Returns `Ok(None)` for unknown identifiers; malformed identifiers are
    /// not distinguished from unknown ones.
    #[instrument(skip_all, name = "sr.registry.get_session")]
    pub async fn get_session(&self, unique_id: &str) -> Result<Option<SessionRecord>, SrError> {
        let record = self.store.find_by_unique_id(unique_id).await?;
        metrics::record_session_lookup(record.is_some());
        Ok(record)
    }

    /// List sessions. `Page::default()` returns every session, in no
    /// guaranteed order.
    #[instrument(skip_all, name = "sr.registry.list_sessions")]
    pub async fn list_sessions(&self, page: Page) -> Result<Vec<SessionRecord>, SrError> {
        self.store.list(page).await
    }

    /// Check the underlying store is reachable.
    pub async fn ping(&self) -> Result<(), SrError> {
        self.store.ping().await
    }

    /// Close the underlying store.
    pub async fn shutdown(&self) {
        self.store.close().await;
    }
}

/// Generate a random (version 4) UUID from the system CSPRNG, rendered in
/// its 36-character hyphenated form.
pub fn generate_session_id() -> Result<String, SrError> {
    let rng = SystemRandom::new();
    let mut bytes = [0u8; 16];

    rng.fill(&mut bytes).map_err(|_| {
        tracing::error!(target: "sr.services.registry", "Failed to generate random bytes");
        SrError::Internal
    })?;

    Ok(uuid::Builder::from_random_bytes(bytes)
        .into_uuid()
        .hyphenated()
        .to_string())
}

/// `{origin}/session/{unique_id}`.
pub fn compose_join_url(origin: &str, unique_id: &str) -> String {
    format!(
        "{}/{}/{}",
        origin.trim_end_matches('/'),
        JOIN_PATH,
        unique_id
    )
}
