//! In-memory session store.
//!
//! Keeps records in insertion order behind a `tokio::sync::RwLock`.
//! Uniqueness of `unique_id` is checked under the write lock, so concurrent
//! inserts of the same identifier cannot both succeed.

use crate::errors::SrError;
use crate::models::{NewSession, Page, SessionRecord};
use crate::repositories::SessionStore;
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Default)]
struct Inner {
    records: Vec<SessionRecord>,
    by_unique_id: HashMap<String, usize>,
}

/// Process-local session store.
pub struct InMemorySessionStore {
    inner: RwLock<Inner>,
    available: AtomicBool,
}

impl Default for InMemorySessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemorySessionStore {
    /// Create an empty, available store.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner::default()),
            available: AtomicBool::new(true),
        }
    }

    /// Create a store that rejects every operation, simulating an
    /// unreachable database.
    pub fn unavailable() -> Self {
        let store = Self::new();
        store.available.store(false, Ordering::SeqCst);
        store
    }

    /// Toggle availability at runtime.
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// Number of stored sessions.
    pub async fn len(&self) -> usize {
        self.inner.read().await.records.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    fn check_available(&self) -> Result<(), SrError> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(SrError::Database("session store unavailable".to_string()))
        }
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn insert(&self, session: &NewSession) -> Result<SessionRecord, SrError> {
        self.check_available()?;

        let mut inner = self.inner.write().await;
        if inner.by_unique_id.contains_key(&session.unique_id) {
            return Err(SrError::DuplicateIdentifier(format!(
                "unique_id '{}' already exists",
                session.unique_id
            )));
        }

        let now = Utc::now();
        let record = SessionRecord {
            id: Uuid::new_v4(),
            role: session.role,
            unique_id: session.unique_id.clone(),
            user_url: session.user_url.clone(),
            created_at: now,
            updated_at: now,
        };

        let position = inner.records.len();
        inner.records.push(record.clone());
        inner.by_unique_id.insert(record.unique_id.clone(), position);

        Ok(record)
    }

    async fn find_by_unique_id(&self, unique_id: &str) -> Result<Option<SessionRecord>, SrError> {
        self.check_available()?;

        let inner = self.inner.read().await;
        Ok(inner
            .by_unique_id
            .get(unique_id)
            .and_then(|&position| inner.records.get(position))
            .cloned())
    }

    async fn list(&self, page: Page) -> Result<Vec<SessionRecord>, SrError> {
        self.check_available()?;

        let inner = self.inner.read().await;
        let offset = usize::try_from(page.offset).unwrap_or(usize::MAX);
        let limit = page
            .limit
            .map(|limit| usize::try_from(limit).unwrap_or(usize::MAX))
            .unwrap_or(usize::MAX);

        Ok(inner
            .records
            .iter()
            .skip(offset)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn ping(&self) -> Result<(), SrError> {
        self.check_available()
    }

    async fn close(&self) {
        self.set_available(false);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::models::SessionRole;

    fn new_session(unique_id: &str) -> NewSession {
        NewSession {
            role: SessionRole::Admin,
            unique_id: unique_id.to_string(),
            user_url: format!("http://foo.test/session/{}", unique_id),
        }
    }

    #[tokio::test]
    async fn test_insert_then_find() {
        let store = InMemorySessionStore::new();

        let inserted = store.insert(&new_session("abc")).await.unwrap();
        let found = store.find_by_unique_id("abc").await.unwrap();

        assert_eq!(found, Some(inserted));
    }

    #[tokio::test]
    async fn test_find_unknown_returns_none() {
        let store = InMemorySessionStore::new();
        assert_eq!(store.find_by_unique_id("missing").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_duplicate_insert_rejected_and_original_kept() {
        let store = InMemorySessionStore::new();
        let original = store.insert(&new_session("dup")).await.unwrap();

        let mut second = new_session("dup");
        second.user_url = "http://other.test/session/dup".to_string();
        let result = store.insert(&second).await;

        assert!(matches!(result, Err(SrError::DuplicateIdentifier(_))));
        assert_eq!(store.len().await, 1);
        assert_eq!(
            store.find_by_unique_id("dup").await.unwrap(),
            Some(original)
        );
    }

    #[tokio::test]
    async fn test_list_unbounded_returns_insertion_order() {
        let store = InMemorySessionStore::new();
        for id in ["a", "b", "c"] {
            store.insert(&new_session(id)).await.unwrap();
        }

        let ids: Vec<String> = store
            .list(Page::default())
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.unique_id)
            .collect();

        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_list_with_page() {
        let store = InMemorySessionStore::new();
        for id in ["a", "b", "c", "d"] {
            store.insert(&new_session(id)).await.unwrap();
        }

        let page = Page {
            limit: Some(2),
            offset: 1,
        };
        let ids: Vec<String> = store
            .list(page)
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.unique_id)
            .collect();

        assert_eq!(ids, vec!["b", "c"]);
    }

    #[tokio::test]
    async fn test_unavailable_store_rejects_everything() {
        let store = InMemorySessionStore::unavailable();

        assert!(matches!(
            store.insert(&new_session("x")).await,
            Err(SrError::Database(_))
        ));
        assert!(store.find_by_unique_id("x").await.is_err());
        assert!(store.list(Page::default()).await.is_err());
        assert!(store.ping().await.is_err());
    }

    #[tokio::test]
    async fn test_close_makes_store_unavailable() {
        let store = InMemorySessionStore::new();
        assert!(store.ping().await.is_ok());

        store.close().await;

        assert!(store.ping().await.is_err());
    }
}
