//! PostgreSQL session store.
//!
//! # Security
//!
//! - All queries use parameterized statements (SQL injection safe)
//! - The `live_sessions_unique_id_key` constraint is the authoritative
//!   uniqueness backstop for identifiers

use crate::config::Config;
use crate::errors::SrError;
use crate::models::{NewSession, Page, SessionRecord, SessionRole};
use crate::observability::metrics;
use crate::repositories::SessionStore;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::time::{Duration, Instant};
use tracing::instrument;
use uuid::Uuid;

/// Statement timeout applied to every pooled connection, in seconds.
const STATEMENT_TIMEOUT_SECS: u32 = 5;

const SESSION_COLUMNS: &str = "id, session_type, unique_id, user_url, created_at, updated_at";

/// Session store backed by a PostgreSQL pool.
#[derive(Clone)]
pub struct PgSessionStore {
    pool: PgPool,
}

impl PgSessionStore {
    /// Wrap an existing pool (e.g. one provided by `#[sqlx::test]`).
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Open a connection pool using the service configuration.
    pub async fn connect(config: &Config) -> Result<Self, SrError> {
        let url = add_query_timeout(&config.database_url, STATEMENT_TIMEOUT_SECS);
        let pool = PgPoolOptions::new()
            .max_connections(config.db_max_connections)
            .min_connections(1)
            .acquire_timeout(Duration::from_secs(5))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .connect(&url)
            .await?;

        Ok(Self { pool })
    }

    /// Apply the embedded schema migrations.
    pub async fn run_migrations(&self) -> Result<(), SrError> {
        sqlx::migrate!("../../migrations")
            .run(&self.pool)
            .await
            .map_err(|e| SrError::Database(e.to_string()))
    }

    /// Get reference to the underlying pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[derive(sqlx::FromRow)]
struct SessionRow {
    id: Uuid,
    session_type: String,
    unique_id: String,
    user_url: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<SessionRow> for SessionRecord {
    type Error = SrError;

    fn try_from(row: SessionRow) -> Result<Self, Self::Error> {
        // The CHECK constraint keeps this parse infallible in practice
        let role: SessionRole = row.session_type.parse().map_err(|_| {
            SrError::Database(format!(
                "Stored session has unknown type '{}'",
                row.session_type
            ))
        })?;

        Ok(SessionRecord {
            id: row.id,
            role,
            unique_id: row.unique_id,
            user_url: row.user_url,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Time a query and record its outcome.
fn finish<T>(
    operation: &'static str,
    start: Instant,
    result: Result<T, sqlx::Error>,
) -> Result<T, SrError> {
    let status = if result.is_ok() { "success" } else { "error" };
    metrics::record_db_query(operation, status, start.elapsed());
    result.map_err(SrError::from)
}

#[async_trait]
impl SessionStore for PgSessionStore {
    #[instrument(skip_all, name = "sr.repo.insert_session", fields(unique_id = %session.unique_id))]
    async fn insert(&self, session: &NewSession) -> Result<SessionRecord, SrError> {
        let start = Instant::now();

        let query = format!(
            "INSERT INTO live_sessions (session_type, unique_id, user_url) \
             VALUES ($1, $2, $3) \
             RETURNING {}",
            SESSION_COLUMNS
        );

        let row: SessionRow = finish(
            "insert_session",
            start,
            sqlx::query_as(&query)
                .bind(session.role.as_str())
                .bind(&session.unique_id)
                .bind(&session.user_url)
                .fetch_one(&self.pool)
                .await,
        )?;

        row.try_into()
    }

    #[instrument(skip_all, name = "sr.repo.find_session")]
    async fn find_by_unique_id(&self, unique_id: &str) -> Result<Option<SessionRecord>, SrError> {
        let start = Instant::now();

        let query = format!(
            "SELECT {} FROM live_sessions WHERE unique_id = $1",
            SESSION_COLUMNS
        );

        let row: Option<SessionRow> = finish(
            "find_session",
            start,
            sqlx::query_as(&query)
                .bind(unique_id)
                .fetch_optional(&self.pool)
                .await,
        )?;

        row.map(SessionRecord::try_from).transpose()
    }

    #[instrument(skip_all, name = "sr.repo.list_sessions", fields(limit = ?page.limit, offset = page.offset))]
    async fn list(&self, page: Page) -> Result<Vec<SessionRecord>, SrError> {
        let start = Instant::now();

        let rows: Vec<SessionRow> = if page.is_unbounded() {
            let query = format!("SELECT {} FROM live_sessions", SESSION_COLUMNS);
            finish(
                "list_sessions",
                start,
                sqlx::query_as(&query).fetch_all(&self.pool).await,
            )?
        } else {
            // LIMIT NULL means no limit in PostgreSQL
            let query = format!(
                "SELECT {} FROM live_sessions ORDER BY created_at, id LIMIT $1 OFFSET $2",
                SESSION_COLUMNS
            );
            finish(
                "list_sessions",
                start,
                sqlx::query_as(&query)
                    .bind(page.limit)
                    .bind(page.offset)
                    .fetch_all(&self.pool)
                    .await,
            )?
        };

        rows.into_iter().map(SessionRecord::try_from).collect()
    }

    async fn ping(&self) -> Result<(), SrError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}

/// Adds statement_timeout to the database URL.
/// This ensures queries don't hang indefinitely.
fn add_query_timeout(url: &str, timeout_secs: u32) -> String {
    let separator = if url.contains('?') { '&' } else { '?' };
    format!(
        "{}{}options=-c%20statement_timeout%3D{}s",
        url, separator, timeout_secs
    )
}
