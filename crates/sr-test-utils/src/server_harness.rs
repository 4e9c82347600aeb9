//! Test server harness for E2E testing
//!
//! Provides `TestRegistryServer` for spawning real Session Registry server
//! instances in tests, backed by either an in-memory store or a PostgreSQL
//! pool.

use metrics_exporter_prometheus::PrometheusBuilder;
use session_registry::config::Config;
use session_registry::repositories::{InMemorySessionStore, PgSessionStore, SessionStore};
use session_registry::routes::{self, AppState};
use session_registry::services::SessionRegistry;
use sqlx::PgPool;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Default origin configured on every test server.
pub const TEST_FRONTEND_URL: &str = "http://frontend.test";

/// Test harness for spawning the Session Registry server in E2E tests.
pub struct TestRegistryServer {
    addr: SocketAddr,
    config: Config,
    registry: SessionRegistry,
    _handle: JoinHandle<()>,
}

impl TestRegistryServer {
    /// Spawn a server over a fresh in-memory store.
    pub async fn spawn_in_memory() -> Result<Self, anyhow::Error> {
        Self::spawn_with_store(Arc::new(InMemorySessionStore::new())).await
    }

    /// Spawn a server over a PostgreSQL pool (typically from `#[sqlx::test]`).
    pub async fn spawn_with_pool(pool: PgPool) -> Result<Self, anyhow::Error> {
        Self::spawn_with_store(Arc::new(PgSessionStore::new(pool))).await
    }

    /// Spawn a server over any store.
    ///
    /// The server will:
    /// - Bind to a random available port (127.0.0.1:0)
    /// - Use [`TEST_FRONTEND_URL`] as the default join URL origin
    /// - Start the HTTP server in the background
    pub async fn spawn_with_store(store: Arc<dyn SessionStore>) -> Result<Self, anyhow::Error> {
        let vars = HashMap::from([
            (
                "DATABASE_URL".to_string(),
                "postgresql://test/test".to_string(),
            ),
            ("BIND_ADDRESS".to_string(), "127.0.0.1:0".to_string()),
            ("FRONTEND_URL".to_string(), TEST_FRONTEND_URL.to_string()),
        ]);

        let config = Config::from_vars(&vars)
            .map_err(|e| anyhow::anyhow!("Failed to create config: {}", e))?;

        let registry = SessionRegistry::new(store, config.frontend_url.clone());
        let state = Arc::new(AppState {
            registry: registry.clone(),
            config: config.clone(),
        });

        // Recorder is not installed globally; tests stay independent
        let metrics_handle = PrometheusBuilder::new().build_recorder().handle();

        let app = routes::build_routes(state, metrics_handle);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .map_err(|e| anyhow::anyhow!("Failed to bind test server: {}", e))?;

        let addr = listener
            .local_addr()
            .map_err(|e| anyhow::anyhow!("Failed to get local address: {}", e))?;

        let handle = tokio::spawn(async move {
            let make_service = app.into_make_service_with_connect_info::<SocketAddr>();
            if let Err(e) = axum::serve(listener, make_service).await {
                eprintln!("Test server error: {}", e);
            }
        });

        Ok(Self {
            addr,
            config,
            registry,
            _handle: handle,
        })
    }

    /// Get the base URL of the test server.
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Get the socket address.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Get reference to the server configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get the registry the server is running on.
    pub fn registry(&self) -> &SessionRegistry {
        &self.registry
    }
}

impl Drop for TestRegistryServer {
    fn drop(&mut self) {
        self._handle.abort();
    }
}
