//! Session Registry configuration.
//!
//! Configuration is loaded from environment variables. The database URL is
//! redacted in Debug output.

use std::collections::HashMap;
use std::env;
use std::fmt;
use thiserror::Error;

/// Default HTTP port when neither `BIND_ADDRESS` nor `PORT` is set.
pub const DEFAULT_PORT: u16 = 5000;

/// Default origin used to compose join URLs when the request carries none.
pub const DEFAULT_FRONTEND_URL: &str = "http://localhost:5173";

/// Default maximum number of pooled database connections.
pub const DEFAULT_DB_MAX_CONNECTIONS: u32 = 20;

/// Session Registry configuration.
#[derive(Clone)]
pub struct Config {
    /// PostgreSQL connection URL.
    pub database_url: String,

    /// Server bind address (default: "0.0.0.0:5000").
    pub bind_address: String,

    /// Fallback origin for join URLs, without a trailing slash.
    pub frontend_url: String,

    /// Maximum pooled database connections.
    pub db_max_connections: u32,
}

/// Custom Debug implementation that redacts sensitive fields.
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("database_url", &"[REDACTED]")
            .field("bind_address", &self.bind_address)
            .field("frontend_url", &self.frontend_url)
            .field("db_max_connections", &self.db_max_connections)
            .finish()
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid port configuration: {0}")]
    InvalidPort(String),

    #[error("Invalid frontend URL configuration: {0}")]
    InvalidFrontendUrl(String),

    #[error("Invalid database pool configuration: {0}")]
    InvalidDbPool(String),
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(&env::vars().collect())
    }

    /// Load configuration from a HashMap (for testing).
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let database_url = vars
            .get("DATABASE_URL")
            .ok_or_else(|| ConfigError::MissingEnvVar("DATABASE_URL".to_string()))?
            .clone();

        // BIND_ADDRESS wins; otherwise listen on all interfaces at PORT
        let bind_address = match vars.get("BIND_ADDRESS") {
            Some(address) => address.clone(),
            None => {
                let port = if let Some(value_str) = vars.get("PORT") {
                    value_str.parse::<u16>().map_err(|e| {
                        ConfigError::InvalidPort(format!(
                            "PORT must be a valid port number, got '{}': {}",
                            value_str, e
                        ))
                    })?
                } else {
                    DEFAULT_PORT
                };
                format!("0.0.0.0:{}", port)
            }
        };

        let frontend_url = vars
            .get("FRONTEND_URL")
            .map(String::as_str)
            .unwrap_or(DEFAULT_FRONTEND_URL)
            .trim()
            .trim_end_matches('/')
            .to_string();

        if frontend_url.is_empty() {
            return Err(ConfigError::InvalidFrontendUrl(
                "FRONTEND_URL must not be empty".to_string(),
            ));
        }

        let db_max_connections = if let Some(value_str) = vars.get("DB_MAX_CONNECTIONS") {
            let value: u32 = value_str.parse().map_err(|e| {
                ConfigError::InvalidDbPool(format!(
                    "DB_MAX_CONNECTIONS must be a valid positive integer, got '{}': {}",
                    value_str, e
                ))
            })?;

            if value == 0 {
                return Err(ConfigError::InvalidDbPool(
                    "DB_MAX_CONNECTIONS must be greater than 0".to_string(),
                ));
            }

            value
        } else {
            DEFAULT_DB_MAX_CONNECTIONS
        };

        Ok(Config {
            database_url,
            bind_address,
            frontend_url,
            db_max_connections,
        })
    }
}
