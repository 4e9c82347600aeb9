//! Session Registry error types.
//!
//! `SrError` is the registry-level error. `ApiError` pairs it with the
//! operation's human-readable message and renders the JSON failure envelope:
//!
//! ```json
//! { "success": false, "message": "Error creating session", "error": "..." }
//! ```
//!
//! A missing session is not an `SrError`; handlers render it with
//! [`ApiError::not_found`].

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Session Registry error type.
///
/// Maps to HTTP status codes:
/// - Database, DuplicateIdentifier, Internal: 500 Internal Server Error
/// - InvalidRole, BadRequest: 400 Bad Request
#[derive(Debug, Error)]
pub enum SrError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Duplicate session identifier: {0}")]
    DuplicateIdentifier(String),

    #[error("Invalid session role: {0}")]
    InvalidRole(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal server error")]
    Internal,
}

impl SrError {
    /// Returns the HTTP status code for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            SrError::Database(_) | SrError::DuplicateIdentifier(_) | SrError::Internal => 500,
            SrError::InvalidRole(_) | SrError::BadRequest(_) => 400,
        }
    }
}

/// Convert sqlx errors to SrError.
///
/// Unique constraint violations become `DuplicateIdentifier` so a colliding
/// identifier is reported as such rather than as a generic failure.
impl From<sqlx::Error> for SrError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                SrError::DuplicateIdentifier(db_err.message().to_string())
            }
            _ => SrError::Database(err.to_string()),
        }
    }
}

/// Failure response for an HTTP operation.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
    error: Option<String>,
}

impl ApiError {
    /// A registry failure during the operation described by `message`.
    pub fn from_error(message: &str, err: SrError) -> Self {
        let status =
            StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        Self {
            status,
            message: message.to_string(),
            error: Some(err.to_string()),
        }
    }

    /// The requested resource does not exist.
    pub fn not_found(message: &str) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: message.to_string(),
            error: None,
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

#[derive(Serialize)]
struct ErrorEnvelope {
    success: bool,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!(
                target: "sr.errors",
                status = self.status.as_u16(),
                error = self.error.as_deref().unwrap_or_default(),
                "{}",
                self.message
            );
        }

        let body = ErrorEnvelope {
            success: false,
            message: self.message,
            error: self.error,
        };

        (self.status, Json(body)).into_response()
    }
}
