//! Session handlers.
//!
//! Implements the session registry endpoints:
//!
//! - `POST /api/sessions/create` - Create an admin session
//! - `GET /api/sessions/{unique_id}` - Look up a session
//! - `GET /api/sessions` - List sessions (optional `limit` / `offset`)
//!
//! All responses carry a `success` flag. Failures add a human-readable
//! `message` and, for registry errors, an `error` diagnostic.

use crate::errors::{ApiError, SrError};
use crate::models::{
    ListSessionsQuery, SessionDocument, SessionEnvelope, SessionListEnvelope, SessionResponse,
};
use crate::routes::AppState;
use crate::services::OriginHints;
use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use std::sync::Arc;
use tracing::{debug, instrument};

const CREATE_FAILED: &str = "Error creating session";
const FETCH_FAILED: &str = "Error fetching session";
const LIST_FAILED: &str = "Error fetching sessions";
const INVALID_PAGINATION: &str = "Invalid pagination parameters";
const NOT_FOUND: &str = "Session not found";

/// Last segment of the create route.
const CREATE_SEGMENT: &str = "create";

/// Handler for POST /api/sessions/create
///
/// No request body. The join URL origin is taken from the `Origin` header,
/// else the `Referer` header, else the configured default.
///
/// # Response
///
/// - 201 Created: `{success: true, session: {id, type, unique_id, userurl}}`
/// - 500 Internal Server Error: storage failure
#[instrument(skip_all, name = "sr.handlers.create_session")]
pub async fn create_session(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<(StatusCode, Json<SessionEnvelope>), ApiError> {
    let hints = OriginHints::from_headers(&headers);

    let record = state
        .registry
        .create_session(&hints)
        .await
        .map_err(|e| ApiError::from_error(CREATE_FAILED, e))?;

    Ok((
        StatusCode::CREATED,
        Json(SessionEnvelope {
            success: true,
            session: SessionResponse::from(record),
        }),
    ))
}

/// Handler for GET /api/sessions/{unique_id}
///
/// # Response
///
/// - 200 OK: `{success: true, session: {...}}`
/// - 404 Not Found: `{success: false, message: "Session not found"}`
/// - 500 Internal Server Error: storage failure
#[instrument(skip_all, name = "sr.handlers.get_session", fields(unique_id = %unique_id))]
pub async fn get_session(
    State(state): State<Arc<AppState>>,
    Path(unique_id): Path<String>,
) -> Result<Json<SessionEnvelope>, ApiError> {
    fetch_session(&state, &unique_id).await
}

/// Handler for GET /api/sessions/create
///
/// The static create path shadows the lookup route for `create`; a GET on it
/// is answered as a lookup of that identifier.
#[instrument(skip_all, name = "sr.handlers.get_session", fields(unique_id = CREATE_SEGMENT))]
pub async fn get_create_segment(
    State(state): State<Arc<AppState>>,
) -> Result<Json<SessionEnvelope>, ApiError> {
    fetch_session(&state, CREATE_SEGMENT).await
}

async fn fetch_session(
    state: &AppState,
    unique_id: &str,
) -> Result<Json<SessionEnvelope>, ApiError> {
    let record = state
        .registry
        .get_session(unique_id)
        .await
        .map_err(|e| ApiError::from_error(FETCH_FAILED, e))?;

    match record {
        Some(record) => Ok(Json(SessionEnvelope {
            success: true,
            session: SessionResponse::from(record),
        })),
        None => {
            debug!(target: "sr.handlers.sessions", "Session not found");
            Err(ApiError::not_found(NOT_FOUND))
        }
    }
}

/// Handler for GET /api/sessions
///
/// Without query parameters every session is returned. `limit` (≥ 1) and
/// `offset` (≥ 0) select a window ordered by creation time.
///
/// # Response
///
/// - 200 OK: `{success: true, sessions: [...]}`
/// - 400 Bad Request: invalid pagination parameters
/// - 500 Internal Server Error: storage failure
#[instrument(skip_all, name = "sr.handlers.list_sessions")]
pub async fn list_sessions(
    State(state): State<Arc<AppState>>,
    query: Result<Query<ListSessionsQuery>, QueryRejection>,
) -> Result<Json<SessionListEnvelope>, ApiError> {
    let Query(query) = query.map_err(|rejection| {
        ApiError::from_error(INVALID_PAGINATION, SrError::BadRequest(rejection.body_text()))
    })?;

    let page = query
        .into_page()
        .map_err(|e| ApiError::from_error(INVALID_PAGINATION, e))?;

    let records = state
        .registry
        .list_sessions(page)
        .await
        .map_err(|e| ApiError::from_error(LIST_FAILED, e))?;

    Ok(Json(SessionListEnvelope {
        success: true,
        sessions: records.into_iter().map(SessionDocument::from).collect(),
    }))
}
