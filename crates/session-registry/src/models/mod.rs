//! Session Registry models.
//!
//! Contains the session record, its role enumeration, and the JSON shapes
//! exchanged over HTTP.

use crate::errors::SrError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Role a session was created for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionRole {
    /// Operator-created session. The only role the public operations mint.
    Admin,

    /// Participant session. Allowed by the model, never created by the API.
    Student,
}

impl SessionRole {
    /// Returns the string representation of the role.
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionRole::Admin => "admin",
            SessionRole::Student => "student",
        }
    }
}

impl fmt::Display for SessionRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SessionRole {
    type Err = SrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(SessionRole::Admin),
            "student" => Ok(SessionRole::Student),
            other => Err(SrError::InvalidRole(other.to_string())),
        }
    }
}

/// A persisted live session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionRecord {
    /// Internal storage key. Never used for lookups.
    pub id: Uuid,

    /// Session role.
    pub role: SessionRole,

    /// Public, unique session identifier.
    pub unique_id: String,

    /// Join URL, `{origin}/session/{unique_id}`.
    pub user_url: String,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A session about to be inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSession {
    pub role: SessionRole,
    pub unique_id: String,
    pub user_url: String,
}

/// Optional window over the session listing.
///
/// The default (no limit, no offset) means "return everything".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Page {
    pub limit: Option<i64>,
    pub offset: i64,
}

impl Page {
    /// Whether this page restricts the listing at all.
    pub fn is_unbounded(&self) -> bool {
        self.limit.is_none() && self.offset == 0
    }
}

// ============================================================================
// HTTP Models
// ============================================================================

/// Query parameters for `GET /api/sessions`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListSessionsQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl ListSessionsQuery {
    /// Validate and convert into a storage page.
    pub fn into_page(self) -> Result<Page, SrError> {
        if let Some(limit) = self.limit {
            if limit <= 0 {
                return Err(SrError::BadRequest(
                    "limit must be greater than 0".to_string(),
                ));
            }
        }

        let offset = self.offset.unwrap_or(0);
        if offset < 0 {
            return Err(SrError::BadRequest(
                "offset must not be negative".to_string(),
            ));
        }

        Ok(Page {
            limit: self.limit,
            offset,
        })
    }
}

/// Session as returned by create and lookup.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionResponse {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub role: SessionRole,
    pub unique_id: String,
    pub userurl: String,
}

impl From<SessionRecord> for SessionResponse {
    fn from(record: SessionRecord) -> Self {
        Self {
            id: record.id,
            role: record.role,
            unique_id: record.unique_id,
            userurl: record.user_url,
        }
    }
}

/// Full session document as returned by the listing, timestamps included.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionDocument {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub role: SessionRole,
    pub unique_id: String,
    pub userurl: String,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

impl From<SessionRecord> for SessionDocument {
    fn from(record: SessionRecord) -> Self {
        Self {
            id: record.id,
            role: record.role,
            unique_id: record.unique_id,
            userurl: record.user_url,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

/// Success envelope carrying a single session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionEnvelope {
    pub success: bool,
    pub session: SessionResponse,
}

/// Success envelope carrying the session listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionListEnvelope {
    pub success: bool,
    pub sessions: Vec<SessionDocument>,
}

/// Readiness check response.
///
/// Returned by the `/ready` endpoint (readiness probe).
#[derive(Debug, Clone, Serialize)]
pub struct ReadinessResponse {
    /// Service readiness status ("ready" or "not_ready").
    pub status: &'static str,

    /// Session store connectivity status.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database: Option<&'static str>,

    /// Error message (generic, no infrastructure details).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn sample_record() -> SessionRecord {
        let now = Utc::now();
        SessionRecord {
            id: Uuid::new_v4(),
            role: SessionRole::Admin,
            unique_id: "5f0c3a9e-3f43-4c4e-9a57-0f2f4d7c1b22".to_string(),
            user_url: "http://foo.test/session/5f0c3a9e-3f43-4c4e-9a57-0f2f4d7c1b22".to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_role_round_trips_through_str() {
        for role in [SessionRole::Admin, SessionRole::Student] {
            assert_eq!(role.as_str().parse::<SessionRole>().unwrap(), role);
        }
    }

    #[test]
    fn test_role_rejects_unknown_value() {
        let result = "guest".parse::<SessionRole>();
        assert!(matches!(result, Err(SrError::InvalidRole(v)) if v == "guest"));
    }

    #[test]
    fn test_role_is_case_sensitive() {
        assert!("Admin".parse::<SessionRole>().is_err());
    }

    #[test]
    fn test_role_serde_rejects_unknown_value() {
        let result: Result<SessionRole, _> = serde_json::from_str("\"guest\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_session_response_json_shape() {
        let record = sample_record();
        let id = record.id;
        let json = serde_json::to_value(SessionResponse::from(record)).unwrap();

        assert_eq!(json["id"], id.to_string());
        assert_eq!(json["type"], "admin");
        assert_eq!(json["unique_id"], "5f0c3a9e-3f43-4c4e-9a57-0f2f4d7c1b22");
        assert_eq!(
            json["userurl"],
            "http://foo.test/session/5f0c3a9e-3f43-4c4e-9a57-0f2f4d7c1b22"
        );
        assert!(json.get("createdAt").is_none());
    }

    #[test]
    fn test_session_document_includes_timestamps() {
        let json = serde_json::to_value(SessionDocument::from(sample_record())).unwrap();

        assert!(json.get("createdAt").is_some());
        assert!(json.get("updatedAt").is_some());
        assert_eq!(json["type"], "admin");
    }

    #[test]
    fn test_list_query_defaults_to_unbounded_page() {
        let page = ListSessionsQuery::default().into_page().unwrap();
        assert!(page.is_unbounded());
        assert_eq!(page, Page::default());
    }

    #[test]
    fn test_list_query_accepts_limit_and_offset() {
        let page = ListSessionsQuery {
            limit: Some(10),
            offset: Some(20),
        }
        .into_page()
        .unwrap();

        assert_eq!(page.limit, Some(10));
        assert_eq!(page.offset, 20);
        assert!(!page.is_unbounded());
    }

    #[test]
    fn test_list_query_rejects_zero_limit() {
        let result = ListSessionsQuery {
            limit: Some(0),
            offset: None,
        }
        .into_page();
        assert!(matches!(result, Err(SrError::BadRequest(_))));
    }

    #[test]
    fn test_list_query_rejects_negative_offset() {
        let result = ListSessionsQuery {
            limit: None,
            offset: Some(-1),
        }
        .into_page();
        assert!(matches!(result, Err(SrError::BadRequest(_))));
    }

    #[test]
    fn test_readiness_response_serialization() {
        let ready = ReadinessResponse {
            status: "ready",
            database: Some("healthy"),
            error: None,
        };

        let json = serde_json::to_string(&ready).unwrap();
        assert!(json.contains("\"status\":\"ready\""));
        assert!(json.contains("\"database\":\"healthy\""));
        assert!(!json.contains("\"error\""));
    }
}
