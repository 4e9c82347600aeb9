//! Session endpoint integration tests.
//!
//! Drives `/api/sessions/*` over real HTTP using the `TestRegistryServer`
//! harness with an in-memory store.

use futures::future::join_all;
use serde_json::Value;
use session_registry::repositories::{InMemorySessionStore, SessionStore};
use sr_test_utils::{TestRegistryServer, TEST_FRONTEND_URL};
use std::collections::HashSet;
use std::sync::Arc;
use uuid::Uuid;

async fn create(
    client: &reqwest::Client,
    server: &TestRegistryServer,
) -> Result<reqwest::Response, anyhow::Error> {
    Ok(client
        .post(format!("{}/api/sessions/create", server.url()))
        .send()
        .await?)
}

/// Create then resolve: the join URL embeds the identifier and the lookup
/// returns the same record.
#[tokio::test]
async fn test_create_then_get_round_trip() -> Result<(), anyhow::Error> {
    let server = TestRegistryServer::spawn_in_memory().await?;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{}/api/sessions/create", server.url()))
        .header("Origin", "https://x.io")
        .send()
        .await?;
    assert_eq!(response.status(), 201);

    let body: Value = response.json().await?;
    assert_eq!(body["success"], true);
    assert_eq!(body["session"]["type"], "admin");

    let unique_id = body["session"]["unique_id"]
        .as_str()
        .ok_or_else(|| anyhow::anyhow!("missing unique_id"))?
        .to_string();
    assert_eq!(unique_id.len(), 36);
    assert_eq!(Uuid::parse_str(&unique_id)?.get_version_num(), 4);
    assert_eq!(
        body["session"]["userurl"],
        format!("https://x.io/session/{}", unique_id)
    );

    let response = client
        .get(format!("{}/api/sessions/{}", server.url(), unique_id))
        .send()
        .await?;
    assert_eq!(response.status(), 200);

    let fetched: Value = response.json().await?;
    assert_eq!(fetched["success"], true);
    assert_eq!(fetched["session"], body["session"]);

    Ok(())
}

#[tokio::test]
async fn test_create_falls_back_to_referer_origin() -> Result<(), anyhow::Error> {
    let server = TestRegistryServer::spawn_in_memory().await?;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{}/api/sessions/create", server.url()))
        .header("Referer", "https://app.example.com:8443/dashboard?tab=1")
        .send()
        .await?;
    assert_eq!(response.status(), 201);

    let body: Value = response.json().await?;
    let userurl = body["session"]["userurl"].as_str().unwrap_or_default();
    assert!(
        userurl.starts_with("https://app.example.com:8443/session/"),
        "unexpected userurl {}",
        userurl
    );

    Ok(())
}

#[tokio::test]
async fn test_create_falls_back_to_configured_frontend() -> Result<(), anyhow::Error> {
    let server = TestRegistryServer::spawn_in_memory().await?;
    let client = reqwest::Client::new();

    let body: Value = create(&client, &server).await?.json().await?;
    let unique_id = body["session"]["unique_id"].as_str().unwrap_or_default();

    assert_eq!(
        body["session"]["userurl"],
        format!("{}/session/{}", TEST_FRONTEND_URL, unique_id)
    );

    Ok(())
}

#[tokio::test]
async fn test_create_ignores_request_body() -> Result<(), anyhow::Error> {
    let server = TestRegistryServer::spawn_in_memory().await?;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{}/api/sessions/create", server.url()))
        .json(&serde_json::json!({"type": "student", "unique_id": "chosen"}))
        .send()
        .await?;
    assert_eq!(response.status(), 201);

    let body: Value = response.json().await?;
    assert_eq!(body["session"]["type"], "admin");
    assert_ne!(body["session"]["unique_id"], "chosen");

    Ok(())
}

#[tokio::test]
async fn test_concurrent_creates_yield_distinct_identifiers() -> Result<(), anyhow::Error> {
    let server = TestRegistryServer::spawn_in_memory().await?;
    let client = reqwest::Client::new();

    let responses = join_all((0..20).map(|_| create(&client, &server))).await;

    let mut ids = HashSet::new();
    for response in responses {
        let response = response?;
        assert_eq!(response.status(), 201);
        let body: Value = response.json().await?;
        let unique_id = body["session"]["unique_id"]
            .as_str()
            .ok_or_else(|| anyhow::anyhow!("missing unique_id"))?
            .to_string();
        assert!(ids.insert(unique_id), "duplicate identifier issued");
    }
    assert_eq!(ids.len(), 20);

    let listing: Value = client
        .get(format!("{}/api/sessions", server.url()))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(listing["sessions"].as_array().map(Vec::len), Some(20));

    Ok(())
}

#[tokio::test]
async fn test_get_unknown_session_returns_404_envelope() -> Result<(), anyhow::Error> {
    let server = TestRegistryServer::spawn_in_memory().await?;
    let client = reqwest::Client::new();

    for unique_id in ["00000000-0000-4000-8000-000000000000", "not-a-uuid"] {
        let response = client
            .get(format!("{}/api/sessions/{}", server.url(), unique_id))
            .send()
            .await?;
        assert_eq!(response.status(), 404);

        let body: Value = response.json().await?;
        assert_eq!(
            body,
            serde_json::json!({"success": false, "message": "Session not found"})
        );
    }

    Ok(())
}

#[tokio::test]
async fn test_list_empty_registry() -> Result<(), anyhow::Error> {
    let server = TestRegistryServer::spawn_in_memory().await?;
    let client = reqwest::Client::new();

    let response = client
        .get(format!("{}/api/sessions", server.url()))
        .send()
        .await?;
    assert_eq!(response.status(), 200);

    let body: Value = response.json().await?;
    assert_eq!(body, serde_json::json!({"success": true, "sessions": []}));

    Ok(())
}

#[tokio::test]
async fn test_list_includes_timestamps() -> Result<(), anyhow::Error> {
    let server = TestRegistryServer::spawn_in_memory().await?;
    let client = reqwest::Client::new();

    create(&client, &server).await?;
    create(&client, &server).await?;

    let body: Value = client
        .get(format!("{}/api/sessions/", server.url()))
        .send()
        .await?
        .json()
        .await?;

    let sessions = body["sessions"]
        .as_array()
        .ok_or_else(|| anyhow::anyhow!("sessions is not an array"))?;
    assert_eq!(sessions.len(), 2);
    for session in sessions {
        assert!(session["createdAt"].is_string());
        assert!(session["updatedAt"].is_string());
        assert_eq!(session["type"], "admin");
    }

    Ok(())
}

#[tokio::test]
async fn test_list_pagination() -> Result<(), anyhow::Error> {
    let server = TestRegistryServer::spawn_in_memory().await?;
    let client = reqwest::Client::new();

    for _ in 0..5 {
        create(&client, &server).await?;
    }

    let page: Value = client
        .get(format!("{}/api/sessions?limit=2&offset=1", server.url()))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(page["sessions"].as_array().map(Vec::len), Some(2));

    let tail: Value = client
        .get(format!("{}/api/sessions?offset=4", server.url()))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(tail["sessions"].as_array().map(Vec::len), Some(1));

    for query in ["limit=0", "limit=abc", "offset=-1"] {
        let response = client
            .get(format!("{}/api/sessions?{}", server.url(), query))
            .send()
            .await?;
        assert_eq!(response.status(), 400, "query {}", query);

        let body: Value = response.json().await?;
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Invalid pagination parameters");
    }

    Ok(())
}

/// Storage failures surface as 500 envelopes carrying a diagnostic.
#[tokio::test]
async fn test_store_failure_returns_500_envelopes() -> Result<(), anyhow::Error> {
    let store = Arc::new(InMemorySessionStore::new());
    let server =
        TestRegistryServer::spawn_with_store(store.clone() as Arc<dyn SessionStore>).await?;
    let client = reqwest::Client::new();

    let created: Value = create(&client, &server).await?.json().await?;
    let unique_id = created["session"]["unique_id"]
        .as_str()
        .unwrap_or_default()
        .to_string();

    store.set_available(false);

    let response = create(&client, &server).await?;
    assert_eq!(response.status(), 500);
    let body: Value = response.json().await?;
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Error creating session");
    assert!(body["error"].is_string());

    let response = client
        .get(format!("{}/api/sessions/{}", server.url(), unique_id))
        .send()
        .await?;
    assert_eq!(response.status(), 500);
    let body: Value = response.json().await?;
    assert_eq!(body["message"], "Error fetching session");

    let response = client
        .get(format!("{}/api/sessions", server.url()))
        .send()
        .await?;
    assert_eq!(response.status(), 500);
    let body: Value = response.json().await?;
    assert_eq!(body["message"], "Error fetching sessions");

    // Nothing was written while the store was down
    store.set_available(true);
    assert_eq!(store.len().await, 1);

    Ok(())
}
