use crate::common::{TEST_ADMIN_PASSWORD, server_utils::{create_test_server, create_test_server_with}};
use anyhow::Result;
use axum::http::StatusCode;
use serde_json::{Value, json};
use wechat_digest_service::{config::Settings, test_helpers::StubFetcher};

#[tokio::test]
async fn test_keyword_crud() -> Result<()> {
    let (server, _db) = create_test_server();

    let response = server
        .post("/api/v1/keywords")
        .authorization_bearer(TEST_ADMIN_PASSWORD)
        .json(&json!({ "keyword": " 健康 ", "category": "健康养生" }))
        .await;
    response.assert_status_ok();
    let created: Value = response.json();
    let id = created["keyword"]["id"].as_i64().unwrap();
    assert_eq!(created["keyword"]["keyword"], "健康");
    assert_eq!(created["keyword"]["category"], "健康养生");
    assert_eq!(created["keyword"]["isActive"], true);
    assert!(created["keyword"]["createdAt"].is_string());

    let response = server
        .put(&format!("/api/v1/keywords/{id}"))
        .authorization_bearer(TEST_ADMIN_PASSWORD)
        .json(&json!({ "isActive": false }))
        .await;
    response.assert_status_ok();
    let updated: Value = response.json();
    assert_eq!(updated["keyword"]["isActive"], false);
    assert_eq!(updated["keyword"]["keyword"], "健康");

    let listed: Value = server.get("/api/v1/keywords").await.json();
    assert_eq!(listed["keywords"].as_array().unwrap().len(), 1);
    assert_eq!(listed["keywords"][0]["isActive"], false);

    let response = server
        .delete(&format!("/api/v1/keywords/{id}"))
        .authorization_bearer(TEST_ADMIN_PASSWORD)
        .await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>(), json!({ "success": true }));

    let listed: Value = server.get("/api/v1/keywords").await.json();
    assert!(listed["keywords"].as_array().unwrap().is_empty());
    Ok(())
}

#[tokio::test]
async fn test_writes_require_admin_password() -> Result<()> {
    let (server, _db) = create_test_server();
    let payload = json!({ "keyword": "理财", "category": "财经理财" });

    let response = server.post("/api/v1/keywords").json(&payload).await;
    response.assert_status(StatusCode::UNAUTHORIZED);

    let response = server
        .post("/api/v1/keywords")
        .authorization_bearer("wrong")
        .json(&payload)
        .await;
    response.assert_status(StatusCode::UNAUTHORIZED);
    assert_eq!(response.json::<Value>()["error"], "Unauthorized");

    let response = server.delete("/api/v1/keywords/1").await;
    response.assert_status(StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn test_writes_disabled_without_admin_password() -> Result<()> {
    let (server, _state, _db) = create_test_server_with(StubFetcher::new(), Settings::default());

    let response = server
        .post("/api/v1/keywords")
        .authorization_bearer(TEST_ADMIN_PASSWORD)
        .json(&json!({ "keyword": "理财", "category": "财经理财" }))
        .await;
    response.assert_status(StatusCode::UNAUTHORIZED);

    server.get("/api/v1/keywords").await.assert_status_ok();
    Ok(())
}

#[tokio::test]
async fn test_duplicate_keyword_conflicts() -> Result<()> {
    let (server, _db) = create_test_server();
    let payload = json!({ "keyword": "职场", "category": "职场成长" });

    server
        .post("/api/v1/keywords")
        .authorization_bearer(TEST_ADMIN_PASSWORD)
        .json(&payload)
        .await
        .assert_status_ok();

    let response = server
        .post("/api/v1/keywords")
        .authorization_bearer(TEST_ADMIN_PASSWORD)
        .json(&payload)
        .await;
    response.assert_status(StatusCode::CONFLICT);
    assert_eq!(response.json::<Value>()["error"], "Keyword already exists");
    Ok(())
}

#[tokio::test]
async fn test_missing_fields_are_rejected() -> Result<()> {
    let (server, _db) = create_test_server();

    for payload in [
        json!({ "keyword": "职场" }),
        json!({ "category": "职场成长" }),
        json!({ "keyword": "  ", "category": "职场成长" }),
    ] {
        let response = server
            .post("/api/v1/keywords")
            .authorization_bearer(TEST_ADMIN_PASSWORD)
            .json(&payload)
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
    }
    Ok(())
}

#[tokio::test]
async fn test_unknown_keyword_id_is_not_found() -> Result<()> {
    let (server, _db) = create_test_server();

    let response = server
        .put("/api/v1/keywords/999")
        .authorization_bearer(TEST_ADMIN_PASSWORD)
        .json(&json!({ "category": "其他" }))
        .await;
    response.assert_status(StatusCode::NOT_FOUND);

    let response = server
        .delete("/api/v1/keywords/999")
        .authorization_bearer(TEST_ADMIN_PASSWORD)
        .await;
    response.assert_status(StatusCode::NOT_FOUND);
    Ok(())
}
