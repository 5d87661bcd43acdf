use crate::common::{TEST_ADMIN_PASSWORD, server_utils::create_test_server};
use anyhow::Result;
use axum::http::StatusCode;
use serde_json::{Value, json};

#[tokio::test]
async fn test_subscription_crud() -> Result<()> {
    let (server, _db) = create_test_server();

    let response = server
        .post("/api/v1/subscriptions")
        .authorization_bearer(TEST_ADMIN_PASSWORD)
        .json(&json!({ "accountName": "健康时报", "accountId": "jksb" }))
        .await;
    response.assert_status_ok();
    let created: Value = response.json();
    let id = created["subscription"]["id"].as_i64().unwrap();
    assert_eq!(created["subscription"]["accountName"], "健康时报");
    assert_eq!(created["subscription"]["accountId"], "jksb");
    assert_eq!(created["subscription"]["isActive"], true);

    let response = server
        .put(&format!("/api/v1/subscriptions/{id}"))
        .authorization_bearer(TEST_ADMIN_PASSWORD)
        .json(&json!({ "accountName": "人民日报" }))
        .await;
    response.assert_status_ok();
    let updated: Value = response.json();
    assert_eq!(updated["subscription"]["accountName"], "人民日报");
    assert_eq!(updated["subscription"]["accountId"], "jksb");

    let listed: Value = server.get("/api/v1/subscriptions").await.json();
    assert_eq!(listed["subscriptions"].as_array().unwrap().len(), 1);

    server
        .delete(&format!("/api/v1/subscriptions/{id}"))
        .authorization_bearer(TEST_ADMIN_PASSWORD)
        .await
        .assert_status_ok();

    server
        .delete(&format!("/api/v1/subscriptions/{id}"))
        .authorization_bearer(TEST_ADMIN_PASSWORD)
        .await
        .assert_status(StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn test_subscription_requires_account_name() -> Result<()> {
    let (server, _db) = create_test_server();

    let response = server
        .post("/api/v1/subscriptions")
        .authorization_bearer(TEST_ADMIN_PASSWORD)
        .json(&json!({ "accountId": "only-id" }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn test_duplicate_subscription_conflicts() -> Result<()> {
    let (server, _db) = create_test_server();
    let payload = json!({ "accountName": "健康时报" });

    server
        .post("/api/v1/subscriptions")
        .authorization_bearer(TEST_ADMIN_PASSWORD)
        .json(&payload)
        .await
        .assert_status_ok();

    let response = server
        .post("/api/v1/subscriptions")
        .authorization_bearer(TEST_ADMIN_PASSWORD)
        .json(&payload)
        .await;
    response.assert_status(StatusCode::CONFLICT);
    assert_eq!(response.json::<Value>()["error"], "Subscription already exists");
    Ok(())
}

#[tokio::test]
async fn test_subscription_writes_require_admin_password() -> Result<()> {
    let (server, _db) = create_test_server();

    let response = server
        .post("/api/v1/subscriptions")
        .json(&json!({ "accountName": "健康时报" }))
        .await;
    response.assert_status(StatusCode::UNAUTHORIZED);
    Ok(())
}
