use crate::common::server_utils::create_test_server;

#[tokio::test]
async fn test_health_endpoint() {
    let (server, _db) = create_test_server();

    let response = server.get("/health").await;
    response.assert_status_ok();
    response.assert_text("OK");
}

#[tokio::test]
async fn test_unknown_api_path_is_json_not_found() {
    let (server, _db) = create_test_server();

    let response = server.get("/api/v1/nothing-here").await;
    response.assert_status_not_found();
    assert_eq!(
        response.json::<serde_json::Value>(),
        serde_json::json!({ "error": "Not found" })
    );
}
