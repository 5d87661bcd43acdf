use crate::common::{
    TEST_CRON_SECRET, listing_item, listing_page,
    server_utils::create_test_server_with,
    test_utils,
};
use anyhow::Result;
use axum::http::StatusCode;
use serde_json::{Value, json};
use wechat_digest_service::{
    AppState,
    auth::Secret,
    models::NewKeywordConfig,
    repositories::KeywordRepository,
    scrape::SearchMode,
    test_helpers::{StubFetcher, test_settings},
};

#[tokio::test]
async fn test_trigger_runs_ingestion_and_reports_totals() -> Result<()> {
    let fetcher = StubFetcher::new().with_page(
        SearchMode::Keyword,
        "科技",
        listing_page(&[
            listing_item("https://mp.weixin.qq.com/s/1", "一", "某号", "1小时前"),
            listing_item("https://mp.weixin.qq.com/s/2", "二", "某号", "2小时前"),
        ]),
    );
    let (server, state, db) = create_test_server_with(fetcher, test_settings());
    state
        .keyword_repo()
        .create(&NewKeywordConfig {
            keyword: "科技".to_string(),
            category: "科技数码".to_string(),
            is_active: true,
        })
        .await?;

    let response = server.get("/api/v1/cron/fetch").await;
    response.assert_status_ok();
    assert_eq!(
        response.json::<Value>(),
        json!({
            "success": true,
            "totalFetched": 2,
            "totalSaved": 2,
            "keywords": 1,
            "subscriptions": 0,
        })
    );

    assert_eq!(test_utils::count_articles(&mut db.lock().unwrap()), 2);
    assert!(!state.run_guard().is_running());
    Ok(())
}

#[tokio::test]
async fn test_trigger_requires_configured_secret() -> Result<()> {
    let mut settings = test_settings();
    settings.cron_secret = Some(Secret::new(TEST_CRON_SECRET));
    let (server, _state, _db) = create_test_server_with(StubFetcher::new(), settings);

    server
        .get("/api/v1/cron/fetch")
        .await
        .assert_status(StatusCode::UNAUTHORIZED);

    server
        .get("/api/v1/cron/fetch")
        .authorization_bearer("nope")
        .await
        .assert_status(StatusCode::UNAUTHORIZED);

    server
        .get("/api/v1/cron/fetch")
        .authorization_bearer(TEST_CRON_SECRET)
        .await
        .assert_status_ok();
    Ok(())
}

#[tokio::test]
async fn test_concurrent_trigger_is_rejected() -> Result<()> {
    let (server, state, _db) = create_test_server_with(StubFetcher::new(), test_settings());

    let permit = state.run_guard().try_start()?;
    let response = server.get("/api/v1/cron/fetch").await;
    response.assert_status(StatusCode::CONFLICT);
    assert_eq!(
        response.json::<Value>()["error"],
        "An ingestion run is already in progress"
    );

    drop(permit);
    server.get("/api/v1/cron/fetch").await.assert_status_ok();
    Ok(())
}

#[tokio::test]
async fn test_trigger_refused_during_shutdown() -> Result<()> {
    let (server, state, _db) = create_test_server_with(StubFetcher::new(), test_settings());

    state.run_guard().start_shutdown();
    server
        .get("/api/v1/cron/fetch")
        .await
        .assert_status(StatusCode::SERVICE_UNAVAILABLE);
    Ok(())
}
