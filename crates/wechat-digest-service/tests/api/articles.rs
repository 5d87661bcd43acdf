use crate::common::{server_utils::create_test_server, test_utils};
use anyhow::Result;
use axum::http::StatusCode;
use chrono::{NaiveDate, NaiveDateTime};
use serde_json::Value;

fn at(day: u32, hour: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 5, day)
        .unwrap()
        .and_hms_opt(hour, 0, 0)
        .unwrap()
}

fn urls(body: &Value) -> Vec<&str> {
    body["articles"]
        .as_array()
        .unwrap()
        .iter()
        .map(|article| article["url"].as_str().unwrap())
        .collect()
}

fn seed(db: &std::sync::Mutex<diesel::sqlite::SqliteConnection>) {
    let mut conn = db.lock().unwrap();
    for article in [
        test_utils::new_article("https://a.example/1", "冬季养生", "健康养生", 100, at(1, 8)),
        test_utils::new_article("https://a.example/2", "新款手机评测", "科技数码", 900, at(2, 8)),
        test_utils::new_article("https://a.example/3", "Rust 入门", "科技数码", 50, at(3, 8)),
        test_utils::new_article("https://a.example/4", "理财小贴士", "财经理财", 900, at(4, 8)),
    ] {
        test_utils::insert_article(&mut conn, &article);
    }
}

#[tokio::test]
async fn test_list_articles_empty_database() -> Result<()> {
    let (server, _db) = create_test_server();

    let response = server.get("/api/v1/articles").await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert!(body["articles"].as_array().unwrap().is_empty());
    assert_eq!(body["pagination"]["page"], 1);
    assert_eq!(body["pagination"]["limit"], 20);
    assert_eq!(body["pagination"]["total"], 0);
    assert_eq!(body["pagination"]["totalPages"], 0);
    Ok(())
}

#[tokio::test]
async fn test_default_sort_is_hot() -> Result<()> {
    let (server, db) = create_test_server();
    seed(&db);

    let body: Value = server.get("/api/v1/articles").await.json();

    // Equal read counts fall back to the newest publish time.
    assert_eq!(
        urls(&body),
        vec![
            "https://a.example/4",
            "https://a.example/2",
            "https://a.example/1",
            "https://a.example/3",
        ]
    );
    Ok(())
}

#[tokio::test]
async fn test_latest_sort_orders_by_publish_time() -> Result<()> {
    let (server, db) = create_test_server();
    seed(&db);

    let body: Value = server
        .get("/api/v1/articles")
        .add_query_param("sort", "latest")
        .await
        .json();

    assert_eq!(
        urls(&body),
        vec![
            "https://a.example/4",
            "https://a.example/3",
            "https://a.example/2",
            "https://a.example/1",
        ]
    );
    Ok(())
}

#[tokio::test]
async fn test_filters_by_category_and_keyword() -> Result<()> {
    let (server, db) = create_test_server();
    seed(&db);

    let body: Value = server
        .get("/api/v1/articles")
        .add_query_param("category", "科技数码")
        .await
        .json();
    assert_eq!(body["pagination"]["total"], 2);
    assert_eq!(urls(&body), vec!["https://a.example/2", "https://a.example/3"]);

    let body: Value = server
        .get("/api/v1/articles")
        .add_query_param("category", "all")
        .await
        .json();
    assert_eq!(body["pagination"]["total"], 4);

    let body: Value = server
        .get("/api/v1/articles")
        .add_query_param("keyword", "rust")
        .await
        .json();
    assert_eq!(urls(&body), vec!["https://a.example/3"]);

    let body: Value = server
        .get("/api/v1/articles")
        .add_query_param("keyword", "100%")
        .await
        .json();
    assert_eq!(body["pagination"]["total"], 0);
    Ok(())
}

#[tokio::test]
async fn test_pagination() -> Result<()> {
    let (server, db) = create_test_server();
    seed(&db);

    let body: Value = server
        .get("/api/v1/articles")
        .add_query_param("sort", "latest")
        .add_query_param("page", 2)
        .add_query_param("limit", 3)
        .await
        .json();

    assert_eq!(urls(&body), vec!["https://a.example/1"]);
    assert_eq!(body["pagination"]["page"], 2);
    assert_eq!(body["pagination"]["limit"], 3);
    assert_eq!(body["pagination"]["total"], 4);
    assert_eq!(body["pagination"]["totalPages"], 2);
    Ok(())
}

#[tokio::test]
async fn test_article_json_shape() -> Result<()> {
    let (server, db) = create_test_server();
    seed(&db);

    let body: Value = server
        .get("/api/v1/articles")
        .add_query_param("limit", 1)
        .await
        .json();
    let article = &body["articles"][0];

    assert_eq!(article["title"], "理财小贴士");
    assert_eq!(article["accountName"], "测试号");
    assert_eq!(article["readCount"], 900);
    assert_eq!(article["likeCount"], 0);
    assert!(article["coverUrl"].is_null());
    assert!(article["publishedAt"].is_string());
    assert!(article["fetchedAt"].is_string());
    assert_eq!(article["keywords"], serde_json::json!([]));
    Ok(())
}

#[tokio::test]
async fn test_invalid_query_parameters() -> Result<()> {
    let (server, _db) = create_test_server();

    for (key, value) in [
        ("sort", "oldest"),
        ("page", "0"),
        ("limit", "0"),
        ("limit", "101"),
        ("limit", "-1"),
        ("page", "abc"),
    ] {
        let response = server.get("/api/v1/articles").add_query_param(key, value).await;
        response.assert_status(StatusCode::BAD_REQUEST);
        assert!(
            response.json::<Value>()["error"].is_string(),
            "{key}={value} should produce a JSON error body"
        );
    }
    Ok(())
}

#[tokio::test]
async fn test_filters_by_account_substring() -> Result<()> {
    let (server, db) = create_test_server();
    {
        let mut conn = db.lock().unwrap();
        for (i, account) in ["TechDaily", "techweekly", "健康时报"].into_iter().enumerate() {
            let mut article = test_utils::new_article(
                &format!("https://b.example/{i}"),
                "标题",
                "科技数码",
                i as i64,
                at(1, 8),
            );
            article.account_name = account.to_string();
            test_utils::insert_article(&mut conn, &article);
        }
    }

    let body: Value = server
        .get("/api/v1/articles")
        .add_query_param("account", "TECH")
        .add_query_param("sort", "latest")
        .await
        .json();
    assert_eq!(body["pagination"]["total"], 2);
    let mut found = urls(&body);
    found.sort();
    assert_eq!(found, vec!["https://b.example/0", "https://b.example/1"]);

    let body: Value = server
        .get("/api/v1/articles")
        .add_query_param("account", "Daily")
        .await
        .json();
    assert_eq!(urls(&body), vec!["https://b.example/0"]);

    let body: Value = server
        .get("/api/v1/articles")
        .add_query_param("account", "时报")
        .await
        .json();
    assert_eq!(body["pagination"]["total"], 1);
    assert_eq!(body["articles"][0]["accountName"], "健康时报");
    Ok(())
}
