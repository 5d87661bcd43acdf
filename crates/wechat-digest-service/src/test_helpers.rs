use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use reqwest::StatusCode;
use tokio::time::Instant;

use crate::auth::Secret;
use crate::config::Settings;
use crate::db;
use crate::scrape::{FetchError, PageFetcher, SearchMode};

pub const TEST_ADMIN_PASSWORD: &str = "hunter2";
pub const TEST_CRON_SECRET: &str = "cron-secret";

pub fn establish_test_connection() -> SqliteConnection {
    let mut connection =
        SqliteConnection::establish(":memory:").expect("Failed to create in-memory database");

    db::run_migrations(&mut connection).expect("Failed to run migrations");

    connection
}

/// Admin writes enabled, trigger open, no pause between searches.
pub fn test_settings() -> Settings {
    Settings {
        cron_secret: None,
        admin_password: Some(Secret::new(TEST_ADMIN_PASSWORD)),
        fetch_delay: Duration::ZERO,
    }
}

#[derive(Debug, Clone)]
enum StubPage {
    Html(String),
    Failure(StatusCode),
}

/// Serves canned listing pages and records every request it receives.
///
/// Queries without a registered page get an empty listing.
#[derive(Clone, Default)]
pub struct StubFetcher {
    pages: Arc<Mutex<HashMap<(SearchMode, String), StubPage>>>,
    calls: Arc<Mutex<Vec<(SearchMode, String, Instant)>>>,
}

impl StubFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(self, mode: SearchMode, query: &str, html: impl Into<String>) -> Self {
        self.set_page(mode, query, html);
        self
    }

    pub fn with_failure(self, mode: SearchMode, query: &str, status: StatusCode) -> Self {
        self.pages
            .lock()
            .unwrap()
            .insert((mode, query.to_string()), StubPage::Failure(status));
        self
    }

    /// Replaces the page served for `query`, also after the state was built.
    pub fn set_page(&self, mode: SearchMode, query: &str, html: impl Into<String>) {
        self.pages
            .lock()
            .unwrap()
            .insert((mode, query.to_string()), StubPage::Html(html.into()));
    }

    pub fn calls(&self) -> Vec<(SearchMode, String)> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(mode, query, _)| (*mode, query.clone()))
            .collect()
    }

    pub fn call_instants(&self) -> Vec<Instant> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(_, _, at)| *at)
            .collect()
    }
}

#[async_trait]
impl PageFetcher for StubFetcher {
    async fn fetch_page(&self, mode: SearchMode, query: &str) -> Result<String, FetchError> {
        self.calls
            .lock()
            .unwrap()
            .push((mode, query.to_string(), Instant::now()));

        let page = self.pages.lock().unwrap().get(&(mode, query.to_string())).cloned();
        match page {
            Some(StubPage::Html(html)) => Ok(html),
            Some(StubPage::Failure(status)) => Err(FetchError::Status(status)),
            None => Ok(listing_page(&[])),
        }
    }
}

/// One search result in the listing markup the extractor understands.
pub fn listing_item(url: &str, title: &str, account: &str, date: &str) -> String {
    format!(
        r#"<li>
  <div class="txt-box">
    <h3><a href="{url}">{title}</a></h3>
    <p class="txt-info">{title} summary</p>
    <div class="s-p"><a class="account">{account}</a><span class="s2">{date}</span></div>
  </div>
</li>"#
    )
}

pub fn listing_page(items: &[String]) -> String {
    format!(
        r#"<html><body><div class="news-box"><ul class="news-list">{}</ul></div></body></html>"#,
        items.concat()
    )
}

pub mod test_utils {
    use super::*;
    use crate::models::{Article, Keywords, NewArticle};
    use crate::schema::articles;
    use chrono::NaiveDateTime;

    pub fn count_articles(conn: &mut SqliteConnection) -> i64 {
        articles::table
            .count()
            .get_result(conn)
            .expect("Failed to count articles")
    }

    pub fn get_all_articles(conn: &mut SqliteConnection) -> Vec<Article> {
        articles::table
            .select(Article::as_select())
            .order_by(articles::id.asc())
            .load(conn)
            .expect("Failed to load articles")
    }

    pub fn get_article_by_url(conn: &mut SqliteConnection, url: &str) -> Option<Article> {
        articles::table
            .filter(articles::url.eq(url))
            .select(Article::as_select())
            .first(conn)
            .optional()
            .expect("Failed to query article by URL")
    }

    /// A stored-article row with engagement counts and a publish time.
    pub fn new_article(
        url: &str,
        title: &str,
        category: &str,
        read_count: i64,
        published_at: NaiveDateTime,
    ) -> NewArticle {
        NewArticle {
            url: url.to_string(),
            title: title.to_string(),
            summary: format!("{title} summary"),
            cover_url: None,
            account_name: "测试号".to_string(),
            read_count,
            like_count: 0,
            published_at,
            fetched_at: published_at,
            category: category.to_string(),
            keywords: Keywords::default(),
        }
    }

    pub fn insert_article(conn: &mut SqliteConnection, article: &NewArticle) {
        diesel::insert_into(articles::table)
            .values(article)
            .execute(conn)
            .expect("Failed to insert article");
    }
}
