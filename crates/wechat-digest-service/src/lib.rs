use axum::Router;
use diesel::sqlite::SqliteConnection;
use std::sync::{Arc, Mutex};

pub mod auth;
pub mod config;
pub mod db;
pub mod errors;
pub mod ingest;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod run_guard;
pub mod schema;
pub mod scrape;
#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers;

use config::Settings;
use repositories::{
    ArticleRepository, KeywordRepository, SqliteArticleRepository, SqliteKeywordRepository,
    SqliteSubscriptionRepository, SubscriptionRepository,
};
use run_guard::RunGuard;
use scrape::{PageFetcher, SearchClient};

/// Everything a request handler may touch.
pub trait AppState: Clone + Send + Sync + 'static {
    type Articles: ArticleRepository;
    type Keywords: KeywordRepository;
    type Subscriptions: SubscriptionRepository;
    type Fetcher: PageFetcher;

    fn article_repo(&self) -> &Self::Articles;
    fn keyword_repo(&self) -> &Self::Keywords;
    fn subscription_repo(&self) -> &Self::Subscriptions;
    fn fetcher(&self) -> &Self::Fetcher;
    fn settings(&self) -> &Settings;
    fn run_guard(&self) -> &RunGuard;
}

/// SQLite-backed state; the fetcher defaults to the live search client.
#[derive(Clone)]
pub struct DefaultAppState<F = SearchClient> {
    articles: SqliteArticleRepository,
    keywords: SqliteKeywordRepository,
    subscriptions: SqliteSubscriptionRepository,
    fetcher: F,
    settings: Arc<Settings>,
    run_guard: RunGuard,
}

impl DefaultAppState {
    pub fn new(
        db: Arc<Mutex<SqliteConnection>>,
        fetcher: SearchClient,
        settings: Settings,
    ) -> Self {
        Self::with_fetcher(db, fetcher, settings)
    }
}

impl<F: PageFetcher> DefaultAppState<F> {
    pub fn with_fetcher(db: Arc<Mutex<SqliteConnection>>, fetcher: F, settings: Settings) -> Self {
        Self {
            articles: SqliteArticleRepository::new(db.clone()),
            keywords: SqliteKeywordRepository::new(db.clone()),
            subscriptions: SqliteSubscriptionRepository::new(db),
            fetcher,
            settings: Arc::new(settings),
            run_guard: RunGuard::new(),
        }
    }
}

impl<F: PageFetcher> AppState for DefaultAppState<F> {
    type Articles = SqliteArticleRepository;
    type Keywords = SqliteKeywordRepository;
    type Subscriptions = SqliteSubscriptionRepository;
    type Fetcher = F;

    fn article_repo(&self) -> &Self::Articles {
        &self.articles
    }

    fn keyword_repo(&self) -> &Self::Keywords {
        &self.keywords
    }

    fn subscription_repo(&self) -> &Self::Subscriptions {
        &self.subscriptions
    }

    fn fetcher(&self) -> &Self::Fetcher {
        &self.fetcher
    }

    fn settings(&self) -> &Settings {
        &self.settings
    }

    fn run_guard(&self) -> &RunGuard {
        &self.run_guard
    }
}

pub fn create_app<S: AppState>(state: S) -> Router {
    routes::create_router().with_state(state)
}
