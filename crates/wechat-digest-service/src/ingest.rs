use std::time::Duration;

use chrono::Utc;
use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::AppState;
use crate::errors::ApiError;
use crate::models::{KeywordConfig, Subscription};
use crate::repositories::{ArticleRepository, KeywordRepository, SubscriptionRepository};
use crate::scrape::{self, PageFetcher, SearchMode};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestionSummary {
    pub total_fetched: usize,
    pub total_saved: usize,
    /// Number of keyword targets processed.
    pub keywords: usize,
    /// Number of subscription targets processed.
    pub subscriptions: usize,
}

#[derive(Debug, Clone, Copy)]
enum Target<'a> {
    Keyword(&'a KeywordConfig),
    Account(&'a Subscription),
}

impl Target<'_> {
    fn mode(&self) -> SearchMode {
        match self {
            Target::Keyword(_) => SearchMode::Keyword,
            Target::Account(_) => SearchMode::Account,
        }
    }

    fn query(&self) -> &str {
        match self {
            Target::Keyword(keyword) => &keyword.keyword,
            Target::Account(subscription) => &subscription.account_name,
        }
    }

    /// Category applied on first insert; account searches keep the extractor's default.
    fn category(&self) -> Option<&str> {
        match self {
            Target::Keyword(keyword) => Some(&keyword.category),
            Target::Account(_) => None,
        }
    }
}

pub struct Ingestor<'a, A, F> {
    articles: &'a A,
    fetcher: &'a F,
    delay: Duration,
}

impl<'a, A: ArticleRepository, F: PageFetcher> Ingestor<'a, A, F> {
    pub fn new(articles: &'a A, fetcher: &'a F, delay: Duration) -> Self {
        Self {
            articles,
            fetcher,
            delay,
        }
    }

    pub async fn run(
        &self,
        keywords: &[KeywordConfig],
        subscriptions: &[Subscription],
    ) -> IngestionSummary {
        let mut summary = IngestionSummary {
            keywords: keywords.len(),
            subscriptions: subscriptions.len(),
            ..Default::default()
        };

        let targets = keywords
            .iter()
            .map(Target::Keyword)
            .chain(subscriptions.iter().map(Target::Account));

        for (index, target) in targets.enumerate() {
            if index > 0 {
                tokio::time::sleep(self.delay).await;
            }

            let (fetched, saved) = self.ingest_target(target).await;
            summary.total_fetched += fetched;
            summary.total_saved += saved;
        }

        info!(
            total_fetched = summary.total_fetched,
            total_saved = summary.total_saved,
            keywords = summary.keywords,
            subscriptions = summary.subscriptions,
            "Ingestion run finished"
        );
        summary
    }

    #[instrument(skip_all, fields(mode = %target.mode(), query = target.query()))]
    async fn ingest_target(&self, target: Target<'_>) -> (usize, usize) {
        let scraped = scrape::search(self.fetcher, target.mode(), target.query()).await;
        let fetched = scraped.len();
        let mut saved = 0;

        for mut article in scraped {
            if let Some(category) = target.category() {
                article.category = category.to_string();
            }

            let new_article = article.into_new_article(Utc::now());
            match self.articles.upsert(&new_article).await {
                Ok(()) => saved += 1,
                Err(err) => {
                    warn!(url = %new_article.url, error = %err, "Failed to save article");
                }
            }
        }

        info!(fetched, saved, "Processed search target");
        (fetched, saved)
    }
}

/// Snapshots the active targets and runs the ingestion over them.
pub async fn run_ingestion<S: AppState>(state: &S) -> Result<IngestionSummary, ApiError> {
    let keywords = state.keyword_repo().list_active().await?;
    let subscriptions = state.subscription_repo().list_active().await?;

    info!(
        keywords = keywords.len(),
        subscriptions = subscriptions.len(),
        "Starting ingestion run"
    );

    let ingestor = Ingestor::new(
        state.article_repo(),
        state.fetcher(),
        state.settings().fetch_delay,
    );
    Ok(ingestor.run(&keywords, &subscriptions).await)
}
