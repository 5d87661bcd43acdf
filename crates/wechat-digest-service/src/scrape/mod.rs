pub mod dates;
pub mod extract;
pub mod fetcher;

use chrono::Utc;
use tracing::warn;

pub use extract::{ScrapedArticle, extract_articles};
pub use fetcher::{FetchError, PageFetcher, SearchClient, SearchMode};

/// Fetches and extracts one listing. A failed fetch is logged and reported
/// as an empty listing.
pub async fn search<F: PageFetcher>(
    fetcher: &F,
    mode: SearchMode,
    query: &str,
) -> Vec<ScrapedArticle> {
    match fetcher.fetch_page(mode, query).await {
        Ok(html) => extract_articles(&html, query, Utc::now()),
        Err(err) => {
            warn!(%mode, query, error = %err, "Search fetch failed, treating as no results");
            Vec::new()
        }
    }
}
