use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use thiserror::Error;
use tracing::{debug, instrument};
use url::Url;

pub const DEFAULT_SEARCH_URL: &str = "https://weixin.sogou.com/weixin";

const USER_AGENT_STRING: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// What a search listing is queried for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchMode {
    /// Articles matching a search term.
    Keyword,
    /// Articles published by an account with the given display name.
    Account,
}

impl SearchMode {
    /// Numeric `type` parameter understood by the search endpoint.
    pub fn code(self) -> &'static str {
        match self {
            SearchMode::Keyword => "2",
            SearchMode::Account => "1",
        }
    }
}

impl fmt::Display for SearchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchMode::Keyword => write!(f, "keyword"),
            SearchMode::Account => write!(f, "account"),
        }
    }
}

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Invalid search URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Search returned HTTP {0}")]
    Status(StatusCode),
}

/// Retrieves the raw HTML of one search listing page.
#[async_trait]
pub trait PageFetcher: Clone + Send + Sync + 'static {
    async fn fetch_page(&self, mode: SearchMode, query: &str) -> Result<String, FetchError>;
}

/// Fetches listings from the public search endpoint. One GET per call, no retries.
#[derive(Clone)]
pub struct SearchClient {
    client: Client,
    base_url: String,
}

impl SearchClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(10))
            .user_agent(USER_AGENT_STRING)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    pub fn search_url(&self, mode: SearchMode, query: &str) -> Result<Url, FetchError> {
        let url = Url::parse_with_params(
            &self.base_url,
            &[("type", mode.code()), ("query", query), ("ie", "utf8")],
        )?;
        Ok(url)
    }
}

#[async_trait]
impl PageFetcher for SearchClient {
    #[instrument(level = "debug", skip(self, mode), fields(%mode))]
    async fn fetch_page(&self, mode: SearchMode, query: &str) -> Result<String, FetchError> {
        let url = self.search_url(mode, query)?;
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }

        let html = response.text().await?;
        debug!(bytes = html.len(), "Fetched search listing");
        Ok(html)
    }
}
