use crate::errors::ApiError;
use crate::models::{
    Article, KeywordConfig, KeywordConfigChanges, NewArticle, NewKeywordConfig, NewSubscription,
    Subscription, SubscriptionChanges,
};
use async_trait::async_trait;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ArticleSort {
    /// Most read first.
    #[default]
    Hot,
    /// Most recently published first.
    Latest,
}

#[derive(Debug, Clone)]
pub struct ListArticlesParams {
    /// Exact category match; `None` means every category.
    pub category: Option<String>,
    /// Case-insensitive substring of title or summary.
    pub keyword: Option<String>,
    /// Case-insensitive substring of the account name.
    pub account: Option<String>,
    pub sort: ArticleSort,
    pub offset: u32,
    pub limit: u32,
}

#[derive(Debug, Clone)]
pub struct ListArticlesResult {
    pub items: Vec<Article>,
    pub total: u64,
}

#[async_trait]
pub trait ArticleRepository: Clone + Send + Sync + 'static {
    /// Inserts the article, or refreshes only its engagement counts when the
    /// URL is already stored.
    async fn upsert(&self, article: &NewArticle) -> Result<(), ApiError>;
    async fn find_by_url(&self, url: &str) -> Result<Option<Article>, ApiError>;
    async fn list(&self, params: &ListArticlesParams) -> Result<ListArticlesResult, ApiError>;
}

#[async_trait]
pub trait KeywordRepository: Clone + Send + Sync + 'static {
    async fn list_all(&self) -> Result<Vec<KeywordConfig>, ApiError>;
    async fn list_active(&self) -> Result<Vec<KeywordConfig>, ApiError>;
    async fn create(&self, keyword: &NewKeywordConfig) -> Result<KeywordConfig, ApiError>;
    async fn update(
        &self,
        id: i32,
        changes: &KeywordConfigChanges,
    ) -> Result<Option<KeywordConfig>, ApiError>;
    /// Returns whether a row was deleted.
    async fn delete(&self, id: i32) -> Result<bool, ApiError>;
    /// Inserts `defaults` only when no keyword exists yet; returns how many were inserted.
    async fn seed_defaults(&self, defaults: &[NewKeywordConfig]) -> Result<usize, ApiError>;
}

#[async_trait]
pub trait SubscriptionRepository: Clone + Send + Sync + 'static {
    async fn list_all(&self) -> Result<Vec<Subscription>, ApiError>;
    async fn list_active(&self) -> Result<Vec<Subscription>, ApiError>;
    async fn create(&self, subscription: &NewSubscription) -> Result<Subscription, ApiError>;
    async fn update(
        &self,
        id: i32,
        changes: &SubscriptionChanges,
    ) -> Result<Option<Subscription>, ApiError>;
    async fn delete(&self, id: i32) -> Result<bool, ApiError>;
}
