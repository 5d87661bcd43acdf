use axum::{
    extract::{Query, State, rejection::QueryRejection},
    response::Json as ResponseJson,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::AppState;
use crate::errors::ApiError;
use crate::models::Article;
use crate::repositories::{ArticleRepository, ArticleSort, ListArticlesParams};

const DEFAULT_LIMIT: u32 = 20;
const MAX_LIMIT: u32 = 100;

#[derive(Debug, Deserialize)]
pub(super) struct ListArticlesQuery {
    category: Option<String>,
    keyword: Option<String>,
    account: Option<String>,
    sort: Option<String>,
    page: Option<u32>,
    limit: Option<u32>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Pagination {
    page: u32,
    limit: u32,
    total: u64,
    total_pages: u64,
}

#[derive(Debug, Serialize)]
pub(super) struct ListArticlesResponse {
    articles: Vec<Article>,
    pagination: Pagination,
}

fn parse_sort(sort: Option<&str>) -> Result<ArticleSort, ApiError> {
    match sort {
        None | Some("hot") => Ok(ArticleSort::Hot),
        Some("latest") => Ok(ArticleSort::Latest),
        Some(other) => Err(ApiError::BadRequest(format!(
            "Invalid sort '{other}', expected 'hot' or 'latest'"
        ))),
    }
}

// Blank filters are ignored, and the "all" category means no category filter.
fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[instrument(skip_all)]
pub(super) async fn list_articles<S: AppState>(
    State(state): State<S>,
    query: Result<Query<ListArticlesQuery>, QueryRejection>,
) -> Result<ResponseJson<ListArticlesResponse>, ApiError> {
    let Query(query) = query.map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
    debug!(
        category = ?query.category,
        sort = ?query.sort,
        page = query.page,
        limit = query.limit,
        "Processing list articles request"
    );

    let sort = parse_sort(query.sort.as_deref())?;

    let page = query.page.unwrap_or(1);
    if page == 0 {
        return Err(ApiError::BadRequest("Page must be at least 1".to_string()));
    }

    let limit = query.limit.unwrap_or(DEFAULT_LIMIT);
    if limit == 0 || limit > MAX_LIMIT {
        return Err(ApiError::BadRequest(format!(
            "Limit must be between 1 and {MAX_LIMIT}"
        )));
    }

    let offset = (page - 1).checked_mul(limit).ok_or_else(|| {
        ApiError::BadRequest("Page is out of range".to_string())
    })?;

    let params = ListArticlesParams {
        category: non_blank(query.category).filter(|c| c != "all"),
        keyword: non_blank(query.keyword),
        account: non_blank(query.account),
        sort,
        offset,
        limit,
    };

    let result = state.article_repo().list(&params).await?;

    let response = ListArticlesResponse {
        pagination: Pagination {
            page,
            limit,
            total: result.total,
            total_pages: result.total.div_ceil(u64::from(limit)),
        },
        articles: result.items,
    };

    info!(
        returned_count = response.articles.len(),
        total = response.pagination.total,
        "Successfully retrieved article list"
    );

    Ok(ResponseJson(response))
}
