use axum::{
    extract::{Json, Path, State},
    response::Json as ResponseJson,
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::{debug, info, instrument};

use crate::AppState;
use crate::auth::AdminAuth;
use crate::errors::ApiError;
use crate::models::{KeywordConfig, KeywordConfigChanges, NewKeywordConfig};
use crate::repositories::KeywordRepository;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct CreateKeywordRequest {
    keyword: Option<String>,
    category: Option<String>,
    is_active: Option<bool>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct UpdateKeywordRequest {
    keyword: Option<String>,
    category: Option<String>,
    is_active: Option<bool>,
}

#[derive(Debug, Serialize)]
pub(super) struct KeywordListResponse {
    keywords: Vec<KeywordConfig>,
}

#[derive(Debug, Serialize)]
pub(super) struct KeywordResponse {
    keyword: KeywordConfig,
}

fn required(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[instrument(skip_all)]
pub(super) async fn list_keywords<S: AppState>(
    State(state): State<S>,
) -> Result<ResponseJson<KeywordListResponse>, ApiError> {
    let keywords = state.keyword_repo().list_all().await?;
    debug!(count = keywords.len(), "Listed keywords");
    Ok(ResponseJson(KeywordListResponse { keywords }))
}

#[instrument(skip_all, fields(keyword = ?payload.keyword, category = ?payload.category))]
pub(super) async fn create_keyword<S: AppState>(
    _auth: AdminAuth,
    State(state): State<S>,
    Json(payload): Json<CreateKeywordRequest>,
) -> Result<ResponseJson<KeywordResponse>, ApiError> {
    let (Some(keyword), Some(category)) = (required(payload.keyword), required(payload.category))
    else {
        return Err(ApiError::BadRequest(
            "keyword and category are required".to_string(),
        ));
    };

    let new_keyword = NewKeywordConfig {
        keyword,
        category,
        is_active: payload.is_active.unwrap_or(true),
    };

    let created = state.keyword_repo().create(&new_keyword).await?;
    info!(id = created.id, "Created keyword");
    Ok(ResponseJson(KeywordResponse { keyword: created }))
}

#[instrument(skip_all, fields(id = %id))]
pub(super) async fn update_keyword<S: AppState>(
    _auth: AdminAuth,
    State(state): State<S>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateKeywordRequest>,
) -> Result<ResponseJson<KeywordResponse>, ApiError> {
    let changes = KeywordConfigChanges {
        keyword: required(payload.keyword),
        category: required(payload.category),
        is_active: payload.is_active,
    };

    match state.keyword_repo().update(id, &changes).await? {
        Some(updated) => {
            info!(id = updated.id, "Updated keyword");
            Ok(ResponseJson(KeywordResponse { keyword: updated }))
        }
        None => Err(ApiError::NotFound),
    }
}

#[instrument(skip_all, fields(id = %id))]
pub(super) async fn delete_keyword<S: AppState>(
    _auth: AdminAuth,
    State(state): State<S>,
    Path(id): Path<i32>,
) -> Result<ResponseJson<Value>, ApiError> {
    if !state.keyword_repo().delete(id).await? {
        return Err(ApiError::NotFound);
    }

    info!("Deleted keyword");
    Ok(ResponseJson(json!({ "success": true })))
}
