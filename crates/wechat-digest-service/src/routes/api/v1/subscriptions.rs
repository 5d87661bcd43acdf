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
use crate::models::{NewSubscription, Subscription, SubscriptionChanges};
use crate::repositories::SubscriptionRepository;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct SubscriptionRequest {
    account_name: Option<String>,
    account_id: Option<String>,
    is_active: Option<bool>,
}

#[derive(Debug, Serialize)]
pub(super) struct SubscriptionListResponse {
    subscriptions: Vec<Subscription>,
}

#[derive(Debug, Serialize)]
pub(super) struct SubscriptionResponse {
    subscription: Subscription,
}

fn trimmed(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[instrument(skip_all)]
pub(super) async fn list_subscriptions<S: AppState>(
    State(state): State<S>,
) -> Result<ResponseJson<SubscriptionListResponse>, ApiError> {
    let subscriptions = state.subscription_repo().list_all().await?;
    debug!(count = subscriptions.len(), "Listed subscriptions");
    Ok(ResponseJson(SubscriptionListResponse { subscriptions }))
}

#[instrument(skip_all, fields(account_name = ?payload.account_name))]
pub(super) async fn create_subscription<S: AppState>(
    _auth: AdminAuth,
    State(state): State<S>,
    Json(payload): Json<SubscriptionRequest>,
) -> Result<ResponseJson<SubscriptionResponse>, ApiError> {
    let Some(account_name) = trimmed(payload.account_name) else {
        return Err(ApiError::BadRequest("accountName is required".to_string()));
    };

    let new_subscription = NewSubscription {
        account_name,
        account_id: trimmed(payload.account_id),
        is_active: payload.is_active.unwrap_or(true),
    };

    let created = state.subscription_repo().create(&new_subscription).await?;
    info!(id = created.id, "Created subscription");
    Ok(ResponseJson(SubscriptionResponse {
        subscription: created,
    }))
}

#[instrument(skip_all, fields(id = %id))]
pub(super) async fn update_subscription<S: AppState>(
    _auth: AdminAuth,
    State(state): State<S>,
    Path(id): Path<i32>,
    Json(payload): Json<SubscriptionRequest>,
) -> Result<ResponseJson<SubscriptionResponse>, ApiError> {
    let changes = SubscriptionChanges {
        account_name: trimmed(payload.account_name),
        account_id: trimmed(payload.account_id),
        is_active: payload.is_active,
    };

    let updated = state
        .subscription_repo()
        .update(id, &changes)
        .await?
        .ok_or(ApiError::NotFound)?;

    info!("Updated subscription");
    Ok(ResponseJson(SubscriptionResponse {
        subscription: updated,
    }))
}

#[instrument(skip_all, fields(id = %id))]
pub(super) async fn delete_subscription<S: AppState>(
    _auth: AdminAuth,
    State(state): State<S>,
    Path(id): Path<i32>,
) -> Result<ResponseJson<Value>, ApiError> {
    if !state.subscription_repo().delete(id).await? {
        return Err(ApiError::NotFound);
    }

    info!("Deleted subscription");
    Ok(ResponseJson(json!({ "success": true })))
}
