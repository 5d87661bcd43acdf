use crate::AppState;
use crate::errors::ApiError;
use axum::Router;

pub mod v1;

async fn unknown_endpoint() -> ApiError {
    ApiError::NotFound
}

/// Versioned JSON API. Unknown paths answer with the JSON error body.
pub fn create_api_router<S: AppState>() -> Router<S> {
    Router::new()
        .nest("/v1", v1::create_api_v1_router())
        .fallback(unknown_endpoint)
}
