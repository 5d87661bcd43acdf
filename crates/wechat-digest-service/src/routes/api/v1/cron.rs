use axum::{extract::State, response::Json as ResponseJson};
use serde::Serialize;
use tracing::{info, instrument};

use crate::AppState;
use crate::auth::CronAuth;
use crate::errors::ApiError;
use crate::ingest::{self, IngestionSummary};

#[derive(Debug, Serialize)]
pub(super) struct TriggerFetchResponse {
    success: bool,
    #[serde(flatten)]
    summary: IngestionSummary,
}

/// Runs one ingestion pass and reports its totals. Only one pass runs at a time.
#[instrument(skip_all)]
pub(super) async fn trigger_fetch<S: AppState>(
    _auth: CronAuth,
    State(state): State<S>,
) -> Result<ResponseJson<TriggerFetchResponse>, ApiError> {
    let _permit = state.run_guard().try_start()?;
    info!("Ingestion triggered");

    let summary = ingest::run_ingestion(&state).await?;

    Ok(ResponseJson(TriggerFetchResponse {
        success: true,
        summary,
    }))
}
