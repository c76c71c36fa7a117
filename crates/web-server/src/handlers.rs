use crate::{AppState, error::AppError};
use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use core_types::ScoreResult;
use serde::Deserialize;
use std::sync::Arc;
use tracing::Instrument;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct LongevityRequest {
    #[serde(default)]
    pub symbol: String,
}

/// # GET /api/health
pub async fn health() -> &'static str {
    "OK"
}

/// # POST /api/calculate-longevity
/// Fetches the company snapshot and returns its longevity score.
/// Malformed bodies are answered with the same JSON error shape as every
/// other failure.
pub async fn calculate_longevity(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<LongevityRequest>, JsonRejection>,
) -> Result<Json<ScoreResult>, AppError> {
    let Json(request) = payload.map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
    let request_id = Uuid::new_v4();
    let span = tracing::info_span!("calculate_longevity", %request_id, symbol = %request.symbol);

    async move {
        let fetcher = state.fetcher.as_ref().ok_or(AppError::MissingApiKey)?;

        let symbol = request.symbol.trim();
        if symbol.is_empty() {
            return Err(AppError::BadRequest("A ticker symbol is required".to_string()));
        }

        let snapshot = fetcher.fetch_snapshot(symbol).await?;
        let result = state.engine.calculate(&snapshot);
        tracing::info!(score = result.score, "Longevity score calculated.");

        Ok::<_, AppError>(Json(result))
    }
    .instrument(span)
    .await
}
