//! JSON prediction handler

use axum::{extract::{rejection::JsonRejection, State}, Json};
use serde::Serialize;
use uuid::Uuid;

use crate::{AppState, AppResult, AppError};
use crate::models::ScenarioRecord;

#[derive(Debug, Serialize)]
pub struct PredictResponse {
    pub prediction_id: Uuid,
    pub score: f64,
    pub model: String,
    pub input: ScenarioRecord,
}

/// Score one scenario record
pub async fn predict(
    State(state): State<AppState>,
    payload: Result<Json<ScenarioRecord>, JsonRejection>,
) -> AppResult<Json<PredictResponse>> {
    // Missing or malformed fields never reach the model
    let Json(record) = payload.map_err(|rejection| {
        tracing::info!("Prediction request rejected: {}", rejection.body_text());
        AppError::ValidationError(rejection.body_text())
    })?;

    let prediction = state.inference.predict(&record)?;

    Ok(Json(PredictResponse {
        prediction_id: prediction.id,
        score: prediction.score,
        model: state.inference.metadata().name.clone(),
        input: record,
    }))
}
