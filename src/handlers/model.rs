//! Model description handler

use axum::{extract::State, Json};
use serde::Serialize;

use crate::AppState;
use crate::inference::ModelMetadata;
use crate::models::SchemaInfo;

#[derive(Serialize)]
pub struct ModelInfoResponse {
    model: ModelMetadata,
    schema: SchemaInfo,
}

/// Loaded model metadata plus the record layout it was checked against
pub async fn info(State(state): State<AppState>) -> Json<ModelInfoResponse> {
    Json(ModelInfoResponse {
        model: state.inference.metadata().clone(),
        schema: SchemaInfo::current(),
    })
}
