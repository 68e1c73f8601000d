//! Inference Request Handler - record in, score out

use std::sync::Arc;

use serde::Serialize;
use uuid::Uuid;
use validator::Validate;

use crate::error::AppResult;
use crate::models::{ScenarioFrame, ScenarioRecord};

use super::{ModelError, ModelMetadata, Predictor};

/// Stateless over a shared read-only predictor
#[derive(Clone)]
pub struct InferenceService {
    predictor: Arc<dyn Predictor>,
}

/// One scored submission
#[derive(Debug, Clone, Serialize)]
pub struct Prediction {
    pub id: Uuid,
    pub score: f64,
}

impl InferenceService {
    pub fn new(predictor: Arc<dyn Predictor>) -> Self {
        Self { predictor }
    }

    pub fn metadata(&self) -> &ModelMetadata {
        self.predictor.metadata()
    }

    /// Validate, frame, predict, take the first score.
    ///
    /// The raw value is returned; rounding is left to the view.
    pub fn score(&self, record: &ScenarioRecord) -> AppResult<f64> {
        record.validate()?;

        let frame = ScenarioFrame::single(record);
        let scores = self.predictor.predict(&frame)?;

        // single-row frame: anything past the first element is ignored
        let score = scores.first().copied().ok_or(ModelError::EmptyPrediction)?;
        Ok(score)
    }

    /// `score` with a fresh prediction id for log correlation
    pub fn predict(&self, record: &ScenarioRecord) -> AppResult<Prediction> {
        let id = Uuid::new_v4();
        let span = tracing::debug_span!("prediction", prediction_id = %id);
        let _guard = span.enter();

        let score = self.score(record)?;
        tracing::debug!(score, "Prediction complete");

        Ok(Prediction { id, score })
    }
}
