//! Inference - model loading and scoring
//!
//! The model is data only (JSON). Nothing executable is deserialized.
//! Swap the scorer by implementing [`Predictor`].

pub mod artifact;
pub mod encoder;
pub mod estimator;
pub mod loader;
pub mod service;

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use crate::models::{ScenarioFrame, SCENARIO_COLUMNS};
use artifact::{ModelArtifact, ARTIFACT_FORMAT_VERSION};
use encoder::FeatureEncoder;
use estimator::Estimator;

pub use loader::ModelLoader;
pub use service::{InferenceService, Prediction};

// ============================================================================
// ERROR HANDLING
// ============================================================================

#[derive(Debug, Error)]
pub enum ModelError {
    /// Artifact missing, unreadable, corrupt or structurally invalid
    #[error("model unavailable: {0}")]
    Unavailable(String),

    #[error("schema mismatch: {0}")]
    SchemaMismatch(String),

    #[error("model returned no prediction")]
    EmptyPrediction,

    #[error("encoding failed: {0}")]
    Encoding(String),
}

// ============================================================================
// PREDICTOR TRAIT
// ============================================================================

/// Anything that scores a frame. One score per row.
pub trait Predictor: Send + Sync {
    fn predict(&self, frame: &ScenarioFrame) -> Result<Vec<f64>, ModelError>;

    fn metadata(&self) -> &ModelMetadata;
}

/// Recorded at load time, served by `/api/v1/model` and `/health`
#[derive(Debug, Clone, Serialize)]
pub struct ModelMetadata {
    pub name: String,
    pub path: String,
    pub sha256: String,
    pub estimator: &'static str,
    pub feature_width: usize,
    pub loaded_at: DateTime<Utc>,
}

// ============================================================================
// SCORING MODEL
// ============================================================================

/// Column transformer followed by an estimator
#[derive(Debug)]
pub struct ScoringModel {
    metadata: ModelMetadata,
    encoder: FeatureEncoder,
    estimator: Estimator,
}

impl ScoringModel {
    /// Validate an artifact's structure and build a ready-to-use model
    pub fn from_artifact(
        artifact: ModelArtifact,
        path: &Path,
        sha256: String,
    ) -> Result<Self, ModelError> {
        if artifact.format_version != ARTIFACT_FORMAT_VERSION {
            return Err(ModelError::Unavailable(format!(
                "unsupported artifact format version {} (expected {})",
                artifact.format_version, ARTIFACT_FORMAT_VERSION
            )));
        }

        if artifact.columns.len() != SCENARIO_COLUMNS.len()
            || artifact.columns.iter().zip(SCENARIO_COLUMNS).any(|(a, b)| a != b)
        {
            return Err(ModelError::SchemaMismatch(format!(
                "artifact columns {:?} do not match record columns {:?}",
                artifact.columns, SCENARIO_COLUMNS
            )));
        }

        let encoder = FeatureEncoder::new(artifact.features)?;
        artifact.estimator.validate(encoder.width())?;

        let metadata = ModelMetadata {
            name: artifact.name,
            path: path.display().to_string(),
            sha256,
            estimator: artifact.estimator.kind(),
            feature_width: encoder.width(),
            loaded_at: Utc::now(),
        };

        Ok(Self {
            metadata,
            encoder,
            estimator: artifact.estimator,
        })
    }
}

impl Predictor for ScoringModel {
    fn predict(&self, frame: &ScenarioFrame) -> Result<Vec<f64>, ModelError> {
        let encoded = self.encoder.encode(frame)?;
        Ok(encoded
            .iter()
            .map(|x| self.estimator.predict_row(x))
            .collect())
    }

    fn metadata(&self) -> &ModelMetadata {
        &self.metadata
    }
}

/// Path of the artifact shipped in this repository
#[cfg(test)]
pub(crate) fn bundled_artifact_path() -> std::path::PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("artifacts")
        .join("best_climate_accident_model.json")
}
