//! Model Loader - read the artifact once, hand out the same model forever

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use once_cell::sync::OnceCell;
use sha2::{Digest, Sha256};

use super::artifact::ModelArtifact;
use super::{ModelError, Predictor, ScoringModel};

/// Owns the artifact location and the cached model.
///
/// Constructed once at startup. A failed load is not cached, so the caller
/// decides whether to retry; the server halts instead.
pub struct ModelLoader {
    path: PathBuf,
    expected_sha256: Option<String>,
    cache: OnceCell<Arc<ScoringModel>>,
}

impl ModelLoader {
    pub fn new(path: impl Into<PathBuf>, expected_sha256: Option<String>) -> Self {
        Self {
            path: path.into(),
            expected_sha256,
            cache: OnceCell::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_loaded(&self) -> bool {
        self.cache.get().is_some()
    }

    /// First call reads and validates the artifact; later calls are free
    pub fn load(&self) -> Result<Arc<ScoringModel>, ModelError> {
        self.cache
            .get_or_try_init(|| {
                read_artifact(&self.path, self.expected_sha256.as_deref()).map(Arc::new)
            })
            .cloned()
    }
}

fn read_artifact(path: &Path, expected_sha256: Option<&str>) -> Result<ScoringModel, ModelError> {
    tracing::info!("Loading model artifact from: {}", path.display());

    let bytes = fs::read(path).map_err(|e| {
        ModelError::Unavailable(format!("cannot read '{}': {}", path.display(), e))
    })?;

    let digest = hex::encode(Sha256::digest(&bytes));
    if let Some(expected) = expected_sha256 {
        if !expected.trim().eq_ignore_ascii_case(&digest) {
            return Err(ModelError::Unavailable(format!(
                "checksum mismatch for '{}': expected {}, got {}",
                path.display(),
                expected.trim(),
                digest
            )));
        }
    }

    let artifact: ModelArtifact = serde_json::from_slice(&bytes).map_err(|e| {
        ModelError::Unavailable(format!("corrupt artifact '{}': {}", path.display(), e))
    })?;

    let model = ScoringModel::from_artifact(artifact, path, digest)?;

    let meta = model.metadata();
    tracing::info!(
        name = %meta.name,
        estimator = meta.estimator,
        features = meta.feature_width,
        sha256 = %meta.sha256,
        "Model loaded successfully"
    );

    Ok(model)
}
