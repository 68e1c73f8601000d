//! On-disk model format

use serde::{Deserialize, Serialize};

use super::estimator::Estimator;

/// Bump when the JSON layout changes incompatibly
pub const ARTIFACT_FORMAT_VERSION: u32 = 1;

/// Serialized scoring model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub format_version: u32,
    pub name: String,
    /// Column order the model was trained against
    pub columns: Vec<String>,
    /// Column transformer steps, applied in order
    pub features: Vec<FeatureSpec>,
    pub estimator: Estimator,
}

/// One column transformer step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FeatureSpec {
    /// `(x - mean) / scale`
    Numeric {
        column: String,
        #[serde(default)]
        mean: f64,
        #[serde(default = "unit_scale")]
        scale: f64,
    },
    /// One 0/1 slot per category; unknown values encode as all zeros
    OneHot {
        column: String,
        categories: Vec<String>,
    },
    Passthrough {
        column: String,
    },
}

fn unit_scale() -> f64 {
    1.0
}

impl FeatureSpec {
    pub fn column(&self) -> &str {
        match self {
            FeatureSpec::Numeric { column, .. }
            | FeatureSpec::OneHot { column, .. }
            | FeatureSpec::Passthrough { column } => column,
        }
    }

    /// Slots this step contributes to the feature vector
    pub fn width(&self) -> usize {
        match self {
            FeatureSpec::OneHot { categories, .. } => categories.len(),
            _ => 1,
        }
    }

    pub fn is_numeric(&self) -> bool {
        !matches!(self, FeatureSpec::OneHot { .. })
    }
}
