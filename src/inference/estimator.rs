//! Estimators over encoded feature vectors

use serde::{Deserialize, Serialize};

use super::ModelError;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Estimator {
    Linear(LinearModel),
    TreeEnsemble(TreeEnsemble),
}

impl Estimator {
    pub fn kind(&self) -> &'static str {
        match self {
            Estimator::Linear(_) => "linear",
            Estimator::TreeEnsemble(_) => "tree_ensemble",
        }
    }

    /// Structural checks against the encoded width. After this passes,
    /// `predict_row` cannot index out of bounds or loop.
    pub fn validate(&self, width: usize) -> Result<(), ModelError> {
        match self {
            Estimator::Linear(m) => m.validate(width),
            Estimator::TreeEnsemble(e) => e.validate(width),
        }
    }

    pub fn predict_row(&self, x: &[f64]) -> f64 {
        match self {
            Estimator::Linear(m) => m.predict_row(x),
            Estimator::TreeEnsemble(e) => e.predict_row(x),
        }
    }
}

// ============================================================================
// LINEAR
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearModel {
    pub intercept: f64,
    pub coefficients: Vec<f64>,
}

impl LinearModel {
    fn validate(&self, width: usize) -> Result<(), ModelError> {
        if self.coefficients.len() != width {
            return Err(ModelError::Unavailable(format!(
                "linear model has {} coefficients for {} features",
                self.coefficients.len(),
                width
            )));
        }
        if !self.intercept.is_finite() || self.coefficients.iter().any(|c| !c.is_finite()) {
            return Err(ModelError::Unavailable("linear model has non-finite weights".to_string()));
        }
        Ok(())
    }

    fn predict_row(&self, x: &[f64]) -> f64 {
        self.intercept
            + self
                .coefficients
                .iter()
                .zip(x)
                .map(|(c, v)| c * v)
                .sum::<f64>()
    }
}

// ============================================================================
// TREE ENSEMBLE
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Aggregation {
    /// Random forest style
    Mean,
    /// Boosting style
    Sum,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeEnsemble {
    pub aggregation: Aggregation,
    #[serde(default)]
    pub base_score: f64,
    pub trees: Vec<Tree>,
}

impl TreeEnsemble {
    fn validate(&self, width: usize) -> Result<(), ModelError> {
        if self.trees.is_empty() {
            return Err(ModelError::Unavailable("tree ensemble has no trees".to_string()));
        }
        if !self.base_score.is_finite() {
            return Err(ModelError::Unavailable("non-finite base_score".to_string()));
        }
        for (i, tree) in self.trees.iter().enumerate() {
            tree.validate(width)
                .map_err(|msg| ModelError::Unavailable(format!("tree {}: {}", i, msg)))?;
        }
        Ok(())
    }

    fn predict_row(&self, x: &[f64]) -> f64 {
        let total: f64 = self.trees.iter().map(|t| t.predict_row(x)).sum();
        let combined = match self.aggregation {
            Aggregation::Mean => total / self.trees.len() as f64,
            Aggregation::Sum => total,
        };
        self.base_score + combined
    }
}

/// Flat node array, root at index 0
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tree {
    pub nodes: Vec<Node>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Node {
    /// Go left when `x[feature] <= threshold`
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        value: f64,
    },
}

impl Tree {
    fn validate(&self, width: usize) -> Result<(), String> {
        if self.nodes.is_empty() {
            return Err("empty tree".to_string());
        }
        let n = self.nodes.len();
        for (idx, node) in self.nodes.iter().enumerate() {
            match *node {
                Node::Split { feature, threshold, left, right } => {
                    if feature >= width {
                        return Err(format!("node {} splits on feature {} of {}", idx, feature, width));
                    }
                    if !threshold.is_finite() {
                        return Err(format!("node {} has non-finite threshold", idx));
                    }
                    // children strictly after the parent: no cycles
                    for child in [left, right] {
                        if child <= idx || child >= n {
                            return Err(format!("node {} has invalid child {}", idx, child));
                        }
                    }
                }
                Node::Leaf { value } => {
                    if !value.is_finite() {
                        return Err(format!("node {} has non-finite leaf", idx));
                    }
                }
            }
        }
        Ok(())
    }

    fn predict_row(&self, x: &[f64]) -> f64 {
        let mut idx = 0;
        loop {
            match self.nodes[idx] {
                Node::Leaf { value } => return value,
                Node::Split { feature, threshold, left, right } => {
                    idx = if x[feature] <= threshold { left } else { right };
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stump(feature: usize, threshold: f64, low: f64, high: f64) -> Tree {
        Tree {
            nodes: vec![
                Node::Split { feature, threshold, left: 1, right: 2 },
                Node::Leaf { value: low },
                Node::Leaf { value: high },
            ],
        }
    }

    #[test]
    fn test_linear_predict() {
        let model = Estimator::Linear(LinearModel {
            intercept: 1.0,
            coefficients: vec![2.0, -0.5],
        });
        model.validate(2).unwrap();
        assert_eq!(model.predict_row(&[3.0, 4.0]), 5.0);
    }

    #[test]
    fn test_linear_width_mismatch() {
        let model = Estimator::Linear(LinearModel { intercept: 0.0, coefficients: vec![1.0] });
        assert!(model.validate(2).is_err());
    }

    #[test]
    fn test_tree_traversal_left_on_equal() {
        let tree = stump(0, 0.5, -1.0, 1.0);
        tree.validate(1).unwrap();
        assert_eq!(tree.predict_row(&[0.5]), -1.0);
        assert_eq!(tree.predict_row(&[0.6]), 1.0);
    }

    #[test]
    fn test_ensemble_mean_and_sum() {
        let trees = vec![stump(0, 0.5, 1.0, 3.0), stump(1, 0.5, 2.0, 4.0)];
        let mean = TreeEnsemble { aggregation: Aggregation::Mean, base_score: 0.0, trees: trees.clone() };
        let sum = TreeEnsemble { aggregation: Aggregation::Sum, base_score: 0.5, trees };

        // x = [1, 0] → leaves 3.0 and 2.0
        assert_eq!(mean.predict_row(&[1.0, 0.0]), 2.5);
        assert_eq!(sum.predict_row(&[1.0, 0.0]), 5.5);
    }

    #[test]
    fn test_rejects_cycles_and_bad_features() {
        let cyclic = Tree {
            nodes: vec![
                Node::Split { feature: 0, threshold: 0.0, left: 0, right: 1 },
                Node::Leaf { value: 1.0 },
            ],
        };
        assert!(cyclic.validate(1).is_err());

        let out_of_range = stump(3, 0.0, 0.0, 1.0);
        assert!(out_of_range.validate(2).is_err());

        let empty = TreeEnsemble { aggregation: Aggregation::Sum, base_score: 0.0, trees: vec![] };
        assert!(empty.validate(1).is_err());
    }

    #[test]
    fn test_deserialize_tree_ensemble() {
        let json = r#"{
            "type": "tree_ensemble",
            "aggregation": "mean",
            "trees": [
                {"nodes": [
                    {"feature": 0, "threshold": 1.5, "left": 1, "right": 2},
                    {"value": 0.25},
                    {"value": 0.75}
                ]}
            ]
        }"#;
        let estimator: Estimator = serde_json::from_str(json).unwrap();
        assert_eq!(estimator.kind(), "tree_ensemble");
        estimator.validate(1).unwrap();
        assert_eq!(estimator.predict_row(&[2.0]), 0.75);
    }
}
