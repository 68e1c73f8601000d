//! Column transformer: frame rows → dense feature vectors

use crate::models::{is_categorical, Cell, ScenarioFrame, SCENARIO_COLUMNS};

use super::artifact::FeatureSpec;
use super::ModelError;

#[derive(Debug, Clone)]
pub struct FeatureEncoder {
    specs: Vec<FeatureSpec>,
    width: usize,
}

impl FeatureEncoder {
    /// Check every step against the record schema
    pub fn new(specs: Vec<FeatureSpec>) -> Result<Self, ModelError> {
        for spec in &specs {
            let column = spec.column();
            if !SCENARIO_COLUMNS.contains(&column) {
                return Err(ModelError::SchemaMismatch(format!(
                    "feature references unknown column '{}'",
                    column
                )));
            }
            if spec.is_numeric() && is_categorical(column) {
                return Err(ModelError::SchemaMismatch(format!(
                    "categorical column '{}' cannot be encoded as a number",
                    column
                )));
            }
            if let FeatureSpec::Numeric { mean, scale, .. } = spec {
                if !mean.is_finite() || !scale.is_finite() {
                    return Err(ModelError::Unavailable(format!(
                        "non-finite scaling for column '{}'",
                        column
                    )));
                }
            }
        }

        let width: usize = specs.iter().map(FeatureSpec::width).sum();
        if width == 0 {
            return Err(ModelError::Unavailable("model encodes zero features".to_string()));
        }

        Ok(Self { specs, width })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// Encode every row. Columns are looked up by name.
    pub fn encode(&self, frame: &ScenarioFrame) -> Result<Vec<Vec<f64>>, ModelError> {
        let indices = self
            .specs
            .iter()
            .map(|spec| {
                frame.column_index(spec.column()).ok_or_else(|| {
                    ModelError::SchemaMismatch(format!("frame has no column '{}'", spec.column()))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        frame
            .rows()
            .iter()
            .map(|row| {
                let mut out = Vec::with_capacity(self.width);
                for (spec, &idx) in self.specs.iter().zip(&indices) {
                    let cell = row.get(idx).copied().ok_or_else(|| {
                        ModelError::SchemaMismatch(format!(
                            "row has no value for column '{}'",
                            spec.column()
                        ))
                    })?;
                    encode_cell(spec, cell, &mut out)?;
                }
                Ok(out)
            })
            .collect()
    }
}

fn encode_cell(spec: &FeatureSpec, cell: Cell, out: &mut Vec<f64>) -> Result<(), ModelError> {
    match spec {
        FeatureSpec::Numeric { column, mean, scale } => {
            let value = numeric(column, cell)?;
            // zero variance columns are left unscaled
            let scale = if *scale == 0.0 { 1.0 } else { *scale };
            out.push((value - mean) / scale);
        }
        FeatureSpec::Passthrough { column } => {
            out.push(numeric(column, cell)?);
        }
        FeatureSpec::OneHot { categories, .. } => {
            let label = match cell {
                Cell::Category(s) => s.to_string(),
                Cell::Integer(i) => i.to_string(),
            };
            out.extend(
                categories
                    .iter()
                    .map(|c| if *c == label { 1.0 } else { 0.0 }),
            );
        }
    }
    Ok(())
}

fn numeric(column: &str, cell: Cell) -> Result<f64, ModelError> {
    match cell {
        Cell::Integer(i) => Ok(i as f64),
        Cell::Category(s) => Err(ModelError::Encoding(format!(
            "column '{}' expects a number, got '{}'",
            column, s
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ScenarioRecord;

    fn one_hot(column: &str, categories: &[&str]) -> FeatureSpec {
        FeatureSpec::OneHot {
            column: column.to_string(),
            categories: categories.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn default_frame() -> ScenarioFrame {
        ScenarioFrame::single(&ScenarioRecord::default())
    }

    #[test]
    fn test_numeric_scaling() {
        let encoder = FeatureEncoder::new(vec![FeatureSpec::Numeric {
            column: "Driver_Age".into(),
            mean: 40.0,
            scale: 5.0,
        }])
        .unwrap();
        let rows = encoder.encode(&default_frame()).unwrap();
        assert_eq!(rows, vec![vec![-2.0]]);
    }

    #[test]
    fn test_zero_scale_treated_as_one() {
        let encoder = FeatureEncoder::new(vec![FeatureSpec::Numeric {
            column: "Speed_Limit".into(),
            mean: 50.0,
            scale: 0.0,
        }])
        .unwrap();
        assert_eq!(encoder.encode(&default_frame()).unwrap(), vec![vec![10.0]]);
    }

    #[test]
    fn test_one_hot_and_unknown() {
        let encoder = FeatureEncoder::new(vec![
            one_hot("Weather", &["Clear", "Rain"]),
            one_hot("Road_Type", &["Rural", "Urban"]),
        ])
        .unwrap();
        assert_eq!(encoder.width(), 4);
        // Weather=Clear hits slot 0, Road_Type=Highway is unknown → zeros
        let rows = encoder.encode(&default_frame()).unwrap();
        assert_eq!(rows, vec![vec![1.0, 0.0, 0.0, 0.0]]);
    }

    #[test]
    fn test_one_hot_integer_column() {
        let encoder = FeatureEncoder::new(vec![one_hot("Traffic_Density", &["1", "2", "3"])]).unwrap();
        assert_eq!(encoder.encode(&default_frame()).unwrap(), vec![vec![1.0, 0.0, 0.0]]);
    }

    #[test]
    fn test_passthrough() {
        let encoder = FeatureEncoder::new(vec![FeatureSpec::Passthrough {
            column: "Number_of_Vehicles".into(),
        }])
        .unwrap();
        assert_eq!(encoder.encode(&default_frame()).unwrap(), vec![vec![1.0]]);
    }

    #[test]
    fn test_rejects_unknown_column() {
        let err = FeatureEncoder::new(vec![FeatureSpec::Passthrough { column: "Mood".into() }])
            .unwrap_err();
        assert!(matches!(err, ModelError::SchemaMismatch(_)));
    }

    #[test]
    fn test_rejects_numeric_categorical() {
        let err = FeatureEncoder::new(vec![FeatureSpec::Numeric {
            column: "Weather".into(),
            mean: 0.0,
            scale: 1.0,
        }])
        .unwrap_err();
        assert!(matches!(err, ModelError::SchemaMismatch(_)));
    }

    #[test]
    fn test_rejects_empty() {
        assert!(FeatureEncoder::new(vec![]).is_err());
        assert!(FeatureEncoder::new(vec![one_hot("Weather", &[])]).is_err());
    }
}
