use crate::domain::errors::{ArtifactError, ForecastError};
use crate::domain::feature_registry;
use crate::domain::ports::ProbabilityModel;
use crate::domain::types::FeatureVector;
use smartcore::ensemble::random_forest_regressor::RandomForestRegressor;
use smartcore::linalg::basic::matrix::DenseMatrix;
use std::fs::File;
use std::path::Path;
use tracing::info;

/// Tabular classifier adapter: a tree-ensemble regressor trained on 0/1
/// margin-call outcomes, deserialized once at startup and immutable
/// thereafter. Output is the calibrated probability of a call.
#[derive(Debug)]
pub struct TabularPredictor {
    model: RandomForestRegressor<f64, f64, DenseMatrix<f64>, Vec<f64>>,
}

impl TabularPredictor {
    /// Loads the serialized model. A missing or corrupt artifact is fatal;
    /// there is no neutral-probability fallback.
    pub fn load(path: &Path) -> Result<Self, ArtifactError> {
        let file = File::open(path).map_err(|e| ArtifactError::ModelUnavailable {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let model = serde_json::from_reader(std::io::BufReader::new(file)).map_err(|e| {
            ArtifactError::ModelUnavailable {
                path: path.to_path_buf(),
                reason: e.to_string(),
            }
        })?;

        info!("Loaded tabular model from {:?}", path);
        Ok(Self { model })
    }
}

impl ProbabilityModel for TabularPredictor {
    fn predict(&self, features: &FeatureVector) -> Result<f64, ForecastError> {
        let input_vec = feature_registry::features_to_f64_vector(features);
        let input_matrix = DenseMatrix::from_2d_vec(&vec![input_vec]).map_err(|e| {
            ForecastError::PredictionFailed {
                model: "tabular".to_string(),
                reason: format!("matrix creation failed: {e}"),
            }
        })?;

        let predictions =
            self.model
                .predict(&input_matrix)
                .map_err(|e| ForecastError::PredictionFailed {
                    model: "tabular".to_string(),
                    reason: e.to_string(),
                })?;

        let raw = predictions
            .first()
            .copied()
            .ok_or_else(|| ForecastError::PredictionFailed {
                model: "tabular".to_string(),
                reason: "no prediction returned".to_string(),
            })?;

        // Trained on 0/1 labels; leaf averages can drift marginally outside.
        Ok(raw.clamp(0.0, 1.0))
    }

    fn name(&self) -> &str {
        "Tree Ensemble (tabular)"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_missing_artifact_is_fatal() {
        let err = TabularPredictor::load(&PathBuf::from("non_existent_model.json")).unwrap_err();
        assert!(matches!(err, ArtifactError::ModelUnavailable { .. }));
    }
}
