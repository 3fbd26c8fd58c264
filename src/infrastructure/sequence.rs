use crate::application::scaler::MinMaxScaler;
use crate::domain::errors::{ArtifactError, ForecastError};
use crate::domain::feature_registry::{self, FEATURE_COUNT};
use crate::domain::ports::ProbabilityModel;
use crate::domain::types::FeatureVector;
use ort::session::Session;
use std::path::Path;
use std::sync::Mutex;
use tracing::info;

/// Sequence classifier adapter: a recurrent network exported to ONNX
/// (input width 7, hidden width 64, depth 1). The single feature vector is
/// scaled by the persisted min-max scaler, then fed as a sequence of length
/// one; the network's sigmoid output is the probability.
#[derive(Debug)]
pub struct SequencePredictor {
    session: Mutex<Session>,
    scaler: MinMaxScaler,
}

impl SequencePredictor {
    /// Loads the ONNX session. A missing or unloadable artifact is fatal.
    pub fn load(path: &Path, scaler: MinMaxScaler) -> Result<Self, ArtifactError> {
        if !path.exists() {
            return Err(ArtifactError::ModelUnavailable {
                path: path.to_path_buf(),
                reason: "file not found".to_string(),
            });
        }

        let session = Session::builder()
            .and_then(|mut builder| builder.commit_from_file(path))
            .map_err(|e| ArtifactError::ModelUnavailable {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;

        info!("Loaded ONNX sequence model from {:?}", path);
        Ok(Self {
            session: Mutex::new(session),
            scaler,
        })
    }
}

impl ProbabilityModel for SequencePredictor {
    fn predict(&self, features: &FeatureVector) -> Result<f64, ForecastError> {
        let scaled = self
            .scaler
            .transform(&feature_registry::features_to_f64_vector(features));
        let scaled_f32: Vec<f32> = scaled.into_iter().map(|v| v as f32).collect();

        // [batch, seq_len, features] with a sequence of length one.
        let shape = vec![1, 1, FEATURE_COUNT];
        let input_value = ort::value::Value::from_array((shape.as_slice(), scaled_f32)).map_err(
            |e| ForecastError::PredictionFailed {
                model: "sequence".to_string(),
                reason: format!("input value creation failed: {e}"),
            },
        )?;

        let mut session = self
            .session
            .lock()
            .map_err(|e| ForecastError::PredictionFailed {
                model: "sequence".to_string(),
                reason: format!("session lock poisoned: {e}"),
            })?;

        let outputs = session
            .run(ort::inputs![input_value])
            .map_err(|e| ForecastError::PredictionFailed {
                model: "sequence".to_string(),
                reason: e.to_string(),
            })?;

        let output_value = outputs.iter().next().map(|(_, v)| v).ok_or_else(|| {
            ForecastError::PredictionFailed {
                model: "sequence".to_string(),
                reason: "no output tensor".to_string(),
            }
        })?;

        let data = output_value.try_extract_tensor::<f32>().map_err(|e| {
            ForecastError::PredictionFailed {
                model: "sequence".to_string(),
                reason: e.to_string(),
            }
        })?;

        let probability =
            data.1
                .iter()
                .next()
                .copied()
                .ok_or_else(|| ForecastError::PredictionFailed {
                    model: "sequence".to_string(),
                    reason: "empty output tensor".to_string(),
                })?;

        Ok((probability as f64).clamp(0.0, 1.0))
    }

    fn name(&self) -> &str {
        "ONNX Runtime (LSTM)"
    }
}
