use crate::domain::errors::ArtifactError;
use crate::domain::feature_registry::FEATURE_COUNT;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::Path;

/// Persisted min-max scaler, fit on the historical dataset at training time.
/// This crate only transforms; there is deliberately no fit method here.
/// Re-fitting at inference time would change the meaning of the input
/// distribution under the trained sequence model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MinMaxScaler {
    pub data_min: Vec<f64>,
    pub data_max: Vec<f64>,
}

impl MinMaxScaler {
    pub fn load(path: &Path) -> Result<Self, ArtifactError> {
        let file = File::open(path).map_err(|e| ArtifactError::ScalerUnavailable {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let scaler: MinMaxScaler =
            serde_json::from_reader(file).map_err(|e| ArtifactError::ScalerUnavailable {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;

        scaler
            .validate()
            .map_err(|reason| ArtifactError::ScalerUnavailable {
                path: path.to_path_buf(),
                reason,
            })?;

        Ok(scaler)
    }

    pub fn new(data_min: Vec<f64>, data_max: Vec<f64>) -> Result<Self, String> {
        let scaler = Self { data_min, data_max };
        scaler.validate()?;
        Ok(scaler)
    }

    fn validate(&self) -> Result<(), String> {
        if self.data_min.len() != FEATURE_COUNT || self.data_max.len() != FEATURE_COUNT {
            return Err(format!(
                "scaler dimensions {}x{} do not match feature count {}",
                self.data_min.len(),
                self.data_max.len(),
                FEATURE_COUNT
            ));
        }
        for (i, (min, max)) in self.data_min.iter().zip(&self.data_max).enumerate() {
            if min > max {
                return Err(format!("scaler column {} has min {} > max {}", i, min, max));
            }
        }
        Ok(())
    }

    /// Maps each feature into [0, 1] by the persisted column ranges.
    /// A constant column (zero span) maps to 0.
    pub fn transform(&self, features: &[f64]) -> Vec<f64> {
        features
            .iter()
            .enumerate()
            .map(|(i, &value)| {
                let span = self.data_max[i] - self.data_min[i];
                if span == 0.0 {
                    0.0
                } else {
                    (value - self.data_min[i]) / span
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scaler() -> MinMaxScaler {
        MinMaxScaler::new(
            vec![0.0, 1_000_000.0, 100_000.0, 50_000.0, 10.0, 3.0, 80_000.0],
            vec![
                5.0,
                9_000_000.0,
                6_000_000.0,
                2_000_000.0,
                40.0,
                6.0,
                2_500_000.0,
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_transform_maps_bounds_to_unit_interval() {
        let s = scaler();
        let at_min = s.transform(&[0.0, 1_000_000.0, 100_000.0, 50_000.0, 10.0, 3.0, 80_000.0]);
        let at_max = s.transform(&[
            5.0,
            9_000_000.0,
            6_000_000.0,
            2_000_000.0,
            40.0,
            6.0,
            2_500_000.0,
        ]);

        for v in at_min {
            assert_eq!(v, 0.0);
        }
        for v in at_max {
            assert_eq!(v, 1.0);
        }
    }

    #[test]
    fn test_transform_midpoint() {
        let s = scaler();
        let scaled = s.transform(&[2.5, 5_000_000.0, 3_050_000.0, 1_025_000.0, 25.0, 4.5, 1_290_000.0]);
        for v in scaled {
            assert!((v - 0.5).abs() < 1e-9);
        }
    }

    #[test]
    fn test_zero_span_column_maps_to_zero() {
        let s = MinMaxScaler::new(
            vec![1.0; 7],
            vec![1.0, 2.0, 2.0, 2.0, 2.0, 2.0, 2.0],
        )
        .unwrap();
        let scaled = s.transform(&[1.0; 7]);
        assert_eq!(scaled[0], 0.0);
    }

    #[test]
    fn test_dimension_mismatch_rejected() {
        let err = MinMaxScaler::new(vec![0.0; 6], vec![1.0; 6]).unwrap_err();
        assert!(err.contains("feature count"));
    }

    #[test]
    fn test_inverted_bounds_rejected() {
        let mut max = vec![1.0; 7];
        max[3] = -1.0;
        let err = MinMaxScaler::new(vec![0.0; 7], max).unwrap_err();
        assert!(err.contains("min"));
    }
}
