use crate::domain::types::FeatureVector;

/// Ordered list of feature names.
/// This order MUST match exactly the order used when the model artifacts
/// were trained. Any change here is a breaking change for both models.
pub const FEATURE_NAMES: &[&str] = &[
    "Client_Encoded",
    "MTM",
    "Collateral",
    "Threshold",
    "Volatility",
    "InterestRate",
    "MTA",
];

pub const FEATURE_COUNT: usize = 7;

/// Flattens the typed vector into model input order (f64, tabular model).
pub fn features_to_f64_vector(fv: &FeatureVector) -> Vec<f64> {
    vec![
        fv.client_code as f64,
        fv.mtm,
        fv.collateral,
        fv.threshold,
        fv.volatility,
        fv.interest_rate,
        fv.mta,
    ]
}

/// Flattens the typed vector into model input order (f32, ONNX inference).
pub fn features_to_f32_vector(fv: &FeatureVector) -> Vec<f32> {
    features_to_f64_vector(fv)
        .into_iter()
        .map(|v| v as f32)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_vector() -> FeatureVector {
        FeatureVector {
            client_code: 2,
            mtm: 5_000_000.0,
            collateral: 3_500_000.0,
            threshold: 1_200_000.0,
            volatility: 24.0,
            interest_rate: 4.2,
            mta: 150_000.0,
        }
    }

    #[test]
    fn test_feature_vector_length() {
        let vec = features_to_f64_vector(&sample_vector());
        assert_eq!(vec.len(), FEATURE_NAMES.len());
        assert_eq!(vec.len(), FEATURE_COUNT);
    }

    #[test]
    fn test_feature_order() {
        let vec = features_to_f64_vector(&sample_vector());
        // Client code is index 0, MTA is last
        assert_eq!(vec[0], 2.0);
        assert_eq!(vec[6], 150_000.0);
    }

    #[test]
    fn test_f32_conversion_matches_f64_order() {
        let fv = sample_vector();
        let f64s = features_to_f64_vector(&fv);
        let f32s = features_to_f32_vector(&fv);
        for (a, b) in f64s.iter().zip(f32s.iter()) {
            assert_eq!(*a as f32, *b);
        }
    }
}
