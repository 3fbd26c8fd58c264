use crate::domain::errors::ForecastError;
use crate::domain::ports::ProbabilityModel;
use crate::domain::types::{Decision, FeatureInput, FeatureVector};
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use std::sync::Arc;
use tracing::debug;

/// Decision threshold on the averaged probability. The comparison is strict:
/// a tie at exactly 0.5 resolves to "No".
pub const DECISION_THRESHOLD: f64 = 0.5;

/// Averages the tabular and sequence probabilities into one decision signal
/// and derives the call amount. If either model fails, the whole request
/// fails; there is no silent single-model fallback.
///
/// The ensemble path performs no MTA re-check: both models receive the MTA
/// as a feature, and the amount is pure exposure arithmetic.
pub struct HybridDecisionEngine {
    tabular: Arc<dyn ProbabilityModel>,
    sequence: Arc<dyn ProbabilityModel>,
}

impl HybridDecisionEngine {
    pub fn new(tabular: Arc<dyn ProbabilityModel>, sequence: Arc<dyn ProbabilityModel>) -> Self {
        Self { tabular, sequence }
    }

    pub fn evaluate(
        &self,
        features: &FeatureVector,
        input: &FeatureInput,
    ) -> Result<Decision, ForecastError> {
        let p_tab = self.tabular.predict(features)?;
        let p_seq = self.sequence.predict(features)?;
        debug!(
            client = %input.client,
            p_tab,
            p_seq,
            "ensemble probabilities"
        );
        Ok(decide(p_tab, p_seq, input))
    }
}

/// The fixed combination rule, kept as a pure function.
pub fn decide(p_tab: f64, p_seq: f64, input: &FeatureInput) -> Decision {
    let p_avg = (p_tab + p_seq) / 2.0;
    let required = p_avg > DECISION_THRESHOLD;

    // Confidence is always probability-of-positive, not distance-from-decision.
    let confidence = (p_avg * 10_000.0).round() / 100.0;

    let amount = if required {
        margin_call_amount(input.mtm, input.collateral, input.threshold)
    } else {
        Decimal::ZERO
    };

    Decision {
        required,
        amount,
        confidence,
    }
}

/// `max(round(MTM - Collateral - Threshold, 2), 0)`. Negative raw
/// differences are floored to zero, never reported as negative.
pub fn margin_call_amount(mtm: f64, collateral: f64, threshold: f64) -> Decimal {
    let raw = Decimal::from_f64(mtm - collateral - threshold).unwrap_or(Decimal::ZERO);
    raw.round_dp(2).max(Decimal::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::mock::MockProbabilityModel;
    use rust_decimal_macros::dec;

    fn input(mtm: f64, collateral: f64, threshold: f64) -> FeatureInput {
        FeatureInput {
            client: "ClientA".to_string(),
            mtm,
            collateral,
            threshold,
            volatility: 20.0,
            interest_rate: 4.5,
            mta: 100_000.0,
        }
    }

    #[test]
    fn test_worked_example_positive() {
        let decision = decide(0.7, 0.9, &input(3_000_000.0, 800_000.0, 200_000.0));
        assert!(decision.required);
        assert_eq!(decision.required_label(), "Yes");
        assert_eq!(decision.confidence_string(), "80.00%");
        assert_eq!(decision.amount_string(), "$2,000,000.00");
    }

    #[test]
    fn test_worked_example_negative() {
        let decision = decide(0.2, 0.3, &input(3_000_000.0, 800_000.0, 200_000.0));
        assert!(!decision.required);
        assert_eq!(decision.required_label(), "No");
        assert_eq!(decision.confidence_string(), "25.00%");
        assert_eq!(decision.amount_string(), "$0.00");
    }

    #[test]
    fn test_tie_resolves_to_no() {
        let decision = decide(0.5, 0.5, &input(3_000_000.0, 800_000.0, 200_000.0));
        assert!(!decision.required);
        assert_eq!(decision.amount, Decimal::ZERO);
        assert_eq!(decision.confidence_string(), "50.00%");
    }

    #[test]
    fn test_negative_difference_floors_to_zero() {
        let decision = decide(0.9, 0.9, &input(1_000_000.0, 800_000.0, 400_000.0));
        assert!(decision.required);
        assert_eq!(decision.amount, Decimal::ZERO);
        assert_eq!(decision.amount_string(), "$0.00");
    }

    #[test]
    fn test_amount_rounds_to_cents() {
        let amount = margin_call_amount(1_234.56, 1_000.0, 100.0);
        assert_eq!(amount, dec!(134.56));
    }

    #[test]
    fn test_confidence_bounds() {
        for (p_tab, p_seq) in [(0.0, 0.0), (1.0, 1.0), (0.0, 1.0), (0.33, 0.77)] {
            let decision = decide(p_tab, p_seq, &input(3_000_000.0, 800_000.0, 200_000.0));
            assert!(decision.confidence >= 0.0 && decision.confidence <= 100.0);
        }
    }

    #[test]
    fn test_decision_is_deterministic() {
        let i = input(3_000_000.0, 800_000.0, 200_000.0);
        let first = decide(0.61, 0.42, &i);
        let second = decide(0.61, 0.42, &i);
        assert_eq!(first, second);
    }

    #[test]
    fn test_engine_averages_model_outputs() {
        let engine = HybridDecisionEngine::new(
            Arc::new(MockProbabilityModel::fixed("tabular", 0.7)),
            Arc::new(MockProbabilityModel::fixed("sequence", 0.9)),
        );

        let i = input(3_000_000.0, 800_000.0, 200_000.0);
        let fv = FeatureVector {
            client_code: 0,
            mtm: i.mtm,
            collateral: i.collateral,
            threshold: i.threshold,
            volatility: i.volatility,
            interest_rate: i.interest_rate,
            mta: i.mta,
        };

        let decision = engine.evaluate(&fv, &i).unwrap();
        assert_eq!(decision.confidence_string(), "80.00%");
    }

    #[test]
    fn test_engine_propagates_model_failure() {
        let engine = HybridDecisionEngine::new(
            Arc::new(MockProbabilityModel::fixed("tabular", 0.7)),
            Arc::new(MockProbabilityModel::failing("sequence")),
        );

        let i = input(3_000_000.0, 800_000.0, 200_000.0);
        let fv = FeatureVector {
            client_code: 0,
            mtm: i.mtm,
            collateral: i.collateral,
            threshold: i.threshold,
            volatility: i.volatility,
            interest_rate: i.interest_rate,
            mta: i.mta,
        };

        let err = engine.evaluate(&fv, &i).unwrap_err();
        assert!(matches!(err, ForecastError::PredictionFailed { .. }));
    }
}
