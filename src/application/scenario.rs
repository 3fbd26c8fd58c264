use crate::application::dataset::DatasetStats;
use crate::domain::types::{FeatureInput, ScenarioSample};
use chrono::{Days, NaiveDate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Draws synthetic what-if inputs bounded by observed historical ranges.
///
/// The RNG is seeded from the client name, so repeated calls for the same
/// client within a process run reproduce the same draws. Consecutive
/// forecast days are drawn independently; no temporal correlation is
/// modeled.
pub struct ScenarioGenerator {
    stats: DatasetStats,
}

impl ScenarioGenerator {
    pub fn new(stats: DatasetStats) -> Self {
        Self { stats }
    }

    /// Generates `n_days` samples tagged today+1 .. today+n.
    pub fn generate(&self, client: &str, today: NaiveDate, n_days: usize) -> Vec<ScenarioSample> {
        let mut rng = StdRng::seed_from_u64(seed_for(client));

        (1..=n_days as u64)
            .map(|offset| ScenarioSample {
                date: today
                    .checked_add_days(Days::new(offset))
                    .unwrap_or(today),
                features: self.draw(client, &mut rng),
            })
            .collect()
    }

    fn draw(&self, client: &str, rng: &mut StdRng) -> FeatureInput {
        // Monetary exposures round to whole units, rate-like fields to 2dp.
        let mtm = rng
            .random_range(self.stats.mtm.min..=self.stats.mtm.max)
            .round();
        let collateral = rng
            .random_range(self.stats.collateral.min..=self.stats.collateral.max)
            .round();
        let threshold = rng
            .random_range(self.stats.threshold.min..=self.stats.threshold.max)
            .round();
        let volatility = round2(
            rng.random_range(self.stats.volatility.min..=self.stats.volatility.max),
        );
        let interest_rate = round2(
            rng.random_range(self.stats.interest_rate.min..=self.stats.interest_rate.max),
        );
        let mta = round2(rng.random_range(self.stats.mta.min..=self.stats.mta.max));

        FeatureInput {
            client: client.to_string(),
            mtm,
            collateral,
            threshold,
            volatility,
            interest_rate,
            mta,
        }
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// FNV-1a over the client name. Stable across runs and releases, unlike the
/// standard library's default hasher.
fn seed_for(client: &str) -> u64 {
    let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
    for byte in client.bytes() {
        hash ^= byte as u64;
        hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
    }
    hash
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::dataset::ColumnStats;

    fn stats() -> DatasetStats {
        DatasetStats {
            mtm: ColumnStats {
                min: 1_000_000.0,
                max: 9_000_000.0,
            },
            collateral: ColumnStats {
                min: 100_000.0,
                max: 6_000_000.0,
            },
            threshold: ColumnStats {
                min: 50_000.0,
                max: 2_000_000.0,
            },
            volatility: ColumnStats {
                min: 15.0,
                max: 40.0,
            },
            interest_rate: ColumnStats { min: 3.0, max: 6.0 },
            mta: ColumnStats {
                min: 80_000.0,
                max: 2_500_000.0,
            },
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 5, 29).unwrap()
    }

    #[test]
    fn test_samples_stay_within_inclusive_bounds() {
        let generator = ScenarioGenerator::new(stats());
        let samples = generator.generate("ClientA", today(), 50);

        let s = stats();
        for sample in &samples {
            let f = &sample.features;
            assert!(s.mtm.contains(f.mtm));
            assert!(s.collateral.contains(f.collateral));
            assert!(s.threshold.contains(f.threshold));
            assert!(s.volatility.contains(f.volatility));
            assert!(s.interest_rate.contains(f.interest_rate));
            assert!(s.mta.contains(f.mta));
        }
    }

    #[test]
    fn test_monetary_fields_are_whole_units() {
        let generator = ScenarioGenerator::new(stats());
        for sample in generator.generate("ClientB", today(), 10) {
            let f = &sample.features;
            assert_eq!(f.mtm, f.mtm.round());
            assert_eq!(f.collateral, f.collateral.round());
            assert_eq!(f.threshold, f.threshold.round());
        }
    }

    #[test]
    fn test_rate_fields_have_two_decimals() {
        let generator = ScenarioGenerator::new(stats());
        for sample in generator.generate("ClientC", today(), 10) {
            let f = &sample.features;
            for value in [f.volatility, f.interest_rate, f.mta] {
                assert!(((value * 100.0).round() - value * 100.0).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn test_same_client_reproduces_same_draws() {
        let generator = ScenarioGenerator::new(stats());
        let first = generator.generate("ClientD", today(), 3);
        let second = generator.generate("ClientD", today(), 3);

        for (a, b) in first.iter().zip(&second) {
            assert_eq!(a.features.mtm, b.features.mtm);
            assert_eq!(a.features.volatility, b.features.volatility);
        }
    }

    #[test]
    fn test_different_clients_diverge() {
        let generator = ScenarioGenerator::new(stats());
        let a = generator.generate("ClientA", today(), 3);
        let b = generator.generate("ClientB", today(), 3);

        let identical = a
            .iter()
            .zip(&b)
            .all(|(x, y)| x.features.mtm == y.features.mtm);
        assert!(!identical);
    }

    #[test]
    fn test_forecast_dates_are_consecutive() {
        let generator = ScenarioGenerator::new(stats());
        let samples = generator.generate("ClientE", today(), 3);

        assert_eq!(samples.len(), 3);
        assert_eq!(samples[0].date, NaiveDate::from_ymd_opt(2025, 5, 30).unwrap());
        assert_eq!(samples[1].date, NaiveDate::from_ymd_opt(2025, 5, 31).unwrap());
        assert_eq!(samples[2].date, NaiveDate::from_ymd_opt(2025, 6, 1).unwrap());
    }
}
