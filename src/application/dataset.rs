use crate::domain::clients;
use crate::domain::errors::ArtifactError;
use crate::domain::types::HistoricalRecord;
use chrono::{Datelike, NaiveDate, Weekday};
use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::path::Path;
use tracing::info;

/// Observed [min, max] of one numeric column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnStats {
    pub min: f64,
    pub max: f64,
}

impl ColumnStats {
    fn observe(&mut self, value: f64) {
        if value < self.min {
            self.min = value;
        }
        if value > self.max {
            self.max = value;
        }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Min/max over the six numeric features, used to bound scenario draws.
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetStats {
    pub mtm: ColumnStats,
    pub collateral: ColumnStats,
    pub threshold: ColumnStats,
    pub volatility: ColumnStats,
    pub interest_rate: ColumnStats,
    pub mta: ColumnStats,
}

/// The historical dataset, loaded once and read-only thereafter.
/// It is the feature-range and retrieval-context source of truth.
#[derive(Debug)]
pub struct HistoricalDataset {
    records: Vec<HistoricalRecord>,
    stats: DatasetStats,
}

impl HistoricalDataset {
    pub fn load(path: &Path) -> Result<Self, ArtifactError> {
        let file = File::open(path).map_err(|e| ArtifactError::DatasetUnavailable {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let dataset =
            Self::from_reader(file).map_err(|reason| ArtifactError::DatasetUnavailable {
                path: path.to_path_buf(),
                reason,
            })?;

        info!(
            "Loaded {} historical records from {:?}",
            dataset.records.len(),
            path
        );
        Ok(dataset)
    }

    pub fn from_reader<R: std::io::Read>(reader: R) -> Result<Self, String> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let mut records = Vec::new();
        for row in csv_reader.deserialize() {
            let record: HistoricalRecord = row.map_err(|e| e.to_string())?;
            records.push(record);
        }
        Self::from_records(records)
    }

    pub fn from_records(records: Vec<HistoricalRecord>) -> Result<Self, String> {
        if records.is_empty() {
            return Err("dataset contains no records".to_string());
        }

        let mut seen: HashSet<(String, NaiveDate)> = HashSet::new();
        let mut mta_by_client: HashMap<String, f64> = HashMap::new();

        for record in &records {
            if !clients::is_known(&record.client) {
                return Err(format!(
                    "record references client {} outside the fixed client set",
                    record.client
                ));
            }
            if matches!(record.date.weekday(), Weekday::Sat | Weekday::Sun) {
                return Err(format!(
                    "record for {} on {} falls on a weekend",
                    record.client, record.date
                ));
            }
            if !seen.insert((record.client.clone(), record.date)) {
                return Err(format!(
                    "duplicate record for ({}, {})",
                    record.client, record.date
                ));
            }
            match mta_by_client.get(&record.client) {
                Some(&mta) if mta != record.mta => {
                    return Err(format!(
                        "MTA for {} changed from {} to {}; MTA is a per-client constant",
                        record.client, mta, record.mta
                    ));
                }
                None => {
                    mta_by_client.insert(record.client.clone(), record.mta);
                }
                _ => {}
            }
        }

        let stats = compute_stats(&records);
        Ok(Self { records, stats })
    }

    pub fn records(&self) -> &[HistoricalRecord] {
        &self.records
    }

    pub fn stats(&self) -> &DatasetStats {
        &self.stats
    }

    /// One flat text document per historical row, in dataset order.
    pub fn documents(&self) -> Vec<String> {
        self.records.iter().map(|r| r.to_document()).collect()
    }
}

fn compute_stats(records: &[HistoricalRecord]) -> DatasetStats {
    let seed = &records[0];
    let mut stats = DatasetStats {
        mtm: ColumnStats {
            min: seed.mtm,
            max: seed.mtm,
        },
        collateral: ColumnStats {
            min: seed.collateral,
            max: seed.collateral,
        },
        threshold: ColumnStats {
            min: seed.threshold,
            max: seed.threshold,
        },
        volatility: ColumnStats {
            min: seed.volatility,
            max: seed.volatility,
        },
        interest_rate: ColumnStats {
            min: seed.interest_rate,
            max: seed.interest_rate,
        },
        mta: ColumnStats {
            min: seed.mta,
            max: seed.mta,
        },
    };

    for record in &records[1..] {
        stats.mtm.observe(record.mtm);
        stats.collateral.observe(record.collateral);
        stats.threshold.observe(record.threshold);
        stats.volatility.observe(record.volatility);
        stats.interest_rate.observe(record.interest_rate);
        stats.mta.observe(record.mta);
    }

    stats
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "Date,Client,MTM,Collateral,Threshold,Volatility,Currency,InterestRate,MTA,MarginCallMade,MarginCallAmount";

    fn dataset_from(rows: &[&str]) -> Result<HistoricalDataset, String> {
        let csv = format!("{}\n{}\n", HEADER, rows.join("\n"));
        HistoricalDataset::from_reader(csv.as_bytes())
    }

    #[test]
    fn test_stats_cover_all_rows() {
        let dataset = dataset_from(&[
            "26-May-2025,ClientA,5860000,3900000,1600000,22,USD,4.5,100000,Yes,360000",
            "27-May-2025,ClientA,6100000,4000000,1700000,25,USD,4.8,100000,Yes,400000",
            "27-May-2025,ClientB,4200000,3100000,900000,18,USD,3.9,200000,No,150000",
        ])
        .expect("valid dataset");

        let stats = dataset.stats();
        assert_eq!(stats.mtm.min, 4_200_000.0);
        assert_eq!(stats.mtm.max, 6_100_000.0);
        assert_eq!(stats.volatility.min, 18.0);
        assert_eq!(stats.volatility.max, 25.0);
        assert_eq!(stats.mta.min, 100_000.0);
        assert_eq!(stats.mta.max, 200_000.0);
    }

    #[test]
    fn test_duplicate_client_date_rejected() {
        let err = dataset_from(&[
            "26-May-2025,ClientA,5860000,3900000,1600000,22,USD,4.5,100000,Yes,360000",
            "26-May-2025,ClientA,6100000,4000000,1700000,25,USD,4.8,100000,Yes,400000",
        ])
        .unwrap_err();

        assert!(err.contains("duplicate"));
    }

    #[test]
    fn test_weekend_record_rejected() {
        // 24-May-2025 is a Saturday
        let err = dataset_from(&[
            "24-May-2025,ClientA,5860000,3900000,1600000,22,USD,4.5,100000,Yes,360000",
        ])
        .unwrap_err();

        assert!(err.contains("weekend"));
    }

    #[test]
    fn test_mta_drift_rejected() {
        let err = dataset_from(&[
            "26-May-2025,ClientA,5860000,3900000,1600000,22,USD,4.5,100000,Yes,360000",
            "27-May-2025,ClientA,6100000,4000000,1700000,25,USD,4.8,999999,Yes,400000",
        ])
        .unwrap_err();

        assert!(err.contains("per-client constant"));
    }

    #[test]
    fn test_unknown_client_rejected() {
        let err = dataset_from(&[
            "26-May-2025,ClientZ,5860000,3900000,1600000,22,USD,4.5,100000,Yes,360000",
        ])
        .unwrap_err();

        assert!(err.contains("ClientZ"));
    }

    #[test]
    fn test_empty_dataset_rejected() {
        let err = dataset_from(&[]).unwrap_err();
        assert!(err.contains("no records"));
    }

    #[test]
    fn test_documents_match_record_count() {
        let dataset = dataset_from(&[
            "26-May-2025,ClientA,5860000,3900000,1600000,22,USD,4.5,100000,Yes,360000",
            "27-May-2025,ClientB,4200000,3100000,900000,18,USD,3.9,200000,No,150000",
        ])
        .expect("valid dataset");

        let docs = dataset.documents();
        assert_eq!(docs.len(), 2);
        assert!(docs[1].contains("Client: ClientB"));
    }
}
