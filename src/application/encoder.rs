use crate::domain::clients;
use crate::domain::errors::{ArtifactError, ForecastError};
use crate::domain::types::{FeatureInput, FeatureVector};
use std::collections::HashMap;
use std::fs::File;
use std::path::Path;
use tracing::info;

/// Persisted client -> dense code table, fit once at training time over the
/// full known client set. Never extended at inference time: a model's
/// input-index-to-client mapping is undefined under any other table.
#[derive(Debug)]
pub struct ClientEncoder {
    table: HashMap<String, u32>,
}

impl ClientEncoder {
    /// Loads the table artifact (a JSON object `{"ClientA": 0, ...}`).
    pub fn load(path: &Path) -> Result<Self, ArtifactError> {
        let file = File::open(path).map_err(|e| ArtifactError::EncoderUnavailable {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let table: HashMap<String, u32> =
            serde_json::from_reader(file).map_err(|e| ArtifactError::EncoderUnavailable {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;

        let encoder =
            Self::from_table(table).map_err(|reason| ArtifactError::EncoderUnavailable {
                path: path.to_path_buf(),
                reason,
            })?;

        info!(
            "Loaded client encoding table ({} clients) from {:?}",
            encoder.table.len(),
            path
        );
        Ok(encoder)
    }

    pub fn from_table(table: HashMap<String, u32>) -> Result<Self, String> {
        if table.is_empty() {
            return Err("encoding table is empty".to_string());
        }

        // Codes must be dense 0..n-1 with no repeats.
        let mut codes: Vec<u32> = table.values().copied().collect();
        codes.sort_unstable();
        for (expected, code) in codes.iter().enumerate() {
            if *code != expected as u32 {
                return Err(format!(
                    "encoding table codes are not dense: expected {}, found {}",
                    expected, code
                ));
            }
        }

        for client in clients::KNOWN_CLIENTS {
            if !table.contains_key(client.name) {
                return Err(format!(
                    "encoding table is missing known client {}",
                    client.name
                ));
            }
        }

        Ok(Self { table })
    }

    pub fn encode(&self, client: &str) -> Result<u32, ForecastError> {
        self.table
            .get(client)
            .copied()
            .ok_or_else(|| ForecastError::UnknownClient {
                client: client.to_string(),
            })
    }

    /// Assembles the ordered feature vector with the client code substituted
    /// for the client identifier.
    pub fn encode_features(&self, input: &FeatureInput) -> Result<FeatureVector, ForecastError> {
        let client_code = self.encode(&input.client)?;
        Ok(FeatureVector {
            client_code,
            mtm: input.mtm,
            collateral: input.collateral,
            threshold: input.threshold,
            volatility: input.volatility,
            interest_rate: input.interest_rate,
            mta: input.mta,
        })
    }
}
