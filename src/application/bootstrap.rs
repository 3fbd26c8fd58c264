use crate::application::dataset::HistoricalDataset;
use crate::application::encoder::ClientEncoder;
use crate::application::ensemble::HybridDecisionEngine;
use crate::application::explainer::Explainer;
use crate::application::forecaster::{ForecastContext, Forecaster};
use crate::application::scaler::MinMaxScaler;
use crate::application::scenario::ScenarioGenerator;
use crate::config::Config;
use crate::domain::ports::{CompletionService, EmbeddingService};
use crate::infrastructure::VectorIndex;
use crate::infrastructure::azure_openai::AzureOpenAiClient;
use crate::infrastructure::sequence::SequencePredictor;
use crate::infrastructure::tabular::TabularPredictor;
use anyhow::Result;
use std::sync::Arc;
use tracing::info;

/// Loads every persisted artifact and wires the immutable forecast context.
/// Absence of any artifact is a startup-fatal condition, not a per-request
/// error.
pub fn bootstrap(config: &Config) -> Result<Forecaster> {
    let dataset = HistoricalDataset::load(&config.historical_data_path)?;
    let encoder = ClientEncoder::load(&config.client_encoder_path)?;
    let scaler = MinMaxScaler::load(&config.feature_scaler_path)?;

    let tabular = Arc::new(TabularPredictor::load(&config.tabular_model_path)?);
    let sequence = Arc::new(SequencePredictor::load(
        &config.sequence_model_path,
        scaler,
    )?);
    let index = Arc::new(VectorIndex::load(&config.vector_index_path)?);

    let azure = Arc::new(AzureOpenAiClient::new(config));
    let embeddings: Arc<dyn EmbeddingService> = azure.clone();
    let completions: Arc<dyn CompletionService> = azure;

    let explainer = Explainer::new(
        index,
        embeddings,
        completions,
        config.single_day_top_k,
        config.multi_day_top_k,
    );

    let context = ForecastContext {
        encoder,
        engine: HybridDecisionEngine::new(tabular, sequence),
        scenarios: ScenarioGenerator::new(dataset.stats().clone()),
        explainer,
        horizon_days: config.forecast_horizon_days,
    };

    info!("forecast context initialized");
    Ok(Forecaster::new(context))
}
