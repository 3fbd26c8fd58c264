use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;

/// Process configuration, read once at startup from the environment
/// (with `.env` support via dotenvy in the binaries).
#[derive(Debug, Clone)]
pub struct Config {
    // Data and artifact paths
    pub historical_data_path: PathBuf,
    pub tabular_model_path: PathBuf,
    pub sequence_model_path: PathBuf,
    pub client_encoder_path: PathBuf,
    pub feature_scaler_path: PathBuf,
    pub vector_index_path: PathBuf,
    // Azure OpenAI
    pub azure_openai_endpoint: String,
    pub azure_openai_api_key: String,
    pub chat_deployment: String,
    pub chat_api_version: String,
    pub embedding_deployment: String,
    pub embedding_api_version: String,
    // Generation behavior
    pub generation_timeout_secs: u64,
    pub single_day_top_k: usize,
    pub multi_day_top_k: usize,
    pub forecast_horizon_days: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let historical_data_path = PathBuf::from(
            env::var("HISTORICAL_DATA_PATH").unwrap_or_else(|_| "data/MarginCallData.csv".into()),
        );
        let tabular_model_path = PathBuf::from(
            env::var("TABULAR_MODEL_PATH")
                .unwrap_or_else(|_| "data/models/margin_call_forest.json".into()),
        );
        let sequence_model_path = PathBuf::from(
            env::var("SEQUENCE_MODEL_PATH")
                .unwrap_or_else(|_| "data/models/margin_call_lstm.onnx".into()),
        );
        let client_encoder_path = PathBuf::from(
            env::var("CLIENT_ENCODER_PATH")
                .unwrap_or_else(|_| "data/models/client_encoder.json".into()),
        );
        let feature_scaler_path = PathBuf::from(
            env::var("FEATURE_SCALER_PATH")
                .unwrap_or_else(|_| "data/models/feature_scaler.json".into()),
        );
        let vector_index_path = PathBuf::from(
            env::var("VECTOR_INDEX_PATH").unwrap_or_else(|_| "data/index/margin_index.json".into()),
        );

        let azure_openai_endpoint = env::var("AZURE_OPENAI_ENDPOINT").unwrap_or_default();
        let azure_openai_api_key = env::var("AZURE_OPENAI_API_KEY").unwrap_or_default();
        let chat_deployment =
            env::var("AZURE_OPENAI_CHAT_DEPLOYMENT").unwrap_or_else(|_| "gpt-4o".into());
        let chat_api_version =
            env::var("AZURE_OPENAI_CHAT_API_VERSION").unwrap_or_else(|_| "2024-06-01".into());
        let embedding_deployment = env::var("AZURE_OPENAI_EMBEDDING_DEPLOYMENT")
            .unwrap_or_else(|_| "text-embedding-3-small".into());
        let embedding_api_version =
            env::var("AZURE_OPENAI_EMBEDDING_API_VERSION").unwrap_or_else(|_| "2024-06-01".into());

        let generation_timeout_secs = env::var("GENERATION_TIMEOUT_SECS")
            .unwrap_or_else(|_| "60".to_string())
            .parse::<u64>()
            .context("Failed to parse GENERATION_TIMEOUT_SECS")?;

        let single_day_top_k = env::var("SINGLE_DAY_TOP_K")
            .unwrap_or_else(|_| "10".to_string())
            .parse::<usize>()
            .context("Failed to parse SINGLE_DAY_TOP_K")?;

        let multi_day_top_k = env::var("MULTI_DAY_TOP_K")
            .unwrap_or_else(|_| "20".to_string())
            .parse::<usize>()
            .context("Failed to parse MULTI_DAY_TOP_K")?;

        let forecast_horizon_days = env::var("FORECAST_HORIZON_DAYS")
            .unwrap_or_else(|_| "3".to_string())
            .parse::<usize>()
            .context("Failed to parse FORECAST_HORIZON_DAYS")?;

        Ok(Self {
            historical_data_path,
            tabular_model_path,
            sequence_model_path,
            client_encoder_path,
            feature_scaler_path,
            vector_index_path,
            azure_openai_endpoint,
            azure_openai_api_key,
            chat_deployment,
            chat_api_version,
            embedding_deployment,
            embedding_api_version,
            generation_timeout_secs,
            single_day_top_k,
            multi_day_top_k,
            forecast_horizon_days,
        })
    }
}
