use std::path::PathBuf;
use thiserror::Error;

/// Startup artifact failures. Any of these is fatal: the process must not
/// serve requests with a missing model, encoder, scaler, index or dataset.
#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("model artifact unavailable at {path:?}: {reason}")]
    ModelUnavailable { path: PathBuf, reason: String },

    #[error("client encoding table unavailable at {path:?}: {reason}")]
    EncoderUnavailable { path: PathBuf, reason: String },

    #[error("feature scaler unavailable at {path:?}: {reason}")]
    ScalerUnavailable { path: PathBuf, reason: String },

    #[error("vector index snapshot unavailable at {path:?}: {reason}")]
    IndexUnavailable { path: PathBuf, reason: String },

    #[error("historical dataset unavailable at {path:?}: {reason}")]
    DatasetUnavailable { path: PathBuf, reason: String },
}

/// Per-request failures. These reject a single forecast/what-if/ask call;
/// none of them is ever replaced with a placeholder prediction.
#[derive(Debug, Error)]
pub enum ForecastError {
    #[error("unknown client: {client}")]
    UnknownClient { client: String },

    #[error("{model} prediction failed: {reason}")]
    PredictionFailed { model: String, reason: String },

    #[error("generation returned malformed output: {raw}")]
    MalformedGeneration { raw: String },

    #[error("generation timed out after {timeout_ms}ms")]
    GenerationTimeout { timeout_ms: u64 },

    #[error("generation request failed: {reason}")]
    GenerationFailed { reason: String },

    #[error("embedding request failed: {reason}")]
    EmbeddingFailed { reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_client_formatting() {
        let err = ForecastError::UnknownClient {
            client: "ClientZ".to_string(),
        };

        let msg = err.to_string();
        assert!(msg.contains("ClientZ"));
        assert!(msg.contains("unknown client"));
    }

    #[test]
    fn test_malformed_generation_carries_raw_text() {
        let err = ForecastError::MalformedGeneration {
            raw: "not json at all".to_string(),
        };

        assert!(err.to_string().contains("not json at all"));
    }

    #[test]
    fn test_artifact_error_formatting() {
        let err = ArtifactError::ModelUnavailable {
            path: PathBuf::from("data/models/margin_call_lstm.onnx"),
            reason: "file not found".to_string(),
        };

        let msg = err.to_string();
        assert!(msg.contains("margin_call_lstm.onnx"));
        assert!(msg.contains("file not found"));
    }
}
