use crate::domain::errors::ForecastError;
use crate::domain::types::FeatureVector;
use async_trait::async_trait;

/// Interface for a trained binary classifier.
/// Implementations are loaded once at startup and treated as immutable;
/// `predict` is stateless per call and has no side effects.
pub trait ProbabilityModel: Send + Sync {
    /// Probability that a margin call occurs, in [0.0, 1.0].
    fn predict(&self, features: &FeatureVector) -> Result<f64, ForecastError>;

    /// Model name for diagnostics.
    fn name(&self) -> &str;
}

/// Interface for text embedding used by the vector index.
#[async_trait]
pub trait EmbeddingService: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, ForecastError>;

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, ForecastError>;
}

/// Interface for the grounded text-generation step.
/// A single blocking attempt per call: timeouts surface as
/// `ForecastError::GenerationTimeout` and retry policy belongs to the caller.
#[async_trait]
pub trait CompletionService: Send + Sync {
    async fn complete(&self, system: &str, prompt: &str) -> Result<String, ForecastError>;
}
