use crate::domain::errors::ForecastError;
use crate::domain::ports::{CompletionService, EmbeddingService, ProbabilityModel};
use crate::domain::types::FeatureVector;
use async_trait::async_trait;

/// Probability model returning a fixed value, or failing on demand.
/// Used to exercise the ensemble and orchestration without model artifacts.
pub struct MockProbabilityModel {
    name: String,
    probability: f64,
    fail: bool,
}

impl MockProbabilityModel {
    pub fn fixed(name: &str, probability: f64) -> Self {
        Self {
            name: name.to_string(),
            probability,
            fail: false,
        }
    }

    pub fn failing(name: &str) -> Self {
        Self {
            name: name.to_string(),
            probability: 0.0,
            fail: true,
        }
    }
}

impl ProbabilityModel for MockProbabilityModel {
    fn predict(&self, _features: &FeatureVector) -> Result<f64, ForecastError> {
        if self.fail {
            return Err(ForecastError::PredictionFailed {
                model: self.name.clone(),
                reason: "mock failure".to_string(),
            });
        }
        Ok(self.probability)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Deterministic embedding service: hashes the text into a small vector.
/// Identical text always embeds identically.
pub struct MockEmbeddingService {
    dimensions: usize,
}

impl MockEmbeddingService {
    pub fn new(dimensions: usize) -> Self {
        Self { dimensions }
    }

    fn embed_sync(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.dimensions];
        for (i, byte) in text.bytes().enumerate() {
            vector[i % self.dimensions] += byte as f32 / 255.0;
        }
        vector
    }
}

#[async_trait]
impl EmbeddingService for MockEmbeddingService {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, ForecastError> {
        Ok(self.embed_sync(text))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, ForecastError> {
        Ok(texts.iter().map(|t| self.embed_sync(t)).collect())
    }
}

/// Completion service returning canned text, or a canned error.
pub struct MockCompletionService {
    response: Result<String, ForecastError>,
}

impl MockCompletionService {
    pub fn canned(response: &str) -> Self {
        Self {
            response: Ok(response.to_string()),
        }
    }

    pub fn timing_out(timeout_ms: u64) -> Self {
        Self {
            response: Err(ForecastError::GenerationTimeout { timeout_ms }),
        }
    }
}

#[async_trait]
impl CompletionService for MockCompletionService {
    async fn complete(&self, _system: &str, _prompt: &str) -> Result<String, ForecastError> {
        match &self.response {
            Ok(text) => Ok(text.clone()),
            Err(ForecastError::GenerationTimeout { timeout_ms }) => {
                Err(ForecastError::GenerationTimeout {
                    timeout_ms: *timeout_ms,
                })
            }
            Err(_) => Err(ForecastError::GenerationFailed {
                reason: "mock failure".to_string(),
            }),
        }
    }
}
