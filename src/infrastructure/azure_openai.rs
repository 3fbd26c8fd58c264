use crate::config::Config;
use crate::domain::errors::ForecastError;
use crate::domain::ports::{CompletionService, EmbeddingService};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Azure OpenAI REST client for chat completions and embeddings.
///
/// One attempt per call, bounded by the configured timeout; retry policy
/// belongs to the caller. Generation runs at temperature zero so repeated
/// explanations stay consistent.
pub struct AzureOpenAiClient {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    chat_deployment: String,
    chat_api_version: String,
    embedding_deployment: String,
    embedding_api_version: String,
    timeout: Duration,
}

impl AzureOpenAiClient {
    pub fn new(config: &Config) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: config.azure_openai_endpoint.trim_end_matches('/').to_string(),
            api_key: config.azure_openai_api_key.clone(),
            chat_deployment: config.chat_deployment.clone(),
            chat_api_version: config.chat_api_version.clone(),
            embedding_deployment: config.embedding_deployment.clone(),
            embedding_api_version: config.embedding_api_version.clone(),
            timeout: Duration::from_secs(config.generation_timeout_secs),
        }
    }

    fn deployment_url(&self, deployment: &str, operation: &str, api_version: &str) -> String {
        format!(
            "{}/openai/deployments/{}/{}?api-version={}",
            self.endpoint, deployment, operation, api_version
        )
    }

    fn map_request_error(&self, e: reqwest::Error) -> ForecastError {
        if e.is_timeout() {
            ForecastError::GenerationTimeout {
                timeout_ms: self.timeout.as_millis() as u64,
            }
        } else {
            ForecastError::GenerationFailed {
                reason: e.to_string(),
            }
        }
    }
}

// ===== Wire types =====

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: String,
}

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    input: &'a [String],
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingRow>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingRow {
    index: usize,
    embedding: Vec<f32>,
}

#[async_trait]
impl CompletionService for AzureOpenAiClient {
    async fn complete(&self, system: &str, prompt: &str) -> Result<String, ForecastError> {
        let url = self.deployment_url(&self.chat_deployment, "chat/completions", &self.chat_api_version);

        let body = ChatRequest {
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            temperature: 0.0,
        };

        let response = self
            .client
            .post(&url)
            .header("api-key", &self.api_key)
            .timeout(self.timeout)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.map_request_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(ForecastError::GenerationFailed {
                reason: format!("chat completion returned {status}: {detail}"),
            });
        }

        let parsed: ChatResponse =
            response
                .json()
                .await
                .map_err(|e| ForecastError::GenerationFailed {
                    reason: format!("chat response decode failed: {e}"),
                })?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| ForecastError::GenerationFailed {
                reason: "chat response contained no choices".to_string(),
            })?;

        debug!(chars = content.len(), "chat completion received");
        Ok(content)
    }
}

#[async_trait]
impl EmbeddingService for AzureOpenAiClient {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, ForecastError> {
        let mut vectors = self.embed_batch(&[text.to_string()]).await?;
        vectors.pop().ok_or_else(|| ForecastError::EmbeddingFailed {
            reason: "embedding response was empty".to_string(),
        })
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, ForecastError> {
        let url = self.deployment_url(
            &self.embedding_deployment,
            "embeddings",
            &self.embedding_api_version,
        );

        let response = self
            .client
            .post(&url)
            .header("api-key", &self.api_key)
            .timeout(self.timeout)
            .json(&EmbeddingRequest { input: texts })
            .send()
            .await
            .map_err(|e| match self.map_request_error(e) {
                ForecastError::GenerationFailed { reason } => {
                    ForecastError::EmbeddingFailed { reason }
                }
                other => other,
            })?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(ForecastError::EmbeddingFailed {
                reason: format!("embeddings returned {status}: {detail}"),
            });
        }

        let parsed: EmbeddingResponse =
            response
                .json()
                .await
                .map_err(|e| ForecastError::EmbeddingFailed {
                    reason: format!("embedding response decode failed: {e}"),
                })?;

        if parsed.data.len() != texts.len() {
            return Err(ForecastError::EmbeddingFailed {
                reason: format!(
                    "expected {} embeddings, got {}",
                    texts.len(),
                    parsed.data.len()
                ),
            });
        }

        let mut rows = parsed.data;
        rows.sort_by_key(|row| row.index);
        Ok(rows.into_iter().map(|row| row.embedding).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Config {
        Config {
            historical_data_path: "data/MarginCallData.csv".into(),
            tabular_model_path: "data/models/margin_call_forest.json".into(),
            sequence_model_path: "data/models/margin_call_lstm.onnx".into(),
            client_encoder_path: "data/models/client_encoder.json".into(),
            feature_scaler_path: "data/models/feature_scaler.json".into(),
            vector_index_path: "data/index/margin_index.json".into(),
            azure_openai_endpoint: "https://example.openai.azure.com/".to_string(),
            azure_openai_api_key: "key".to_string(),
            chat_deployment: "gpt-4o".to_string(),
            chat_api_version: "2024-06-01".to_string(),
            embedding_deployment: "text-embedding-3-small".to_string(),
            embedding_api_version: "2024-06-01".to_string(),
            generation_timeout_secs: 60,
            single_day_top_k: 10,
            multi_day_top_k: 20,
            forecast_horizon_days: 3,
        }
    }

    #[test]
    fn test_deployment_url_shape() {
        let client = AzureOpenAiClient::new(&config());
        let url = client.deployment_url("gpt-4o", "chat/completions", "2024-06-01");
        assert_eq!(
            url,
            "https://example.openai.azure.com/openai/deployments/gpt-4o/chat/completions?api-version=2024-06-01"
        );
    }
}
