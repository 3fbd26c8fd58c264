use crate::domain::errors::ForecastError;
use crate::domain::ports::{CompletionService, EmbeddingService};
use crate::domain::types::{Decision, FeatureInput, PredictionResult};
use crate::infrastructure::VectorIndex;
use chrono::NaiveDate;
use std::sync::Arc;
use tracing::debug;

const GROUNDING_SYSTEM_PROMPT: &str = "Use the provided historical margin call records to answer. \
Ground every statement in the retrieved context. \
Never contradict or re-derive a prediction that is stated as fixed.";

/// How many historical documents to retrieve for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetrievalDepth {
    /// Single-day explanation or what-if.
    SingleDay,
    /// Multi-day forecasts and open-ended questions.
    MultiDay,
}

/// Retrieval-augmented explanation over the vector index.
///
/// The decision itself is fixed upstream by the hybrid engine; this layer
/// only turns it into a short grounded narrative, or answers free-form
/// questions against the same index.
pub struct Explainer {
    index: Arc<VectorIndex>,
    embeddings: Arc<dyn EmbeddingService>,
    completions: Arc<dyn CompletionService>,
    single_day_k: usize,
    multi_day_k: usize,
}

impl Explainer {
    pub fn new(
        index: Arc<VectorIndex>,
        embeddings: Arc<dyn EmbeddingService>,
        completions: Arc<dyn CompletionService>,
        single_day_k: usize,
        multi_day_k: usize,
    ) -> Self {
        Self {
            index,
            embeddings,
            completions,
            single_day_k,
            multi_day_k,
        }
    }

    fn k_for(&self, depth: RetrievalDepth) -> usize {
        match depth {
            RetrievalDepth::SingleDay => self.single_day_k,
            RetrievalDepth::MultiDay => self.multi_day_k,
        }
    }

    async fn retrieve_context(
        &self,
        query: &str,
        depth: RetrievalDepth,
    ) -> Result<String, ForecastError> {
        let query_embedding = self.embeddings.embed(query).await?;
        let hits = self.index.top_k(&query_embedding, self.k_for(depth));
        debug!(retrieved = hits.len(), "retrieved historical context");

        Ok(hits
            .iter()
            .map(|doc| doc.text.as_str())
            .collect::<Vec<_>>()
            .join("\n\n"))
    }

    async fn run_grounded(
        &self,
        question: &str,
        depth: RetrievalDepth,
    ) -> Result<String, ForecastError> {
        let context = self.retrieve_context(question, depth).await?;
        let prompt = format!("Context:\n{context}\n\nQuestion:\n{question}");
        self.completions
            .complete(GROUNDING_SYSTEM_PROMPT, &prompt)
            .await
    }

    /// Grounded-explanation mode: a 2-3 line narrative for a fixed
    /// prediction, normalized to a single line.
    pub async fn explain_prediction(
        &self,
        client: &str,
        date: NaiveDate,
        features: &FeatureInput,
        decision: &Decision,
        depth: RetrievalDepth,
    ) -> Result<String, ForecastError> {
        let question = explanation_prompt(client, date, features, decision);
        let raw = self.run_grounded(&question, depth).await?;
        Ok(normalize_comment(&raw))
    }

    /// Open-question mode: free-form question, plain-language answer.
    pub async fn answer(&self, question: &str) -> Result<String, ForecastError> {
        let raw = self.run_grounded(question, RetrievalDepth::MultiDay).await?;
        Ok(normalize_comment(&raw))
    }

    /// Structured-query mode: the generation step itself produces the full
    /// prediction as JSON. Parse failures surface the raw text; no field is
    /// ever silently defaulted.
    pub async fn structured_what_if(
        &self,
        client: &str,
        date: NaiveDate,
        features: &FeatureInput,
    ) -> Result<PredictionResult, ForecastError> {
        let question = structured_what_if_prompt(client, date, features);
        let raw = self
            .run_grounded(&question, RetrievalDepth::SingleDay)
            .await?;
        let mut result = parse_prediction_json(&raw)?;
        result.comments = normalize_comment(&result.comments);
        Ok(result)
    }
}

/// Builds the grounded-explanation question embedding the exact values the
/// engine decided on.
pub fn explanation_prompt(
    client: &str,
    date: NaiveDate,
    features: &FeatureInput,
    decision: &Decision,
) -> String {
    format!(
        "The ML model predicts that a margin call **{}** required for client {} on {}.\n\
         Prediction Details:\n\
         - MTM: {}\n\
         - Collateral: {}\n\
         - Threshold: {}\n\
         - Volatility: {}\n\
         - InterestRate: {}\n\
         - MTA: {}\n\
         - Margin Call Required: {}\n\
         - Margin Call Amount: {}\n\
         - Confidence Score: {}\n\n\
         Using historical margin call data, briefly explain the model's prediction in 2-3 lines.",
        if decision.required { "IS" } else { "is NOT" },
        client,
        date.format("%Y-%m-%d"),
        features.mtm,
        features.collateral,
        features.threshold,
        features.volatility,
        features.interest_rate,
        features.mta,
        decision.required_label(),
        decision.amount_string(),
        decision.confidence_string(),
    )
}

fn structured_what_if_prompt(client: &str, date: NaiveDate, features: &FeatureInput) -> String {
    format!(
        "Client: {}\n\
         Date: {}\n\
         Given Volatility={} and Interest Rate={}, should a margin call be issued today?\n\
         Margin Call Amount = MTM - Collateral - Threshold.\n\
         Provide a brief explanation.\n\n\
         Respond in JSON format with these keys:\n\
         - 'Client'\n\
         - 'Date'\n\
         - 'MarginCallRequired'\n\
         - 'MarginCallAmount'\n\
         - 'ConfidenceScore' (between 0% and 100%)\n\
         - 'Comments' (brief explanation)",
        client,
        date.format("%Y-%m-%d"),
        features.volatility,
        features.interest_rate,
    )
}

fn parse_prediction_json(raw: &str) -> Result<PredictionResult, ForecastError> {
    serde_json::from_str(raw.trim()).map_err(|_| ForecastError::MalformedGeneration {
        raw: raw.to_string(),
    })
}

/// Collapses whitespace runs to single spaces and trims. The output is one
/// normalized line with no raw newlines.
pub fn normalize_comment(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
