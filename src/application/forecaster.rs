use crate::application::encoder::ClientEncoder;
use crate::application::ensemble::HybridDecisionEngine;
use crate::application::explainer::{Explainer, RetrievalDepth};
use crate::application::scenario::ScenarioGenerator;
use crate::domain::errors::ForecastError;
use crate::domain::types::{Decision, FeatureInput, PredictionResult};
use chrono::{Local, NaiveDate};
use tracing::info;

/// Every shared resource a request needs, loaded once at process start and
/// immutable for the process lifetime. Requests share it read-only; no
/// locking is needed because nothing mutates after initialization.
pub struct ForecastContext {
    pub encoder: ClientEncoder,
    pub engine: HybridDecisionEngine,
    pub scenarios: ScenarioGenerator,
    pub explainer: Explainer,
    pub horizon_days: usize,
}

/// The three logical operations consumed by the serving layer, plus the
/// generation-only what-if carried over from the pure-LLM path.
pub struct Forecaster {
    ctx: ForecastContext,
}

impl Forecaster {
    pub fn new(ctx: ForecastContext) -> Self {
        Self { ctx }
    }

    /// Forecasts the next `horizon_days` days for a client from synthetic
    /// inputs bounded by history.
    pub async fn forecast(&self, client: &str) -> Result<Vec<PredictionResult>, ForecastError> {
        self.forecast_on(client, Local::now().date_naive()).await
    }

    pub async fn forecast_on(
        &self,
        client: &str,
        today: NaiveDate,
    ) -> Result<Vec<PredictionResult>, ForecastError> {
        // Reject unknown clients before doing any work.
        self.ctx.encoder.encode(client)?;

        let samples = self
            .ctx
            .scenarios
            .generate(client, today, self.ctx.horizon_days);

        let mut results = Vec::with_capacity(samples.len());
        for sample in samples {
            let features = self.ctx.encoder.encode_features(&sample.features)?;
            let decision = self.ctx.engine.evaluate(&features, &sample.features)?;
            let comments = self
                .ctx
                .explainer
                .explain_prediction(
                    client,
                    sample.date,
                    &sample.features,
                    &decision,
                    RetrievalDepth::MultiDay,
                )
                .await?;

            results.push(assemble(client, sample.date, &decision, comments));
        }

        info!(client, days = results.len(), "forecast complete");
        Ok(results)
    }

    /// Evaluates a caller-supplied scenario for today.
    pub async fn what_if(&self, input: FeatureInput) -> Result<PredictionResult, ForecastError> {
        self.what_if_on(input, Local::now().date_naive()).await
    }

    pub async fn what_if_on(
        &self,
        input: FeatureInput,
        today: NaiveDate,
    ) -> Result<PredictionResult, ForecastError> {
        let features = self.ctx.encoder.encode_features(&input)?;
        let decision = self.ctx.engine.evaluate(&features, &input)?;
        let comments = self
            .ctx
            .explainer
            .explain_prediction(
                &input.client,
                today,
                &input,
                &decision,
                RetrievalDepth::SingleDay,
            )
            .await?;

        Ok(assemble(&input.client, today, &decision, comments))
    }

    /// Generation-only what-if: the grounded generation step produces the
    /// full structured prediction instead of the ensemble.
    pub async fn what_if_llm(
        &self,
        input: FeatureInput,
    ) -> Result<PredictionResult, ForecastError> {
        self.what_if_llm_on(input, Local::now().date_naive()).await
    }

    pub async fn what_if_llm_on(
        &self,
        input: FeatureInput,
        today: NaiveDate,
    ) -> Result<PredictionResult, ForecastError> {
        self.ctx.encoder.encode(&input.client)?;
        self.ctx
            .explainer
            .structured_what_if(&input.client, today, &input)
            .await
    }

    /// Free-form question answered against the historical index.
    pub async fn ask(&self, query: &str) -> Result<String, ForecastError> {
        self.ctx.explainer.answer(query).await
    }
}

fn assemble(
    client: &str,
    date: NaiveDate,
    decision: &Decision,
    comments: String,
) -> PredictionResult {
    PredictionResult {
        client: client.to_string(),
        date: date.format("%Y-%m-%d").to_string(),
        margin_call_required: decision.required_label().to_string(),
        margin_call_amount: decision.amount_string(),
        confidence_score: decision.confidence_string(),
        comments,
    }
}
