//! Model fallback: try each configured model in order until one yields a
//! usable website.

use super::error::{GenerationError, ModelFailure};
use super::extractor::extract_site;
use super::fetcher::{fetch_with_retry, RetryPolicy};
use super::gemini;
use super::metrics::{record_generation, record_model_failure};
use super::transport::HttpTransport;
use crate::dtos::ExtractedSite;
use std::sync::Arc;

/// Settings for a [`SiteGenerator`].
#[derive(Debug, Clone)]
pub struct GeneratorSettings {
    /// Provider base URL, normally [`gemini::GEMINI_API_BASE`].
    pub api_base: String,
    /// Fallback priority list, tried first to last.
    pub models: Vec<String>,
    /// Attach the fixed safety-settings block to each request.
    pub safety_settings: bool,
    pub retry: RetryPolicy,
}

/// Generates websites through the provider, falling back across models.
#[derive(Clone)]
pub struct SiteGenerator {
    transport: Arc<dyn HttpTransport>,
    settings: GeneratorSettings,
}

impl SiteGenerator {
    pub fn new(transport: Arc<dyn HttpTransport>, settings: GeneratorSettings) -> Self {
        Self {
            transport,
            settings,
        }
    }

    /// Generate a website about `topic`.
    ///
    /// Per-model failures are logged and skipped; only when every model has
    /// failed is [`GenerationError::AllModelsExhausted`] returned.
    pub async fn generate(
        &self,
        topic: &str,
        api_key: &str,
    ) -> Result<ExtractedSite, GenerationError> {
        let prompt = gemini::build_prompt(topic);
        let request = gemini::build_request(&prompt, self.settings.safety_settings);
        let body = serde_json::to_value(&request)
            .map_err(|e| GenerationError::Parse(format!("Failed to encode request: {}", e)))?;

        let mut failures = Vec::with_capacity(self.settings.models.len());

        for model in &self.settings.models {
            tracing::debug!(model = %model, topic_len = topic.len(), "Trying model");

            match self.attempt(model, api_key, &body).await {
                Ok(site) => {
                    tracing::info!(
                        model = %model,
                        failed_models = failures.len(),
                        "Website generated"
                    );
                    record_generation("success", model, failures.len() + 1);
                    return Ok(site);
                }
                Err(e) => {
                    tracing::warn!(model = %model, error = %e, "Model failed, trying next");
                    record_model_failure(model, e.kind());
                    failures.push(ModelFailure {
                        model: model.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        tracing::error!(attempted = failures.len(), "All models failed");
        record_generation("exhausted", "", failures.len());
        Err(GenerationError::AllModelsExhausted { failures })
    }

    async fn attempt(
        &self,
        model: &str,
        api_key: &str,
        body: &serde_json::Value,
    ) -> Result<ExtractedSite, GenerationError> {
        let url = gemini::api_url(&self.settings.api_base, model, api_key);
        let response = fetch_with_retry(
            self.transport.as_ref(),
            &url,
            body,
            &self.settings.retry,
            model,
        )
        .await?;

        let text = gemini::envelope_text(&response.body)?;
        extract_site(&text)
    }
}
