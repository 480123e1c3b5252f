//! Hosted generation API provider.
//!
//! Sends `{model, prompt}` to the configured endpoint with a bearer key and
//! reads the generated text back.

use super::types::*;
use crate::config::LlmConfig;
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, error, warn};

/// Text returned when no API key is configured.
pub const DEMO_MODE_TEXT: &str = "Gemini not configured (demo mode)";

/// HTTP provider for the Gemini-style generate endpoint.
#[derive(Debug, Clone)]
pub struct GeminiProvider {
    base_url: String,
    api_key: Option<String>,
    model: String,
    http_client: reqwest::Client,
}

impl GeminiProvider {
    /// Creates a new provider from the LLM configuration.
    pub fn new(config: &LlmConfig) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            http_client,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Whether requests go to the API or return the demo placeholder.
    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }
}

#[async_trait]
impl Provider for GeminiProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse> {
        let Some(api_key) = &self.api_key else {
            warn!("GEMINI_API_KEY not set, returning demo placeholder");
            return Ok(CompletionResponse {
                model: request.model,
                text: DEMO_MODE_TEXT.to_string(),
            });
        };

        debug!(model = %request.model, prompt_len = request.prompt.len(), "Sending completion request");

        let response = self
            .http_client
            .post(&self.base_url)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .inspect_err(|e| error!("Gemini call failed: {}", e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await?;
            error!(status = status.as_u16(), "Gemini call failed: {}", body);
            return Err(ProviderError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;
        Ok(CompletionResponse {
            model: request.model,
            text: extract_text(&body),
        })
    }
}

/// Pulls the generated text out of a response body.
///
/// Prefers a top-level `text` field, then a bare JSON string, and finally
/// falls back to the raw body.
fn extract_text(body: &str) -> String {
    match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(map)) => {
            if let Some(Value::String(text)) = map.get("text") {
                return text.trim().to_string();
            }
            Value::Object(map).to_string()
        }
        Ok(Value::String(text)) => text.trim().to_string(),
        _ => body.trim().to_string(),
    }
}
