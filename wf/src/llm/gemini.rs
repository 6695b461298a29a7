//! Gemini API client implementation
//!
//! Implements the GenerationClient trait over the Gemini `generateContent`
//! REST endpoint. One request per call, no streaming, no retries.

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

use super::{GenerationClient, ProviderError};
use crate::config::LlmConfig;

/// Gemini API client
pub struct GeminiClient {
    model: String,
    api_key: String,
    base_url: String,
    http: Client,
    max_output_tokens: u32,
}

impl GeminiClient {
    /// Create a new client from configuration
    ///
    /// Reads the API key from the environment variable named in config.
    pub fn from_config(config: &LlmConfig) -> Result<Self, ProviderError> {
        let api_key = config
            .get_api_key()
            .map_err(|e| ProviderError::Unavailable { message: e.to_string() })?;

        // No client-level timeout: the per-request budget governs each call
        let http = Client::builder().build().map_err(ProviderError::Network)?;

        Ok(Self {
            model: config.model.clone(),
            api_key,
            base_url: config.base_url.clone(),
            http,
            max_output_tokens: config.max_output_tokens,
        })
    }

    /// Build the request body for the generateContent endpoint
    fn build_request_body(&self, prompt: &str) -> serde_json::Value {
        serde_json::json!({
            "contents": [{
                "role": "user",
                "parts": [{ "text": prompt }],
            }],
            "generationConfig": {
                "maxOutputTokens": self.max_output_tokens,
            },
        })
    }
}

#[async_trait]
impl GenerationClient for GeminiClient {
    async fn generate(&self, prompt: &str, budget: Duration) -> Result<String, ProviderError> {
        let url = format!("{}/v1beta/models/{}:generateContent", self.base_url, self.model);
        debug!(model = %self.model, prompt_len = prompt.len(), budget_ms = budget.as_millis() as u64, "generate: called");

        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .header("content-type", "application/json")
            .json(&self.build_request_body(prompt))
            .timeout(budget)
            .send()
            .await
            .map_err(|e| classify_request_error(e, budget))?;

        let status = response.status().as_u16();
        if status >= 500 {
            let message = response.text().await.unwrap_or_default();
            debug!(status, "generate: provider unavailable");
            return Err(ProviderError::Unavailable { message });
        }
        if !(200..300).contains(&status) {
            let message = response.text().await.unwrap_or_default();
            debug!(status, "generate: API error");
            return Err(ProviderError::Api { status, message });
        }

        let body: serde_json::Value =
            response.json().await.map_err(|e| classify_request_error(e, budget))?;

        match extract_text(&body) {
            Some(text) => {
                debug!(reply_len = text.len(), "generate: success");
                Ok(text)
            }
            None => Err(ProviderError::UnexpectedShape { detail: snippet(&body) }),
        }
    }
}

/// Map a reqwest failure to the provider taxonomy
fn classify_request_error(err: reqwest::Error, budget: Duration) -> ProviderError {
    if err.is_timeout() {
        ProviderError::Timeout(budget)
    } else if err.is_connect() {
        ProviderError::Unavailable { message: err.to_string() }
    } else {
        ProviderError::Network(err)
    }
}

/// Pull the generated text out of a response body.
///
/// Tries, in order: a top-level `text` string; a nested `response.text`
/// (the shape SDK-wrapped proxies return); the candidate list, concatenating
/// every text part of the first candidate.
fn extract_text(body: &serde_json::Value) -> Option<String> {
    if let Some(text) = body["text"].as_str() {
        return Some(text.to_string());
    }

    if let Some(text) = body["response"]["text"].as_str() {
        return Some(text.to_string());
    }

    let parts = body["candidates"][0]["content"]["parts"].as_array()?;
    let text: String = parts.iter().filter_map(|part| part["text"].as_str()).collect();
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

/// Truncated body for UnexpectedShape diagnostics
fn snippet(body: &serde_json::Value) -> String {
    body.to_string().chars().take(200).collect()
}
