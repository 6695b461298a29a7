//! Text-generation provider module for Wayfarer
//!
//! Provides the GenerationClient seam the planner talks through, plus the
//! concrete Gemini implementation.

use std::sync::Arc;

use tracing::debug;

pub mod client;
mod error;
mod gemini;

pub use client::GenerationClient;
pub use error::ProviderError;
pub use gemini::GeminiClient;

use crate::config::LlmConfig;

/// Create a generation client based on the provider specified in config
///
/// Supports the "gemini" provider.
pub fn create_client(config: &LlmConfig) -> Result<Arc<dyn GenerationClient>, ProviderError> {
    debug!(provider = %config.provider, model = %config.model, "create_client: called");
    match config.provider.as_str() {
        "gemini" => Ok(Arc::new(GeminiClient::from_config(config)?)),
        other => Err(ProviderError::Unavailable {
            message: format!("Unknown provider: '{}'. Supported: gemini", other),
        }),
    }
}
