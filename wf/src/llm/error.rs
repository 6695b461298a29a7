//! Provider error types

use std::time::Duration;
use thiserror::Error;

/// Errors from one generation request
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Timed out after {0:?}")]
    Timeout(Duration),

    #[error("Provider unavailable: {message}")]
    Unavailable { message: String },

    #[error("Unexpected response shape: {detail}")]
    UnexpectedShape { detail: String },

    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl ProviderError {
    /// Whether a fresh attempt could plausibly succeed. The client itself
    /// never retries; this is advice for callers that choose to.
    pub fn is_retryable(&self) -> bool {
        match self {
            ProviderError::Timeout(_) => true,
            ProviderError::Unavailable { .. } => true,
            ProviderError::Network(_) => true,
            ProviderError::Api { status, .. } => *status == 429,
            ProviderError::UnexpectedShape { .. } => false,
        }
    }
}
