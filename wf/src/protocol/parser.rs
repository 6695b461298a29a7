//! Raw provider output to JSON
//!
//! Purely syntactic: strip one surrounding markdown fence if the model added
//! one, then parse. Everything semantic lives in the validator, so this
//! stage can be tested against raw model transcripts in isolation.

use thiserror::Error;
use tracing::debug;

/// The provider reply was not a JSON payload
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("provider output is not a JSON payload")]
    MalformedOutput {
        /// The raw reply, kept for diagnostics
        raw: String,
    },
}

/// Parse a raw provider reply into a JSON value
pub fn parse_payload(raw: &str) -> Result<serde_json::Value, ParseError> {
    let candidate = strip_fences(raw);
    serde_json::from_str(candidate).map_err(|e| {
        debug!(error = %e, reply_len = raw.len(), "parse_payload: reply is not JSON");
        ParseError::MalformedOutput { raw: raw.to_string() }
    })
}

/// Remove one ```json or ``` fence wrapping the payload, if present.
/// Models wrap JSON in fences despite instructions often enough that
/// rejecting fenced output would throw away good turns.
fn strip_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    if let Some(start) = trimmed.find("```json") {
        let after = &trimmed[start + 7..];
        let end = after.find("```").unwrap_or(after.len());
        after[..end].trim()
    } else if let Some(start) = trimmed.find("```") {
        let after = &trimmed[start + 3..];
        let end = after.find("```").unwrap_or(after.len());
        after[..end].trim()
    } else {
        trimmed
    }
}
