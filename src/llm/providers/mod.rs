//! LLM provider implementations
//!
//! One module per wire format, plus the HTTP plumbing they share.

pub mod anthropic;
pub mod openai;

// Re-export providers for easy access
pub use anthropic::AnthropicProvider;
pub use openai::OpenAiProvider;

use crate::error::ScoutError;
use reqwest::{Client, StatusCode};
use std::time::Duration;

pub(crate) fn build_client(provider: &str) -> Result<Client, ScoutError> {
    Client::builder()
        .timeout(Duration::from_secs(60))
        .build()
        .map_err(|e| ScoutError::llm_provider(provider, e.to_string(), None))
}

/// Map a non-success completion response into a provider error
pub(crate) fn status_error(provider: &str, status: StatusCode, body: &str) -> ScoutError {
    let message = match status.as_u16() {
        401 => "Authentication failed (401). Please check your API key".to_string(),
        403 => "Access forbidden (403). Your API key may not have permission for this model".to_string(),
        429 => "Rate limit exceeded (429). Please try again later".to_string(),
        500..=599 => format!("Server error ({}). The API service is experiencing issues", status),
        _ => format!("API request failed ({}): {}", status, body),
    };
    ScoutError::llm_provider(provider, message, Some(status.as_u16()))
}
