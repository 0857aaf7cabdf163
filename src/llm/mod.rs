//! LLM side of the scout: providers, prompt and reply parsing
//!
//! Turns a user's project description and chat history into a
//! conversational reply plus domain suggestions.

pub mod generator;
pub mod parser;
pub mod providers;

// Re-export main functionality
pub use generator::SuggestionGenerator;
pub use parser::parse_conversational_response;

use crate::error::Result;
use crate::types::{ChatMessage, LlmConfig};
use async_trait::async_trait;

/// One chat completion call
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub system: String,
    pub messages: Vec<ChatMessage>,
    /// Overrides the provider's configured temperature
    pub temperature: Option<f32>,
    pub max_tokens: u32,
}

/// Core trait for all LLM providers
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Run a chat completion and return the raw assistant text
    async fn complete(&self, request: &CompletionRequest) -> Result<String>;

    /// Get provider name
    fn name(&self) -> &'static str;

    /// Model identifier sent with each request
    fn model(&self) -> &str;

    /// Check if provider is configured and ready
    fn is_ready(&self) -> bool;
}

/// Provider names accepted by [`create_provider`]
pub fn available_providers() -> Vec<&'static str> {
    vec!["openrouter", "openai", "anthropic"]
}

/// Create an LLM provider from configuration
pub fn create_provider(config: &LlmConfig) -> Result<Box<dyn LlmProvider>> {
    match config.provider.as_str() {
        "openrouter" => Ok(Box::new(providers::OpenAiProvider::openrouter(config)?)),
        "openai" => Ok(Box::new(providers::OpenAiProvider::new(config)?)),
        "anthropic" => Ok(Box::new(providers::AnthropicProvider::new(config)?)),
        _ => Err(crate::config_error!(
            "Unsupported LLM provider: {}. Supported providers: {}",
            config.provider,
            available_providers().join(", ")
        )),
    }
}
