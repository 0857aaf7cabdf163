//! Conversational domain suggestion generator

use crate::error::{Result, ScoutError};
use crate::llm::{create_provider, parse_conversational_response, CompletionRequest, LlmProvider};
use crate::types::{ChatMessage, ChatRole, ConversationalResponse, LlmConfig, SuggestionConfig};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

/// Generates conversational replies and domain suggestions through the
/// configured LLM providers, falling back from one provider to the next.
#[derive(Clone)]
pub struct SuggestionGenerator {
    providers: Arc<RwLock<HashMap<String, Arc<dyn LlmProvider>>>>,
    default_provider: Arc<RwLock<String>>,
    config: SuggestionConfig,
}

impl SuggestionGenerator {
    /// Create a new generator with no providers
    pub fn new(config: SuggestionConfig) -> Self {
        Self {
            providers: Arc::new(RwLock::new(HashMap::new())),
            default_provider: Arc::new(RwLock::new(String::new())),
            config,
        }
    }

    /// Add an LLM provider from configuration; the first one added becomes the default
    pub fn add_provider(&self, config: &LlmConfig) -> Result<()> {
        let provider = create_provider(config)?;
        self.insert_provider(config.provider.clone(), Arc::from(provider));
        Ok(())
    }

    /// Register an already constructed provider under its own name
    pub fn add_provider_instance(&self, provider: Arc<dyn LlmProvider>) {
        self.insert_provider(provider.name().to_string(), provider);
    }

    fn insert_provider(&self, name: String, provider: Arc<dyn LlmProvider>) {
        let mut providers = self.providers.write();
        providers.insert(name.clone(), provider);

        let mut default = self.default_provider.write();
        if default.is_empty() {
            *default = name;
        }
    }

    /// Set default provider; ignored if the provider is not registered
    pub fn set_default_provider(&self, provider: &str) {
        let providers = self.providers.read();
        if providers.contains_key(provider) {
            let mut default = self.default_provider.write();
            *default = provider.to_string();
        }
    }

    pub fn default_provider(&self) -> String {
        self.default_provider.read().clone()
    }

    /// Get available providers, sorted by name
    pub fn available_providers(&self) -> Vec<String> {
        let providers = self.providers.read();
        let mut names: Vec<String> = providers.keys().cloned().collect();
        names.sort();
        names
    }

    /// Check if provider is available
    pub fn has_provider(&self, provider: &str) -> bool {
        self.providers.read().contains_key(provider)
    }

    /// Check if any providers are configured
    pub fn is_ready(&self) -> bool {
        !self.providers.read().is_empty()
    }

    pub fn config(&self) -> &SuggestionConfig {
        &self.config
    }

    /// Reply to `message` given the prior conversation
    pub async fn respond(&self, message: &str, history: &[ChatMessage]) -> Result<ConversationalResponse> {
        let message = message.trim();
        if message.is_empty() {
            return Err(ScoutError::validation("Message cannot be empty"));
        }

        let request = self.build_request(message, history);
        let content = self.complete_with_fallback(&request).await?;
        let response = parse_conversational_response(&content, &self.config);

        tracing::info!(
            intent = %response.intent,
            suggestions = %response.domain_suggestions.len(),
            needs_more_info = response.needs_more_info,
            "Conversational response parsed"
        );

        Ok(response)
    }

    /// Assemble the system prompt, the recent history and the new message
    pub fn build_request(&self, message: &str, history: &[ChatMessage]) -> CompletionRequest {
        let skip = history.len().saturating_sub(self.config.history_limit);
        // The window has to open on a user turn
        let mut messages: Vec<ChatMessage> = history[skip..]
            .iter()
            .skip_while(|m| m.role == ChatRole::Assistant)
            .cloned()
            .collect();
        messages.push(ChatMessage::user(message));

        CompletionRequest {
            system: build_system_prompt(&self.config),
            messages,
            temperature: Some(self.config.temperature),
            max_tokens: self.config.max_tokens,
        }
    }

    async fn complete_with_fallback(&self, request: &CompletionRequest) -> Result<String> {
        let overall_start = Instant::now();
        let default_provider = self.default_provider();

        // Default first, then everything else in name order
        let order: Vec<(String, Arc<dyn LlmProvider>)> = {
            let providers = self.providers.read();
            let mut others: Vec<(String, Arc<dyn LlmProvider>)> = providers
                .iter()
                .filter(|(name, _)| **name != default_provider)
                .map(|(name, provider)| (name.clone(), Arc::clone(provider)))
                .collect();
            others.sort_by(|a, b| a.0.cmp(&b.0));

            providers
                .get(&default_provider)
                .map(|p| (default_provider.clone(), Arc::clone(p)))
                .into_iter()
                .chain(others)
                .collect()
        };

        let mut last_error = None;
        for (index, (name, provider)) in order.into_iter().enumerate() {
            let start = Instant::now();
            match provider.complete(request).await {
                Ok(content) => {
                    tracing::info!(
                        provider = %name,
                        model = %provider.model(),
                        fallback_used = index > 0,
                        duration_ms = %start.elapsed().as_millis(),
                        total_ms = %overall_start.elapsed().as_millis(),
                        "LLM completion succeeded"
                    );
                    return Ok(content);
                }
                Err(e) => {
                    tracing::warn!(provider = %name, error = %e, "LLM provider failed");
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| ScoutError::config("No LLM providers configured")))
    }
}

fn build_system_prompt(config: &SuggestionConfig) -> String {
    let tlds: Vec<String> = config.tlds.iter().map(|t| format!(".{}", t)).collect();

    format!(
        "You are a world-class creative branding assistant helping a user find a domain name for their project.
Chat naturally. When you understand the project well enough, suggest up to {count} unique, catchy and brandable domain names using {tlds}.
Avoid generic or overused words; keep each name short, memorable and easy to spell. If the request is too vague, ask one clarifying question instead of guessing.

Respond ONLY with a JSON object in this format:
{{
  \"assistantReply\": \"your conversational reply to the user\",
  \"intent\": \"domain_request | project_discussion | clarification | general\",
  \"needsMoreInfo\": false,
  \"domainSuggestions\": [
    {{
      \"domain\": \"example.com\",
      \"explanation\": \"one sentence on why it fits\",
      \"relevanceScore\": 8,
      \"category\": \"brandable | descriptive | keyword-rich\",
      \"reasoning\": \"why this domain fits the user's needs\"
    }}
  ]
}}",
        count = config.max_suggestions,
        tlds = tlds.join(", "),
    )
}
