//! Anthropic Messages API

use crate::error::{Result, ScoutError};
use crate::llm::{CompletionRequest, LlmProvider};
use crate::types::LlmConfig;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{build_client, status_error};

/// Claude models through the Messages API
pub struct AnthropicProvider {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
    temperature: f32,
}

impl AnthropicProvider {
    pub fn new(config: &LlmConfig) -> Result<Self> {
        if config.api_key.is_empty() {
            return Err(ScoutError::config("Anthropic API key is required"));
        }

        Ok(Self {
            client: build_client("anthropic")?,
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            base_url: config
                .base_url
                .clone()
                .unwrap_or_else(|| "https://api.anthropic.com/v1".to_string()),
            temperature: config.temperature,
        })
    }

    fn build_request(&self, request: &CompletionRequest) -> AnthropicRequest {
        AnthropicRequest {
            model: self.model.clone(),
            system: request.system.clone(),
            messages: request
                .messages
                .iter()
                .map(|m| AnthropicMessage {
                    role: m.role.to_string(),
                    content: m.content.clone(),
                })
                .collect(),
            temperature: request.temperature.unwrap_or(self.temperature),
            max_tokens: request.max_tokens,
        }
    }
}

#[async_trait]
impl LlmProvider for AnthropicProvider {
    async fn complete(&self, request: &CompletionRequest) -> Result<String> {
        let body = self.build_request(request);
        let url = format!("{}/messages", self.base_url.trim_end_matches('/'));

        let response = self
            .client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", "2023-06-01")
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_else(|_| "Unknown error".to_string());
            return Err(status_error("anthropic", status, &error_text));
        }

        let anthropic_response: AnthropicResponse = response.json().await?;

        let text: Vec<String> = anthropic_response
            .content
            .into_iter()
            .filter_map(|block| block.text)
            .collect();

        if text.is_empty() {
            return Err(ScoutError::llm_provider("anthropic", "No text in Anthropic response", None));
        }
        Ok(text.join("\n"))
    }

    fn name(&self) -> &'static str {
        "anthropic"
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn is_ready(&self) -> bool {
        !self.api_key.is_empty()
    }
}

// Anthropic API structures
#[derive(Serialize)]
struct AnthropicRequest {
    model: String,
    system: String,
    messages: Vec<AnthropicMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct AnthropicMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct AnthropicResponse {
    content: Vec<AnthropicContent>,
}

#[derive(Deserialize)]
struct AnthropicContent {
    #[serde(default)]
    text: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ChatMessage;

    #[test]
    fn test_system_prompt_is_top_level() {
        let provider = AnthropicProvider::new(&LlmConfig {
            provider: "anthropic".to_string(),
            model: "claude-sonnet-4-5".to_string(),
            api_key: "test-key".to_string(),
            base_url: None,
            temperature: 0.7,
        })
        .unwrap();

        let request = CompletionRequest {
            system: "be brief".to_string(),
            messages: vec![ChatMessage::user("bakery in Lisbon")],
            temperature: Some(0.2),
            max_tokens: 512,
        };

        let body = provider.build_request(&request);
        assert_eq!(body.system, "be brief");
        assert_eq!(body.messages.len(), 1);
        assert_eq!(body.messages[0].role, "user");
        assert_eq!(body.temperature, 0.2);
    }

    #[test]
    fn test_text_blocks_joined() {
        let response: AnthropicResponse = serde_json::from_str(
            r#"{"content":[{"type":"text","text":"Hello"},{"type":"tool_use","id":"x"},{"type":"text","text":"World"}]}"#,
        )
        .unwrap();
        let text: Vec<String> = response.content.into_iter().filter_map(|b| b.text).collect();
        assert_eq!(text, vec!["Hello", "World"]);
    }
}
