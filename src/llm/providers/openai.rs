//! Chat completions over the OpenAI wire format
//!
//! Serves both OpenAI and OpenRouter, which share the request shape.

use crate::error::{Result, ScoutError};
use crate::llm::{CompletionRequest, LlmProvider};
use crate::types::LlmConfig;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{build_client, status_error};

const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
const OPENROUTER_BASE_URL: &str = "https://openrouter.ai/api/v1";

/// OpenAI-compatible chat completions provider
pub struct OpenAiProvider {
    client: Client,
    name: &'static str,
    api_key: String,
    model: String,
    base_url: String,
    temperature: f32,
}

impl OpenAiProvider {
    pub fn new(config: &LlmConfig) -> Result<Self> {
        Self::build("openai", OPENAI_BASE_URL, config)
    }

    /// Same wire format, routed through OpenRouter
    pub fn openrouter(config: &LlmConfig) -> Result<Self> {
        Self::build("openrouter", OPENROUTER_BASE_URL, config)
    }

    fn build(name: &'static str, default_base: &str, config: &LlmConfig) -> Result<Self> {
        if config.api_key.is_empty() {
            return Err(ScoutError::config(format!("{} API key is required", name)));
        }

        Ok(Self {
            client: build_client(name)?,
            name,
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            base_url: config.base_url.clone().unwrap_or_else(|| default_base.to_string()),
            temperature: config.temperature,
        })
    }

    /// Join the base URL and endpoint, adding `/v1` unless the base already has it
    fn build_url(&self, endpoint: &str) -> String {
        let base_url = self.base_url.trim_end_matches('/');
        if base_url.ends_with("/v1") {
            format!("{}{}", base_url, endpoint)
        } else {
            format!("{}/v1{}", base_url, endpoint)
        }
    }

    fn build_request(&self, request: &CompletionRequest) -> OpenAiRequest {
        let mut messages = Vec::with_capacity(request.messages.len() + 1);
        messages.push(OpenAiMessage {
            role: "system".to_string(),
            content: request.system.clone(),
        });
        messages.extend(request.messages.iter().map(|m| OpenAiMessage {
            role: m.role.to_string(),
            content: m.content.clone(),
        }));

        OpenAiRequest {
            model: self.model.clone(),
            messages,
            temperature: request.temperature.unwrap_or(self.temperature),
            max_tokens: request.max_tokens,
        }
    }
}

#[async_trait]
impl LlmProvider for OpenAiProvider {
    async fn complete(&self, request: &CompletionRequest) -> Result<String> {
        let body = self.build_request(request);
        let url = self.build_url("/chat/completions");

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_else(|_| "Unknown error".to_string());
            return Err(status_error(self.name, status, &error_text));
        }

        let completion: OpenAiResponse = response.json().await?;

        completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| ScoutError::llm_provider(self.name, "No content in completion response", None))
    }

    fn name(&self) -> &'static str {
        self.name
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn is_ready(&self) -> bool {
        !self.api_key.is_empty()
    }
}

// OpenAI API structures
#[derive(Serialize)]
struct OpenAiRequest {
    model: String,
    messages: Vec<OpenAiMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct OpenAiMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct OpenAiResponse {
    choices: Vec<OpenAiChoice>,
}

#[derive(Deserialize)]
struct OpenAiChoice {
    message: OpenAiResponseMessage,
}

#[derive(Deserialize)]
struct OpenAiResponseMessage {
    #[serde(default)]
    content: Option<String>,
}
