//! OpenAI-compatible chat-completions provider.
//!
//! Works with any endpoint that speaks the `/chat/completions` protocol and
//! honours `response_format: {"type": "json_object"}` (OpenAI, DeepSeek,
//! Qwen/DashScope compatible mode, vLLM, Ollama's `/v1`).

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use crate::error::{GeoSiftError, Result};

use super::provider::{LlmConfig, LlmProvider};

/// OpenAI-compatible provider.
pub struct OpenAIProvider {
    client: Client,
    api_key: String,
    url: String,
    config: LlmConfig,
}

impl OpenAIProvider {
    /// Create a provider with default configuration and the given API key.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_config(LlmConfig::default().with_api_key(api_key))
    }

    /// Create a provider from configuration.
    ///
    /// Fails before any network traffic if no API key can be resolved.
    pub fn with_config(config: LlmConfig) -> Result<Self> {
        let api_key = config.resolve_api_key()?;
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| GeoSiftError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key,
            url: config.completions_url(),
            config,
        })
    }

    /// Create from `OPENAI_API_KEY`, `GEOSIFT_MODEL` and `GEOSIFT_BASE_URL`.
    pub fn from_env() -> Result<Self> {
        Self::with_config(LlmConfig::from_env())
    }

    /// Build headers for API requests.
    fn build_headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", self.api_key))
                .map_err(|e| GeoSiftError::Config(format!("Invalid API key: {}", e)))?,
        );
        Ok(headers)
    }
}

/// Request body for one prompt.
pub(crate) fn request_body(config: &LlmConfig, prompt: &str) -> Value {
    let mut body = json!({
        "model": config.model,
        "temperature": config.temperature,
        "messages": [
            {
                "role": "user",
                "content": prompt
            }
        ],
        "response_format": { "type": "json_object" }
    });
    if let Some(max_tokens) = config.max_tokens {
        body["max_tokens"] = json!(max_tokens);
    }
    body
}

impl LlmProvider for OpenAIProvider {
    fn complete_json(&self, prompt: &str) -> Result<String> {
        let body = request_body(&self.config, prompt);
        debug!(url = %self.url, model = %self.config.model, bytes = prompt.len(), "sending completion request");

        let response = self
            .client
            .post(&self.url)
            .headers(self.build_headers()?)
            .json(&body)
            .send()
            .map_err(|e| GeoSiftError::Remote(format!("API request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().unwrap_or_default();
            return Err(GeoSiftError::Remote(format!(
                "API error ({}): {}",
                status, error_text
            )));
        }

        let api_response: ChatResponse = response
            .json()
            .map_err(|e| GeoSiftError::Remote(format!("Failed to parse API response: {}", e)))?;

        api_response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| GeoSiftError::Remote("Empty response from completion API".to_string()))
    }

    fn config(&self) -> &LlmConfig {
        &self.config
    }

    fn name(&self) -> &str {
        "openai"
    }
}

/// Chat-completions response structure.
#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Message,
}

#[derive(Debug, Deserialize)]
struct Message {
    #[serde(default)]
    content: Option<String>,
}
