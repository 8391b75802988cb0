//! LLM provider trait and configuration.

use std::sync::Arc;

use crate::error::{GeoSiftError, Result};

/// Environment variable holding the API credential.
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";
/// Environment variable overriding the model identifier.
pub const MODEL_ENV: &str = "GEOSIFT_MODEL";
/// Environment variable overriding the service endpoint.
pub const BASE_URL_ENV: &str = "GEOSIFT_BASE_URL";

/// Default model identifier.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
/// Default OpenAI-compatible endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Configuration for LLM providers.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// Model to use (e.g., "gpt-4o-mini", "deepseek-chat").
    pub model: String,

    /// Base URL of an OpenAI-compatible API, without the `/chat/completions` suffix.
    pub base_url: String,

    /// API credential. Resolved from `OPENAI_API_KEY` when `None`.
    pub api_key: Option<String>,

    /// Sampling temperature. Kept at 0 for reproducible labels.
    pub temperature: f64,

    /// Optional cap on response tokens.
    pub max_tokens: Option<u32>,

    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            temperature: 0.0,
            max_tokens: None,
            timeout_secs: 120,
        }
    }
}

impl LlmConfig {
    /// Defaults overridden by `GEOSIFT_MODEL`, `GEOSIFT_BASE_URL` and `OPENAI_API_KEY`.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(model) = non_empty_env(MODEL_ENV) {
            config.model = model;
        }
        if let Some(url) = non_empty_env(BASE_URL_ENV) {
            config.base_url = url;
        }
        config.api_key = non_empty_env(API_KEY_ENV);
        config
    }

    /// Set the model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the API key.
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Set the request timeout.
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// The explicit key, else `OPENAI_API_KEY`, else a configuration error.
    pub fn resolve_api_key(&self) -> Result<String> {
        self.api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .or_else(|| non_empty_env(API_KEY_ENV))
            .ok_or_else(|| {
                GeoSiftError::Config(format!(
                    "No API key given and {} environment variable not set",
                    API_KEY_ENV
                ))
            })
    }

    /// Full chat-completions endpoint URL.
    pub fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// A text-completion service that answers with a JSON object.
///
/// Implementations must be thread-safe (Send + Sync) so one provider can be
/// shared across flows.
pub trait LlmProvider: Send + Sync {
    /// Send a prompt and return the raw reply text, which is expected to be
    /// a JSON object.
    fn complete_json(&self, prompt: &str) -> Result<String>;

    /// Get the configuration for this provider.
    fn config(&self) -> &LlmConfig;

    /// Get the name of this provider (for logging/debugging).
    fn name(&self) -> &str;
}

impl<P: LlmProvider + ?Sized> LlmProvider for Arc<P> {
    fn complete_json(&self, prompt: &str) -> Result<String> {
        (**self).complete_json(prompt)
    }

    fn config(&self) -> &LlmConfig {
        (**self).config()
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completions_url_trims_slash() {
        let config = LlmConfig::default().with_base_url("https://api.deepseek.com/v1/");
        assert_eq!(
            config.completions_url(),
            "https://api.deepseek.com/v1/chat/completions"
        );
    }

    #[test]
    fn test_explicit_key_wins() {
        let config = LlmConfig::default().with_api_key("sk-test");
        assert_eq!(config.resolve_api_key().unwrap(), "sk-test");
    }

    #[test]
    fn test_defaults_are_deterministic() {
        let config = LlmConfig::default();
        assert_eq!(config.temperature, 0.0);
        assert_eq!(config.model, DEFAULT_MODEL);
    }
}
