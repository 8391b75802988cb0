//! Mock LLM provider for testing.

use std::collections::VecDeque;
use std::sync::Mutex;

use serde_json::json;

use crate::error::{GeoSiftError, Result};

use super::provider::{LlmConfig, LlmProvider};

type Responder = Box<dyn Fn(&str) -> Result<String> + Send + Sync>;

/// A canned reply for [`MockProvider::scripted`].
#[derive(Debug, Clone)]
pub enum MockReply {
    /// Return this text as the completion.
    Text(String),
    /// Fail the call with a remote error carrying this message.
    Fail(String),
}

impl MockReply {
    /// A successful reply.
    pub fn text(s: impl Into<String>) -> Self {
        MockReply::Text(s.into())
    }

    /// A failed call.
    pub fn fail(s: impl Into<String>) -> Self {
        MockReply::Fail(s.into())
    }
}

/// Mock LLM provider that returns predictable responses for testing.
///
/// The default mock reads the dataset lines out of the prompt and answers
/// every classification with `"Other"` and every screening by selecting all
/// datasets. All received prompts are recorded.
pub struct MockProvider {
    config: LlmConfig,
    responder: Responder,
    prompts: Mutex<Vec<String>>,
}

impl MockProvider {
    /// Create a mock that labels everything `Other` and selects everything.
    pub fn new() -> Self {
        Self::with_responder(|prompt| {
            let ids = dataset_ids(prompt);
            let reply = if prompt.contains("\"classifications\"") {
                let entries: Vec<_> = ids
                    .iter()
                    .map(|id| json!({ "id": id, "type": "Other" }))
                    .collect();
                json!({ "classifications": entries })
            } else {
                json!({ "selected_ids": ids })
            };
            Ok(reply.to_string())
        })
    }

    /// Create a mock that computes each reply from the prompt.
    pub fn with_responder<F>(responder: F) -> Self
    where
        F: Fn(&str) -> Result<String> + Send + Sync + 'static,
    {
        Self {
            config: LlmConfig::default().with_model("mock"),
            responder: Box::new(responder),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Create a mock that plays back replies in order, then fails.
    pub fn scripted(replies: Vec<MockReply>) -> Self {
        let queue = Mutex::new(VecDeque::from(replies));
        Self::with_responder(move |_| {
            let next = queue.lock().unwrap_or_else(|e| e.into_inner()).pop_front();
            match next {
                Some(MockReply::Text(text)) => Ok(text),
                Some(MockReply::Fail(msg)) => Err(GeoSiftError::Remote(msg)),
                None => Err(GeoSiftError::Remote("No scripted reply left".to_string())),
            }
        })
    }

    /// Create a mock whose every call fails.
    pub fn failing() -> Self {
        Self::with_responder(|_| Err(GeoSiftError::Remote("connection refused".to_string())))
    }

    /// Prompts received so far, in call order.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Number of calls made so far.
    pub fn call_count(&self) -> usize {
        self.prompts.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl LlmProvider for MockProvider {
    fn complete_json(&self, prompt: &str) -> Result<String> {
        self.prompts
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(prompt.to_string());
        (self.responder)(prompt)
    }

    fn config(&self) -> &LlmConfig {
        &self.config
    }

    fn name(&self) -> &str {
        "mock"
    }
}

/// Identifiers of the dataset lines embedded at the end of a prompt.
pub fn dataset_ids(prompt: &str) -> Vec<String> {
    prompt
        .split("## Datasets\n")
        .nth(1)
        .unwrap_or("")
        .lines()
        .filter_map(|line| line.split(" | ").next())
        .map(|id| id.trim().to_string())
        .filter(|id| !id.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::prompts;

    #[test]
    fn test_default_mock_selects_everything() {
        let lines = vec!["GSE1 | a".to_string(), "GSE2 | b".to_string()];
        let prompt = prompts::screening_prompt("Disease: x", &lines);

        let provider = MockProvider::new();
        let reply = provider.complete_json(&prompt).unwrap();

        assert_eq!(reply, r#"{"selected_ids":["GSE1","GSE2"]}"#);
        assert_eq!(provider.call_count(), 1);
    }

    #[test]
    fn test_default_mock_classifies_as_other() {
        let lines = vec!["GSE7 | a".to_string()];
        let prompt = prompts::classification_prompt(&lines);
        let reply = MockProvider::new().complete_json(&prompt).unwrap();
        assert!(reply.contains(r#""id":"GSE7""#));
        assert!(reply.contains(r#""type":"Other""#));
    }

    #[test]
    fn test_scripted_then_exhausted() {
        let provider = MockProvider::scripted(vec![MockReply::fail("503"), MockReply::text("{}")]);
        assert!(provider.complete_json("a").is_err());
        assert_eq!(provider.complete_json("b").unwrap(), "{}");
        assert!(provider.complete_json("c").is_err());
        assert_eq!(provider.prompts(), vec!["a", "b", "c"]);
    }
}
