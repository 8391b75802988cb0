//! Completion-service integration.
//!
//! The pipeline only needs one capability from a model: take a prompt and
//! answer with a JSON object. [`LlmProvider`] captures that contract;
//! [`OpenAIProvider`] implements it over any OpenAI-compatible
//! `/chat/completions` endpoint and [`MockProvider`] stands in for it in tests.
//!
//! # Example
//!
//! ```no_run
//! use geosift::{LlmConfig, OpenAIProvider};
//!
//! let provider = OpenAIProvider::with_config(
//!     LlmConfig::from_env()
//!         .with_base_url("https://api.deepseek.com/v1")
//!         .with_model("deepseek-chat"),
//! )
//! .unwrap();
//! ```

mod mock;
mod openai;
pub mod prompts;
mod provider;
mod response;

pub use mock::{dataset_ids, MockProvider, MockReply};
pub use openai::OpenAIProvider;
pub use provider::{
    LlmConfig, LlmProvider, API_KEY_ENV, BASE_URL_ENV, DEFAULT_BASE_URL, DEFAULT_MODEL, MODEL_ENV,
};
pub use response::{
    parse_json_response, ClassificationEntry, ClassificationReply, ScreeningReply,
};
