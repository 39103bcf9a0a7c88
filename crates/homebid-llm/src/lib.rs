//! Homebid Generative Backend Layer
//!
//! Pluggable providers for the two call shapes the drafting system
//! consumes: single-shot completion and multi-step tool-augmented chat.
//!
//! # Providers
//!
//! - `MockProvider` / `MockChatModel`: deterministic mocks for testing
//! - `OpenAiProvider`: OpenAI-compatible chat-completions API over HTTP
//!
//! # Examples
//!
//! ```
//! use homebid_llm::{MockProvider, TextGenerator};
//!
//! # tokio_test::block_on(async {
//! let provider = MockProvider::new("Hello from the model!");
//! let result = provider.generate("test prompt").await.unwrap();
//! assert_eq!(result, "Hello from the model!");
//! # });
//! ```

#![warn(missing_docs)]

pub mod chat;
pub mod openai;

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use thiserror::Error;

pub use chat::{ChatMessage, ChatRole, ModelStep, ToolCallRequest, ToolSpec};
pub use openai::OpenAiProvider;

/// Errors that can occur during generative backend operations
#[derive(Error, Debug)]
pub enum LlmError {
    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// Invalid response from the backend
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// Model not available
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// Generic error
    #[error("LLM error: {0}")]
    Other(String),
}

/// Single-shot text completion: one prompt in, one text out
///
/// Implemented by providers and by the deterministic mock. Exactly one
/// attempt per call; callers decide what a failure means.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate a completion for the prompt
    async fn generate(&self, prompt: &str) -> Result<String, LlmError>;
}

/// One step of a tool-augmented conversation
///
/// The model sees the system framing, the message history, and the tool
/// specifications, and answers with text, tool-call requests, or both.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Run a single model step over the conversation so far
    async fn step(
        &self,
        system: &str,
        messages: &[ChatMessage],
        tools: &[ToolSpec],
    ) -> Result<ModelStep, LlmError>;
}

/// Mock completion provider for deterministic testing
///
/// Returns pre-configured responses without any network calls.
///
/// # Examples
///
/// ```
/// use homebid_llm::{MockProvider, TextGenerator};
///
/// # tokio_test::block_on(async {
/// let mut provider = MockProvider::new("default");
/// provider.add_response("prompt1", "response1");
/// assert_eq!(provider.generate("prompt1").await.unwrap(), "response1");
/// assert_eq!(provider.generate("anything else").await.unwrap(), "default");
/// # });
/// ```
#[derive(Debug, Clone)]
pub struct MockProvider {
    default_response: String,
    responses: Arc<Mutex<HashMap<String, String>>>,
    call_count: Arc<Mutex<usize>>,
}

/// Sentinel stored in the response map to trigger an error
const MOCK_ERROR: &str = "\u{0}ERROR\u{0}";

impl MockProvider {
    /// Create a provider with a fixed response for all prompts
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            default_response: response.into(),
            responses: Arc::new(Mutex::new(HashMap::new())),
            call_count: Arc::new(Mutex::new(0)),
        }
    }

    /// Add a specific response for a given prompt
    pub fn add_response(&mut self, prompt: impl Into<String>, response: impl Into<String>) {
        self.responses
            .lock()
            .unwrap()
            .insert(prompt.into(), response.into());
    }

    /// Configure a specific prompt to fail
    pub fn add_error(&mut self, prompt: impl Into<String>) {
        self.responses
            .lock()
            .unwrap()
            .insert(prompt.into(), MOCK_ERROR.to_string());
    }

    /// Number of times generate was called
    pub fn call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new("Default mock response")
    }
}

#[async_trait]
impl TextGenerator for MockProvider {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        *self.call_count.lock().unwrap() += 1;

        let responses = self.responses.lock().unwrap();
        if let Some(response) = responses.get(prompt) {
            if response == MOCK_ERROR {
                return Err(LlmError::Other("Mock error".to_string()));
            }
            return Ok(response.clone());
        }

        Ok(self.default_response.clone())
    }
}

/// Mock chat model replaying a scripted sequence of steps
///
/// Each call to `step` consumes the next scripted step; once the script is
/// exhausted the model answers with a fixed text step, so conversations
/// always terminate.
#[derive(Debug, Clone)]
pub struct MockChatModel {
    script: Arc<Mutex<VecDeque<ModelStep>>>,
    fallback_text: String,
    call_count: Arc<Mutex<usize>>,
    seen_messages: Arc<Mutex<Vec<usize>>>,
}

impl MockChatModel {
    /// Create a chat model that replays the given steps in order
    pub fn with_steps(steps: Vec<ModelStep>) -> Self {
        Self {
            script: Arc::new(Mutex::new(steps.into())),
            fallback_text: "Anything else I can help with?".to_string(),
            call_count: Arc::new(Mutex::new(0)),
            seen_messages: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Number of steps the model has been asked for
    pub fn call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }

    /// Message-list lengths observed per step, for asserting that tool
    /// results were fed back into the conversation
    pub fn seen_message_counts(&self) -> Vec<usize> {
        self.seen_messages.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatModel for MockChatModel {
    async fn step(
        &self,
        _system: &str,
        messages: &[ChatMessage],
        _tools: &[ToolSpec],
    ) -> Result<ModelStep, LlmError> {
        *self.call_count.lock().unwrap() += 1;
        self.seen_messages.lock().unwrap().push(messages.len());

        let next = self.script.lock().unwrap().pop_front();
        Ok(next.unwrap_or_else(|| ModelStep::text(self.fallback_text.clone())))
    }
}
