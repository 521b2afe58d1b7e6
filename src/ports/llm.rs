//! LLM client port for chat completions.

use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};

use crate::config::CompletionConfig;
use crate::error::PortError;

/// Boxed future type alias used by [`LlmClient`] to keep the trait dyn-compatible.
pub type CompletionFuture<'a> =
    Pin<Box<dyn Future<Output = Result<CompletionResponse, PortError>> + Send + 'a>>;

/// One role-tagged message in a chat request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Speaker role (`"user"`, `"system"`, ...).
    pub role: String,
    /// Message text.
    pub content: String,
}

impl ChatMessage {
    /// Creates a `user`-role message.
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self { role: "user".to_string(), content: content.into() }
    }
}

/// A request to generate a completion from an LLM.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionRequest {
    /// The model identifier (e.g. `"gpt-4o"`).
    pub model: String,
    /// Ordered messages making up the conversation.
    pub messages: Vec<ChatMessage>,
    /// Sampling temperature.
    pub temperature: f32,
    /// Maximum number of tokens to generate.
    pub max_tokens: u32,
}

impl CompletionRequest {
    /// Builds a single-turn request carrying `prompt` verbatim as the user message.
    #[must_use]
    pub fn single_prompt(config: &CompletionConfig, prompt: impl Into<String>) -> Self {
        Self {
            model: config.model.clone(),
            messages: vec![ChatMessage::user(prompt)],
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        }
    }
}

/// The response from an LLM completion call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionResponse {
    /// Text of the first returned choice.
    pub text: String,
    /// Number of prompt tokens consumed, 0 when not reported.
    #[serde(default)]
    pub prompt_tokens: u32,
    /// Number of completion tokens generated, 0 when not reported.
    #[serde(default)]
    pub completion_tokens: u32,
}

/// Sends completion requests to a language model.
pub trait LlmClient: Send + Sync {
    /// Generates a completion for the given request.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails (network, auth, quota, malformed
    /// response, etc.).
    fn complete(&self, request: &CompletionRequest) -> CompletionFuture<'_>;
}
