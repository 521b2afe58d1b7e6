//! Live adapter for the `LlmClient` port using the OpenAI chat completions API.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::Credential;
use crate::error::PortError;
use crate::ports::llm::{
    ChatMessage, CompletionFuture, CompletionRequest, CompletionResponse, LlmClient,
};

/// Live LLM client that calls an OpenAI-compatible chat completions endpoint.
///
/// The underlying `reqwest` client has no request timeout: the call waits
/// until the service answers or the connection fails.
pub struct OpenAiClient {
    client: Client,
    credential: Credential,
    endpoint: String,
}

impl OpenAiClient {
    /// Creates a client for `base_url` authenticated with `credential`.
    #[must_use]
    pub fn new(credential: Credential, base_url: &str) -> Self {
        Self {
            client: Client::new(),
            credential,
            endpoint: format!("{}/chat/completions", base_url.trim_end_matches('/')),
        }
    }

    /// Returns the full chat completions URL.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

/// Request body sent to the chat completions API.
#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
    max_tokens: u32,
}

/// Top-level response from the chat completions API.
#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
    usage: Option<Usage>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// Token usage reported by the API.
#[derive(Deserialize)]
struct Usage {
    prompt_tokens: u32,
    completion_tokens: u32,
}

/// Error response from the API.
#[derive(Deserialize)]
struct ApiError {
    error: ApiErrorDetail,
}

#[derive(Deserialize)]
struct ApiErrorDetail {
    message: String,
}

/// Turns a successful response body into a [`CompletionResponse`].
///
/// Only the first choice is used; an empty choice list or a first choice
/// without text content is a malformed response.
fn parse_completion(body: &str) -> Result<CompletionResponse, PortError> {
    let api_response: ChatResponse = serde_json::from_str(body)
        .map_err(|e| format!("Failed to parse completion response: {e}"))?;

    let first = api_response
        .choices
        .into_iter()
        .next()
        .ok_or("Completion response contained no choices")?;
    let text = first.message.content.ok_or("First completion choice has no text content")?;

    let (prompt_tokens, completion_tokens) =
        api_response.usage.map_or((0, 0), |u| (u.prompt_tokens, u.completion_tokens));

    Ok(CompletionResponse { text, prompt_tokens, completion_tokens })
}

/// Builds the error for a non-2xx status, preferring the service's own message.
fn status_error(status: u16, body: String) -> PortError {
    let msg = serde_json::from_str::<ApiError>(&body).map(|e| e.error.message).unwrap_or(body);
    format!("API error ({status}): {msg}").into()
}

impl LlmClient for OpenAiClient {
    fn complete(&self, request: &CompletionRequest) -> CompletionFuture<'_> {
        let request = request.clone();

        Box::pin(async move {
            let body = ChatRequest {
                model: &request.model,
                messages: &request.messages,
                temperature: request.temperature,
                max_tokens: request.max_tokens,
            };

            debug!(endpoint = %self.endpoint, "posting chat completion request");
            let response = self
                .client
                .post(&self.endpoint)
                .bearer_auth(self.credential.expose())
                .json(&body)
                .send()
                .await
                .map_err(|e| -> PortError { format!("Completion request failed: {e}").into() })?;

            let status = response.status();
            let response_text = response.text().await.map_err(|e| -> PortError {
                format!("Failed to read completion response: {e}").into()
            })?;

            if !status.is_success() {
                return Err(status_error(status.as_u16(), response_text));
            }

            parse_completion(&response_text)
        })
    }
}
