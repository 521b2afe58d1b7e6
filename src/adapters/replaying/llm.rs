//! Replaying adapter for the `LlmClient` port.

use std::sync::{Arc, Mutex};

use super::{next_output, replay_result};
use crate::cassette::replayer::CassetteReplayer;
use crate::ports::{CompletionFuture, CompletionRequest, CompletionResponse, LlmClient};

/// Serves recorded LLM completions from a cassette.
pub struct ReplayingLlmClient {
    replayer: Option<Arc<Mutex<CassetteReplayer>>>,
}

impl ReplayingLlmClient {
    /// Create a replaying LLM client backed by the given replayer.
    #[must_use]
    pub fn new(replayer: Arc<Mutex<CassetteReplayer>>) -> Self {
        Self { replayer: Some(replayer) }
    }

    /// Create a replaying LLM client with no cassette. Every call fails.
    #[must_use]
    pub fn unconfigured() -> Self {
        Self { replayer: None }
    }
}

impl LlmClient for ReplayingLlmClient {
    fn complete(&self, _request: &CompletionRequest) -> CompletionFuture<'_> {
        let result = next_output(self.replayer.as_ref(), "llm", "complete")
            .and_then(replay_result::<CompletionResponse>);
        Box::pin(async move { result })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cassette::format::{Cassette, Interaction};
    use crate::config::CompletionConfig;
    use chrono::Utc;
    use serde_json::json;

    fn make_client(outputs: Vec<serde_json::Value>) -> ReplayingLlmClient {
        let interactions = outputs
            .into_iter()
            .zip(0..)
            .map(|(output, seq)| Interaction {
                seq,
                port: "llm".into(),
                method: "complete".into(),
                input: json!({}),
                output,
            })
            .collect();
        let cassette = Cassette {
            name: "test".into(),
            recorded_at: Utc::now(),
            commit: "abc".into(),
            interactions,
        };
        ReplayingLlmClient::new(Arc::new(Mutex::new(CassetteReplayer::new(&cassette))))
    }

    fn request() -> CompletionRequest {
        CompletionRequest::single_prompt(&CompletionConfig::default(), "Say hello")
    }

    #[tokio::test]
    async fn serves_recorded_completion() {
        let client = make_client(vec![json!({"Ok": {"text": "Hello!"}})]);
        let response = client.complete(&request()).await.unwrap();
        assert_eq!(response.text, "Hello!");
        assert_eq!(response.completion_tokens, 0);
    }

    #[tokio::test]
    async fn serves_recorded_error() {
        let client = make_client(vec![json!({"Err": "API error (401): bad key"})]);
        let err = client.complete(&request()).await.unwrap_err();
        assert_eq!(err.to_string(), "API error (401): bad key");
    }

    #[tokio::test]
    async fn serves_completions_in_order() {
        let client =
            make_client(vec![json!({"Ok": {"text": "first"}}), json!({"Ok": {"text": "second"}})]);
        assert_eq!(client.complete(&request()).await.unwrap().text, "first");
        assert_eq!(client.complete(&request()).await.unwrap().text, "second");
    }

    #[tokio::test]
    async fn exhausted_cassette_is_an_error() {
        let client = make_client(vec![json!({"Ok": {"text": "only"}})]);
        client.complete(&request()).await.unwrap();
        let err = client.complete(&request()).await.unwrap_err();
        assert!(err.to_string().contains("Cassette exhausted"));
    }

    #[tokio::test]
    async fn empty_cassette_is_an_error() {
        let client = make_client(vec![]);
        let err = client.complete(&request()).await.unwrap_err();
        assert!(err.to_string().contains("no interactions recorded for llm::complete"));
    }

    #[tokio::test]
    async fn unconfigured_client_fails() {
        let err = ReplayingLlmClient::unconfigured().complete(&request()).await.unwrap_err();
        assert!(err.to_string().contains("no cassette loaded"));
    }
}
