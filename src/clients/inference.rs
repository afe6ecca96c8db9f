//! Inference client — hosted chat-completion service
//!
//! Sends `{model, messages:[system, user]}` with a bearer key and returns the
//! first choice's message content verbatim. Any transport failure or
//! non-success status maps to [`Error::ServiceUnavailable`] so the caller can
//! surface an error notice instead of crashing the session.

use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::{build_http_client, send_with_retry, OutboundError, RetryPolicy};
use crate::error::Error;

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: String,
}

/// HTTP client for the chat-completion endpoint.
#[derive(Clone)]
pub struct InferenceClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
    policy: RetryPolicy,
}

impl InferenceClient {
    pub fn new(base_url: &str, api_key: &str, model: &str, policy: RetryPolicy) -> Self {
        Self {
            http: build_http_client(&policy),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
            policy,
        }
    }

    /// Request a completion and return the first generated message's text.
    ///
    /// Both prompts must be non-empty; no length cap is enforced locally.
    pub async fn get_completion(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        cancel: &CancellationToken,
    ) -> Result<String, Error> {
        let body = ChatCompletionRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system_prompt,
                },
                ChatMessage {
                    role: "user",
                    content: user_prompt,
                },
            ],
        };

        let req = self
            .http
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&body);

        let resp = send_with_retry(&req, &self.policy, cancel)
            .await
            .map_err(|e| match e {
                OutboundError::Cancelled => Error::Cancelled,
                other => Error::ServiceUnavailable(format!("inference request failed: {other}")),
            })?;

        if !resp.status().is_success() {
            return Err(Error::ServiceUnavailable(format!(
                "inference service returned status {}",
                resp.status()
            )));
        }

        let completion: ChatCompletionResponse = resp.json().await.map_err(|e| {
            Error::ServiceUnavailable(format!("cannot parse completion body: {e}"))
        })?;

        let text = completion
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| {
                Error::ServiceUnavailable("completion contained no choices".to_string())
            })?;

        debug!(chars = text.len(), model = %self.model, "Received completion");
        Ok(text)
    }
}
