//! Client for the OpenRouter-compatible text completion endpoint.

use std::fmt;

use log::{debug, error, info};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{BotError, Result};

/// Text shown to users whenever a completion cannot be produced.
pub const COMPLETION_FAILURE_TEXT: &str = "Failed to fetch AI response. Please try again later.";

const COMPLETION_MODEL: &str = "openai/gpt-4";
const MAX_TOKENS: u32 = 1000;
const TEMPERATURE: f32 = 1.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletionRequest {
    pub model: String,
    pub prompt: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl CompletionRequest {
    #[must_use]
    pub fn new(prompt: &str) -> Self {
        Self {
            model: COMPLETION_MODEL.to_string(),
            prompt: prompt.to_string(),
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
        }
    }
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    text: String,
}

/// Outcome of one completion request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompletionResult {
    Success(String),
    Failure { status: StatusCode, body: String },
}

impl CompletionResult {
    /// Turn a failed status into [`BotError::CompletionApi`].
    pub fn into_answer(self) -> Result<String> {
        match self {
            CompletionResult::Success(text) => Ok(text),
            CompletionResult::Failure { status, body } => Err(BotError::CompletionApi {
                status,
                message: body,
            }),
        }
    }
}

impl fmt::Display for CompletionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompletionResult::Success(text) => f.write_str(text),
            CompletionResult::Failure { status, body } => {
                write!(f, "HTTP error {}: {body}", status.as_u16())
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct CompletionClient {
    api_key: String,
    base_url: Url,
}

impl CompletionClient {
    #[must_use]
    pub fn new(api_key: String, base_url: Url) -> Self {
        Self { api_key, base_url }
    }

    /// Full URL of the `/completions` endpoint.
    #[must_use]
    pub fn endpoint(&self) -> String {
        format!("{}/completions", self.base_url.as_str().trim_end_matches('/'))
    }

    /// Send one completion request.
    ///
    /// Non-200 statuses come back as [`CompletionResult::Failure`]; transport
    /// faults and malformed success bodies are errors.
    pub async fn complete(&self, question: &str) -> Result<CompletionResult> {
        let request = CompletionRequest::new(question);
        debug!(
            "Sending completion request ({} prompt characters) to {}",
            request.prompt.len(),
            self.endpoint()
        );

        // Scoped to this call; connections are released when it drops.
        let client = reqwest::Client::new();
        let response = client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response
                .text()
                .await
                .unwrap_or_else(|e| format!("Failed to read error response: {e}"));
            return Ok(CompletionResult::Failure { status, body });
        }

        let body = response.text().await?;
        let api_response: CompletionResponse = serde_json::from_str(&body)?;
        let text = api_response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| BotError::CompletionResponse("No choices in response".to_string()))?
            .text;

        let text = text.trim();
        if text.is_empty() {
            return Err(BotError::CompletionResponse(
                "Empty completion text".to_string(),
            ));
        }

        debug!("Received completion response");
        Ok(CompletionResult::Success(text.to_string()))
    }

    /// Resolve a question to the text shown to the user.
    ///
    /// Every failure, including transport faults, is logged and replaced by
    /// [`COMPLETION_FAILURE_TEXT`].
    pub async fn resolve_by_completion(&self, question: &str) -> String {
        match self.complete(question).await.and_then(CompletionResult::into_answer) {
            Ok(answer) => {
                info!("Completion succeeded ({} characters)", answer.len());
                answer
            }
            Err(e) => {
                error!("{e}");
                COMPLETION_FAILURE_TEXT.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_uses_fixed_parameters() {
        let request = CompletionRequest::new("Why is the sky blue?");
        let json = serde_json::to_value(&request).expect("serializable");
        assert_eq!(json["model"], "openai/gpt-4");
        assert_eq!(json["prompt"], "Why is the sky blue?");
        assert_eq!(json["max_tokens"], 1000);
        assert_eq!(json["temperature"], 1.0);
    }

    #[test]
    fn endpoint_appends_completions_path() {
        let client = CompletionClient::new(
            "key".to_string(),
            Url::parse("https://openrouter.ai/api/v1").expect("url"),
        );
        assert_eq!(client.endpoint(), "https://openrouter.ai/api/v1/completions");

        let client = CompletionClient::new(
            "key".to_string(),
            Url::parse("http://127.0.0.1:9000/").expect("url"),
        );
        assert_eq!(client.endpoint(), "http://127.0.0.1:9000/completions");
    }

    #[test]
    fn failure_renders_status_code_and_body() {
        let failure = CompletionResult::Failure {
            status: StatusCode::TOO_MANY_REQUESTS,
            body: "rate limited".to_string(),
        };
        assert_eq!(failure.to_string(), "HTTP error 429: rate limited");
        assert!(matches!(
            failure.into_answer(),
            Err(BotError::CompletionApi { status, .. }) if status == StatusCode::TOO_MANY_REQUESTS
        ));
    }

    #[test]
    fn success_converts_to_answer() {
        let answer = CompletionResult::Success("42".to_string())
            .into_answer()
            .expect("answer");
        assert_eq!(answer, "42");
    }
}
