//! OpenAI chat completions client.
//!
//! Works with the OpenAI API and any server exposing a compatible
//! `/chat/completions` endpoint (Ollama, vLLM, etc.).

use std::time::Duration;

use async_trait::async_trait;
use docchat_core::{DocChatError, Llm, Mode, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::http::{self, DEFAULT_REQUEST_TIMEOUT};

/// The default OpenAI API base URL.
pub const OPENAI_API_BASE: &str = "https://api.openai.com/v1";

/// The model used when none is configured.
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";

const PROVIDER: &str = "OpenAI";

/// OpenAI client for standard OpenAI API and OpenAI-compatible APIs.
pub struct OpenAIModel {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
    timeout: Duration,
}

impl OpenAIModel {
    /// Create a client for `model` against the OpenAI API.
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(DocChatError::Config("OpenAI API key must not be empty".into()));
        }
        Ok(Self {
            client: http::client(DEFAULT_REQUEST_TIMEOUT)?,
            api_key,
            base_url: OPENAI_API_BASE.into(),
            model: model.into(),
            timeout: DEFAULT_REQUEST_TIMEOUT,
        })
    }

    /// Create a client for an OpenAI-compatible API.
    pub fn compatible(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        model: impl Into<String>,
    ) -> Result<Self> {
        Ok(Self::new(api_key, model)?.with_base_url(base_url))
    }

    /// Override the API base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Bound each generation request by `timeout` instead of
    /// [`DEFAULT_REQUEST_TIMEOUT`].
    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self> {
        self.client = http::client(timeout)?;
        self.timeout = timeout;
        Ok(self)
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

fn request_body<'a>(model: &'a str, prompt: &'a str, mode: Mode) -> ChatRequest<'a> {
    ChatRequest {
        model,
        messages: [
            ChatMessage { role: "system", content: mode.system_instruction() },
            ChatMessage { role: "user", content: prompt },
        ],
    }
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: String,
}

fn parse_text(body: &str) -> Result<String> {
    let response: ChatResponse = serde_json::from_str(body)
        .map_err(|e| DocChatError::provider(PROVIDER, format!("failed to parse response: {e}")))?;
    response
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .filter(|text| !text.is_empty())
        .ok_or_else(|| DocChatError::provider(PROVIDER, "response contained no message content"))
}

#[async_trait]
impl Llm for OpenAIModel {
    fn name(&self) -> &str {
        &self.model
    }

    async fn generate(&self, prompt: &str, mode: Mode) -> Result<String> {
        debug!(
            provider = PROVIDER,
            model = %self.model,
            %mode,
            prompt_len = prompt.len(),
            "generating"
        );

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&request_body(&self.model, prompt, mode))
            .send()
            .await
            .map_err(|e| {
                error!(provider = PROVIDER, error = %e, "request failed");
                http::send_error(PROVIDER, self.timeout, &e)
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            if e.is_timeout() {
                http::send_error(PROVIDER, self.timeout, &e)
            } else {
                DocChatError::provider(PROVIDER, format!("failed to read response: {e}"))
            }
        })?;

        if !status.is_success() {
            let detail = serde_json::from_str::<ErrorResponse>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            error!(provider = PROVIDER, %status, "API error");
            return Err(DocChatError::provider(
                PROVIDER,
                format!("API returned {status}: {detail}"),
            ));
        }

        parse_text(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_first_choice() {
        let body = r#"{"choices":[{"index":0,"message":{"role":"assistant","content":"Paris."}}]}"#;
        assert_eq!(parse_text(body).unwrap(), "Paris.");
    }

    #[test]
    fn missing_content_is_a_provider_error() {
        assert!(parse_text(r#"{"choices":[]}"#).is_err());
        assert!(parse_text(r#"{"choices":[{"message":{"content":null}}]}"#).is_err());
    }

    #[test]
    fn system_message_comes_first() {
        let json = serde_json::to_value(request_body("gpt-4o-mini", "Q?", Mode::Concise)).unwrap();
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][0]["content"], Mode::Concise.system_instruction());
        assert_eq!(json["messages"][1]["content"], "Q?");
    }

    #[test]
    fn compatible_client_uses_custom_base() {
        let model = OpenAIModel::compatible("key", "http://localhost:11434/v1/", "llama3").unwrap();
        assert_eq!(model.endpoint(), "http://localhost:11434/v1/chat/completions");
        assert!(OpenAIModel::new("", "gpt-4o").is_err());
    }
}
