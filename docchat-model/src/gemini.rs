//! Gemini text generation over the Generative Language REST API.

use std::time::Duration;

use async_trait::async_trait;
use docchat_core::{DocChatError, Llm, Mode, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::http::{self, DEFAULT_REQUEST_TIMEOUT};

/// The default Generative Language API base URL.
pub const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// The model used when none is configured.
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";

const PROVIDER: &str = "Gemini";

/// A Gemini model answering prompts with a mode-dependent system instruction.
pub struct GeminiModel {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
    timeout: Duration,
}

impl GeminiModel {
    /// Create a client for `model`. Fails with a configuration error when the
    /// key is blank.
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(DocChatError::Config("Gemini API key must not be empty".into()));
        }
        let model = model.into();
        let model = model.strip_prefix("models/").map(str::to_string).unwrap_or(model);

        Ok(Self {
            client: http::client(DEFAULT_REQUEST_TIMEOUT)?,
            api_key,
            base_url: GEMINI_API_BASE.into(),
            model,
            timeout: DEFAULT_REQUEST_TIMEOUT,
        })
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
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    system_instruction: Content<'a>,
    contents: [Content<'a>; 1],
}

#[derive(Serialize)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'a str>,
    parts: [Part<'a>; 1],
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

fn request_body<'a>(prompt: &'a str, mode: Mode) -> GenerateContentRequest<'a> {
    GenerateContentRequest {
        system_instruction: Content {
            role: None,
            parts: [Part { text: mode.system_instruction() }],
        },
        contents: [Content { role: Some("user"), parts: [Part { text: prompt }] }],
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: String,
}

/// Concatenate the text parts of the first candidate.
fn parse_text(body: &str) -> Result<String> {
    let response: GenerateContentResponse = serde_json::from_str(body)
        .map_err(|e| DocChatError::provider(PROVIDER, format!("failed to parse response: {e}")))?;

    if let Some(reason) = response.prompt_feedback.and_then(|f| f.block_reason) {
        return Err(DocChatError::provider(PROVIDER, format!("prompt blocked: {reason}")));
    }

    let candidate = response
        .candidates
        .into_iter()
        .next()
        .ok_or_else(|| DocChatError::provider(PROVIDER, "response contained no candidates"))?;

    let text: String = candidate
        .content
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    if text.is_empty() {
        let reason = candidate.finish_reason.unwrap_or_else(|| "unknown".into());
        return Err(DocChatError::provider(
            PROVIDER,
            format!("response contained no text (finish reason: {reason})"),
        ));
    }
    Ok(text)
}

#[async_trait]
impl Llm for GeminiModel {
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
            .header("x-goog-api-key", &self.api_key)
            .json(&request_body(prompt, mode))
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
