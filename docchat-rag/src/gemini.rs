//! Gemini embedding provider using the Generative Language REST API.
//!
//! This module is only available when the `gemini` feature is enabled.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};

/// The default Generative Language API base URL.
pub const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// The default embedding model.
const DEFAULT_MODEL: &str = "models/embedding-001";

/// Dimensionality of `embedding-001` vectors.
const DEFAULT_DIMENSIONS: usize = 768;

const PROVIDER: &str = "Gemini";

/// An [`EmbeddingProvider`] backed by the Gemini `embedContent` endpoint.
///
/// # Configuration
///
/// - `model` – defaults to `models/embedding-001`.
/// - `base_url` – defaults to [`GEMINI_API_BASE`].
///
/// # Example
///
/// ```rust,ignore
/// use docchat_rag::gemini::GeminiEmbeddingProvider;
///
/// let provider = GeminiEmbeddingProvider::new("your-api-key")?;
/// let embedding = provider.embed("hello world").await?;
/// ```
pub struct GeminiEmbeddingProvider {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
    dimensions: usize,
}

impl GeminiEmbeddingProvider {
    /// Create a new provider with the given API key and the default model.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(RagError::embedding(PROVIDER, "API key must not be empty"));
        }

        Ok(Self {
            client: reqwest::Client::new(),
            api_key,
            base_url: GEMINI_API_BASE.into(),
            model: DEFAULT_MODEL.into(),
            dimensions: DEFAULT_DIMENSIONS,
        })
    }

    /// Set the model name. A bare name such as `text-embedding-004` gets the
    /// `models/` prefix added.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        let model = model.into();
        self.model = if model.starts_with("models/") { model } else { format!("models/{model}") };
        self
    }

    /// Set the expected output dimensionality.
    pub fn with_dimensions(mut self, dimensions: usize) -> Self {
        self.dimensions = dimensions;
        self
    }

    /// Override the API base URL (for proxies or regional endpoints).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn endpoint(&self) -> String {
        format!("{}/{}:embedContent", self.base_url, self.model)
    }
}

// Gemini API request/response types

#[derive(Serialize)]
struct EmbedContentRequest<'a> {
    model: &'a str,
    content: Content<'a>,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: [Part<'a>; 1],
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct EmbedContentResponse {
    embedding: Option<ContentEmbedding>,
}

#[derive(Deserialize)]
struct ContentEmbedding {
    values: Vec<f32>,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: String,
}

fn parse_embedding(body: &str) -> Result<Vec<f32>> {
    let response: EmbedContentResponse = serde_json::from_str(body)
        .map_err(|e| RagError::embedding(PROVIDER, format!("failed to parse response: {e}")))?;
    response
        .embedding
        .map(|e| e.values)
        .ok_or_else(|| RagError::embedding(PROVIDER, "no embedding found in response"))
}

// EmbeddingProvider implementation

#[async_trait]
impl EmbeddingProvider for GeminiEmbeddingProvider {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        debug!(provider = PROVIDER, model = %self.model, text_len = text.len(), "embedding text");

        let request_body = EmbedContentRequest {
            model: &self.model,
            content: Content { parts: [Part { text }] },
        };

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| {
                error!(provider = PROVIDER, error = %e, "request failed");
                RagError::embedding(PROVIDER, format!("request failed: {e}"))
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| RagError::embedding(PROVIDER, format!("failed to read response: {e}")))?;

        if !status.is_success() {
            let detail = serde_json::from_str::<ErrorResponse>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            error!(provider = PROVIDER, %status, "API error");
            return Err(RagError::embedding(PROVIDER, format!("API returned {status}: {detail}")));
        }

        parse_embedding(&body)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn name(&self) -> &str {
        PROVIDER
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_embed_content_response() {
        let body = r#"{"embedding": {"values": [0.25, -0.5, 1.0]}}"#;
        assert_eq!(parse_embedding(body).unwrap(), vec![0.25, -0.5, 1.0]);
    }

    #[test]
    fn missing_embedding_is_an_error() {
        let err = parse_embedding("{}").unwrap_err();
        assert!(err.to_string().contains("no embedding found"));
    }

    #[test]
    fn request_body_carries_model_and_text() {
        let body = EmbedContentRequest {
            model: "models/embedding-001",
            content: Content { parts: [Part { text: "hi" }] },
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["model"], "models/embedding-001");
        assert_eq!(json["content"]["parts"][0]["text"], "hi");
        assert!(json.get("taskType").is_none());
    }

    #[test]
    fn model_names_get_prefixed() {
        let provider = GeminiEmbeddingProvider::new("key")
            .unwrap()
            .with_model("text-embedding-004")
            .with_base_url("http://localhost:8080/");
        assert_eq!(
            provider.endpoint(),
            "http://localhost:8080/models/text-embedding-004:embedContent"
        );
        assert!(GeminiEmbeddingProvider::new("  ").is_err());
    }
}
