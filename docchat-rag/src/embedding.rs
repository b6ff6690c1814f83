//! Embedding provider trait and embedding provenance.

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// A provider that generates vector embeddings from text input.
///
/// Implementations wrap specific embedding backends (Gemini, OpenAI, etc.)
/// behind a unified async interface. They report failures as errors and
/// leave retries and fallbacks to [`ResilientEmbedder`](crate::ResilientEmbedder),
/// which calls them once per input.
///
/// # Example
///
/// ```rust,ignore
/// use docchat_rag::EmbeddingProvider;
///
/// let provider = MyEmbeddingProvider::new();
/// let embedding = provider.embed("hello world").await?;
/// assert_eq!(embedding.len(), provider.dimensions());
/// ```
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Generate an embedding vector for a single text input.
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Generate embeddings for several inputs.
    ///
    /// The default implementation calls [`embed`](Self::embed) sequentially
    /// and stops at the first error.
    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        let mut embeddings = Vec::with_capacity(texts.len());
        for text in texts {
            embeddings.push(self.embed(text).await?);
        }
        Ok(embeddings)
    }

    /// Return the dimensionality of embeddings produced by this provider.
    fn dimensions(&self) -> usize;

    /// Provider name, used in logs and errors.
    fn name(&self) -> &str {
        "embedding"
    }
}

/// Why an [`Embedding`] was synthesised instead of obtained from a provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FallbackReason {
    /// The input was empty or whitespace; the vector is all zeros.
    EmptyInput,
    /// No provider is configured; the vector is random.
    Unconfigured,
    /// Every attempt failed; the vector is random.
    ProviderFailed {
        /// How many attempts were made.
        attempts: u32,
        /// The last failure.
        message: String,
    },
}

impl fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FallbackReason::EmptyInput => f.write_str("empty input"),
            FallbackReason::Unconfigured => f.write_str("no embedding provider configured"),
            FallbackReason::ProviderFailed { attempts, message } => {
                write!(f, "provider failed after {attempts} attempts: {message}")
            }
        }
    }
}

/// An embedding vector tagged with where it came from.
///
/// Fallback vectors keep index construction total but carry no semantic
/// signal; callers can use [`is_fallback`](Embedding::is_fallback) to tell
/// them apart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Embedding {
    /// Returned by the embedding provider.
    Provided(Vec<f32>),
    /// Synthesised locally.
    Fallback {
        /// The substitute vector.
        vector: Vec<f32>,
        /// Why it was substituted.
        reason: FallbackReason,
    },
}

impl Embedding {
    /// The vector, regardless of provenance.
    pub fn vector(&self) -> &[f32] {
        match self {
            Embedding::Provided(vector) | Embedding::Fallback { vector, .. } => vector,
        }
    }

    /// Consume the embedding and return its vector.
    pub fn into_vector(self) -> Vec<f32> {
        match self {
            Embedding::Provided(vector) | Embedding::Fallback { vector, .. } => vector,
        }
    }

    /// Whether the vector was synthesised.
    pub fn is_fallback(&self) -> bool {
        matches!(self, Embedding::Fallback { .. })
    }

    /// The fallback reason, if any.
    pub fn fallback_reason(&self) -> Option<&FallbackReason> {
        match self {
            Embedding::Provided(_) => None,
            Embedding::Fallback { reason, .. } => Some(reason),
        }
    }
}
