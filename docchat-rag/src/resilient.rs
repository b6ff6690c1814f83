//! Total embedding: retries, timeouts and fallback vectors.
//!
//! [`ResilientEmbedder`] sits between the retrieval engine and an
//! [`EmbeddingProvider`]. It never fails: every input gets a vector of the
//! configured dimension, tagged with its provenance.

use std::sync::Arc;

use futures::StreamExt;
use rand::Rng;
use tracing::{debug, warn};

use crate::config::RagConfig;
use crate::embedding::{Embedding, EmbeddingProvider, FallbackReason};

/// Wraps an optional [`EmbeddingProvider`] with retry, timeout and fallback.
///
/// - blank input → zero vector, no provider call
/// - input longer than `max_input_chars` → truncated first
/// - failure, timeout or wrong dimension → retried with exponential backoff,
///   then replaced by a random vector
/// - no provider at all → random vectors, logged as a configuration warning
///
/// # Example
///
/// ```rust,ignore
/// use docchat_rag::{RagConfig, ResilientEmbedder};
///
/// let embedder = ResilientEmbedder::new(Arc::new(provider), RagConfig::default());
/// let embeddings = embedder.embed(&["first line", "second line"]).await;
/// assert_eq!(embeddings.len(), 2);
/// ```
#[derive(Clone)]
pub struct ResilientEmbedder {
    provider: Option<Arc<dyn EmbeddingProvider>>,
    config: RagConfig,
}

impl ResilientEmbedder {
    /// Wrap a configured provider.
    pub fn new(provider: Arc<dyn EmbeddingProvider>, config: RagConfig) -> Self {
        Self { provider: Some(provider), config }
    }

    /// An embedder with no provider; every non-blank input gets a random vector.
    pub fn unconfigured(config: RagConfig) -> Self {
        Self { provider: None, config }
    }

    /// Wrap a provider that may be missing.
    pub fn from_optional(provider: Option<Arc<dyn EmbeddingProvider>>, config: RagConfig) -> Self {
        Self { provider, config }
    }

    /// Whether a provider is configured.
    pub fn is_configured(&self) -> bool {
        self.provider.is_some()
    }

    /// Dimensionality of every vector this embedder returns.
    pub fn dimensions(&self) -> usize {
        self.config.dimensions
    }

    /// The configuration in use.
    pub fn config(&self) -> &RagConfig {
        &self.config
    }

    /// Embed `texts`, returning one embedding per input in input order.
    ///
    /// Inputs are embedded concurrently, up to `embed_concurrency` at a time.
    pub async fn embed(&self, texts: &[&str]) -> Vec<Embedding> {
        if texts.is_empty() {
            return Vec::new();
        }
        self.warn_if_unconfigured(texts.len());

        // Collected up front so the stream holds plain futures rather than a
        // borrowing closure, which keeps the returned future `Send`.
        let pending: Vec<_> = texts.iter().map(|text| self.embed_text(text)).collect();
        futures::stream::iter(pending)
            .buffered(self.config.embed_concurrency.max(1))
            .collect()
            .await
    }

    /// Embed a single query string.
    pub async fn embed_query(&self, text: &str) -> Embedding {
        self.warn_if_unconfigured(1);
        self.embed_text(text).await
    }

    fn warn_if_unconfigured(&self, inputs: usize) {
        if self.provider.is_none() {
            warn!(
                inputs,
                dimensions = self.config.dimensions,
                "no embedding provider configured; using random embeddings as fallback"
            );
        }
    }

    async fn embed_text(&self, text: &str) -> Embedding {
        let dimensions = self.config.dimensions;

        if text.trim().is_empty() {
            return Embedding::Fallback {
                vector: vec![0.0; dimensions],
                reason: FallbackReason::EmptyInput,
            };
        }

        let Some(provider) = &self.provider else {
            return Embedding::Fallback {
                vector: random_vector(dimensions),
                reason: FallbackReason::Unconfigured,
            };
        };

        let text = truncate_chars(text, self.config.max_input_chars);
        let attempts = self.config.max_attempts.max(1);
        let mut last_error = String::new();

        for attempt in 0..attempts {
            match tokio::time::timeout(self.config.request_timeout(), provider.embed(text)).await {
                Ok(Ok(vector)) if vector.len() == dimensions => {
                    return Embedding::Provided(vector);
                }
                Ok(Ok(vector)) => {
                    last_error =
                        format!("expected {dimensions} dimensions, got {}", vector.len());
                }
                Ok(Err(e)) => last_error = e.to_string(),
                Err(_) => {
                    last_error =
                        format!("request timed out after {}ms", self.config.request_timeout_ms);
                }
            }

            if attempt + 1 < attempts {
                let delay = self.config.backoff_delay(attempt);
                debug!(
                    provider = provider.name(),
                    attempt = attempt + 1,
                    max_attempts = attempts,
                    backoff_ms = delay.as_millis() as u64,
                    error = %last_error,
                    "retrying embedding after failure"
                );
                tokio::time::sleep(delay).await;
            }
        }

        warn!(
            provider = provider.name(),
            attempts,
            error = %last_error,
            "failed to get embedding; using random vector as fallback"
        );
        Embedding::Fallback {
            vector: random_vector(dimensions),
            reason: FallbackReason::ProviderFailed { attempts, message: last_error },
        }
    }
}

impl std::fmt::Debug for ResilientEmbedder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResilientEmbedder")
            .field("provider", &self.provider.as_ref().map(|p| p.name().to_string()))
            .field("config", &self.config)
            .finish()
    }
}

/// Truncate to at most `max_chars` characters, on a character boundary.
fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => &text[..byte_index],
        None => text,
    }
}

fn random_vector(dimensions: usize) -> Vec<f32> {
    let mut rng = rand::rng();
    (0..dimensions).map(|_| rng.random::<f32>()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncation_respects_char_boundaries() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("short", 10), "short");
        assert_eq!(truncate_chars("exact", 5), "exact");
    }

    #[test]
    fn random_vectors_are_unit_interval() {
        let v = random_vector(32);
        assert_eq!(v.len(), 32);
        assert!(v.iter().all(|x| (0.0..1.0).contains(x)));
    }
}
