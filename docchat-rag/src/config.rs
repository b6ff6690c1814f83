//! Configuration for the retrieval core.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{RagError, Result};

/// Configuration parameters for embedding and retrieval.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RagConfig {
    /// Number of chunks retrieved per question.
    pub top_k: usize,
    /// Length of every embedding vector in the index.
    pub dimensions: usize,
    /// Inputs longer than this many characters are truncated before embedding.
    pub max_input_chars: usize,
    /// Total provider attempts per input before falling back to a random vector.
    pub max_attempts: u32,
    /// Delay before the first retry; doubled for every further retry.
    pub retry_base_delay_ms: u64,
    /// Upper bound on a single provider call.
    pub request_timeout_ms: u64,
    /// Number of chunks embedded concurrently while building an index.
    pub embed_concurrency: usize,
}

impl Default for RagConfig {
    fn default() -> Self {
        Self {
            top_k: 3,
            dimensions: 768,
            max_input_chars: 10_000,
            max_attempts: 3,
            retry_base_delay_ms: 1_000,
            request_timeout_ms: 30_000,
            embed_concurrency: 4,
        }
    }
}

impl RagConfig {
    /// Create a new builder for constructing a [`RagConfig`].
    pub fn builder() -> RagConfigBuilder {
        RagConfigBuilder::default()
    }

    /// Backoff delay before retry number `retry` (zero-based).
    pub fn backoff_delay(&self, retry: u32) -> Duration {
        let factor = 1u64.checked_shl(retry).unwrap_or(u64::MAX);
        Duration::from_millis(self.retry_base_delay_ms.saturating_mul(factor))
    }

    /// Timeout applied to each provider call.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

/// Builder for constructing a validated [`RagConfig`].
#[derive(Debug, Clone, Default)]
pub struct RagConfigBuilder {
    config: RagConfig,
}

impl RagConfigBuilder {
    /// Set the number of chunks retrieved per question.
    pub fn top_k(mut self, k: usize) -> Self {
        self.config.top_k = k;
        self
    }

    /// Set the embedding dimensionality.
    pub fn dimensions(mut self, dimensions: usize) -> Self {
        self.config.dimensions = dimensions;
        self
    }

    /// Set the truncation limit for embedding inputs, in characters.
    pub fn max_input_chars(mut self, chars: usize) -> Self {
        self.config.max_input_chars = chars;
        self
    }

    /// Set the total number of provider attempts per input.
    pub fn max_attempts(mut self, attempts: u32) -> Self {
        self.config.max_attempts = attempts;
        self
    }

    /// Set the base retry delay.
    pub fn retry_base_delay(mut self, delay: Duration) -> Self {
        self.config.retry_base_delay_ms = delay.as_millis() as u64;
        self
    }

    /// Set the per-call provider timeout.
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.config.request_timeout_ms = timeout.as_millis() as u64;
        self
    }

    /// Set how many chunks are embedded concurrently during index builds.
    pub fn embed_concurrency(mut self, concurrency: usize) -> Self {
        self.config.embed_concurrency = concurrency;
        self
    }

    /// Build the [`RagConfig`], validating that parameters are consistent.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::ConfigError`] if any of `top_k`, `dimensions`,
    /// `max_input_chars`, `max_attempts`, `request_timeout` or
    /// `embed_concurrency` is zero.
    pub fn build(self) -> Result<RagConfig> {
        let c = &self.config;
        let zero = [
            ("top_k", c.top_k == 0),
            ("dimensions", c.dimensions == 0),
            ("max_input_chars", c.max_input_chars == 0),
            ("max_attempts", c.max_attempts == 0),
            ("request_timeout", c.request_timeout_ms == 0),
            ("embed_concurrency", c.embed_concurrency == 0),
        ];
        if let Some((field, _)) = zero.iter().find(|(_, is_zero)| *is_zero) {
            return Err(RagError::ConfigError(format!("{field} must be greater than zero")));
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_follow_the_reference_behaviour() {
        let config = RagConfig::default();
        assert_eq!(config.top_k, 3);
        assert_eq!(config.dimensions, 768);
        assert_eq!(config.max_input_chars, 10_000);
        assert_eq!(config.max_attempts, 3);
    }

    #[test]
    fn backoff_doubles_per_retry() {
        let config =
            RagConfig::builder().retry_base_delay(Duration::from_millis(100)).build().unwrap();
        assert_eq!(config.backoff_delay(0), Duration::from_millis(100));
        assert_eq!(config.backoff_delay(1), Duration::from_millis(200));
        assert_eq!(config.backoff_delay(3), Duration::from_millis(800));
    }

    #[test]
    fn rejects_zero_values() {
        let err = RagConfig::builder().dimensions(0).build().unwrap_err();
        assert!(err.to_string().contains("dimensions"));
        assert!(RagConfig::builder().max_attempts(0).build().is_err());
        assert!(RagConfig::builder().top_k(0).build().is_err());
        assert!(RagConfig::builder().embed_concurrency(0).build().is_err());
    }
}
