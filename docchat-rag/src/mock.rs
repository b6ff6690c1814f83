//! Offline embedding providers for tests and demos.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};

/// Deterministic bag-of-words embedder using the hashing trick.
///
/// Each lowercase alphanumeric token is hashed into one of `dimensions`
/// buckets, so texts sharing words get a positive cosine similarity. Good
/// enough to make retrieval tests meaningful without a network.
#[derive(Debug)]
pub struct HashingEmbedder {
    dimensions: usize,
    calls: AtomicUsize,
}

impl HashingEmbedder {
    /// Create an embedder producing `dimensions`-long vectors.
    ///
    /// Zero is clamped to one so every token has a bucket.
    pub fn new(dimensions: usize) -> Self {
        Self { dimensions: dimensions.max(1), calls: AtomicUsize::new(0) }
    }

    /// Number of `embed` calls so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

fn bucket(token: &str, dimensions: usize) -> usize {
    // FNV-1a
    let hash = token.bytes().fold(0xcbf2_9ce4_8422_2325u64, |acc, b| {
        (acc ^ u64::from(b)).wrapping_mul(0x0100_0000_01b3)
    });
    (hash % dimensions as u64) as usize
}

#[async_trait]
impl EmbeddingProvider for HashingEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut vector = vec![0.0f32; self.dimensions];
        for token in text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
            .map(str::to_lowercase)
        {
            vector[bucket(&token, self.dimensions)] += 1.0;
        }
        Ok(vector)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn name(&self) -> &str {
        "Hashing"
    }
}

/// An embedder that fails a configurable number of times before delegating.
///
/// With `failures == usize::MAX` it never succeeds.
#[derive(Debug)]
pub struct FailingEmbedder {
    inner: HashingEmbedder,
    failures: usize,
    calls: AtomicUsize,
}

impl FailingEmbedder {
    /// Fail on the first `failures` calls, then behave like [`HashingEmbedder`].
    pub fn new(dimensions: usize, failures: usize) -> Self {
        Self { inner: HashingEmbedder::new(dimensions), failures, calls: AtomicUsize::new(0) }
    }

    /// An embedder that always fails.
    pub fn always(dimensions: usize) -> Self {
        Self::new(dimensions, usize::MAX)
    }

    /// Number of `embed` calls so far, failed or not.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EmbeddingProvider for FailingEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if call < self.failures {
            return Err(RagError::EmbeddingError {
                provider: "Failing".into(),
                message: format!("simulated failure #{}", call + 1),
            });
        }
        self.inner.embed(text).await
    }

    fn dimensions(&self) -> usize {
        self.inner.dimensions()
    }

    fn name(&self) -> &str {
        "Failing"
    }
}
