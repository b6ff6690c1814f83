//! Tests for retry, timeout and fallback behaviour of `ResilientEmbedder`.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use docchat_rag::mock::{FailingEmbedder, HashingEmbedder};
use docchat_rag::{
    Embedding, EmbeddingProvider, FallbackReason, RagConfig, ResilientEmbedder, Result,
};
use docchat_telemetry::{SharedEventStorage, capture_subscriber};

const DIM: usize = 8;

fn config() -> RagConfig {
    RagConfig::builder()
        .dimensions(DIM)
        .max_attempts(3)
        .retry_base_delay(Duration::from_millis(100))
        .request_timeout(Duration::from_secs(5))
        .build()
        .unwrap()
}

/// Records the exact text it was asked to embed.
#[derive(Default)]
struct RecordingEmbedder {
    seen: std::sync::Mutex<Vec<String>>,
}

#[async_trait]
impl EmbeddingProvider for RecordingEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.seen.lock().unwrap().push(text.to_string());
        Ok(vec![1.0; DIM])
    }

    fn dimensions(&self) -> usize {
        DIM
    }
}

/// Never answers within the timeout.
struct SlowEmbedder {
    calls: AtomicUsize,
}

#[async_trait]
impl EmbeddingProvider for SlowEmbedder {
    async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_secs(3600)).await;
        Ok(vec![1.0; DIM])
    }

    fn dimensions(&self) -> usize {
        DIM
    }
}

/// Returns vectors of the wrong length.
struct WrongDimensionEmbedder;

#[async_trait]
impl EmbeddingProvider for WrongDimensionEmbedder {
    async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
        Ok(vec![1.0; DIM + 1])
    }

    fn dimensions(&self) -> usize {
        DIM
    }
}

#[tokio::test]
async fn preserves_length_and_order() {
    let provider = Arc::new(HashingEmbedder::new(DIM));
    let embedder = ResilientEmbedder::new(provider.clone(), config());

    let texts = ["alpha", "beta gamma", "", "delta", "alpha"];
    let embeddings = embedder.embed(&texts).await;

    assert_eq!(embeddings.len(), texts.len());
    for (text, embedding) in texts.iter().zip(&embeddings) {
        let expected = if text.is_empty() {
            vec![0.0; DIM]
        } else {
            provider.embed(text).await.unwrap()
        };
        assert_eq!(embedding.vector(), expected.as_slice(), "mismatch for {text:?}");
    }
    assert_eq!(embeddings[0], embeddings[4]);
}

/// Embeds `"<i>"` as `[i; DIM]`, answering later inputs sooner.
struct StaggeredEmbedder {
    inputs: u64,
}

#[async_trait]
impl EmbeddingProvider for StaggeredEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let index: u64 = text.parse().unwrap();
        tokio::time::sleep(Duration::from_millis((self.inputs - index) * 10)).await;
        Ok(vec![index as f32; DIM])
    }

    fn dimensions(&self) -> usize {
        DIM
    }
}

#[tokio::test(start_paused = true)]
async fn concurrent_embedding_keeps_input_order() {
    let texts: Vec<String> = (0..6).map(|i| i.to_string()).collect();
    let texts: Vec<&str> = texts.iter().map(String::as_str).collect();
    let config = RagConfig::builder().dimensions(DIM).embed_concurrency(4).build().unwrap();
    let embedder =
        ResilientEmbedder::new(Arc::new(StaggeredEmbedder { inputs: texts.len() as u64 }), config);

    let embeddings = embedder.embed(&texts).await;

    assert_eq!(embeddings.len(), texts.len());
    for (i, embedding) in embeddings.iter().enumerate() {
        assert!(!embedding.is_fallback());
        assert_eq!(embedding.vector(), vec![i as f32; DIM].as_slice(), "output {i} out of order");
    }
}

#[tokio::test]
async fn empty_batch_and_blank_input() {
    let provider = Arc::new(HashingEmbedder::new(DIM));
    let embedder = ResilientEmbedder::new(provider.clone(), config());

    assert!(embedder.embed(&[]).await.is_empty());

    let embeddings = embedder.embed(&["", "   \t"]).await;
    assert_eq!(embeddings.len(), 2);
    for embedding in &embeddings {
        assert_eq!(embedding.vector(), vec![0.0; DIM].as_slice());
        assert_eq!(embedding.fallback_reason(), Some(&FallbackReason::EmptyInput));
    }
    assert_eq!(provider.calls(), 0, "blank input must not reach the provider");
}

#[tokio::test]
async fn long_input_is_truncated_before_embedding() {
    let provider = Arc::new(RecordingEmbedder::default());
    let config = RagConfig::builder().dimensions(DIM).max_input_chars(10).build().unwrap();
    let embedder = ResilientEmbedder::new(provider.clone(), config);

    let embedding = embedder.embed_query("ééééééééééééééé").await;

    assert!(!embedding.is_fallback());
    let seen = provider.seen.lock().unwrap();
    assert_eq!(seen.as_slice(), ["éééééééééé"]);
}

#[tokio::test(start_paused = true)]
async fn retries_with_backoff_then_falls_back() {
    let provider = Arc::new(FailingEmbedder::always(DIM));
    let embedder = ResilientEmbedder::new(provider.clone(), config());

    let started = tokio::time::Instant::now();
    let embedding = embedder.embed_query("will never embed").await;

    assert_eq!(provider.calls(), 3);
    // 100ms + 200ms between the three attempts.
    let elapsed = started.elapsed();
    assert!(elapsed >= Duration::from_millis(300), "backoff too short: {elapsed:?}");
    assert!(elapsed < Duration::from_millis(400), "backoff too long: {elapsed:?}");
    match embedding {
        Embedding::Fallback {
            vector,
            reason: FallbackReason::ProviderFailed { attempts, message },
        } => {
            assert_eq!(vector.len(), DIM);
            assert!(vector.iter().all(|x| (0.0..1.0).contains(x)));
            assert_eq!(attempts, 3);
            assert!(message.contains("simulated failure #3"));
        }
        other => panic!("expected provider fallback, got {other:?}"),
    }
}

#[tokio::test(start_paused = true)]
async fn recovers_when_a_retry_succeeds() {
    let provider = Arc::new(FailingEmbedder::new(DIM, 2));
    let embedder = ResilientEmbedder::new(provider.clone(), config());

    let embedding = embedder.embed_query("eventually fine").await;

    assert_eq!(provider.calls(), 3);
    assert!(matches!(embedding, Embedding::Provided(_)));
}

#[tokio::test(start_paused = true)]
async fn timeouts_count_as_failed_attempts() {
    let provider = Arc::new(SlowEmbedder { calls: AtomicUsize::new(0) });
    let config = RagConfig::builder()
        .dimensions(DIM)
        .max_attempts(2)
        .request_timeout(Duration::from_secs(1))
        .retry_base_delay(Duration::from_millis(10))
        .build()
        .unwrap();
    let embedder = ResilientEmbedder::new(provider.clone(), config);

    let embedding = embedder.embed_query("slow").await;

    assert_eq!(provider.calls.load(Ordering::SeqCst), 2);
    match embedding.fallback_reason() {
        Some(FallbackReason::ProviderFailed { message, .. }) => {
            assert!(message.contains("timed out"));
        }
        other => panic!("expected timeout fallback, got {other:?}"),
    }
}

#[tokio::test(start_paused = true)]
async fn wrong_dimension_is_treated_as_failure() {
    let embedder = ResilientEmbedder::new(Arc::new(WrongDimensionEmbedder), config());

    let embedding = embedder.embed_query("anything").await;

    assert_eq!(embedding.vector().len(), DIM);
    match embedding.fallback_reason() {
        Some(FallbackReason::ProviderFailed { message, .. }) => {
            assert!(message.contains("expected 8 dimensions, got 9"));
        }
        other => panic!("expected dimension fallback, got {other:?}"),
    }
}

#[tokio::test]
async fn unconfigured_embedder_returns_random_vectors_and_warns() {
    let storage = Arc::new(SharedEventStorage::new());
    let _guard = tracing::subscriber::set_default(capture_subscriber(storage.clone()));

    let embedder = ResilientEmbedder::unconfigured(config());
    assert!(!embedder.is_configured());

    let embeddings = embedder.embed(&["one", "two", ""]).await;

    assert_eq!(embeddings.len(), 3);
    assert_eq!(embeddings[0].fallback_reason(), Some(&FallbackReason::Unconfigured));
    assert_eq!(embeddings[1].fallback_reason(), Some(&FallbackReason::Unconfigured));
    assert_eq!(embeddings[2].fallback_reason(), Some(&FallbackReason::EmptyInput));
    assert!(embeddings.iter().all(|e| e.vector().len() == DIM));

    let warnings = storage.find("WARN", "no embedding provider configured");
    assert_eq!(warnings.len(), 1, "one configuration warning per call");
}

#[tokio::test]
async fn provider_batch_defaults_to_sequential_embed() {
    let provider = HashingEmbedder::new(DIM);
    let batch = provider.embed_batch(&["alpha", "beta"]).await.unwrap();
    assert_eq!(batch.len(), 2);
    assert_eq!(batch[0], provider.embed("alpha").await.unwrap());
    assert_eq!(provider.calls(), 3);

    let failing = FailingEmbedder::new(DIM, 1);
    assert!(failing.embed_batch(&["a", "b"]).await.is_err());
    assert_eq!(failing.calls(), 1, "the batch stops at the first error");
}
