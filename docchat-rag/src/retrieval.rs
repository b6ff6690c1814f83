//! Retrieval engine.
//!
//! The [`RetrievalEngine`] coordinates the upload-and-query workflow by
//! composing a [`ResilientEmbedder`], a [`Chunker`], and the active
//! [`VectorIndex`].
//!
//! # Example
//!
//! ```rust,ignore
//! use docchat_rag::{Document, LineChunker, RagConfig, ResilientEmbedder, RetrievalEngine};
//!
//! let engine = RetrievalEngine::builder()
//!     .config(RagConfig::default())
//!     .embedder(ResilientEmbedder::new(Arc::new(my_embedder), RagConfig::default()))
//!     .chunker(Arc::new(LineChunker))
//!     .build()?;
//!
//! engine.load(&Document::new("notes.txt", text)).await?;
//! let chunks = engine.retrieve("search query", 3).await;
//! ```

use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};
use tracing::{info, warn};

use crate::chunking::Chunker;
use crate::config::RagConfig;
use crate::document::{Document, IndexSummary, ScoredChunk};
use crate::error::{RagError, Result};
use crate::index::VectorIndex;
use crate::resilient::ResilientEmbedder;

/// Builds, swaps and queries the index for one session.
///
/// Construct one via [`RetrievalEngine::builder()`]. Queries clone the active
/// index handle and never see a half-built index: a new index is built in
/// full before it replaces the old one, and concurrent loads are serialised.
pub struct RetrievalEngine {
    config: RagConfig,
    embedder: ResilientEmbedder,
    chunker: Arc<dyn Chunker>,
    active: RwLock<Option<Arc<VectorIndex>>>,
    load_lock: Mutex<()>,
}

impl RetrievalEngine {
    /// Create a new [`RetrievalEngineBuilder`].
    pub fn builder() -> RetrievalEngineBuilder {
        RetrievalEngineBuilder::default()
    }

    /// Return a reference to the configuration.
    pub fn config(&self) -> &RagConfig {
        &self.config
    }

    /// Return a reference to the embedder.
    pub fn embedder(&self) -> &ResilientEmbedder {
        &self.embedder
    }

    /// Index a document: chunk → embed → build → swap.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::InputError`] if the document has no non-blank
    /// chunks; the previously active index stays active.
    pub async fn load(&self, document: &Document) -> Result<IndexSummary> {
        let _loading = self.load_lock.lock().await;

        let chunks = self.chunker.chunk(document);
        if chunks.is_empty() {
            warn!(document.id = %document.id, "rejected upload: document is empty");
            return Err(RagError::InputError(format!("document '{}' is empty", document.id)));
        }

        let texts: Vec<&str> = chunks.iter().map(|c| c.text.as_str()).collect();
        let embeddings = self.embedder.embed(&texts).await;

        let index = VectorIndex::build(
            document.id.clone(),
            self.embedder.dimensions(),
            chunks.into_iter().zip(embeddings),
        )?;
        let summary = index.summary();

        *self.active.write().await = Some(Arc::new(index));

        if summary.fallback_count > 0 {
            warn!(
                document.id = %summary.document_id,
                fallback_count = summary.fallback_count,
                "some chunks were indexed with fallback embeddings"
            );
        }
        info!(
            document.id = %summary.document_id,
            chunk_count = summary.chunk_count,
            "indexed document"
        );

        Ok(summary)
    }

    /// Discard the active index.
    pub async fn unload(&self) {
        let _loading = self.load_lock.lock().await;
        if self.active.write().await.take().is_some() {
            info!("discarded active index");
        }
    }

    /// Whether an index is loaded.
    pub async fn is_loaded(&self) -> bool {
        self.active.read().await.is_some()
    }

    /// Summary of the active index, if any.
    pub async fn summary(&self) -> Option<IndexSummary> {
        self.snapshot().await.map(|index| index.summary())
    }

    /// Chunk texts of the top-`k` matches for `query`, most similar first.
    ///
    /// Returns an empty `Vec` when no document is loaded.
    pub async fn retrieve(&self, query: &str, k: usize) -> Vec<String> {
        self.retrieve_scored(query, k).await.into_iter().map(|r| r.chunk.text).collect()
    }

    /// Like [`retrieve`](Self::retrieve), keeping scores and chunk metadata.
    ///
    /// No similarity threshold is applied.
    pub async fn retrieve_scored(&self, query: &str, k: usize) -> Vec<ScoredChunk> {
        match self.snapshot().await {
            Some(index) => self.retrieve_from(&index, query, k).await,
            None => Vec::new(),
        }
    }

    /// Handle to the active index, unaffected by later loads or unloads.
    pub async fn snapshot(&self) -> Option<Arc<VectorIndex>> {
        self.active.read().await.clone()
    }

    /// Top-`k` matches for `query` in `index`, usually one obtained from
    /// [`snapshot`](Self::snapshot).
    pub async fn retrieve_from(
        &self,
        index: &VectorIndex,
        query: &str,
        k: usize,
    ) -> Vec<ScoredChunk> {
        if k == 0 || index.is_empty() {
            return Vec::new();
        }

        let query_embedding = self.embedder.embed_query(query).await;
        if let Some(reason) = query_embedding.fallback_reason() {
            warn!(%reason, "query embedding is a fallback; ranking carries no semantic signal");
        }

        let results = index.query(query_embedding.vector(), k);
        info!(document.id = %index.document_id(), result_count = results.len(), "query completed");
        results
    }
}

/// Builder for constructing a [`RetrievalEngine`].
///
/// All fields are required. Call [`build()`](RetrievalEngineBuilder::build)
/// to validate and produce the engine.
#[derive(Default)]
pub struct RetrievalEngineBuilder {
    config: Option<RagConfig>,
    embedder: Option<ResilientEmbedder>,
    chunker: Option<Arc<dyn Chunker>>,
}

impl RetrievalEngineBuilder {
    /// Set the configuration.
    pub fn config(mut self, config: RagConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the embedder.
    pub fn embedder(mut self, embedder: ResilientEmbedder) -> Self {
        self.embedder = Some(embedder);
        self
    }

    /// Set the document chunker.
    pub fn chunker(mut self, chunker: Arc<dyn Chunker>) -> Self {
        self.chunker = Some(chunker);
        self
    }

    /// Build the [`RetrievalEngine`], validating that all required fields are set.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::ConfigError`] if any field is missing or the
    /// embedder's dimensionality disagrees with the configuration.
    pub fn build(self) -> Result<RetrievalEngine> {
        let config =
            self.config.ok_or_else(|| RagError::ConfigError("config is required".to_string()))?;
        let embedder = self
            .embedder
            .ok_or_else(|| RagError::ConfigError("embedder is required".to_string()))?;
        let chunker =
            self.chunker.ok_or_else(|| RagError::ConfigError("chunker is required".to_string()))?;

        if embedder.dimensions() != config.dimensions {
            return Err(RagError::ConfigError(format!(
                "embedder produces {}-dimensional vectors but config expects {}",
                embedder.dimensions(),
                config.dimensions
            )));
        }

        Ok(RetrievalEngine {
            config,
            embedder,
            chunker,
            active: RwLock::new(None),
            load_lock: Mutex::new(()),
        })
    }
}
