//! # docchat-rag
//!
//! Retrieval core for docchat: turn an uploaded text document into a vector
//! index, retrieve the chunks most similar to a question, and assemble the
//! generation prompt.
//!
//! ## Overview
//!
//! - [`Chunker`] / [`LineChunker`] - split a [`Document`] into [`Chunk`]s
//! - [`EmbeddingProvider`] - backend seam (Gemini, OpenAI, offline mocks)
//! - [`ResilientEmbedder`] - total embedding with retry, backoff and fallback vectors
//! - [`VectorIndex`] - cosine-similarity top-k over one document
//! - [`RetrievalEngine`] - load/replace the active index and retrieve
//! - [`PromptAssembler`] - knowledge-base and web-search sections plus the question
//!
//! ## Features
//!
//! - `gemini` (default) - [`gemini::GeminiEmbeddingProvider`]
//! - `openai` - [`openai::OpenAIEmbeddingProvider`]

pub mod chunking;
pub mod config;
pub mod document;
pub mod embedding;
pub mod error;
#[cfg(feature = "gemini")]
pub mod gemini;
pub mod index;
pub mod mock;
#[cfg(feature = "openai")]
pub mod openai;
pub mod prompt;
pub mod resilient;
pub mod retrieval;

pub use chunking::{Chunker, LineChunker, ParagraphChunker};
pub use config::{RagConfig, RagConfigBuilder};
pub use document::{Chunk, Document, IndexSummary, ScoredChunk};
pub use embedding::{Embedding, EmbeddingProvider, FallbackReason};
pub use error::{RagError, Result};
#[cfg(feature = "gemini")]
pub use gemini::GeminiEmbeddingProvider;
pub use index::{VectorIndex, cosine_similarity};
#[cfg(feature = "openai")]
pub use openai::OpenAIEmbeddingProvider;
pub use prompt::{PromptAssembler, mode_instruction};
pub use resilient::ResilientEmbedder;
pub use retrieval::{RetrievalEngine, RetrievalEngineBuilder};
