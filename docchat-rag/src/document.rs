//! Data types for documents, chunks, and search results.

use serde::{Deserialize, Serialize};

/// An uploaded source document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Document {
    /// Identifier for the document, usually the uploaded file name.
    pub id: String,
    /// The raw text content.
    pub text: String,
}

impl Document {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self { id: id.into(), text: text.into() }
    }
}

/// One retrievable unit of a [`Document`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Chunk {
    /// Position of the chunk in upload order, starting at zero.
    pub id: usize,
    /// Trimmed, non-empty chunk text.
    pub text: String,
    /// The ID of the parent [`Document`].
    pub document_id: String,
}

/// A retrieved [`Chunk`] paired with its similarity score.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScoredChunk {
    /// The retrieved chunk.
    pub chunk: Chunk,
    /// Cosine similarity to the query (higher is more relevant).
    pub score: f32,
    /// Whether the chunk's vector was synthesised rather than provided.
    pub fallback: bool,
}

/// Description of an index after a successful upload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IndexSummary {
    /// The document the index was built from.
    pub document_id: String,
    /// Number of chunks indexed.
    pub chunk_count: usize,
    /// Number of chunks whose vectors are fallbacks.
    pub fallback_count: usize,
    /// Vector dimensionality.
    pub dimensions: usize,
}
