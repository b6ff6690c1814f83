//! In-memory vector index using cosine similarity.
//!
//! A [`VectorIndex`] is immutable once built. Re-uploading a document builds a
//! fresh index and swaps it in; there are no partial or append updates.

use std::cmp::Ordering;

use crate::document::{Chunk, IndexSummary, ScoredChunk};
use crate::embedding::Embedding;
use crate::error::{RagError, Result};

#[derive(Debug, Clone, PartialEq)]
struct IndexEntry {
    chunk: Chunk,
    embedding: Embedding,
}

/// Chunk vectors for one uploaded document.
///
/// # Example
///
/// ```rust,ignore
/// use docchat_rag::VectorIndex;
///
/// let index = VectorIndex::build("doc", 768, chunks.into_iter().zip(embeddings))?;
/// let top = index.query(&query_vector, 3);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct VectorIndex {
    document_id: String,
    dimensions: usize,
    entries: Vec<IndexEntry>,
}

impl VectorIndex {
    /// Build an index from `(chunk, embedding)` pairs.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::IndexError`] if any vector's length differs from
    /// `dimensions`.
    pub fn build(
        document_id: impl Into<String>,
        dimensions: usize,
        entries: impl IntoIterator<Item = (Chunk, Embedding)>,
    ) -> Result<Self> {
        let mut built = Vec::new();
        for (chunk, embedding) in entries {
            let len = embedding.vector().len();
            if len != dimensions {
                return Err(RagError::IndexError(format!(
                    "chunk {} has a {len}-dimensional vector, expected {dimensions}",
                    chunk.id
                )));
            }
            built.push(IndexEntry { chunk, embedding });
        }
        built.sort_by_key(|entry| entry.chunk.id);

        Ok(Self { document_id: document_id.into(), dimensions, entries: built })
    }

    /// Return the `k` chunks most similar to `vector`.
    ///
    /// Results are ordered by descending cosine similarity; equal scores keep
    /// ascending chunk order. `k` is clamped to the index size, so `k == 0`
    /// or an empty index yields an empty result.
    pub fn query(&self, vector: &[f32], k: usize) -> Vec<ScoredChunk> {
        let k = k.min(self.entries.len());
        if k == 0 {
            return Vec::new();
        }

        let mut scored: Vec<(usize, f32)> = self
            .entries
            .iter()
            .enumerate()
            .map(|(position, entry)| {
                (position, cosine_similarity(entry.embedding.vector(), vector))
            })
            .collect();

        scored.sort_by(|(pos_a, a), (pos_b, b)| {
            compare_scores(*a, *b).then_with(|| {
                self.entries[*pos_a].chunk.id.cmp(&self.entries[*pos_b].chunk.id)
            })
        });
        scored.truncate(k);

        scored
            .into_iter()
            .map(|(position, score)| {
                let entry = &self.entries[position];
                ScoredChunk {
                    chunk: entry.chunk.clone(),
                    score,
                    fallback: entry.embedding.is_fallback(),
                }
            })
            .collect()
    }

    /// Number of indexed chunks.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the index holds no chunks.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Vector dimensionality.
    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    /// The document this index was built from.
    pub fn document_id(&self) -> &str {
        &self.document_id
    }

    /// Number of entries whose vector is a fallback.
    pub fn fallback_count(&self) -> usize {
        self.entries.iter().filter(|entry| entry.embedding.is_fallback()).count()
    }

    /// The indexed chunks in upload order.
    pub fn chunks(&self) -> impl Iterator<Item = &Chunk> {
        self.entries.iter().map(|entry| &entry.chunk)
    }

    /// Summary used for upload reports.
    pub fn summary(&self) -> IndexSummary {
        IndexSummary {
            document_id: self.document_id.clone(),
            chunk_count: self.len(),
            fallback_count: self.fallback_count(),
            dimensions: self.dimensions,
        }
    }
}

/// Descending by score; non-finite scores sort last.
fn compare_scores(a: f32, b: f32) -> Ordering {
    match (a.is_finite(), b.is_finite()) {
        (true, true) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (false, false) => Ordering::Equal,
    }
}

/// Compute cosine similarity between two vectors.
///
/// Returns 0.0 if either vector has zero magnitude.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedding::FallbackReason;

    fn chunk(id: usize, text: &str) -> Chunk {
        Chunk { id, text: text.to_string(), document_id: "doc".to_string() }
    }

    fn provided(v: &[f32]) -> Embedding {
        Embedding::Provided(v.to_vec())
    }

    #[test]
    fn cosine_of_zero_vector_is_zero() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]), 0.0);
        assert!((cosine_similarity(&[1.0, 1.0], &[2.0, 2.0]) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn ties_are_broken_by_ascending_chunk_id() {
        let index = VectorIndex::build(
            "doc",
            2,
            vec![
                (chunk(2, "c"), provided(&[1.0, 0.0])),
                (chunk(0, "a"), provided(&[1.0, 0.0])),
                (chunk(1, "b"), provided(&[0.0, 1.0])),
            ],
        )
        .unwrap();

        let results = index.query(&[1.0, 0.0], 3);
        let ids: Vec<usize> = results.iter().map(|r| r.chunk.id).collect();
        assert_eq!(ids, [0, 2, 1]);
    }

    #[test]
    fn k_is_clamped_and_zero_is_empty() {
        let index =
            VectorIndex::build("doc", 2, vec![(chunk(0, "a"), provided(&[1.0, 0.0]))]).unwrap();
        assert_eq!(index.query(&[1.0, 0.0], 10).len(), 1);
        assert!(index.query(&[1.0, 0.0], 0).is_empty());

        let empty = VectorIndex::build("doc", 2, Vec::new()).unwrap();
        assert!(empty.is_empty());
        assert!(empty.query(&[1.0, 0.0], 3).is_empty());
    }

    #[test]
    fn rejects_mismatched_dimensions() {
        let err = VectorIndex::build("doc", 3, vec![(chunk(0, "a"), provided(&[1.0, 0.0]))])
            .unwrap_err();
        assert!(matches!(err, RagError::IndexError(_)));
    }

    #[test]
    fn reports_fallback_entries() {
        let index = VectorIndex::build(
            "doc",
            2,
            vec![
                (chunk(0, "a"), provided(&[1.0, 0.0])),
                (
                    chunk(1, "b"),
                    Embedding::Fallback {
                        vector: vec![0.0, 0.0],
                        reason: FallbackReason::EmptyInput,
                    },
                ),
            ],
        )
        .unwrap();

        assert_eq!(index.fallback_count(), 1);
        let results = index.query(&[1.0, 0.0], 2);
        assert!(!results[0].fallback);
        assert!(results[1].fallback);
        assert_eq!(index.summary().chunk_count, 2);
    }

    #[test]
    fn nan_scores_sort_last() {
        assert_eq!(compare_scores(0.5, f32::NAN), Ordering::Less);
        assert_eq!(compare_scores(f32::NAN, -1.0), Ordering::Greater);
    }
}
