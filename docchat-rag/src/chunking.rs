//! Document chunking strategies.
//!
//! This module provides the [`Chunker`] trait and two implementations:
//!
//! - [`LineChunker`] — one chunk per non-blank line (the upload default)
//! - [`ParagraphChunker`] — one chunk per blank-line separated paragraph

use crate::document::{Chunk, Document};

/// A strategy for splitting documents into chunks.
///
/// Every returned chunk has trimmed, non-empty text and an `id` equal to its
/// position in the returned sequence.
pub trait Chunker: Send + Sync {
    /// Split a document into chunks. Returns an empty `Vec` for blank text.
    fn chunk(&self, document: &Document) -> Vec<Chunk>;
}

fn number_chunks<'a>(document: &Document, pieces: impl Iterator<Item = &'a str>) -> Vec<Chunk> {
    pieces
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
        .enumerate()
        .map(|(id, text)| Chunk { id, text: text.to_string(), document_id: document.id.clone() })
        .collect()
}

/// Splits on newlines and discards blank lines.
///
/// # Example
///
/// ```rust,ignore
/// use docchat_rag::{Document, LineChunker, chunking::Chunker};
///
/// let chunks = LineChunker.chunk(&Document::new("notes.txt", "a\n\nb"));
/// assert_eq!(chunks.len(), 2);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct LineChunker;

impl Chunker for LineChunker {
    fn chunk(&self, document: &Document) -> Vec<Chunk> {
        number_chunks(document, document.text.lines())
    }
}

/// Splits on blank lines, joining the lines of each paragraph with a space.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParagraphChunker;

impl Chunker for ParagraphChunker {
    fn chunk(&self, document: &Document) -> Vec<Chunk> {
        let mut paragraphs = Vec::new();
        let mut current: Vec<&str> = Vec::new();

        for line in document.text.lines() {
            let line = line.trim();
            if line.is_empty() {
                if !current.is_empty() {
                    paragraphs.push(current.join(" "));
                    current.clear();
                }
            } else {
                current.push(line);
            }
        }
        if !current.is_empty() {
            paragraphs.push(current.join(" "));
        }

        number_chunks(document, paragraphs.iter().map(String::as_str))
    }
}
