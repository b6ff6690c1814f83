//! Error types for the `docchat-rag` crate.

use docchat_core::DocChatError;
use thiserror::Error;

/// Errors that can occur in retrieval operations.
#[derive(Debug, Error)]
pub enum RagError {
    /// An error occurred during embedding generation.
    #[error("Embedding error ({provider}): {message}")]
    EmbeddingError {
        /// The embedding provider that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// The vector index could not be built from the supplied entries.
    #[error("Index error: {0}")]
    IndexError(String),

    /// The uploaded document cannot be indexed.
    #[error("Input error: {0}")]
    InputError(String),

    /// A configuration validation error.
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl RagError {
    pub(crate) fn embedding(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::EmbeddingError { provider: provider.into(), message: message.into() }
    }
}

impl From<RagError> for DocChatError {
    fn from(err: RagError) -> Self {
        match err {
            RagError::EmbeddingError { provider, message } => {
                DocChatError::Provider { provider, message }
            }
            RagError::InputError(message) => DocChatError::Input(message),
            RagError::ConfigError(message) => DocChatError::Config(message),
            RagError::IndexError(message) => DocChatError::Input(message),
        }
    }
}

/// A convenience result type for retrieval operations.
pub type Result<T> = std::result::Result<T, RagError>;
