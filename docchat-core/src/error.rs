//! Error types shared across the docchat crates.

use thiserror::Error;

/// Errors that can cross a docchat crate boundary.
///
/// The variants mirror how each failure is handled: configuration errors
/// are fatal at startup, provider errors are recovered per call, and input
/// errors are turned into guidance for the user.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DocChatError {
    /// A required credential or setting is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A network collaborator (embedding, generation, search) failed.
    #[error("{provider} error: {message}")]
    Provider {
        /// The provider that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// The user supplied something unusable (empty document, no document loaded).
    #[error("{0}")]
    Input(String),
}

impl DocChatError {
    /// Shorthand for a [`DocChatError::Provider`].
    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provider { provider: provider.into(), message: message.into() }
    }

    /// Whether this error must stop the process.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Config(_))
    }
}

/// A convenience result type for docchat operations.
pub type Result<T> = std::result::Result<T, DocChatError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_error_display_names_the_provider() {
        let err = DocChatError::provider("Gemini", "quota exceeded");
        assert_eq!(err.to_string(), "Gemini error: quota exceeded");
        assert!(!err.is_fatal());
    }

    #[test]
    fn only_configuration_errors_are_fatal() {
        assert!(DocChatError::Config("GEMINI_API_KEY not set".into()).is_fatal());
        assert!(!DocChatError::Input("empty".into()).is_fatal());
    }
}
