//! The text-generation collaborator.

use async_trait::async_trait;

use crate::error::Result;
use crate::mode::Mode;

/// A large language model that turns a prompt into answer text.
///
/// Implementations should map every transport or API failure to
/// [`DocChatError::Provider`](crate::DocChatError::Provider); callers render
/// that error as the visible answer instead of stopping the session.
///
/// # Example
///
/// ```rust,ignore
/// use docchat_core::{Llm, Mode};
///
/// let text = model.generate("Answer the following question: ...", Mode::Concise).await?;
/// ```
#[async_trait]
pub trait Llm: Send + Sync {
    /// Model name, used in logs.
    fn name(&self) -> &str;

    /// Generate a response for `prompt` using the system instruction for `mode`.
    async fn generate(&self, prompt: &str, mode: Mode) -> Result<String>;
}
