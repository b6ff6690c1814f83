//! # docchat-model
//!
//! LLM clients implementing [`docchat_core::Llm`].
//!
//! ## Overview
//!
//! - [`GeminiModel`] - Google's Gemini models via `generateContent`
//! - [`OpenAIModel`] - OpenAI and OpenAI-compatible chat completions
//! - [`MockLlm`] - Mock LLM for testing
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use docchat_core::{Llm, Mode};
//! use docchat_model::GeminiModel;
//!
//! let model = GeminiModel::new(std::env::var("GEMINI_API_KEY")?, "gemini-1.5-flash")?;
//! let answer = model.generate("Answer the following question: ...", Mode::Concise).await?;
//! ```
//!
//! ## Supported Models
//!
//! ### Gemini
//! | Model | Description |
//! |-------|-------------|
//! | `gemini-1.5-flash` | Balanced speed/capability (default) |
//! | `gemini-1.5-pro` | Most capable model |
//! | `gemini-2.0-flash` | Fast, efficient model |
//!
//! ### OpenAI
//! | Model | Description |
//! |-------|-------------|
//! | `gpt-4o-mini` | Fast, cost-effective (default) |
//! | `gpt-4o` | Most capable model |

#[cfg(feature = "gemini")]
pub mod gemini;
#[cfg(any(feature = "gemini", feature = "openai"))]
mod http;
pub mod mock;
#[cfg(feature = "openai")]
pub mod openai;

#[cfg(feature = "gemini")]
pub use gemini::GeminiModel;
#[cfg(any(feature = "gemini", feature = "openai"))]
pub use http::DEFAULT_REQUEST_TIMEOUT;
pub use mock::MockLlm;
#[cfg(feature = "openai")]
pub use openai::OpenAIModel;
