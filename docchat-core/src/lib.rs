//! # docchat-core
//!
//! Shared vocabulary for the docchat crates.
//!
//! ## Overview
//!
//! - [`Mode`] - response verbosity (concise or detailed)
//! - [`Llm`] - the text-generation collaborator
//! - [`WebSearch`] - the optional web-search collaborator and its sentinel strings
//! - [`DocChatError`] - the error taxonomy shared across crate boundaries
//!
//! Concrete model clients live in `docchat-model`, the SerpAPI client in
//! `docchat-tool`, and the retrieval core in `docchat-rag`.

pub mod error;
pub mod llm;
pub mod mode;
pub mod search;

pub use error::{DocChatError, Result};
pub use llm::Llm;
pub use mode::Mode;
pub use search::{
    NO_RESULTS, SEARCH_ERROR_PREFIX, SEARCH_UNAVAILABLE_PREFIX, WebSearch, is_search_sentinel,
};
