//! # docchat-tool
//!
//! Web search backends implementing [`docchat_core::WebSearch`].
//!
//! - [`SerpApiSearch`] - Google results through SerpAPI
//! - [`ScriptedSearch`] - returns fixed snippets, for tests and offline demos

pub mod scripted;
pub mod web_search;

pub use scripted::ScriptedSearch;
pub use web_search::{SERPAPI_BASE, SerpApiSearch};
