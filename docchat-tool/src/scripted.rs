//! A web search double with fixed output.

use std::sync::Mutex;

use async_trait::async_trait;
use docchat_core::WebSearch;

/// Returns the same snippets for every query and records the queries.
#[derive(Debug, Default)]
pub struct ScriptedSearch {
    snippets: Vec<String>,
    queries: Mutex<Vec<String>>,
}

impl ScriptedSearch {
    /// Answer every query with `snippets`.
    pub fn new<I, S>(snippets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            snippets: snippets.into_iter().map(Into::into).collect(),
            queries: Mutex::new(Vec::new()),
        }
    }

    /// Queries received so far.
    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().map(|q| q.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl WebSearch for ScriptedSearch {
    async fn search(&self, query: &str) -> Vec<String> {
        if let Ok(mut queries) = self.queries.lock() {
            queries.push(query.to_string());
        }
        self.snippets.clone()
    }
}
