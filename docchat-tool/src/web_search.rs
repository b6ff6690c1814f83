//! SerpAPI web search.
//!
//! Returns the snippets of the top organic results. Failures never
//! propagate: they come back as a single sentinel string that prompt
//! assembly knows to skip.

use std::time::Duration;

use async_trait::async_trait;
use docchat_core::{NO_RESULTS, SEARCH_ERROR_PREFIX, SEARCH_UNAVAILABLE_PREFIX, WebSearch};
use serde::Deserialize;
use tracing::{debug, error, warn};

/// The SerpAPI JSON endpoint.
pub const SERPAPI_BASE: &str = "https://serpapi.com/search.json";

const MAX_SNIPPETS: usize = 3;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Web search through SerpAPI.
///
/// Built without a key it stays usable and answers every query with the
/// "unavailable" sentinel.
pub struct SerpApiSearch {
    client: reqwest::Client,
    api_key: Option<String>,
    base_url: String,
    max_results: usize,
}

impl SerpApiSearch {
    /// Create a client. A missing or blank key yields the unavailable sentinel
    /// on every search.
    pub fn new(api_key: Option<String>) -> Self {
        let api_key = api_key.filter(|k| !k.trim().is_empty());
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self { client, api_key, base_url: SERPAPI_BASE.into(), max_results: MAX_SNIPPETS }
    }

    /// Override the endpoint URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Whether a key is configured.
    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    async fn fetch(&self, api_key: &str, query: &str) -> Result<String, String> {
        let response = self
            .client
            .get(&self.base_url)
            .query(&[("q", query), ("api_key", api_key)])
            .send()
            .await
            .map_err(|e| e.to_string())?;

        let status = response.status();
        let body = response.text().await.map_err(|e| e.to_string())?;
        if !status.is_success() {
            let detail = serde_json::from_str::<SearchResponse>(&body)
                .ok()
                .and_then(|r| r.error)
                .unwrap_or_else(|| status.to_string());
            return Err(detail);
        }
        Ok(body)
    }
}

/// The sentinel returned when no key is configured.
pub fn unavailable_sentinel() -> String {
    format!("{SEARCH_UNAVAILABLE_PREFIX}: no SerpAPI key configured]")
}

fn error_sentinel(cause: &str) -> String {
    format!("{SEARCH_ERROR_PREFIX}: {cause}")
}

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    organic_results: Vec<OrganicResult>,
    error: Option<String>,
}

#[derive(Deserialize)]
struct OrganicResult {
    snippet: Option<String>,
}

/// Extract up to `max` non-empty snippets, or a single sentinel.
fn parse_snippets(body: &str, max: usize) -> Vec<String> {
    let response: SearchResponse = match serde_json::from_str(body) {
        Ok(response) => response,
        Err(e) => return vec![error_sentinel(&format!("invalid response: {e}"))],
    };

    let snippets: Vec<String> = response
        .organic_results
        .into_iter()
        .filter_map(|r| r.snippet)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .take(max)
        .collect();

    if snippets.is_empty() { vec![NO_RESULTS.to_string()] } else { snippets }
}

#[async_trait]
impl WebSearch for SerpApiSearch {
    async fn search(&self, query: &str) -> Vec<String> {
        let Some(api_key) = self.api_key.as_deref() else {
            warn!("web search requested but no SerpAPI key is configured");
            return vec![unavailable_sentinel()];
        };

        debug!(query_len = query.len(), "searching the web");
        match self.fetch(api_key, query).await {
            Ok(body) => {
                let snippets = parse_snippets(&body, self.max_results);
                debug!(snippets = snippets.len(), "web search completed");
                snippets
            }
            Err(cause) => {
                error!(error = %cause, "web search failed");
                vec![error_sentinel(&cause)]
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docchat_core::is_search_sentinel;

    #[test]
    fn takes_the_top_three_snippets() {
        let body = r#"{"organic_results":[
            {"title":"a","snippet":"first"},
            {"title":"b"},
            {"title":"c","snippet":"  second  "},
            {"title":"d","snippet":"third"},
            {"title":"e","snippet":"fourth"}
        ]}"#;
        assert_eq!(parse_snippets(body, 3), vec!["first", "second", "third"]);
    }

    #[test]
    fn no_results_yields_the_sentinel() {
        assert_eq!(parse_snippets(r#"{"organic_results":[]}"#, 3), vec![NO_RESULTS]);
        assert_eq!(parse_snippets(r#"{"search_metadata":{}}"#, 3), vec![NO_RESULTS]);
    }

    #[test]
    fn malformed_body_is_an_error_sentinel() {
        let result = parse_snippets("<html>", 3);
        assert!(result[0].starts_with("Web search error: invalid response"));
        assert!(is_search_sentinel(&result));
    }

    #[test]
    fn unavailable_sentinel_text() {
        assert_eq!(unavailable_sentinel(), "[Web search unavailable: no SerpAPI key configured]");
        assert!(is_search_sentinel(&[unavailable_sentinel()]));
    }
}
