//! The optional web-search collaborator.
//!
//! Search never fails from the caller's point of view. Instead of an error,
//! an implementation returns a single *sentinel* string describing the
//! problem, and prompt assembly recognises and skips it.

use async_trait::async_trait;

/// Returned (as the only element) when a search produced no snippets.
pub const NO_RESULTS: &str = "No results found.";

/// Prefix of the sentinel returned when a search request failed.
pub const SEARCH_ERROR_PREFIX: &str = "Web search error";

/// Prefix of the sentinel returned when search is not configured.
pub const SEARCH_UNAVAILABLE_PREFIX: &str = "[Web search unavailable";

const NO_WEB_RESULTS_PREFIX: &str = "No web results";

/// A web-search backend returning ordered text snippets.
#[async_trait]
pub trait WebSearch: Send + Sync {
    /// Search for `query` and return snippets, best first, or a single sentinel.
    async fn search(&self, query: &str) -> Vec<String>;
}

/// Whether `snippets` is a sentinel rather than real search output.
///
/// A sentinel is a sequence of exactly one entry that is either
/// [`NO_RESULTS`] or starts with one of the error/unavailable prefixes.
pub fn is_search_sentinel(snippets: &[String]) -> bool {
    match snippets {
        [only] => {
            let only = only.trim();
            only == NO_RESULTS
                || only.starts_with(NO_WEB_RESULTS_PREFIX)
                || only.starts_with(SEARCH_ERROR_PREFIX)
                || only.starts_with(SEARCH_UNAVAILABLE_PREFIX)
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn recognises_every_sentinel_form() {
        assert!(is_search_sentinel(&strings(&[NO_RESULTS])));
        assert!(is_search_sentinel(&strings(&["Web search error: timed out"])));
        assert!(is_search_sentinel(&strings(&["No web results for query"])));
        assert!(is_search_sentinel(&strings(&[
            "[Web search unavailable: no SerpAPI key configured]"
        ])));
    }

    #[test]
    fn real_snippets_are_not_sentinels() {
        assert!(!is_search_sentinel(&[]));
        assert!(!is_search_sentinel(&strings(&["Paris is the capital of France."])));
        // A sentinel-looking entry among real results is still a result list.
        assert!(!is_search_sentinel(&strings(&[NO_RESULTS, "Something else"])));
    }
}
