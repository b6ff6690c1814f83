use docchat_core::{WebSearch, is_search_sentinel};
use docchat_tool::{ScriptedSearch, SerpApiSearch};

#[tokio::test]
async fn test_search_without_key_is_unavailable() {
    let search = SerpApiSearch::new(None);
    assert!(!search.is_configured());

    let results = search.search("capital of France").await;
    assert_eq!(results, vec!["[Web search unavailable: no SerpAPI key configured]".to_string()]);
    assert!(is_search_sentinel(&results));

    assert!(!SerpApiSearch::new(Some("  ".into())).is_configured());
}

#[tokio::test]
async fn test_unreachable_endpoint_yields_error_sentinel() {
    // Port 9 (discard) on localhost is not expected to serve HTTP.
    let search =
        SerpApiSearch::new(Some("key".into())).with_base_url("http://127.0.0.1:9/search.json");

    let results = search.search("anything").await;
    assert_eq!(results.len(), 1);
    assert!(results[0].starts_with("Web search error: "), "got {results:?}");
    assert!(is_search_sentinel(&results));
}

#[tokio::test]
async fn test_scripted_search_records_queries() {
    let search = ScriptedSearch::new(["France is in Europe."]);

    assert_eq!(search.search("where is France").await, vec!["France is in Europe.".to_string()]);
    assert_eq!(search.queries(), vec!["where is France".to_string()]);
}
