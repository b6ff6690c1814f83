use std::sync::Arc;

use crate::memory::SharedEventStorage;
use crate::{LogFormat, capture_subscriber};

#[test]
fn test_captures_level_message_and_fields() {
    let storage = Arc::new(SharedEventStorage::new());
    let _guard = tracing::subscriber::set_default(capture_subscriber(storage.clone()));

    tracing::warn!(inputs = 3u64, provider = "Gemini", "using random embeddings as fallback");
    tracing::info!(chunk_count = 2u64, "indexed document");

    let events = storage.events();
    assert_eq!(events.len(), 2);

    let warn = &events[0];
    assert_eq!(warn.level, "WARN");
    assert_eq!(warn.message, "using random embeddings as fallback");
    assert_eq!(warn.fields["inputs"], serde_json::json!(3));
    assert_eq!(warn.fields["provider"], serde_json::json!("Gemini"));
    assert!(!warn.fields.contains_key("message"));

    assert_eq!(storage.count_at_level("info"), 1);
    assert_eq!(storage.find("warn", "random embeddings").len(), 1);
}

#[tokio::test]
async fn test_capture_across_await_points() {
    let storage = Arc::new(SharedEventStorage::new());
    let _guard = tracing::subscriber::set_default(capture_subscriber(storage.clone()));

    tokio::task::yield_now().await;
    tracing::error!(error = %"boom", "provider call failed");

    let errors = storage.find("ERROR", "provider call failed");
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].fields["error"], serde_json::json!("boom"));

    storage.clear();
    assert!(storage.events().is_empty());
}

#[test]
fn test_log_format_parsing() {
    assert_eq!("json".parse::<LogFormat>().unwrap(), LogFormat::Json);
    assert_eq!("Pretty".parse::<LogFormat>().unwrap(), LogFormat::Pretty);
    assert!("xml".parse::<LogFormat>().is_err());
}
