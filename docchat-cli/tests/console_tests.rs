#![cfg(feature = "gemini")]

use std::path::PathBuf;
use std::time::Duration;

use docchat_cli::console::upload_file;
use docchat_cli::{AppConfig, Provider, build_session};
use docchat_core::Mode;
use docchat_session::UploadReport;

fn offline_config() -> AppConfig {
    AppConfig {
        provider: Provider::Gemini,
        model: "gemini-1.5-flash".into(),
        generation_api_key: "key".into(),
        embedding_api_key: None,
        embedding_model: None,
        web_search: None,
        top_k: 3,
        generation_timeout: Duration::from_secs(60),
        mode: Mode::Concise,
        paragraphs: false,
    }
}

fn temp_file(name: &str, contents: &[u8]) -> PathBuf {
    let path = std::env::temp_dir().join(format!("docchat-{}-{name}", std::process::id()));
    std::fs::write(&path, contents).unwrap();
    path
}

#[tokio::test]
async fn test_upload_file_reports_line_count() {
    let mut session = build_session(&offline_config()).unwrap();
    let path = temp_file("lines.txt", b"first line\n\n  second line  \n\xff\xfe third\n");

    let report = upload_file(&mut session, &path).await.unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(report.to_string(), "File loaded! (3 lines)");
    let status = session.status().await;
    let document = status.document.unwrap();
    assert_eq!(document.document_id, path.file_name().unwrap().to_string_lossy());
    assert_eq!(document.fallback_count, 3);
}

#[tokio::test]
async fn test_upload_of_blank_file_is_reported_empty() {
    let mut session = build_session(&offline_config()).unwrap();
    let path = temp_file("blank.txt", b"\n   \n");

    let report = upload_file(&mut session, &path).await.unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(report, UploadReport::Empty);
    assert!(session.status().await.document.is_none());
}

#[tokio::test]
async fn test_missing_file_is_an_error() {
    let mut session = build_session(&offline_config()).unwrap();
    let missing = PathBuf::from("/definitely/not/here.txt");
    let err = upload_file(&mut session, &missing).await.unwrap_err();
    assert!(err.to_string().contains("failed to read"));
}
