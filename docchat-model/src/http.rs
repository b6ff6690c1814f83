//! Shared HTTP plumbing for the REST-backed models.

use std::time::Duration;

use docchat_core::{DocChatError, Result};

/// Upper bound on a whole generation request, connect to last byte.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

pub(crate) fn client(timeout: Duration) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| DocChatError::Config(format!("failed to build HTTP client: {e}")))
}

pub(crate) fn send_error(provider: &str, timeout: Duration, e: &reqwest::Error) -> DocChatError {
    if e.is_timeout() {
        let secs = timeout.as_secs_f32();
        DocChatError::provider(provider, format!("request timed out after {secs}s"))
    } else {
        DocChatError::provider(provider, format!("request failed: {e}"))
    }
}
