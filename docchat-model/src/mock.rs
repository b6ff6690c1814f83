//! Mock LLM for testing.

use std::sync::Mutex;

use async_trait::async_trait;
use docchat_core::{DocChatError, Llm, Mode, Result};

/// A recorded `generate` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub prompt: String,
    pub mode: Mode,
}

/// An [`Llm`] that returns a canned answer (or error) and records every call.
#[derive(Debug)]
pub struct MockLlm {
    name: String,
    response: std::result::Result<String, DocChatError>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl MockLlm {
    /// Always answer with `answer`.
    pub fn new(name: impl Into<String>, answer: impl Into<String>) -> Self {
        Self { name: name.into(), response: Ok(answer.into()), calls: Mutex::new(Vec::new()) }
    }

    /// Always fail with a provider error carrying `message`.
    pub fn failing(name: impl Into<String>, message: impl Into<String>) -> Self {
        let name = name.into();
        let response = Err(DocChatError::provider(name.clone(), message));
        Self { name, response, calls: Mutex::new(Vec::new()) }
    }

    /// All calls so far, oldest first.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().map(|calls| calls.clone()).unwrap_or_default()
    }

    /// Number of calls so far.
    pub fn call_count(&self) -> usize {
        self.calls.lock().map(|calls| calls.len()).unwrap_or_default()
    }

    /// The prompt of the most recent call.
    pub fn last_prompt(&self) -> Option<String> {
        self.calls.lock().ok().and_then(|calls| calls.last().map(|c| c.prompt.clone()))
    }
}

#[async_trait]
impl Llm for MockLlm {
    fn name(&self) -> &str {
        &self.name
    }

    async fn generate(&self, prompt: &str, mode: Mode) -> Result<String> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(RecordedCall { prompt: prompt.to_string(), mode });
        }
        self.response.clone()
    }
}
