//! Per-user chat state: mode, message history and the loaded document.

use std::fmt;

use chrono::{DateTime, Utc};
use docchat_core::Mode;
use docchat_rag::{Document, IndexSummary, RagError};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::service::{AnswerService, SessionState};

/// Who produced a [`Message`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::User => f.write_str("user"),
            Role::Assistant => f.write_str("assistant"),
        }
    }
}

/// One entry of the chat history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
    /// Mode active when the message was produced.
    pub mode: Mode,
    pub timestamp: DateTime<Utc>,
}

impl Message {
    fn new(role: Role, content: impl Into<String>, mode: Mode) -> Self {
        Self { role, content: content.into(), mode, timestamp: Utc::now() }
    }
}

/// Outcome of [`Session::upload_text`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadReport {
    /// The document was indexed.
    Loaded(IndexSummary),
    /// The document had no non-blank lines; the previous one stays loaded.
    Empty,
    /// Indexing failed for another reason.
    Failed(String),
}

impl UploadReport {
    fn from_load(result: docchat_rag::Result<IndexSummary>) -> Self {
        match result {
            Ok(summary) => UploadReport::Loaded(summary),
            Err(RagError::InputError(_)) => UploadReport::Empty,
            Err(e) => UploadReport::Failed(e.to_string()),
        }
    }

    /// Whether the document is now the active one.
    pub fn is_loaded(&self) -> bool {
        matches!(self, UploadReport::Loaded(_))
    }
}

impl fmt::Display for UploadReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UploadReport::Loaded(summary) => {
                write!(f, "File loaded! ({} lines)", summary.chunk_count)
            }
            UploadReport::Empty => f.write_str("File is empty"),
            UploadReport::Failed(reason) => write!(f, "Upload failed: {reason}"),
        }
    }
}

/// Snapshot returned by [`Session::status`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStatus {
    pub session_id: Uuid,
    pub mode: Mode,
    pub message_count: usize,
    pub state: SessionState,
    pub document: Option<IndexSummary>,
    pub web_search: bool,
}

/// A chat session over one document at a time.
pub struct Session {
    id: Uuid,
    created_at: DateTime<Utc>,
    mode: Mode,
    messages: Vec<Message>,
    service: AnswerService,
}

impl Session {
    /// Start a session in concise mode with an empty history.
    pub fn new(service: AnswerService) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            mode: Mode::default(),
            messages: Vec::new(),
            service,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: Mode) {
        if self.mode != mode {
            info!(session.id = %self.id, %mode, "response mode changed");
        }
        self.mode = mode;
    }

    pub fn service(&self) -> &AnswerService {
        &self.service
    }

    /// Index `text` under the name `name`, replacing the current document.
    pub async fn upload_text(&mut self, name: &str, text: &str) -> UploadReport {
        let result = self.service.upload(&Document::new(name, text)).await;
        if let Err(e) = &result {
            warn!(session.id = %self.id, document.id = name, error = %e, "upload rejected");
        }
        UploadReport::from_load(result)
    }

    /// Ask a question in the active mode and record both sides in the history.
    ///
    /// Blank questions are ignored and return `None`.
    pub async fn ask(&mut self, query: &str) -> Option<String> {
        let query = query.trim();
        if query.is_empty() {
            return None;
        }

        self.messages.push(Message::new(Role::User, query, self.mode));
        let answer = self.service.answer(query, self.mode).await;
        self.messages.push(Message::new(Role::Assistant, answer.clone(), self.mode));
        Some(answer)
    }

    /// The history, oldest first.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Empty the history. The loaded document and mode are kept.
    pub fn clear(&mut self) {
        self.messages.clear();
    }

    pub async fn status(&self) -> SessionStatus {
        let document = self.service.engine().summary().await;
        SessionStatus {
            session_id: self.id,
            mode: self.mode,
            message_count: self.messages.len(),
            state: if document.is_some() { SessionState::Ready } else { SessionState::NoDocument },
            document,
            web_search: self.service.web_search_enabled(),
        }
    }
}
