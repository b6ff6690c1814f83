//! # docchat-session
//!
//! The answer pipeline and the chat session built on top of it.
//!
//! - [`AnswerService`] - query + mode → answer text, gated on a loaded document
//! - [`Session`] - mode, message history and uploads for one user

pub mod service;
pub mod session;

pub use service::{AnswerService, GENERATION_ERROR_PREFIX, NO_DOCUMENT_MESSAGE, SessionState};
pub use session::{Message, Role, Session, SessionStatus, UploadReport};
