//! Backend-agnostic conversation sessions.
//!
//! The controller only ever sees these two traits: a [`ChatBackend`] opens a
//! session bound to one persona's system instruction, and a [`ChatSession`]
//! sends one utterance at a time within that context. Turn history lives
//! inside the session handle and is never inspected by callers.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;

use crate::core::persona::Persona;

/// Banner shown when a session cannot be bound to a persona.
pub const INIT_ERROR_BANNER: &str = "Failed to initialize chat session. Please check your API key.";
/// Fallback detail when a failed request carries no message of its own.
pub const GENERIC_REQUEST_ERROR: &str = "An error occurred while fetching the response.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// Missing or invalid credentials, or the session could not be bound.
    Initialization(String),
    /// A single send failed: transport, backend-side, or malformed reply.
    Request { message: String },
}

impl SessionError {
    pub fn request(message: impl Into<String>) -> Self {
        SessionError::Request {
            message: message.into(),
        }
    }

    pub fn is_initialization(&self) -> bool {
        matches!(self, SessionError::Initialization(_))
    }

    /// Human-readable text for the error banner.
    pub fn banner_text(&self) -> String {
        match self {
            SessionError::Initialization(_) => INIT_ERROR_BANNER.to_string(),
            SessionError::Request { message } => {
                let message = message.trim();
                if message.is_empty() {
                    format!("Error: {GENERIC_REQUEST_ERROR}")
                } else {
                    format!("Error: {message}")
                }
            }
        }
    }
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::Initialization(detail) => {
                write!(f, "Failed to initialize chat session: {detail}")
            }
            SessionError::Request { message } => write!(f, "Request failed: {message}"),
        }
    }
}

impl std::error::Error for SessionError {}

/// One conversational context on the backend.
#[async_trait]
pub trait ChatSession: Send + Sync {
    /// The directive this session was opened with.
    fn system_instruction(&self) -> &str;

    /// Send one utterance and wait for the reply. Exactly one attempt is made.
    async fn send(&self, utterance: &str) -> Result<String, SessionError>;
}

pub type SharedSession = Arc<dyn ChatSession>;

/// Factory for sessions.
pub trait ChatBackend: Send + Sync {
    fn open(&self, persona: &Persona) -> Result<SharedSession, SessionError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initialization_banner_mentions_api_key() {
        let err = SessionError::Initialization("GEMINI_API_KEY is not set".into());
        assert!(err.is_initialization());
        assert_eq!(err.banner_text(), INIT_ERROR_BANNER);
        assert!(err.to_string().contains("GEMINI_API_KEY"));
    }

    #[test]
    fn request_banner_prefixes_message() {
        let err = SessionError::request("RESOURCE_EXHAUSTED: quota exceeded");
        assert!(!err.is_initialization());
        assert_eq!(err.banner_text(), "Error: RESOURCE_EXHAUSTED: quota exceeded");
    }

    #[test]
    fn empty_request_message_uses_generic_text() {
        let err = SessionError::request("  ");
        assert_eq!(
            err.banner_text(),
            "Error: An error occurred while fetching the response."
        );
    }
}
