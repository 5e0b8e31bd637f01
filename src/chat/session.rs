//! The chat session contract the game talks to.

use async_trait::async_trait;
use derive_more::{Display, Error};
use tracing::{error, instrument};

use super::events::EventHub;

/// One AI dialogue.
///
/// `send` only dispatches. The reply arrives as notifications on
/// [`ChatSession::events`], ending with an idle notification.
#[async_trait]
pub trait ChatSession: Send + Sync {
    /// Session identifier, for logging.
    fn id(&self) -> &str;

    /// The hub this session publishes notifications to.
    fn events(&self) -> &EventHub;

    /// Dispatches `prompt`. Resolves once the session has accepted it.
    async fn send(&self, prompt: &str) -> Result<(), SessionError>;

    /// Closes the session. Later sends fail and all listeners are dropped.
    async fn destroy(&self);
}

/// Chat session error.
#[derive(Debug, Clone, Display, Error)]
#[display("Session error: {} at {}:{}", message, file, line)]
pub struct SessionError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl SessionError {
    /// Creates a new session error with caller location tracking.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        let message = message.into();
        error!(error_message = %message, "Session error created");
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}

impl From<reqwest::Error> for SessionError {
    #[track_caller]
    fn from(err: reqwest::Error) -> Self {
        Self::new(format!("HTTP transport error: {}", err))
    }
}
