//! Single-turn request/response over a streaming chat session.

use tracing::{debug, info, instrument, warn};

use super::events::{EventKind, SessionEvent};
use super::session::{ChatSession, SessionError};

/// Sends `prompt` and returns the trimmed text of the full reply.
///
/// Listeners are registered before the prompt is dispatched and are
/// released when this returns, whether the turn ended in idle, a send
/// failure, or a session error.
///
/// # Errors
///
/// Returns [`SessionError`] if the prompt is blank, the send is
/// rejected, the session reports an error, or the session closes before
/// going idle.
#[instrument(skip(session, prompt), fields(session_id = %session.id(), prompt_len = prompt.len()))]
pub async fn get_response<S>(session: &S, prompt: &str) -> Result<String, SessionError>
where
    S: ChatSession + ?Sized,
{
    if prompt.trim().is_empty() {
        return Err(SessionError::new("Prompt must not be empty"));
    }

    let hub = session.events();
    let mut messages = hub.subscribe(EventKind::AssistantMessage);
    let mut idle = hub.subscribe(EventKind::Idle);
    let mut failures = hub.subscribe(EventKind::Error);

    debug!("Dispatching prompt");
    session.send(prompt).await?;

    let mut reply = String::new();
    loop {
        tokio::select! {
            biased;
            Some(event) = messages.recv() => {
                if let Some(text) = event.content() {
                    reply.push_str(text);
                }
            }
            Some(event) = failures.recv() => {
                let message = match event {
                    SessionEvent::Error { message } => message,
                    other => format!("Unexpected event on error stream: {:?}", other),
                };
                warn!(%message, "Session reported an error mid-turn");
                return Err(SessionError::new(message));
            }
            Some(_) = idle.recv() => break,
            else => {
                return Err(SessionError::new("Session closed before the turn completed"));
            }
        }
    }

    // Fragments published just ahead of idle may still be queued.
    while let Some(event) = messages.try_recv() {
        if let Some(text) = event.content() {
            reply.push_str(text);
        }
    }

    let reply = reply.trim().to_string();
    info!(reply_len = reply.len(), "Turn complete");
    Ok(reply)
}
