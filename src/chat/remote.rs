//! Streaming chat session over an LLM HTTP API.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use futures::StreamExt;
use serde::Serialize;
use serde_json::json;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, instrument, warn};

use super::client::{LlmConfig, LlmProvider};
use super::events::{EventHub, SessionEvent};
use super::session::{ChatSession, SessionError};
use super::sse::{SseDecoder, StreamChunk, decode_chunk};

/// Speaker of a transcript entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The player-side prompt.
    User,
    /// The model's reply.
    Assistant,
}

/// One transcript entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    /// Who said it.
    pub role: Role,
    /// What was said.
    pub content: String,
}

type Transcript = Arc<Mutex<Vec<ChatMessage>>>;

/// A chat session backed by a streaming HTTP endpoint.
///
/// The session replays its transcript on every send, so the model sees
/// the whole conversation.
#[derive(Debug)]
pub struct RemoteSession {
    id: String,
    http: reqwest::Client,
    config: LlmConfig,
    system_prompt: Option<String>,
    transcript: Transcript,
    events: EventHub,
    open: AtomicBool,
    in_flight: Mutex<Option<JoinHandle<()>>>,
}

impl RemoteSession {
    pub(super) fn new(
        id: String,
        http: reqwest::Client,
        config: LlmConfig,
        system_prompt: Option<String>,
    ) -> Self {
        Self {
            id,
            http,
            config,
            system_prompt,
            transcript: Arc::new(Mutex::new(Vec::new())),
            events: EventHub::new(),
            open: AtomicBool::new(true),
            in_flight: Mutex::new(None),
        }
    }

    /// Snapshot of the conversation so far.
    pub fn transcript(&self) -> Vec<ChatMessage> {
        self.transcript
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn rollback(&self) {
        self.transcript
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop();
    }

    fn request(&self, messages: &[ChatMessage]) -> reqwest::RequestBuilder {
        let base = self.config.base_url();
        match self.config.provider() {
            LlmProvider::OpenAI => {
                let mut all = Vec::with_capacity(messages.len() + 1);
                if let Some(system) = &self.system_prompt {
                    all.push(json!({ "role": "system", "content": system }));
                }
                all.extend(
                    messages
                        .iter()
                        .map(|m| json!({ "role": m.role, "content": m.content })),
                );
                self.http
                    .post(format!("{}/chat/completions", base))
                    .bearer_auth(self.config.api_key())
                    .json(&json!({
                        "model": self.config.model(),
                        "max_tokens": self.config.max_tokens(),
                        "stream": true,
                        "messages": all,
                    }))
            }
            LlmProvider::Anthropic => {
                let mut body = json!({
                    "model": self.config.model(),
                    "max_tokens": self.config.max_tokens(),
                    "stream": true,
                    "messages": messages,
                });
                if let Some(system) = &self.system_prompt {
                    body["system"] = json!(system);
                }
                self.http
                    .post(format!("{}/messages", base))
                    .header("x-api-key", self.config.api_key())
                    .header("anthropic-version", "2023-06-01")
                    .json(&body)
            }
        }
    }
}

#[async_trait]
impl ChatSession for RemoteSession {
    fn id(&self) -> &str {
        &self.id
    }

    fn events(&self) -> &EventHub {
        &self.events
    }

    #[instrument(skip(self, prompt), fields(session_id = %self.id, provider = %self.config.provider()))]
    async fn send(&self, prompt: &str) -> Result<(), SessionError> {
        if !self.open.load(Ordering::Acquire) {
            return Err(SessionError::new("Session has been destroyed"));
        }

        let messages = {
            let mut transcript = self.transcript.lock().unwrap_or_else(PoisonError::into_inner);
            transcript.push(ChatMessage {
                role: Role::User,
                content: prompt.to_string(),
            });
            transcript.clone()
        };

        debug!(turns = messages.len(), "Sending request");
        let response = match self.request(&messages).send().await {
            Ok(response) => response,
            Err(e) => {
                self.rollback();
                return Err(e.into());
            }
        };

        let status = response.status();
        if !status.is_success() {
            self.rollback();
            let body = response.text().await.unwrap_or_default();
            error!(status = %status, response = %body, "Chat API error");
            return Err(SessionError::new(format!(
                "Chat API error {}: {}",
                status, body
            )));
        }

        let task = tokio::spawn(stream_reply(
            response,
            *self.config.provider(),
            self.events.clone(),
            Arc::clone(&self.transcript),
        ));
        let previous = self
            .in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .replace(task);
        if let Some(previous) = previous {
            previous.abort();
        }

        info!("Prompt accepted");
        Ok(())
    }

    #[instrument(skip(self), fields(session_id = %self.id))]
    async fn destroy(&self) {
        if !self.open.swap(false, Ordering::AcqRel) {
            debug!("Session already destroyed");
            return;
        }
        if let Some(task) = self
            .in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
        {
            task.abort();
        }
        self.events.close();
        info!("Session destroyed");
    }
}

/// Reads the SSE body, publishing fragments and then idle or error.
async fn stream_reply(
    response: reqwest::Response,
    provider: LlmProvider,
    events: EventHub,
    transcript: Transcript,
) {
    let mut decoder = SseDecoder::new();
    let mut body = std::pin::pin!(response.bytes_stream());
    let mut reply = String::new();

    let outcome = 'stream: loop {
        let sse_events = match body.next().await {
            Some(Ok(bytes)) => decoder.push(&bytes),
            Some(Err(e)) => break 'stream Err(format!("Stream interrupted: {}", e)),
            None => {
                if let Some(event) = decoder.finish()
                    && let StreamChunk::Fragment(Some(text)) = decode_chunk(provider, &event)
                {
                    reply.push_str(&text);
                    events.publish(SessionEvent::fragment(text));
                }
                // Some compatible servers close without an explicit terminator.
                break 'stream Ok(());
            }
        };

        for event in &sse_events {
            match decode_chunk(provider, event) {
                StreamChunk::Fragment(content) => {
                    if let Some(text) = &content {
                        reply.push_str(text);
                    }
                    events.publish(SessionEvent::AssistantMessage { content });
                }
                StreamChunk::Done => break 'stream Ok(()),
                StreamChunk::Failed(message) => break 'stream Err(message),
                StreamChunk::Skip => {}
            }
        }
    };

    // Unanswered or blank turns leave the transcript, so user and
    // assistant entries keep alternating.
    let answered = outcome.is_ok() && !reply.trim().is_empty();
    debug!(reply_len = reply.len(), answered, "Reply stream ended");
    {
        let mut transcript = transcript.lock().unwrap_or_else(PoisonError::into_inner);
        if answered {
            transcript.push(ChatMessage {
                role: Role::Assistant,
                content: reply,
            });
        } else {
            transcript.pop();
        }
    }

    match outcome {
        Ok(()) => {
            events.publish(SessionEvent::Idle);
        }
        Err(message) => {
            warn!(%message, "Reply stream failed");
            events.publish(SessionEvent::Error { message });
        }
    }
}
