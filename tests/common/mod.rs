//! Scripted in-memory chat session for tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use sassy_hangman::{ChatSession, EventHub, SessionError, SessionEvent};

/// How the scripted session answers one send.
#[derive(Debug, Clone)]
pub enum Reply {
    /// Publish these fragments, then idle.
    Fragments(Vec<Option<String>>),
    /// Publish the fragments from a spawned task after yielding.
    Deferred(Vec<String>),
    /// Reject the send.
    SendFails(String),
    /// Accept the send, publish one fragment, then an error event.
    StreamFails(String),
    /// Accept the send, then close the hub without going idle.
    Hangup,
}

impl Reply {
    /// A reply made of one fragment.
    pub fn text(text: &str) -> Self {
        Self::Fragments(vec![Some(text.to_string())])
    }

    /// A reply split into several fragments.
    pub fn chunks(parts: &[&str]) -> Self {
        Self::Fragments(parts.iter().map(|p| Some(p.to_string())).collect())
    }
}

/// A chat session that plays back canned replies in order.
#[derive(Debug, Default)]
pub struct ScriptedSession {
    events: EventHub,
    replies: Mutex<VecDeque<Reply>>,
    prompts: Mutex<Vec<String>>,
    listeners_at_send: Mutex<Vec<usize>>,
    destroyed: AtomicBool,
}

impl ScriptedSession {
    /// Creates a session that answers with `replies`.
    pub fn new(replies: impl IntoIterator<Item = Reply>) -> Self {
        Self {
            replies: Mutex::new(replies.into_iter().collect()),
            ..Self::default()
        }
    }

    /// Creates a session with no replies; any send fails.
    pub fn silent() -> Self {
        Self::default()
    }

    /// Every prompt sent so far.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    /// Listener count observed at each send.
    pub fn listeners_at_send(&self) -> Vec<usize> {
        self.listeners_at_send.lock().unwrap().clone()
    }

    /// Replies not consumed yet.
    pub fn remaining(&self) -> usize {
        self.replies.lock().unwrap().len()
    }
}

#[async_trait]
impl ChatSession for ScriptedSession {
    fn id(&self) -> &str {
        "scripted"
    }

    fn events(&self) -> &EventHub {
        &self.events
    }

    async fn send(&self, prompt: &str) -> Result<(), SessionError> {
        if self.destroyed.load(Ordering::SeqCst) {
            return Err(SessionError::new("Session has been destroyed"));
        }
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.listeners_at_send
            .lock()
            .unwrap()
            .push(self.events.listener_count());

        let reply = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| SessionError::new("No scripted reply left"))?;

        match reply {
            Reply::Fragments(parts) => {
                for content in parts {
                    self.events.publish(SessionEvent::AssistantMessage { content });
                }
                self.events.publish(SessionEvent::Idle);
            }
            Reply::Deferred(parts) => {
                let events = self.events.clone();
                tokio::spawn(async move {
                    for part in parts {
                        tokio::task::yield_now().await;
                        events.publish(SessionEvent::fragment(part));
                    }
                    events.publish(SessionEvent::Idle);
                });
            }
            Reply::SendFails(message) => return Err(SessionError::new(message)),
            Reply::StreamFails(message) => {
                self.events.publish(SessionEvent::fragment("partial "));
                self.events.publish(SessionEvent::Error { message });
            }
            Reply::Hangup => self.events.close(),
        }
        Ok(())
    }

    async fn destroy(&self) {
        self.destroyed.store(true, Ordering::SeqCst);
        self.events.close();
    }
}
