//! Conversational AI plumbing: sessions, notifications, and the
//! single-turn bridge the game uses.

mod bridge;
mod client;
mod events;
mod remote;
mod session;
mod sse;

pub use bridge::get_response;
pub use client::{ChatClient, LlmConfig, LlmProvider, SessionOptions};
pub use events::{EventHub, EventKind, SessionEvent, Subscription};
pub use remote::{ChatMessage, RemoteSession, Role};
pub use session::{ChatSession, SessionError};
pub use sse::{SseDecoder, SseEvent, StreamChunk, decode_chunk};
