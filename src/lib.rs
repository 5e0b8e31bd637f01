//! Sassy Hangman library - console Hangman hosted by an LLM
//!
//! An AI chat session picks the secret word, hands out hints on demand,
//! and narrates the ending. The guess loop itself is plain state
//! bookkeeping and never touches the network.
//!
//! # Architecture
//!
//! - **Chat**: streaming LLM sessions with per-turn listener scopes
//! - **Game**: Hangman rules, input parsing, and the interactive round
//! - **Config**: TOML file plus command-line overrides
//!
//! # Example
//!
//! ```no_run
//! use sassy_hangman::{ChatClient, ChatSession, HangmanConfig, get_response};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = HangmanConfig::default();
//! let mut client = ChatClient::new(config.create_llm_config()?);
//! client.start().await?;
//!
//! let session = client.create_session(config.session_options()).await?;
//! let reply = get_response(&session, "Say hello in five words.").await?;
//! println!("{reply}");
//!
//! session.destroy().await;
//! client.stop().await;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod chat;
mod cli;
mod config;
mod game;

// Crate-level exports - Chat sessions
pub use chat::{
    ChatClient, ChatMessage, ChatSession, EventHub, EventKind, LlmConfig, LlmProvider,
    RemoteSession, Role, SessionError, SessionEvent, SessionOptions, SseDecoder, SseEvent,
    StreamChunk, Subscription, decode_chunk, get_response,
};

// Crate-level exports - Command line
pub use cli::{Cli, DEFAULT_CONFIG_PATH};

// Crate-level exports - Configuration
pub use config::{ConfigError, ConfigOverrides, HangmanConfig};

// Crate-level exports - Game
pub use game::{
    DEFAULT_MAX_MISTAKES, Flavor, Game, GameSettings, GuessError, GuessOutcome, HOST_PERSONA,
    INPUT_PROMPT, Phase, PlayerInput, SECRET_WORD_PROMPT, SecretWord, hint_prompt, host_game,
    loss_prompt, pick_secret_word, play_game, win_prompt,
};
