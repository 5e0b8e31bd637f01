//! LLM chat client: provider selection, configuration, and session factory.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use super::remote::RemoteSession;
use super::session::SessionError;

/// LLM provider selection.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum LlmProvider {
    /// OpenAI (GPT models) or any compatible chat completions endpoint.
    OpenAI,
    /// Anthropic (Claude models).
    Anthropic,
}

impl LlmProvider {
    /// Default API root for this provider.
    pub fn default_base_url(self) -> &'static str {
        match self {
            Self::OpenAI => "https://api.openai.com/v1",
            Self::Anthropic => "https://api.anthropic.com/v1",
        }
    }

    /// Model used when none is configured.
    pub fn default_model(self) -> &'static str {
        match self {
            Self::OpenAI => "gpt-4o",
            Self::Anthropic => "claude-3-5-haiku-20241022",
        }
    }

    /// Environment variable holding the API key.
    pub fn api_key_var(self) -> &'static str {
        match self {
            Self::OpenAI => "OPENAI_API_KEY",
            Self::Anthropic => "ANTHROPIC_API_KEY",
        }
    }
}

/// Connection settings for an LLM client.
#[derive(Debug, Clone, Getters)]
pub struct LlmConfig {
    provider: LlmProvider,
    #[getter(skip)]
    api_key: String,
    model: String,
    max_tokens: u32,
    base_url: String,
}

impl LlmConfig {
    /// Creates a new LLM configuration against the provider's default endpoint.
    #[instrument(skip(api_key), fields(provider = %provider, model = %model))]
    pub fn new(provider: LlmProvider, api_key: String, model: String, max_tokens: u32) -> Self {
        debug!("Creating LLM config");
        Self {
            provider,
            api_key,
            model,
            max_tokens,
            base_url: provider.default_base_url().to_string(),
        }
    }

    /// Points the client at a different API root (proxies, compatible servers).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Gets the API key.
    pub fn api_key(&self) -> &str {
        &self.api_key
    }
}

/// Per-session options.
#[derive(Debug, Clone, Default)]
pub struct SessionOptions {
    /// Model override; falls back to the client's model.
    pub model: Option<String>,
    /// System prompt sent ahead of every turn.
    pub system_prompt: Option<String>,
}

/// Chat client that opens streaming sessions.
///
/// The client must be started before sessions can be created, and
/// stopping it closes the HTTP connection pool.
#[derive(Debug)]
pub struct ChatClient {
    config: LlmConfig,
    http: Option<reqwest::Client>,
    next_session: AtomicU64,
}

impl ChatClient {
    /// Creates a stopped client.
    #[instrument(skip(config), fields(provider = %config.provider()))]
    pub fn new(config: LlmConfig) -> Self {
        info!("Creating chat client");
        Self {
            config,
            http: None,
            next_session: AtomicU64::new(1),
        }
    }

    /// Gets the client configuration.
    pub fn config(&self) -> &LlmConfig {
        &self.config
    }

    /// Whether [`ChatClient::start`] has run without a matching stop.
    pub fn is_running(&self) -> bool {
        self.http.is_some()
    }

    /// Builds the HTTP transport.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] if no API key is configured or the
    /// transport cannot be built.
    #[instrument(skip(self), fields(provider = %self.config.provider, base_url = %self.config.base_url))]
    pub async fn start(&mut self) -> Result<(), SessionError> {
        if self.http.is_some() {
            debug!("Chat client already running");
            return Ok(());
        }
        if self.config.api_key.trim().is_empty() {
            return Err(SessionError::new(format!(
                "{} environment variable not set",
                self.config.provider.api_key_var()
            )));
        }

        let http = reqwest::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(Duration::from_secs(30))
            .build()?;
        self.http = Some(http);
        info!("Chat client started");
        Ok(())
    }

    /// Opens a new session.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] if the client has not been started.
    #[instrument(skip(self, options), fields(model = ?options.model))]
    pub async fn create_session(
        &self,
        options: SessionOptions,
    ) -> Result<RemoteSession, SessionError> {
        let http = self
            .http
            .clone()
            .ok_or_else(|| SessionError::new("Chat client is not started"))?;
        let n = self.next_session.fetch_add(1, Ordering::Relaxed);
        let id = format!("session-{}", n);

        let mut config = self.config.clone();
        if let Some(model) = options.model {
            config.model = model;
        }

        info!(session_id = %id, model = %config.model, "Opening chat session");
        Ok(RemoteSession::new(id, http, config, options.system_prompt))
    }

    /// Releases the HTTP transport.
    #[instrument(skip(self))]
    pub async fn stop(&mut self) {
        match self.http.take() {
            Some(_) => info!("Chat client stopped"),
            None => warn!("Chat client stopped before it was started"),
        }
    }
}
