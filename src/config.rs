//! Game and host configuration.

use std::path::Path;

use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::chat::{LlmConfig, LlmProvider, SessionOptions};
use crate::game::{DEFAULT_MAX_MISTAKES, GameSettings, HOST_PERSONA};

/// Configuration loaded from `hangman.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HangmanConfig {
    /// LLM provider (openai or anthropic).
    #[serde(default = "default_provider")]
    provider: LlmProvider,

    /// Model name (e.g., "gpt-4o", "claude-3-5-haiku-20241022").
    /// Unset means the provider's default model.
    #[serde(default)]
    #[getter(skip)]
    model: Option<String>,

    /// Maximum tokens per reply.
    #[serde(default = "default_max_tokens")]
    max_tokens: u32,

    /// API root override, for proxies and compatible servers.
    #[serde(default)]
    base_url: Option<String>,

    /// Replaces the built-in host persona.
    #[serde(default)]
    system_prompt: Option<String>,

    /// Wrong guesses allowed.
    #[serde(default = "default_max_mistakes")]
    max_mistakes: u32,

    /// Ask the host to narrate wins and losses.
    #[serde(default = "default_narrate_endings")]
    narrate_endings: bool,
}

fn default_provider() -> LlmProvider {
    LlmProvider::OpenAI
}

fn default_max_tokens() -> u32 {
    256
}

fn default_max_mistakes() -> u32 {
    DEFAULT_MAX_MISTAKES
}

fn default_narrate_endings() -> bool {
    true
}

impl Default for HangmanConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            model: None,
            max_tokens: default_max_tokens(),
            base_url: None,
            system_prompt: None,
            max_mistakes: default_max_mistakes(),
            narrate_endings: default_narrate_endings(),
        }
    }
}

/// Command-line overrides layered over the file.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    /// Provider override.
    pub provider: Option<LlmProvider>,
    /// Model override.
    pub model: Option<String>,
    /// Mistake budget override.
    pub max_mistakes: Option<u32>,
    /// Turn off ending narration.
    pub no_narration: bool,
}

impl HangmanConfig {
    /// Parses configuration from TOML text.
    #[instrument(skip(content))]
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;
        let config = Self::from_toml(&content)?;
        info!(provider = %config.provider, model = %config.model(), "Config loaded successfully");
        Ok(config)
    }

    /// Loads `path` if it exists, otherwise returns the defaults.
    ///
    /// Use this for the implicit default location; an explicitly named
    /// file should go through [`HangmanConfig::from_file`] so a typo is
    /// reported.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            Self::from_file(path)
        } else {
            debug!("No config file, using defaults");
            Ok(Self::default())
        }
    }

    /// Applies command-line overrides.
    #[instrument(skip(self))]
    pub fn apply(mut self, overrides: ConfigOverrides) -> Result<Self, ConfigError> {
        if let Some(provider) = overrides.provider {
            self.provider = provider;
        }
        if let Some(model) = overrides.model {
            self.model = Some(model);
        }
        if let Some(max_mistakes) = overrides.max_mistakes {
            self.max_mistakes = max_mistakes;
        }
        if overrides.no_narration {
            self.narrate_endings = false;
        }
        self.validate()?;
        Ok(self)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.max_mistakes == 0 {
            return Err(ConfigError::new("max_mistakes must be at least 1"));
        }
        if self.model().trim().is_empty() {
            return Err(ConfigError::new("model must not be empty"));
        }
        if self.max_tokens == 0 {
            return Err(ConfigError::new("max_tokens must be at least 1"));
        }
        Ok(())
    }

    /// Model name, falling back to the provider's default.
    pub fn model(&self) -> &str {
        self.model
            .as_deref()
            .unwrap_or_else(|| self.provider.default_model())
    }

    /// Builds the LLM client configuration.
    /// Requires OPENAI_API_KEY or ANTHROPIC_API_KEY environment variable.
    #[instrument(skip(self), fields(provider = %self.provider, model = %self.model()))]
    pub fn create_llm_config(&self) -> Result<LlmConfig, ConfigError> {
        let var = self.provider.api_key_var();
        let api_key = std::env::var(var)
            .map_err(|_| ConfigError::new(format!("{} environment variable not set", var)))?;

        let config = LlmConfig::new(
            self.provider,
            api_key,
            self.model().to_string(),
            self.max_tokens,
        );
        Ok(match &self.base_url {
            Some(url) => config.with_base_url(url.clone()),
            None => config,
        })
    }

    /// Options for the game's chat session.
    pub fn session_options(&self) -> SessionOptions {
        SessionOptions {
            model: Some(self.model().to_string()),
            system_prompt: Some(
                self.system_prompt
                    .clone()
                    .unwrap_or_else(|| HOST_PERSONA.to_string()),
            ),
        }
    }

    /// Settings for the guess loop.
    pub fn game_settings(&self) -> GameSettings {
        GameSettings {
            max_mistakes: self.max_mistakes,
            narrate_endings: self.narrate_endings,
        }
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}
