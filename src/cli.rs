//! Command-line interface for sassy_hangman.

use std::path::PathBuf;

use clap::Parser;

use crate::chat::LlmProvider;
use crate::config::ConfigOverrides;

/// Default config file, read only if present.
pub const DEFAULT_CONFIG_PATH: &str = "hangman.toml";

/// Sassy Hangman - guess the word before the AI host roasts you
#[derive(Parser, Debug)]
#[command(name = "sassy_hangman")]
#[command(about = "Console Hangman hosted by an LLM", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to a TOML config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// LLM provider (openai or anthropic)
    #[arg(long)]
    pub provider: Option<LlmProvider>,

    /// Model name
    #[arg(short, long)]
    pub model: Option<String>,

    /// Wrong guesses allowed before the game is lost
    #[arg(long)]
    pub max_mistakes: Option<u32>,

    /// Skip the host's win/loss narration
    #[arg(long)]
    pub no_narration: bool,
}

impl Cli {
    /// Overrides to layer over the config file.
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            provider: self.provider,
            model: self.model.clone(),
            max_mistakes: self.max_mistakes,
            no_narration: self.no_narration,
        }
    }
}
