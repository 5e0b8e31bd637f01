//! Sassy Hangman - console entry point.

use anyhow::{Context, Result};
use clap::Parser;
use sassy_hangman::{
    ChatClient, ChatSession, Cli, DEFAULT_CONFIG_PATH, HangmanConfig, host_game,
};
use tracing::{error, info, instrument};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    // Failures are reported, not turned into an exit status.
    if let Err(e) = run(cli).await {
        error!(error = %e, "Hangman aborted");
        eprintln!("An error occurred: {:#}", e);
    }

    Ok(())
}

/// Loads configuration and plays one game, stopping the client on every path.
#[instrument(skip(cli))]
async fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => HangmanConfig::from_file(path)?,
        None => HangmanConfig::load_or_default(DEFAULT_CONFIG_PATH)?,
    }
    .apply(cli.overrides())?;

    let mut client = ChatClient::new(config.create_llm_config()?);

    println!("🚀 Connecting to the host...");
    let result = play(&mut client, &config).await;
    client.stop().await;
    result
}

/// Opens a session, plays, and destroys the session on every path.
#[instrument(skip_all)]
async fn play(client: &mut ChatClient, config: &HangmanConfig) -> Result<()> {
    client
        .start()
        .await
        .context("Failed to start the chat client")?;
    let session = client
        .create_session(config.session_options())
        .await
        .context("Failed to open a chat session")?;

    let mut input = tokio::io::BufReader::new(tokio::io::stdin());
    let mut output = std::io::stdout();
    let result = host_game(&session, config.game_settings(), &mut input, &mut output).await;

    session.destroy().await;

    let phase = result?;
    info!(%phase, "Game over");
    Ok(())
}
