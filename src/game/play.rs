//! The interactive round: word selection, the guess loop, and the
//! closing narration.

use std::io::Write;

use anyhow::{Context, Result, bail};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, info, instrument, warn};

use super::flavor::Flavor;
use super::input::PlayerInput;
use super::prompts::{SECRET_WORD_PROMPT, hint_prompt, loss_prompt, win_prompt};
use super::state::{DEFAULT_MAX_MISTAKES, Game, GuessError, GuessOutcome, Phase, SecretWord};
use crate::chat::{ChatSession, get_response};

/// Prompt shown before each read.
pub const INPUT_PROMPT: &str = "Enter guess or 'hint': ";

/// Knobs for a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameSettings {
    /// Wrong guesses allowed.
    pub max_mistakes: u32,
    /// Ask the host to narrate the ending.
    pub narrate_endings: bool,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            max_mistakes: DEFAULT_MAX_MISTAKES,
            narrate_endings: true,
        }
    }
}

/// Asks the host for a word and sanitizes the reply.
///
/// # Errors
///
/// Fails if the turn fails or the reply contains no letters.
#[instrument(skip(session), fields(session_id = %session.id()))]
pub async fn pick_secret_word<S>(session: &S) -> Result<SecretWord>
where
    S: ChatSession + ?Sized,
{
    let raw = get_response(session, SECRET_WORD_PROMPT)
        .await
        .context("Failed to ask for a secret word")?;
    match SecretWord::sanitize(&raw) {
        Some(word) => {
            info!(word_len = word.len(), "Secret word chosen");
            Ok(word)
        }
        None => {
            warn!(reply = %raw, "Host reply had no usable letters");
            bail!("Failed to get a valid word from the host (reply was {:?})", raw)
        }
    }
}

/// Picks a word and plays one round to completion.
///
/// Returns the terminal phase.
#[instrument(skip_all, fields(session_id = %session.id()))]
pub async fn host_game<S, R, W>(
    session: &S,
    settings: GameSettings,
    input: &mut R,
    out: &mut W,
) -> Result<Phase>
where
    S: ChatSession + ?Sized,
    R: AsyncBufRead + Unpin,
    W: Write,
{
    writeln!(out, "🎲 Asking the host to pick a secret word...")?;
    let word = pick_secret_word(session).await?;
    let game = Game::new(word, settings.max_mistakes);
    play_game(session, game, settings, input, out).await
}

/// Runs the guess loop on `game` until it is won or lost.
///
/// Hints and rejected input never consume a guess. Closing `input`
/// before the game ends is an error.
#[instrument(skip_all, fields(session_id = %session.id(), max_mistakes = game.max_mistakes()))]
pub async fn play_game<S, R, W>(
    session: &S,
    mut game: Game,
    settings: GameSettings,
    input: &mut R,
    out: &mut W,
) -> Result<Phase>
where
    S: ChatSession + ?Sized,
    R: AsyncBufRead + Unpin,
    W: Write,
{
    writeln!(
        out,
        "\n🎭 Welcome to HANGMAN, where letters come to play and dreams come to die!"
    )?;
    writeln!(
        out,
        "Type a letter to guess, or 'hint' to beg the host for mercy. Let's GO! 🔥"
    )?;

    loop {
        writeln!(out, "\n{}", game.render())?;
        if game.phase().is_over() {
            break;
        }

        write!(out, "{}", INPUT_PROMPT)?;
        out.flush()?;
        let line = read_line(input).await?;

        match PlayerInput::parse(&line) {
            PlayerInput::Hint => {
                writeln!(out, "\nAsking the host for a hint...")?;
                let hint = get_response(session, &hint_prompt(&game))
                    .await
                    .context("Failed to get a hint")?;
                writeln!(out, "> {}", hint)?;
            }
            PlayerInput::Invalid(text) => {
                debug!(input = %text, "Rejected input");
                writeln!(out, "{}", Flavor::Invalid.pick(&mut rand::rng()))?;
            }
            PlayerInput::Letter(letter) => {
                let flavor = match game.guess(letter) {
                    Ok(GuessOutcome::Hit(_)) => Flavor::Correct,
                    Ok(GuessOutcome::Miss(_)) => Flavor::Wrong,
                    Err(GuessError::Duplicate(_)) => Flavor::Duplicate,
                    Err(GuessError::Invalid(_)) => Flavor::Invalid,
                    Err(GuessError::GameOver) => break,
                };
                writeln!(out, "{}", flavor.pick(&mut rand::rng()))?;
            }
        }
    }

    let phase = game.phase();
    info!(%phase, mistakes = game.mistakes(), "Game finished");
    announce_ending(session, &game, settings, out).await?;
    Ok(phase)
}

async fn announce_ending<S, W>(
    session: &S,
    game: &Game,
    settings: GameSettings,
    out: &mut W,
) -> Result<()>
where
    S: ChatSession + ?Sized,
    W: Write,
{
    let won = game.phase() == Phase::Won;
    if settings.narrate_endings {
        let prompt = if won { win_prompt(game) } else { loss_prompt(game) };
        let narration = get_response(session, &prompt)
            .await
            .context("Failed to get the closing narration")?;
        writeln!(out, "\n{}", narration)?;
    } else if won {
        writeln!(out, "\n🏆 You got it! The word was {}.", game.word())?;
    } else {
        writeln!(out, "\n💀 Game over! The word was {}.", game.word())?;
    }
    Ok(())
}

async fn read_line<R>(input: &mut R) -> Result<String>
where
    R: AsyncBufRead + Unpin,
{
    let mut line = String::new();
    let read = input
        .read_line(&mut line)
        .await
        .context("Failed to read player input")?;
    if read == 0 {
        bail!("Input closed before the game finished");
    }
    Ok(line)
}
