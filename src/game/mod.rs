//! Hangman rules and the interactive round.

mod flavor;
mod input;
mod play;
mod prompts;
mod state;

pub use flavor::Flavor;
pub use input::PlayerInput;
pub use play::{GameSettings, INPUT_PROMPT, host_game, pick_secret_word, play_game};
pub use prompts::{HOST_PERSONA, SECRET_WORD_PROMPT, hint_prompt, loss_prompt, win_prompt};
pub use state::{DEFAULT_MAX_MISTAKES, Game, GuessError, GuessOutcome, Phase, SecretWord};
