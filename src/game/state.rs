//! Hangman game state and rules.
//!
//! [`Game`] owns everything that changes during a round: the letters
//! tried so far and the mistake count. Both only grow. The phase is
//! derived from them on demand, so it can never disagree with the
//! state it summarizes.

use std::collections::BTreeSet;
use std::fmt;

use tracing::{debug, info, instrument};

/// Default number of wrong guesses that ends the game.
pub const DEFAULT_MAX_MISTAKES: u32 = 6;

/// A non-empty word of uppercase `A`–`Z` letters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SecretWord(String);

impl SecretWord {
    /// Cleans up a model reply: uppercases it and keeps only `A`–`Z`.
    ///
    /// Uppercasing runs first and follows Unicode case mapping, so `ß`
    /// becomes `SS`. Returns `None` if no letters survive.
    #[instrument(skip(raw), fields(raw_len = raw.len()))]
    pub fn sanitize(raw: &str) -> Option<Self> {
        let word: String = raw
            .to_uppercase()
            .chars()
            .filter(char::is_ascii_uppercase)
            .collect();
        if word.is_empty() {
            debug!("Reply contained no usable letters");
            None
        } else {
            Some(Self(word))
        }
    }

    /// The word as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether `letter` occurs in the word.
    pub fn contains(&self, letter: char) -> bool {
        self.0.contains(letter)
    }

    /// Number of letters.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the word has no letters.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for SecretWord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Where the game stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum Phase {
    /// Waiting for the next letter.
    AwaitingGuess,
    /// Every letter has been revealed.
    Won,
    /// The mistake budget is spent.
    Lost,
}

impl Phase {
    /// Whether the game has ended.
    pub fn is_over(self) -> bool {
        !matches!(self, Self::AwaitingGuess)
    }
}

/// Result of an accepted guess.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuessOutcome {
    /// The letter is in the word.
    Hit(char),
    /// The letter is not in the word; a mistake was counted.
    Miss(char),
}

/// Why a guess was rejected. Rejected guesses never change the game.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum GuessError {
    /// Not exactly one `A`–`Z` letter.
    #[display("{:?} is not a single letter", _0)]
    Invalid(#[error(not(source))] String),

    /// The letter was guessed before.
    #[display("{} was already guessed", _0)]
    Duplicate(#[error(not(source))] char),

    /// The game is already won or lost.
    #[display("Game is already over")]
    GameOver,
}

/// A round of Hangman.
#[derive(Debug, Clone)]
pub struct Game {
    word: SecretWord,
    guessed: BTreeSet<char>,
    mistakes: u32,
    max_mistakes: u32,
}

impl Game {
    /// Starts a round. A `max_mistakes` of zero is treated as one.
    #[instrument(skip(word), fields(word_len = word.len()))]
    pub fn new(word: SecretWord, max_mistakes: u32) -> Self {
        info!("Starting new game");
        Self {
            word,
            guessed: BTreeSet::new(),
            mistakes: 0,
            max_mistakes: max_mistakes.max(1),
        }
    }

    /// The secret word.
    pub fn word(&self) -> &SecretWord {
        &self.word
    }

    /// Letters tried so far, in alphabetical order.
    pub fn guessed_letters(&self) -> &BTreeSet<char> {
        &self.guessed
    }

    /// Wrong guesses so far.
    pub fn mistakes(&self) -> u32 {
        self.mistakes
    }

    /// Wrong guesses allowed before the game is lost.
    pub fn max_mistakes(&self) -> u32 {
        self.max_mistakes
    }

    /// Current phase, derived from the guesses made.
    pub fn phase(&self) -> Phase {
        if self.word.as_str().chars().all(|c| self.guessed.contains(&c)) {
            Phase::Won
        } else if self.mistakes >= self.max_mistakes {
            Phase::Lost
        } else {
            Phase::AwaitingGuess
        }
    }

    /// Applies a guess.
    ///
    /// Lowercase letters are accepted and uppercased.
    ///
    /// # Errors
    ///
    /// Returns [`GuessError`] for a non-letter, a repeated letter, or a
    /// game that is already over. The game is unchanged in every error
    /// case.
    #[instrument(skip(self), fields(mistakes = self.mistakes))]
    pub fn guess(&mut self, letter: char) -> Result<GuessOutcome, GuessError> {
        if self.phase().is_over() {
            return Err(GuessError::GameOver);
        }
        if !letter.is_ascii_alphabetic() {
            return Err(GuessError::Invalid(letter.to_string()));
        }
        let letter = letter.to_ascii_uppercase();
        if !self.guessed.insert(letter) {
            return Err(GuessError::Duplicate(letter));
        }

        let outcome = if self.word.contains(letter) {
            GuessOutcome::Hit(letter)
        } else {
            self.mistakes += 1;
            GuessOutcome::Miss(letter)
        };
        debug!(?outcome, mistakes = self.mistakes, phase = %self.phase(), "Guess applied");
        Ok(outcome)
    }

    /// The word with unguessed letters shown as `_`, space separated.
    pub fn masked_word(&self) -> String {
        self.word
            .as_str()
            .chars()
            .map(|c| if self.guessed.contains(&c) { c } else { '_' })
            .map(String::from)
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Guessed letters joined with `", "`.
    pub fn guessed_list(&self) -> String {
        self.guessed
            .iter()
            .map(char::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// The status block shown before each prompt.
    pub fn render(&self) -> String {
        format!(
            "Word: {}\nMistakes: {}/{}\nGuessed: {}",
            self.masked_word(),
            self.mistakes,
            self.max_mistakes,
            self.guessed_list()
        )
    }
}
