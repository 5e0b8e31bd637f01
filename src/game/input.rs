//! Player input classification.

use tracing::instrument;

/// What the player typed, after trimming and uppercasing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayerInput {
    /// Asked for a clue.
    Hint,
    /// A single `A`–`Z` letter.
    Letter(char),
    /// Anything else.
    Invalid(String),
}

impl PlayerInput {
    /// Classifies one line of terminal input.
    #[instrument]
    pub fn parse(line: &str) -> Self {
        let input = line.trim().to_uppercase();
        if input == "HINT" {
            return Self::Hint;
        }

        let mut chars = input.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) if c.is_ascii_uppercase() => Self::Letter(c),
            _ => Self::Invalid(input),
        }
    }
}
