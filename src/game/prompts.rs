//! Prompts sent to the host model.

use super::state::Game;

/// Persona installed as the session's system prompt.
pub const HOST_PERSONA: &str = "You are the sassiest, most entertaining Hangman host in the galaxy. \
Your personality:
- Witty and playful, with a dash of roast energy
- You love dramatic flair and theatrical responses
- Your hints are cryptic but hilarious
- You sprinkle in pop culture references and puns
- You keep responses SHORT (1-2 sentences max)
Never reveal the secret word directly!";

/// Asks the model for the secret word.
pub const SECRET_WORD_PROMPT: &str = "Pick a random English word (difficulty: medium) for Hangman. \
Return ONLY the uppercase word, nothing else.";

/// Asks for a clue that does not give the word away.
pub fn hint_prompt(game: &Game) -> String {
    let guessed = if game.guessed_letters().is_empty() {
        "nothing yet".to_string()
    } else {
        game.guessed_list()
    };
    format!(
        "The player is stuck on the word \"{}\" (they've guessed: {}). \
Give them a spicy, funny hint about its meaning. Be cryptic but entertaining, with some sass. \
Don't reveal the word or its length.",
        game.word(),
        guessed
    )
}

/// Asks for a victory celebration.
pub fn win_prompt(game: &Game) -> String {
    format!(
        "The player just WON! They guessed the word \"{}\" correctly! \
Celebrate with an over-the-top, hilarious congratulations that makes them feel like a genius. \
Keep it short but memorable!",
        game.word()
    )
}

/// Asks for a game-over roast.
pub fn loss_prompt(game: &Game) -> String {
    format!(
        "GAME OVER! The player lost with {} mistakes. The word was \"{}\". \
Give them a dramatic, funny game over message. Reveal the word and roast them for failing, \
but encourage them to try again. Keep it memorable!",
        game.max_mistakes(),
        game.word()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::state::SecretWord;

    fn game() -> Game {
        Game::new(SecretWord::sanitize("PYTHON").expect("valid"), 6)
    }

    #[test]
    fn test_hint_prompt_lists_guesses() {
        let mut game = game();
        assert!(hint_prompt(&game).contains("nothing yet"));
        game.guess('Z').expect("new letter");
        game.guess('P').expect("new letter");
        let prompt = hint_prompt(&game);
        assert!(prompt.contains("\"PYTHON\""));
        assert!(prompt.contains("P, Z"));
    }

    #[test]
    fn test_ending_prompts_mention_word() {
        let game = game();
        assert!(win_prompt(&game).contains("\"PYTHON\""));
        let loss = loss_prompt(&game);
        assert!(loss.contains("6 mistakes"));
        assert!(loss.contains("\"PYTHON\""));
    }
}
