//! Tests for Hangman rules and rendering.

use sassy_hangman::{DEFAULT_MAX_MISTAKES, Game, GuessError, GuessOutcome, Phase, SecretWord};

fn new_game(word: &str) -> Game {
    Game::new(
        SecretWord::sanitize(word).expect("valid word"),
        DEFAULT_MAX_MISTAKES,
    )
}

#[test]
fn test_python_all_correct_wins_without_mistakes() {
    let mut game = new_game("PYTHON");

    for (i, letter) in ['P', 'Y', 'T', 'H', 'O', 'N'].into_iter().enumerate() {
        assert_eq!(game.phase(), Phase::AwaitingGuess, "ended early at guess {i}");
        assert_eq!(game.guess(letter), Ok(GuessOutcome::Hit(letter)));
        assert_eq!(game.mistakes(), 0);
    }

    assert_eq!(game.masked_word(), "P Y T H O N");
    assert!(!game.masked_word().contains('_'));
    assert_eq!(game.phase(), Phase::Won);
}

#[test]
fn test_cat_six_misses_loses() {
    let mut game = new_game("CAT");

    for (i, letter) in ['X', 'Q', 'Z', 'W', 'R', 'S'].into_iter().enumerate() {
        assert_eq!(game.phase(), Phase::AwaitingGuess, "lost early at guess {i}");
        assert_eq!(game.guess(letter), Ok(GuessOutcome::Miss(letter)));
        assert_eq!(game.mistakes(), i as u32 + 1);
    }

    assert_eq!(game.phase(), Phase::Lost);
    assert_eq!(game.mistakes(), game.max_mistakes());
    assert_eq!(game.masked_word(), "_ _ _");
}

#[test]
fn test_duplicate_guess_rejected() {
    let mut game = new_game("PYTHON");

    assert_eq!(game.guess('p'), Ok(GuessOutcome::Hit('P')));
    assert_eq!(game.guess('p'), Err(GuessError::Duplicate('P')));
    assert_eq!(game.guess('P'), Err(GuessError::Duplicate('P')));

    assert_eq!(game.guessed_letters().len(), 1);
    assert_eq!(game.mistakes(), 0);
}

#[test]
fn test_duplicate_miss_not_counted_twice() {
    let mut game = new_game("PYTHON");

    assert_eq!(game.guess('Z'), Ok(GuessOutcome::Miss('Z')));
    assert_eq!(game.guess('z'), Err(GuessError::Duplicate('Z')));
    assert_eq!(game.mistakes(), 1);
}

#[test]
fn test_non_letters_rejected() {
    let mut game = new_game("PYTHON");

    for c in ['1', ' ', '-', 'é', '_'] {
        assert!(matches!(game.guess(c), Err(GuessError::Invalid(_))));
    }
    assert!(game.guessed_letters().is_empty());
    assert_eq!(game.mistakes(), 0);
}

#[test]
fn test_mask_reveals_exactly_guessed_letters() {
    let mut game = new_game("BANANA");
    assert_eq!(game.masked_word(), "_ _ _ _ _ _");

    game.guess('A').expect("new letter");
    assert_eq!(game.masked_word(), "_ A _ A _ A");

    game.guess('N').expect("new letter");
    let first = game.masked_word();
    let second = game.masked_word();
    assert_eq!(first, "_ A N A N A");
    assert_eq!(first, second);
}

#[test]
fn test_guessed_letters_grow_without_duplicates() {
    let mut game = new_game("ALPHABET");
    let sequence = ['E', 'A', 'Q', 'E', 'L', 'A', 'Z', 'B'];
    let mut previous = 0;

    for letter in sequence {
        let _ = game.guess(letter);
        let now = game.guessed_letters().len();
        assert!(now >= previous);
        previous = now;
    }

    let letters: Vec<char> = game.guessed_letters().iter().copied().collect();
    assert_eq!(letters, ['A', 'B', 'E', 'L', 'Q', 'Z']);
    assert_eq!(game.guessed_list(), "A, B, E, L, Q, Z");
}

#[test]
fn test_mistakes_only_on_absent_letters() {
    let mut game = new_game("RUST");
    let mut expected = 0;

    for letter in ['R', 'X', 'R', 'U', 'Y', '9', 'S', 'Y'] {
        let before = game.mistakes();
        let result = game.guess(letter);
        if matches!(result, Ok(GuessOutcome::Miss(_))) {
            expected += 1;
            assert_eq!(game.mistakes(), before + 1);
        } else {
            assert_eq!(game.mistakes(), before);
        }
    }

    assert_eq!(game.mistakes(), expected);
    assert_eq!(expected, 2);
}

#[test]
fn test_win_on_last_letter_with_mistakes_remaining() {
    let mut game = new_game("GO");

    for letter in ['A', 'B', 'C', 'D', 'E', 'G'] {
        game.guess(letter).expect("new letter");
    }
    assert_eq!(game.mistakes(), 5);
    assert_eq!(game.phase(), Phase::AwaitingGuess);

    game.guess('O').expect("new letter");
    assert_eq!(game.phase(), Phase::Won);
}

#[test]
fn test_guess_after_game_over_rejected() {
    let mut game = Game::new(SecretWord::sanitize("HI").expect("valid"), 1);

    game.guess('Z').expect("new letter");
    assert_eq!(game.phase(), Phase::Lost);
    assert_eq!(game.guess('H'), Err(GuessError::GameOver));
    assert_eq!(game.mistakes(), 1);
    assert!(!game.guessed_letters().contains(&'H'));
}

#[test]
fn test_render_shows_board_mistakes_and_sorted_guesses() {
    let mut game = new_game("PYTHON");
    for letter in ['T', 'Z', 'P', 'A', 'N'] {
        game.guess(letter).expect("new letter");
    }

    assert_eq!(
        game.render(),
        "Word: P _ T _ _ N\nMistakes: 2/6\nGuessed: A, N, P, T, Z"
    );
}
