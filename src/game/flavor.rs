//! Canned host one-liners shown after each guess.

use rand::Rng;
use rand::seq::IndexedRandom;
use strum::EnumIter;

/// Which situation a line reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter)]
pub enum Flavor {
    /// The letter is in the word.
    Correct,
    /// The letter is not in the word.
    Wrong,
    /// The letter was tried before.
    Duplicate,
    /// The input was not a single letter.
    Invalid,
}

const CORRECT: &[&str] = &[
    "🎯 Well, well. A letter that actually belongs. Mark the calendar.",
    "✨ Correct! Somewhere a spelling bee judge sheds a single tear.",
    "🔥 It's in there! Don't let it go to your head.",
    "💅 Fine. FINE. That one counts.",
    "🎉 A hit! The gallows carpenter grumbles and puts down the hammer.",
];

const WRONG: &[&str] = &[
    "💀 Nope. That letter isn't even in the neighborhood.",
    "🪦 Another one for the graveyard of bad ideas.",
    "😬 Wrong! Was that a guess or did your cat walk across the keyboard?",
    "❌ Denied. The rope gets a little tighter.",
    "🎭 *gasp* The audience can't believe you'd do that.",
];

const DUPLICATE: &[&str] = &[
    "🧠 You tried that one already. Keep up!",
    "🔁 Same letter, same answer. That's not how this works.",
    "📝 Check the list, superstar. Already guessed.",
    "🤦 Deja vu? Pick a letter you HAVEN'T used.",
];

const INVALID: &[&str] = &[
    "🤨 One letter. A through Z. That's the whole game.",
    "📖 The alphabet has twenty-six options. Choose exactly one.",
    "🎓 Hot tip: a single letter works wonders here.",
];

impl Flavor {
    /// Every line available for this situation.
    pub fn lines(self) -> &'static [&'static str] {
        match self {
            Self::Correct => CORRECT,
            Self::Wrong => WRONG,
            Self::Duplicate => DUPLICATE,
            Self::Invalid => INVALID,
        }
    }

    /// Picks one line uniformly at random.
    pub fn pick<R: Rng + ?Sized>(self, rng: &mut R) -> &'static str {
        self.lines().choose(rng).copied().unwrap_or_default()
    }
}
