use std::{
    borrow::Cow,
    convert::Infallible,
    ops::{Index, IndexMut},
    str::FromStr,
};

use serde::{Deserialize, Serialize};

/// One evaluated guess: the guessed letters paired with their feedback.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Guess {
    letters: Vec<(char, LetterState)>,
}

impl Guess {
    pub(crate) fn new(word: &str) -> Self {
        let letters = word
            .chars()
            .map(|ch| (ch.to_ascii_lowercase(), LetterState::Absent))
            .collect();

        Self { letters }
    }

    pub fn len(&self) -> usize {
        self.letters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.letters.is_empty()
    }

    pub fn is_correct(&self) -> bool {
        !self.is_empty()
            && self
                .letters
                .iter()
                .all(|(_, state)| *state == LetterState::Correct)
    }

    pub fn iter(&self) -> impl Iterator<Item = &(char, LetterState)> + '_ {
        self.letters.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut (char, LetterState)> + '_ {
        self.letters.iter_mut()
    }
}

impl Index<usize> for Guess {
    type Output = (char, LetterState);

    fn index(&self, index: usize) -> &Self::Output {
        self.letters.index(index)
    }
}

impl IndexMut<usize> for Guess {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        self.letters.index_mut(index)
    }
}

impl std::fmt::Display for Guess {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (_, state) in self.iter() {
            write!(f, "{state}")?;
        }

        Ok(())
    }
}

impl PartialEq<&str> for Guess {
    fn eq(&self, other: &&str) -> bool {
        &self.to_string() == other
    }
}

/// Feedback for one letter of a guess.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LetterState {
    #[default]
    Absent,
    Present,
    Correct,
}

impl AsEmoji for LetterState {
    fn as_emoji(&self) -> Cow<str> {
        match self {
            Self::Correct => "🟩",
            Self::Present => "🟨",
            Self::Absent => "⬜",
        }
        .into()
    }
}

impl FromStr for LetterState {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "O" => Self::Correct,
            "o" => Self::Present,
            _ => Self::Absent,
        })
    }
}

impl std::fmt::Display for LetterState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let ch = match self {
            Self::Correct => "O",
            Self::Present => "o",
            Self::Absent => ".",
        };

        write!(f, "{ch}")
    }
}

/// Best-ever status of a letter across a whole guess history, for the
/// keyboard hint. Ordering is the upgrade precedence: a letter never moves
/// left once it has moved right.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LetterStatus {
    #[default]
    Unknown,
    Absent,
    Present,
    Correct,
}

impl From<LetterState> for LetterStatus {
    fn from(state: LetterState) -> Self {
        match state {
            LetterState::Correct => Self::Correct,
            LetterState::Present => Self::Present,
            LetterState::Absent => Self::Absent,
        }
    }
}

/// Folds a guess history into one status per letter of the alphabet,
/// upgrading only (`correct > present > absent > unknown`).
pub fn letter_statuses<'a>(guesses: impl IntoIterator<Item = &'a Guess>) -> [LetterStatus; 26] {
    let mut statuses = [LetterStatus::Unknown; 26];

    for guess in guesses {
        for (letter, state) in guess.iter() {
            let Some(slot) = (*letter as usize)
                .checked_sub('a' as usize)
                .and_then(|i| statuses.get_mut(i))
            else {
                continue;
            };

            *slot = (*slot).max(LetterStatus::from(*state));
        }
    }

    statuses
}

pub trait AsEmoji {
    fn as_emoji(&self) -> Cow<str>;
}

impl AsEmoji for Guess {
    fn as_emoji(&self) -> Cow<str> {
        self.letters
            .iter()
            .map(|(_, state)| state.as_emoji())
            .collect::<Vec<_>>()
            .join("")
            .into()
    }
}

impl AsEmoji for [Guess] {
    fn as_emoji(&self) -> Cow<str> {
        self.iter()
            .map(|guess| guess.as_emoji())
            .collect::<Vec<_>>()
            .join("\n")
            .into()
    }
}
