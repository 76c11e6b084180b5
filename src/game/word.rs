use std::{collections::HashMap, ops::Index, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::guess::{Guess, LetterState};

pub const MIN_LETTERS: usize = 3;
pub const MAX_LETTERS: usize = 8;

/// A lowercase target word, 3 to 8 letters, with per-letter occurrence counts
/// precomputed for guess evaluation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Word {
    letters: Vec<char>,
    letter_counts: HashMap<char, usize>,
}

impl Word {
    pub fn len(&self) -> usize {
        self.letters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.letters.is_empty()
    }

    /// Evaluates a guess against this word with the standard two-pass
    /// consumption rules: exact positions first, then leftover occurrences
    /// marked in-word, everything else absent. Each target letter is matched
    /// at most once.
    pub fn guess(&self, word: &str) -> Guess {
        let mut guess = Guess::new(word);
        debug_assert_eq!(guess.len(), self.len());

        let mut letter_counts = self.letter_counts.clone();

        for (index, (letter, state)) in guess.iter_mut().enumerate() {
            if self[index] == *letter {
                *state = LetterState::Correct;
                let count = letter_counts.get_mut(letter).expect("word has letter");
                *count = count.saturating_sub(1);
            }
        }

        for (letter, state) in guess.iter_mut() {
            if *state != LetterState::Correct
                && letter_counts.get(letter).is_some_and(|count| *count > 0)
            {
                *state = LetterState::Present;
                *letter_counts.get_mut(letter).expect("word has letter") -= 1;
            }
        }

        guess
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseWordError {
    #[error(
        "word `{0}` must have {MIN_LETTERS} to {MAX_LETTERS} letters but has {}",
        .0.chars().count()
    )]
    Length(String),

    #[error("word `{0}` contains non-alphabetic characters")]
    NotAlphabetic(String),
}

impl FromStr for Word {
    type Err = ParseWordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if !s.chars().all(|ch| ch.is_ascii_alphabetic()) {
            return Err(ParseWordError::NotAlphabetic(s.to_owned()));
        }

        let letters = s.to_lowercase().chars().collect::<Vec<char>>();

        if !(MIN_LETTERS..=MAX_LETTERS).contains(&letters.len()) {
            return Err(ParseWordError::Length(s.to_owned()));
        }

        let mut letter_counts: HashMap<char, usize> = HashMap::new();
        for letter in letters.iter() {
            *letter_counts.entry(*letter).or_insert(0) += 1;
        }

        Ok(Self {
            letters,
            letter_counts,
        })
    }
}

impl TryFrom<String> for Word {
    type Error = ParseWordError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_str(&value)
    }
}

impl From<Word> for String {
    fn from(value: Word) -> Self {
        value.to_string()
    }
}

impl std::fmt::Display for Word {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.letters.iter().collect::<String>())
    }
}

impl Index<usize> for Word {
    type Output = char;

    fn index(&self, index: usize) -> &Self::Output {
        self.letters.index(index)
    }
}
