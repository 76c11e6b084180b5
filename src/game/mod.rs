use chrono::Utc;
use serde::{Deserialize, Serialize};
use thiserror::Error;

mod word;
pub use word::{ParseWordError, Word, MAX_LETTERS, MIN_LETTERS};

mod guess;
pub use guess::{letter_statuses, AsEmoji, Guess, LetterState, LetterStatus};

/// Attempt budget per word length. Shorter words get fewer tries, longer
/// words more.
pub fn max_attempts(letter_count: usize) -> usize {
    match letter_count {
        3 => 4,
        4 => 5,
        6 => 8,
        7 => 10,
        8 => 12,
        _ => 6,
    }
}

/// How a finished game ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Won,
    Lost,
    Abandoned,
}

/// One group's active game. Fields are private so the invariants hold by
/// construction: `attempts == guesses.len()`, no duplicate guesses, every
/// guess matches the target length, and `finished` never reverts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Game {
    target: Word,
    guesses: Vec<String>,
    max_attempts: usize,
    finished: bool,
    started: i64,
}

impl Game {
    pub fn new(target: Word) -> Self {
        let max_attempts = max_attempts(target.len());

        Self {
            target,
            guesses: Vec::with_capacity(max_attempts),
            max_attempts,
            finished: false,
            started: Utc::now().timestamp_millis(),
        }
    }

    pub fn target(&self) -> &Word {
        &self.target
    }

    pub fn letter_count(&self) -> usize {
        self.target.len()
    }

    pub fn guesses(&self) -> &[String] {
        &self.guesses
    }

    pub fn attempts(&self) -> usize {
        self.guesses.len()
    }

    pub fn max_attempts(&self) -> usize {
        self.max_attempts
    }

    pub fn remaining(&self) -> usize {
        self.max_attempts.saturating_sub(self.attempts())
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn has_guessed(&self, word: &str) -> bool {
        self.guesses.iter().any(|guess| guess == word)
    }

    pub fn outcome(&self) -> Option<Outcome> {
        if !self.finished {
            return None;
        }

        let solved = self
            .guesses
            .last()
            .is_some_and(|guess| *guess == self.target.to_string());

        Some(if solved { Outcome::Won } else { Outcome::Lost })
    }

    /// Re-evaluates the whole guess history against the target.
    pub fn evaluations(&self) -> Vec<Guess> {
        self.guesses
            .iter()
            .map(|guess| self.target.guess(guess))
            .collect()
    }

    /// Appends a guess. The guess must be alphabetic, of the right length and
    /// not a repeat; on success the game may transition to finished (won on
    /// an exact match, lost when the budget runs out).
    pub fn submit(&mut self, word: &str) -> Result<(Guess, Option<Outcome>), GuessError> {
        let word = word.to_lowercase();

        if self.finished {
            return Err(GuessError::Finished);
        }

        if self.attempts() >= self.max_attempts {
            return Err(GuessError::OutOfAttempts(self.max_attempts));
        }

        if !word.chars().all(|ch| ch.is_ascii_alphabetic()) {
            return Err(GuessError::NotAlphabetic(word));
        }

        let expected = self.letter_count();
        let got = word.chars().count();
        if got != expected {
            return Err(GuessError::WrongLength { expected, got });
        }

        if self.has_guessed(&word) {
            return Err(GuessError::Duplicate(word));
        }

        let guess = self.target.guess(&word);
        self.guesses.push(word.clone());

        let outcome = if word == self.target.to_string() {
            self.finished = true;
            Some(Outcome::Won)
        } else if self.attempts() >= self.max_attempts {
            self.finished = true;
            Some(Outcome::Lost)
        } else {
            None
        };

        Ok((guess, outcome))
    }

    /// Ends the game early, revealing the target. No-op signal if already
    /// finished.
    pub fn abandon(&mut self) -> Outcome {
        self.finished = true;
        Outcome::Abandoned
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GuessError {
    #[error("game is already finished")]
    Finished,

    #[error("all {0} attempts have been used")]
    OutOfAttempts(usize),

    #[error("guess `{0}` contains non-alphabetic characters")]
    NotAlphabetic(String),

    #[error("guess has {got} letters, expected {expected}")]
    WrongLength { expected: usize, got: usize },

    #[error("`{0}` was already guessed this game")]
    Duplicate(String),
}

/// Persisted shape of a [`Game`], one record per group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameRecord {
    pub target_word: String,
    pub guesses: Vec<String>,
    pub attempts: usize,
    pub max_attempts: usize,
    pub finished: bool,
    pub start_time: i64,
    pub letter_count: usize,
}

impl From<&Game> for GameRecord {
    fn from(game: &Game) -> Self {
        Self {
            target_word: game.target.to_string(),
            guesses: game.guesses.clone(),
            attempts: game.attempts(),
            max_attempts: game.max_attempts,
            finished: game.finished,
            start_time: game.started,
            letter_count: game.letter_count(),
        }
    }
}

#[derive(Debug, Error)]
pub enum RecordError {
    #[error(transparent)]
    Word(#[from] ParseWordError),

    #[error("record counts {attempts} attempts but holds {guesses} guesses")]
    AttemptsMismatch { attempts: usize, guesses: usize },

    #[error("guess `{0}` does not match the target length")]
    GuessLength(String),

    #[error("letter count {count} does not match the {target} letter target")]
    LetterCount { count: usize, target: usize },
}

impl TryFrom<GameRecord> for Game {
    type Error = RecordError;

    fn try_from(record: GameRecord) -> Result<Self, Self::Error> {
        let target: Word = record.target_word.parse()?;

        if record.letter_count != target.len() {
            return Err(RecordError::LetterCount {
                count: record.letter_count,
                target: target.len(),
            });
        }

        if record.attempts != record.guesses.len() {
            return Err(RecordError::AttemptsMismatch {
                attempts: record.attempts,
                guesses: record.guesses.len(),
            });
        }

        if let Some(guess) = record
            .guesses
            .iter()
            .find(|guess| guess.chars().count() != target.len())
        {
            return Err(RecordError::GuessLength(guess.clone()));
        }

        Ok(Self {
            target,
            guesses: record.guesses,
            max_attempts: record.max_attempts,
            finished: record.finished,
            started: record.start_time,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use pretty_assertions::assert_eq;

    use super::{max_attempts, Game, GameRecord, GuessError, Outcome, Word};

    fn game(target: &str) -> Game {
        Game::new(Word::from_str(target).unwrap())
    }

    #[test]
    fn attempt_budget_is_adaptive() {
        assert_eq!(max_attempts(3), 4);
        assert_eq!(max_attempts(4), 5);
        assert_eq!(max_attempts(5), 6);
        assert_eq!(max_attempts(6), 8);
        assert_eq!(max_attempts(7), 10);
        assert_eq!(max_attempts(8), 12);
    }

    #[test]
    fn winning_guess_finishes_and_is_last() {
        let mut game = game("apple");

        let (guess, outcome) = game.submit("apple").unwrap();
        assert!(guess.is_correct());
        assert_eq!(outcome, Some(Outcome::Won));
        assert!(game.is_finished());
        assert_eq!(game.attempts(), 1);
        assert_eq!(game.guesses().last().map(String::as_str), Some("apple"));
        assert_eq!(game.outcome(), Some(Outcome::Won));
    }

    #[test]
    fn budget_exhaustion_loses() {
        let mut game = game("apple");
        let misses = ["amber", "tummy", "handy", "spend", "flash", "badly"];

        for (i, miss) in misses.iter().enumerate() {
            let (_, outcome) = game.submit(miss).unwrap();
            if i + 1 < misses.len() {
                assert_eq!(outcome, None);
            } else {
                assert_eq!(outcome, Some(Outcome::Lost));
            }
        }

        assert!(game.is_finished());
        assert_eq!(game.attempts(), game.max_attempts());
        assert_eq!(game.submit("quite"), Err(GuessError::Finished));
    }

    #[test]
    fn rejections_leave_state_untouched() {
        let mut game = game("apple");
        game.submit("amber").unwrap();

        assert_eq!(
            game.submit("alpine"),
            Err(GuessError::WrongLength {
                expected: 5,
                got: 6
            })
        );
        assert_eq!(
            game.submit("amber"),
            Err(GuessError::Duplicate("amber".to_owned()))
        );
        assert_eq!(
            game.submit("app1e"),
            Err(GuessError::NotAlphabetic("app1e".to_owned()))
        );
        assert_eq!(game.attempts(), 1);
        assert!(!game.is_finished());
    }

    #[test]
    fn abandon_is_final() {
        let mut game = game("apple");
        assert_eq!(game.abandon(), Outcome::Abandoned);
        assert!(game.is_finished());
        assert_eq!(game.submit("apple"), Err(GuessError::Finished));
    }

    #[test]
    fn record_round_trip_is_lossless() {
        let mut game = game("apple");
        game.submit("amber").unwrap();
        game.submit("plead").unwrap();

        let record = GameRecord::from(&game);
        let json = serde_json::to_string(&record).unwrap();
        let read: GameRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(record, read);

        let restored = Game::try_from(read).unwrap();
        assert_eq!(restored, game);
    }

    #[test]
    fn record_shape_uses_camel_case_keys() {
        let record = GameRecord::from(&game("apple"));
        let value = serde_json::to_value(&record).unwrap();

        for key in [
            "targetWord",
            "guesses",
            "attempts",
            "maxAttempts",
            "finished",
            "startTime",
            "letterCount",
        ] {
            assert!(value.get(key).is_some(), "missing key {key}");
        }
    }

    #[test]
    fn corrupt_records_are_rejected() {
        let mut record = GameRecord::from(&game("apple"));
        record.attempts = 3;

        assert!(Game::try_from(record).is_err());
    }
}
