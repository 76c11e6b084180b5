use crate::game::{letter_statuses, AsEmoji, Game, Guess, LetterStatus, Outcome};

const KEYBOARD_ROWS: [&str; 3] = ["qwertyuiop", "asdfghjkl", "zxcvbnm"];

/// Everything a renderer needs to draw the board: evaluated rows, the board
/// width, the attempt budget and how the game ended (if it did). The target
/// word itself is deliberately not part of the snapshot.
#[derive(Debug, Clone)]
pub struct BoardView {
    pub letter_count: usize,
    pub rows: Vec<Guess>,
    pub attempts: usize,
    pub max_attempts: usize,
    pub outcome: Option<Outcome>,
}

impl BoardView {
    pub fn of(game: &Game) -> Self {
        Self {
            letter_count: game.letter_count(),
            rows: game.evaluations(),
            attempts: game.attempts(),
            max_attempts: game.max_attempts(),
            outcome: game.outcome(),
        }
    }
}

/// An image produced by a renderer, as encoded bytes the platform layer can
/// attach to a reply.
#[derive(Debug, Clone)]
pub struct Artifact(pub Vec<u8>);

/// Seam for the host platform's board drawing. Returning `None` (or any
/// internal failure mapped to `None`) makes the engine fall back to
/// [`fallback_text`], so a guess is never lost to a broken renderer.
pub trait BoardRenderer: std::fmt::Debug + Send + Sync {
    fn render(&self, group_id: &str, view: &BoardView) -> Option<Artifact>;

    /// Drops any per-group cache the renderer keeps. Called when a finished
    /// game is deleted.
    fn clear_cache(&self, group_id: &str) {
        let _ = group_id;
    }
}

/// Renderer that always falls through to text.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopRenderer;

impl BoardRenderer for NoopRenderer {
    fn render(&self, _group_id: &str, _view: &BoardView) -> Option<Artifact> {
        None
    }
}

/// Emoji rows for the guesses made so far.
pub fn board_text(view: &BoardView) -> String {
    if view.rows.is_empty() {
        return "no guesses yet!".to_owned();
    }

    view.rows.as_slice().as_emoji().into_owned()
}

/// The three-row keyboard hint, with each letter's best-known status.
pub fn keyboard_hint(rows: &[Guess]) -> String {
    let statuses = letter_statuses(rows);

    let mut hint = String::from("⌨️ keyboard:");
    for (i, row) in KEYBOARD_ROWS.iter().enumerate() {
        hint.push('\n');
        hint.push_str(&"  ".repeat(i));

        for letter in row.chars() {
            let status = statuses[letter as usize - 'a' as usize];
            hint.push_str(status_glyph(status));
            hint.push(letter.to_ascii_uppercase());
            hint.push(' ');
        }
    }

    hint
}

fn status_glyph(status: LetterStatus) -> &'static str {
    match status {
        LetterStatus::Correct => "🟩",
        LetterStatus::Present => "🟨",
        LetterStatus::Absent => "⬛",
        LetterStatus::Unknown => "⬜",
    }
}

/// Plain-text stand-in for the rendered board: feedback rows, the attempt
/// counter and the keyboard hint.
pub fn fallback_text(view: &BoardView) -> String {
    format!(
        "{board}\n{used}/{max} attempts\n{keyboard}",
        board = board_text(view),
        used = view.attempts,
        max = view.max_attempts,
        keyboard = keyboard_hint(&view.rows),
    )
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use pretty_assertions::assert_eq;

    use super::{board_text, fallback_text, keyboard_hint, BoardView};
    use crate::game::{Game, Word};

    fn view(target: &str, guesses: &[&str]) -> BoardView {
        let mut game = Game::new(Word::from_str(target).unwrap());
        for guess in guesses {
            game.submit(guess).unwrap();
        }

        BoardView::of(&game)
    }

    #[test]
    fn empty_board_says_so() {
        assert_eq!(board_text(&view("apple", &[])), "no guesses yet!");
    }

    #[test]
    fn board_rows_match_evaluations() {
        let view = view("apple", &["amber", "apple"]);
        assert_eq!(board_text(&view), "🟩⬜⬜🟨⬜\n🟩🟩🟩🟩🟩");
    }

    #[test]
    fn keyboard_marks_best_status() {
        let view = view("apple", &["plead"]);
        let hint = keyboard_hint(&view.rows);

        assert!(hint.contains("🟨P"));
        assert!(hint.contains("🟨L"));
        assert!(hint.contains("⬛D"));
        assert!(hint.contains("⬜Z"));
    }

    #[test]
    fn fallback_counts_attempts() {
        let text = fallback_text(&view("apple", &["amber"]));
        assert!(text.contains("1/6 attempts"));
        assert!(text.contains("⌨️ keyboard:"));
    }
}
