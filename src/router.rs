//! Maps raw chat messages onto engine operations. Only messages prefixed
//! with `#` or `!` are commands; everything else is ordinary chat and parses
//! to `None`.

use std::sync::LazyLock;

use regex::Regex;

static COMMAND_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[#!]\s*(.+)$").expect("hard-coded regex should be valid"));

static LETTERS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("^[A-Za-z]+$").expect("hard-coded regex should be valid"));

pub const DEFAULT_LETTER_COUNT: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Start { letter_count: usize },
    Guess(String),
    Abandon,
    ToggleBank,
    Help,
}

/// Parses one message. `#wordle` and its subcommands drive the game; a bare
/// `#<word>` is a guess.
pub fn parse(message: &str) -> Option<Command> {
    let captures = COMMAND_RE.captures(message.trim())?;
    let body = captures[1].trim();

    let (head, rest) = match body.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, rest.trim()),
        None => (body, ""),
    };

    if !head.eq_ignore_ascii_case("wordle") {
        // `#wordbank` survives from an older command set
        if head.eq_ignore_ascii_case("wordbank") && rest.is_empty() {
            return Some(Command::ToggleBank);
        }

        return (rest.is_empty() && LETTERS_RE.is_match(head))
            .then(|| Command::Guess(head.to_lowercase()));
    }

    match rest.to_lowercase().as_str() {
        "" => Some(Command::Start {
            letter_count: DEFAULT_LETTER_COUNT,
        }),
        "help" => Some(Command::Help),
        "bank" => Some(Command::ToggleBank),
        "ans" | "answer" | "giveup" => Some(Command::Abandon),
        other => {
            if let Ok(letter_count) = other.parse() {
                return Some(Command::Start { letter_count });
            }

            // `#wordle crane` is a guess too; anything else gets the
            // command list
            Some(if LETTERS_RE.is_match(other) {
                Command::Guess(other.to_owned())
            } else {
                Command::Help
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::{parse, Command};

    #[test]
    fn plain_chat_is_not_a_command() {
        assert_eq!(parse("hello everyone"), None);
        assert_eq!(parse("wordle"), None);
        assert_eq!(parse(""), None);
    }

    #[test]
    fn wordle_starts_a_default_game() {
        let expected = Some(Command::Start { letter_count: 5 });

        assert_eq!(parse("#wordle"), expected);
        assert_eq!(parse("!wordle"), expected);
        assert_eq!(parse("  #wordle  "), expected);
        assert_eq!(parse("#WORDLE"), expected);
    }

    #[test]
    fn wordle_with_a_number_picks_the_length() {
        assert_eq!(parse("#wordle 7"), Some(Command::Start { letter_count: 7 }));
        // range checking is the engine's job, not the parser's
        assert_eq!(parse("#wordle 99"), Some(Command::Start { letter_count: 99 }));
    }

    #[test]
    fn unknown_subcommands_get_help() {
        assert_eq!(parse("#wordle what is this"), Some(Command::Help));
        assert_eq!(parse("#wordle 5x"), Some(Command::Help));
    }

    #[test]
    fn subcommands_map_to_operations() {
        assert_eq!(parse("#wordle help"), Some(Command::Help));
        assert_eq!(parse("#wordle bank"), Some(Command::ToggleBank));
        assert_eq!(parse("#wordbank"), Some(Command::ToggleBank));
        assert_eq!(parse("#wordle ans"), Some(Command::Abandon));
        assert_eq!(parse("#wordle answer"), Some(Command::Abandon));
        assert_eq!(parse("!wordle giveup"), Some(Command::Abandon));
    }

    #[test]
    fn a_bare_word_is_a_guess() {
        assert_eq!(parse("#apple"), Some(Command::Guess("apple".to_owned())));
        assert_eq!(parse("!APPLE"), Some(Command::Guess("apple".to_owned())));
        assert_eq!(parse("# crane"), Some(Command::Guess("crane".to_owned())));
    }

    #[test]
    fn wordle_with_a_word_is_a_guess() {
        assert_eq!(
            parse("#wordle crane"),
            Some(Command::Guess("crane".to_owned()))
        );
        assert_eq!(
            parse("!wordle SEVEN"),
            Some(Command::Guess("seven".to_owned()))
        );
    }

    #[test]
    fn junk_after_the_prefix_is_ignored() {
        assert_eq!(parse("#app1e"), None);
        assert_eq!(parse("#two words"), None);
        assert_eq!(parse("#"), None);
    }
}
