use std::{
    collections::HashSet,
    path::{Path, PathBuf},
    str::FromStr,
    sync::{Arc, LazyLock},
    time::{Duration, Instant},
};

use arc_swap::ArcSwapOption;
use rand::seq::SliceRandom;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{config::WordsConfig, game::Word};

const CACHE_TTL: Duration = Duration::from_secs(60 * 60);

static WORD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("^[a-z]+$").expect("hard-coded regex should be valid"));

/// Part-of-speech markers like `n.` or `vt.` embedded in definition text.
static POS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Za-z]+\.").expect("hard-coded regex should be valid"));

/// Which list new target words are drawn from. Guess validation always checks
/// both, regardless of selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Bank {
    #[default]
    Main,
    Backup,
}

impl Bank {
    pub fn toggled(self) -> Self {
        match self {
            Self::Main => Self::Backup,
            Self::Backup => Self::Main,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Main => "core list",
            Self::Backup => "full list",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::Main => "core list: everyday vocabulary, good for practice",
            Self::Backup => "full list: the whole dictionary, much harder",
        }
    }
}

impl std::fmt::Display for Bank {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Main => "main",
            Self::Backup => "backup",
        };

        write!(f, "{name}")
    }
}

#[derive(Debug)]
struct Lists {
    main: Vec<String>,
    backup: Vec<String>,
    /// Word lengths present in either list, for O(1) rejection of lengths no
    /// bank can ever validate.
    lengths: HashSet<usize>,
    loaded_at: Instant,
}

impl Lists {
    fn build(main: Vec<String>, backup: Vec<String>) -> Self {
        let lengths = main
            .iter()
            .chain(backup.iter())
            .map(|word| word.chars().count())
            .collect();

        Self {
            main,
            backup,
            lengths,
            loaded_at: Instant::now(),
        }
    }

    fn is_fresh(&self) -> bool {
        self.loaded_at.elapsed() < CACHE_TTL
    }

    fn bank(&self, bank: Bank) -> &[String] {
        match bank {
            Bank::Main => &self.main,
            Bank::Backup => &self.backup,
        }
    }
}

/// The two word lists, parsed from disk and cached for an hour at a time.
/// Missing or unreadable files degrade to empty banks rather than failing.
#[derive(Debug, Clone)]
pub struct WordBank {
    main_path: PathBuf,
    backup_path: PathBuf,
    cache: Arc<ArcSwapOption<Lists>>,
}

impl WordBank {
    pub fn new(config: &WordsConfig) -> Self {
        Self {
            main_path: config.main_path.clone(),
            backup_path: config.backup_path.clone(),
            cache: Arc::new(ArcSwapOption::empty()),
        }
    }

    /// Builds a bank directly from in-memory lists, bypassing the filesystem.
    #[cfg(test)]
    pub(crate) fn from_lists(main: Vec<String>, backup: Vec<String>) -> Self {
        let bank = Self::new(&WordsConfig::default());
        bank.cache.store(Some(Arc::new(Lists::build(main, backup))));
        bank
    }

    async fn lists(&self) -> Arc<Lists> {
        if let Some(lists) = self.cache.load_full() {
            if lists.is_fresh() {
                return lists;
            }
        }

        // rebuilt wholesale; a concurrent rebuild just swaps in an identical
        // snapshot
        let main = parse_main(&read_list(&self.main_path).await);
        let backup = parse_backup(&read_list(&self.backup_path).await);
        debug!(main = main.len(), backup = backup.len(), "word lists loaded");

        let lists = Arc::new(Lists::build(main, backup));
        self.cache.store(Some(Arc::clone(&lists)));
        lists
    }

    /// A uniformly random word of exactly `letter_count` letters from the
    /// selected bank, or `None` when that bank has no such word.
    pub async fn random_word(&self, letter_count: usize, bank: Bank) -> Option<Word> {
        let lists = self.lists().await;

        let candidates = lists
            .bank(bank)
            .iter()
            .filter(|word| word.chars().count() == letter_count)
            .collect::<Vec<_>>();

        let word = candidates.choose(&mut rand::thread_rng())?;
        debug!(%word, %bank, "drew target word");

        Word::from_str(word).ok()
    }

    /// Case-insensitive membership check against the union of both banks,
    /// restricted to words of exactly `letter_count` letters.
    pub async fn is_valid(&self, word: &str, letter_count: usize) -> bool {
        let word = word.to_lowercase();
        let lists = self.lists().await;

        if !lists.lengths.contains(&letter_count) {
            return false;
        }

        let matches = |w: &String| w.chars().count() == letter_count && *w == word;
        lists.main.iter().any(matches) || lists.backup.iter().any(matches)
    }

    /// Definition text for a word from the main list, with part-of-speech
    /// markers stripped. Empty string when the word has no entry or the file
    /// is unreadable, never an error.
    pub async fn definition(&self, word: &str) -> String {
        let word = word.to_lowercase();
        let content = match tokio::fs::read_to_string(&self.main_path).await {
            Ok(content) => content,
            Err(_) => return String::new(),
        };

        for line in content.lines() {
            let Some((token, rest)) = split_entry(line) else {
                continue;
            };

            if token == word {
                return extract_definition(rest);
            }
        }

        String::new()
    }
}

async fn read_list(path: &Path) -> String {
    match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(err) => {
            warn!(path = %path.display(), %err, "failed to read word list");
            String::new()
        }
    }
}

/// Splits a main-list line into its word token and the definition remainder.
/// Lines look like `314| banner n.flag, standard`; the index segment is
/// optional and a line without a definition is skipped.
fn split_entry(line: &str) -> Option<(String, &str)> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    let body = match line.split_once('|') {
        Some((_, rest)) => rest.trim(),
        None => line,
    };

    let (token, rest) = body.split_once(' ')?;
    let token = token.trim().to_lowercase();

    WORD_RE.is_match(&token).then_some((token, rest.trim()))
}

fn parse_main(content: &str) -> Vec<String> {
    content
        .lines()
        .filter_map(|line| split_entry(line).map(|(word, _)| word))
        .collect()
}

fn parse_backup(content: &str) -> Vec<String> {
    content
        .lines()
        .filter_map(|line| {
            let word = line.trim().to_lowercase();
            WORD_RE.is_match(&word).then_some(word)
        })
        .collect()
}

/// Strips part-of-speech markers from a raw definition and joins the
/// fragments between them with a full-width semicolon.
fn extract_definition(text: &str) -> String {
    let text = text.trim();

    if !POS_RE.is_match(text) {
        return text.to_owned();
    }

    POS_RE
        .split(text)
        .map(str::trim)
        .filter(|fragment| !fragment.is_empty())
        .collect::<Vec<_>>()
        .join("；")
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use tracing_test::traced_test;

    use super::{extract_definition, parse_backup, parse_main, Bank, WordBank};
    use crate::config::WordsConfig;

    const MAIN: &str = "\
1| apple n.fruit of the apple tree
2| amber n.fossil resin adj.amberlike
   banner n.flag, standard

not-a-word x.nothing
justaword
3| Trust vt.believe in n.confidence
";

    #[test]
    fn main_list_parsing_skips_malformed_lines() {
        assert_eq!(
            parse_main(MAIN),
            vec!["apple", "amber", "banner", "trust"]
        );
    }

    #[test]
    fn backup_list_is_one_word_per_line() {
        let content = "apple\n  Pear \n\nnot a word\nsix6\nplum\n";
        assert_eq!(parse_backup(content), vec!["apple", "pear", "plum"]);
    }

    #[test]
    fn definitions_lose_their_pos_markers() {
        assert_eq!(extract_definition("n.flag, standard"), "flag, standard");
        assert_eq!(
            extract_definition("vt.operate vi.run, work"),
            "operate；run, work"
        );
        assert_eq!(extract_definition("plain text"), "plain text");
    }

    #[tokio::test]
    async fn validation_checks_both_banks_at_exact_length() {
        let bank = WordBank::from_lists(
            vec!["apple".to_owned(), "cat".to_owned()],
            vec!["plumb".to_owned()],
        );

        assert!(bank.is_valid("APPLE", 5).await);
        assert!(bank.is_valid("plumb", 5).await, "backup bank counts too");
        assert!(bank.is_valid("cat", 3).await);
        assert!(!bank.is_valid("cat", 5).await, "wrong expected length");
        assert!(!bank.is_valid("zzzzz", 5).await);
        assert!(!bank.is_valid("zzzz", 4).await, "no 4-letter words anywhere");
    }

    #[tokio::test]
    async fn random_word_respects_bank_and_length() {
        let bank = WordBank::from_lists(vec!["apple".to_owned()], vec!["plumb".to_owned()]);

        let word = bank.random_word(5, Bank::Main).await.unwrap();
        assert_eq!(word.to_string(), "apple");

        let word = bank.random_word(5, Bank::Backup).await.unwrap();
        assert_eq!(word.to_string(), "plumb");

        assert!(bank.random_word(4, Bank::Main).await.is_none());
    }

    #[tokio::test]
    #[traced_test]
    async fn missing_files_degrade_to_empty_banks() {
        let config = WordsConfig {
            main_path: "does/not/exist.txt".into(),
            backup_path: "does/not/exist-either.txt".into(),
        };
        let bank = WordBank::new(&config);

        assert!(bank.random_word(5, Bank::Main).await.is_none());
        assert!(!bank.is_valid("apple", 5).await);
        assert!(logs_contain("failed to read word list"));
    }
}
