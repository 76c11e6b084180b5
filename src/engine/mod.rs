//! The game state machine: one active game per group, guarded by a per-group
//! lock so concurrent guesses serialize instead of racing.

use std::{
    collections::HashMap,
    sync::Arc,
    time::{Duration, Instant},
};

use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::{
    config::GameConfig,
    game::{Game, GameRecord, GuessError, Outcome, MAX_LETTERS, MIN_LETTERS},
    render::{self, Artifact, BoardRenderer, BoardView, NoopRenderer},
    store::GameStore,
    translate::Translator,
    words::WordBank,
};

mod cooldown;
pub use cooldown::Cooldowns;

const RENDER_WARN_AFTER: Duration = Duration::from_secs(1);

const HELP_TEXT: &str = "\
🎮 wordle - guess the word together!
#wordle        start a 5-letter game
#wordle <n>    start an n-letter game (3 to 8)
#<word>        guess (also !<word>)
#wordle ans    give up and reveal the answer
#wordle bank   switch between the core and full word lists
🟩 right letter, right spot
🟨 right letter, wrong spot
⬜ letter not in the word";

/// What the engine says back: always text, sometimes a rendered board image
/// to go with it.
#[derive(Debug, Clone)]
pub struct Reply {
    pub text: String,
    pub image: Option<Artifact>,
}

impl Reply {
    fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            image: None,
        }
    }
}

/// Orchestrates games across groups. Cheap to clone; clones share the same
/// store, word bank, locks and cooldowns.
#[derive(Debug, Clone)]
pub struct GameEngine {
    words: WordBank,
    store: GameStore,
    renderer: Arc<dyn BoardRenderer>,
    translator: Option<Translator>,
    cooldowns: Cooldowns,
    cleanup_delay: Duration,
    locks: Arc<Mutex<HashMap<String, Arc<Mutex<()>>>>>,
}

impl GameEngine {
    pub fn new(words: WordBank, store: GameStore, config: &GameConfig) -> Self {
        Self {
            words,
            store,
            renderer: Arc::new(NoopRenderer),
            translator: None,
            cooldowns: Cooldowns::new(config.cooldown()),
            cleanup_delay: config.cleanup_delay(),
            locks: Arc::default(),
        }
    }

    pub fn with_renderer(mut self, renderer: Arc<dyn BoardRenderer>) -> Self {
        self.renderer = renderer;
        self
    }

    pub fn with_translator(mut self, translator: Translator) -> Self {
        self.translator = Some(translator);
        self
    }

    #[cfg(test)]
    fn with_cooldown(mut self, interval: Duration) -> Self {
        self.cooldowns = Cooldowns::new(interval);
        self
    }

    #[cfg(test)]
    fn with_cleanup_delay(mut self, delay: Duration) -> Self {
        self.cleanup_delay = delay;
        self
    }

    /// The lock serializing all game mutations for one group.
    async fn group_lock(&self, group_id: &str) -> Arc<Mutex<()>> {
        Arc::clone(
            self.locks
                .lock()
                .await
                .entry(group_id.to_owned())
                .or_default(),
        )
    }

    /// Starts a new game for the group, drawing a target of `letter_count`
    /// letters from its selected bank. Rejected while an unfinished game is
    /// running.
    pub async fn start(&self, group_id: &str, letter_count: usize) -> Reply {
        if !(MIN_LETTERS..=MAX_LETTERS).contains(&letter_count) {
            return Reply::text(format!(
                "pick a word length between {MIN_LETTERS} and {MAX_LETTERS}!"
            ));
        }

        let lock = self.group_lock(group_id).await;
        let _guard = lock.lock().await;

        if let Some(record) = self.store.get(group_id).await {
            if !record.finished {
                return Reply::text(
                    "a game is already running here! finish it, or end it with `#wordle ans`.",
                );
            }
        }

        let bank = self.store.bank_selection(group_id).await;
        let Some(target) = self.words.random_word(letter_count, bank).await else {
            return Reply::text(format!(
                "the {label} has no {letter_count}-letter words. try another length?",
                label = bank.label()
            ));
        };

        let game = Game::new(target);
        self.store.save(group_id, GameRecord::from(&game)).await;
        info!(
            group_id,
            letter_count,
            max_attempts = game.max_attempts(),
            %bank,
            "game started"
        );

        let image = self.render_board(group_id, &BoardView::of(&game));
        let text = format!(
            "🎮 wordle time! i picked a {letter_count}-letter word from the {label}.\n\
             you have {max} tries. guess with #<word> or !<word>.",
            label = bank.label(),
            max = game.max_attempts(),
        );

        Reply { text, image }
    }

    /// Applies one user's guess to the group's game.
    pub async fn guess(&self, group_id: &str, user_id: &str, word: &str) -> Reply {
        if let Some(remaining) = self.cooldowns.remaining(group_id, user_id).await {
            let secs = remaining.as_millis().div_ceil(1000);
            return Reply::text(format!("easy there! wait {secs}s before guessing again."));
        }

        let word = word.trim().to_lowercase();
        if !word.chars().all(|ch| ch.is_ascii_alphabetic()) {
            return Reply::text("letters only, please!");
        }

        let lock = self.group_lock(group_id).await;
        let _guard = lock.lock().await;

        let Some(mut game) = self.active_game(group_id).await else {
            return Reply::text("no game running! start one with `#wordle`.");
        };

        let expected = game.letter_count();
        let got = word.chars().count();
        if got != expected {
            return Reply::text(format!(
                "the word has {expected} letters, but \"{word}\" has {got}."
            ));
        }

        if game.has_guessed(&word) {
            return Reply::text(format!("\"{word}\" was already tried! guess something else."));
        }

        if !self.words.is_valid(&word, expected).await {
            return Reply::text(format!("\"{word}\" isn't in my word list, sorry!"));
        }

        let outcome = match game.submit(&word) {
            Ok((_, outcome)) => outcome,
            // length, duplicate and charset were checked above, so this only
            // fires for finished/exhausted games
            Err(err @ (GuessError::Finished | GuessError::OutOfAttempts(_))) => {
                debug!(group_id, %err, "guess rejected");
                return Reply::text("that game is over! start a new one with `#wordle`.");
            }
            Err(err) => {
                warn!(group_id, %err, "guess rejected after validation");
                return Reply::text(format!("{err}"));
            }
        };

        // only an accepted guess arms the cooldown, so a typo costs nothing
        self.cooldowns.stamp(group_id, user_id).await;
        self.store.save(group_id, GameRecord::from(&game)).await;

        let view = BoardView::of(&game);
        let image = self.render_board(group_id, &view);

        let text = match outcome {
            Some(Outcome::Won) => {
                info!(group_id, user_id, attempts = game.attempts(), "game won");
                let mut text = format!(
                    "🎉 {user_id} got it in {attempts}/{max}! the word was \"{target}\".",
                    attempts = game.attempts(),
                    max = game.max_attempts(),
                    target = game.target(),
                );
                self.append_definition(&mut text, &word).await;
                text
            }
            Some(Outcome::Lost | Outcome::Abandoned) => {
                info!(group_id, "game lost");
                let mut text = format!(
                    "😵 out of tries! the word was \"{target}\".",
                    target = game.target()
                );
                self.append_definition(&mut text, &game.target().to_string())
                    .await;
                text
            }
            None => format!("{} tries left!", game.remaining()),
        };

        // a broken renderer must not eat the feedback
        let text = if image.is_none() {
            format!("{}\n{text}", render::fallback_text(&view))
        } else {
            text
        };

        if game.is_finished() {
            self.schedule_cleanup(group_id);
        }

        Reply { text, image }
    }

    /// Ends the group's game early, revealing the target.
    pub async fn abandon(&self, group_id: &str) -> Reply {
        let lock = self.group_lock(group_id).await;
        let _guard = lock.lock().await;

        let Some(mut game) = self.active_game(group_id).await else {
            return Reply::text("no game running! start one with `#wordle`.");
        };

        game.abandon();
        self.store.save(group_id, GameRecord::from(&game)).await;
        info!(group_id, attempts = game.attempts(), "game abandoned");

        let mut text = format!(
            "game over! the word was \"{target}\".",
            target = game.target()
        );
        self.append_definition(&mut text, &game.target().to_string())
            .await;

        self.schedule_cleanup(group_id);
        Reply::text(text)
    }

    /// Flips the group's word bank between the core and full lists.
    pub async fn toggle_bank(&self, group_id: &str) -> Reply {
        let current = self.store.bank_selection(group_id).await;
        let next = current.toggled();
        let persisted = self.store.set_bank_selection(group_id, next).await;
        info!(group_id, %next, persisted, "bank selection toggled");

        let mut text = format!("word bank switched to the {}.\n{}", next.label(), next.description());
        if !persisted {
            text.push_str("\n(no database configured, so this resets on restart)");
        }

        Reply::text(text)
    }

    pub fn help(&self) -> Reply {
        Reply::text(HELP_TEXT)
    }

    /// The group's unfinished game, if any. Corrupt records are discarded so
    /// the group is not wedged forever.
    async fn active_game(&self, group_id: &str) -> Option<Game> {
        let record = self.store.get(group_id).await?;
        if record.finished {
            return None;
        }

        match Game::try_from(record) {
            Ok(game) => Some(game),
            Err(err) => {
                warn!(group_id, %err, "discarding corrupt game record");
                self.store.delete(group_id).await;
                None
            }
        }
    }

    fn render_board(&self, group_id: &str, view: &BoardView) -> Option<Artifact> {
        let before = Instant::now();
        let artifact = self.renderer.render(group_id, view);

        let elapsed = before.elapsed();
        if elapsed > RENDER_WARN_AFTER {
            warn!(group_id, ?elapsed, "board render was slow");
        }

        artifact
    }

    async fn append_definition(&self, text: &mut String, word: &str) {
        let mut definition = self.words.definition(word).await;

        if definition.is_empty() {
            if let Some(translator) = &self.translator {
                definition = translator.lookup(word).await;
            }
        }

        if !definition.is_empty() {
            text.push_str(&format!("\n📖 {definition}"));
        }
    }

    /// Deletes the group's finished game after a grace period, leaving the
    /// final board visible for a while. The deferred task re-checks the
    /// record: a new game started in the meantime must survive.
    fn schedule_cleanup(&self, group_id: &str) {
        let store = self.store.clone();
        let renderer = Arc::clone(&self.renderer);
        let group_id = group_id.to_owned();
        let delay = self.cleanup_delay;

        tokio::spawn(async move {
            tokio::time::sleep(delay).await;

            match store.get(&group_id).await {
                Some(record) if record.finished => {
                    store.delete(&group_id).await;
                    renderer.clear_cache(&group_id);
                    debug!(group_id, "finished game cleaned up");
                }
                _ => debug!(group_id, "cleanup skipped, game was replaced"),
            }
        });
    }
}
