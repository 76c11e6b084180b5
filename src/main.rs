use anyhow::Context;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

use wordlebot::{
    config::Config,
    router::{self, Command},
    store::MongoTier,
    translate::Translator,
    GameEngine, GameStore, WordBank,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    wordlebot::logging::init_tracing();

    let config = Config::load().context("invalid configuration")?;

    let store = match &config.db {
        Some(db) => match MongoTier::connect(db, config.game.state_ttl()).await {
            Ok(tier) => {
                info!(database = db.database(), "connected to mongodb");
                GameStore::new(Some(tier))
            }
            Err(err) => {
                warn!(%err, "mongodb unavailable, falling back to in-memory state");
                GameStore::memory_only()
            }
        },
        None => {
            info!("no database configured, state kept in memory");
            GameStore::memory_only()
        }
    };

    let engine = GameEngine::new(WordBank::new(&config.words), store, &config.game)
        .with_translator(Translator::new(&config.translate));

    info!("ready! reading messages from stdin, one per line");

    // each line is a chat message, optionally addressed as `group:user text`
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let (group_id, user_id, text) = split_address(&line);

        let Some(command) = router::parse(text) else {
            continue;
        };

        let reply = match command {
            Command::Start { letter_count } => engine.start(group_id, letter_count).await,
            Command::Guess(word) => engine.guess(group_id, user_id, &word).await,
            Command::Abandon => engine.abandon(group_id).await,
            Command::ToggleBank => engine.toggle_bank(group_id).await,
            Command::Help => engine.help(),
        };

        println!("[{group_id}] {}", reply.text);
        if let Some(artifact) = reply.image {
            println!("[{group_id}] <board image, {} bytes>", artifact.0.len());
        }
    }

    Ok(())
}

/// Splits an optional `group:user` address off the front of a line. Without
/// one, the message counts as the local group's.
fn split_address(line: &str) -> (&str, &str, &str) {
    if let Some((address, text)) = line.split_once(' ') {
        if let Some((group, user)) = address.split_once(':') {
            if !group.is_empty() && !user.is_empty() {
                return (group, user, text);
            }
        }
    }

    ("local", "local", line)
}

#[cfg(test)]
mod tests {
    use super::split_address;

    #[test]
    fn addressed_and_bare_lines_both_parse() {
        assert_eq!(split_address("games:alice #apple"), ("games", "alice", "#apple"));
        assert_eq!(split_address("#apple"), ("local", "local", "#apple"));
        assert_eq!(split_address(": #apple"), ("local", "local", ": #apple"));
    }
}
