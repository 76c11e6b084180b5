use std::time::Duration;

use chrono::Utc;
use mongodb::{
    bson::doc,
    options::{ClientOptions, Credential, ReplaceOptions},
    Client, Collection, Database,
};
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::{config::DbConfig, game::GameRecord, words::Bank};

type DbResult<T> = Result<T, mongodb::error::Error>;

/// MongoDB tier of the [`GameStore`](super::GameStore). Game records carry an
/// expiry timestamp and expired ones are treated as absent on read.
#[derive(Debug, Clone)]
pub struct MongoTier {
    games: Collection<StoredGame>,
    banks: Collection<StoredBank>,
    ttl_ms: i64,
}

#[derive(Debug, Serialize, Deserialize)]
struct StoredGame {
    group_id: String,
    expires_at_ms: i64,
    game: GameRecord,
}

#[derive(Debug, Serialize, Deserialize)]
struct StoredBank {
    group_id: String,
    bank: Bank,
}

impl MongoTier {
    pub async fn connect(config: &DbConfig, ttl: Duration) -> DbResult<Self> {
        let mut options = ClientOptions::parse(config.url()).await?;
        options.app_name = Some("wordlebot".to_owned());

        if let (Some(username), Some(password)) = (config.username(), config.password()) {
            options.credential = Some(
                Credential::builder()
                    .username(username.to_owned())
                    .password(password.to_owned())
                    .build(),
            );
        }

        let db = Client::with_options(options)?.database(config.database());
        Ok(Self::new(&db, ttl))
    }

    pub fn new(db: &Database, ttl: Duration) -> Self {
        Self {
            games: db.collection("games"),
            banks: db.collection("bank_selections"),
            ttl_ms: ttl.as_millis() as i64,
        }
    }

    pub(super) async fn get_game(&self, group_id: &str) -> DbResult<Option<GameRecord>> {
        let Some(stored) = self
            .games
            .find_one(doc! { "group_id": group_id }, None)
            .await?
        else {
            return Ok(None);
        };

        if stored.expires_at_ms <= Utc::now().timestamp_millis() {
            trace!(group_id, "stored game expired");
            self.delete_game(group_id).await?;
            return Ok(None);
        }

        Ok(Some(stored.game))
    }

    pub(super) async fn set_game(&self, group_id: &str, game: &GameRecord) -> DbResult<()> {
        let stored = StoredGame {
            group_id: group_id.to_owned(),
            expires_at_ms: Utc::now().timestamp_millis() + self.ttl_ms,
            game: game.clone(),
        };

        self.games
            .replace_one(
                doc! { "group_id": group_id },
                &stored,
                ReplaceOptions::builder().upsert(true).build(),
            )
            .await?;

        Ok(())
    }

    pub(super) async fn delete_game(&self, group_id: &str) -> DbResult<()> {
        self.games
            .delete_one(doc! { "group_id": group_id }, None)
            .await?;

        Ok(())
    }

    pub(super) async fn get_bank(&self, group_id: &str) -> DbResult<Option<Bank>> {
        Ok(self
            .banks
            .find_one(doc! { "group_id": group_id }, None)
            .await?
            .map(|stored| stored.bank))
    }

    pub(super) async fn set_bank(&self, group_id: &str, bank: Bank) -> DbResult<()> {
        let stored = StoredBank {
            group_id: group_id.to_owned(),
            bank,
        };

        self.banks
            .replace_one(
                doc! { "group_id": group_id },
                &stored,
                ReplaceOptions::builder().upsert(true).build(),
            )
            .await?;

        Ok(())
    }
}
