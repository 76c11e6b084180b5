use std::{collections::HashMap, sync::Arc};

use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::{game::GameRecord, words::Bank};

mod mongo;
pub use mongo::MongoTier;

/// Per-group game state, one record per group key.
///
/// Writes always land in the in-memory map first, so in-process callers never
/// lose state outright; the MongoDB tier, when configured, adds durability
/// with a fixed expiry. Backend errors are logged and swallowed: the store
/// degrades to memory-only behavior instead of surfacing them.
#[derive(Debug, Clone, Default)]
pub struct GameStore {
    memory: Arc<RwLock<HashMap<String, GameRecord>>>,
    durable: Option<MongoTier>,
}

impl GameStore {
    pub fn new(durable: Option<MongoTier>) -> Self {
        Self {
            memory: Arc::default(),
            durable,
        }
    }

    pub fn memory_only() -> Self {
        Self::new(None)
    }

    pub async fn get(&self, group_id: &str) -> Option<GameRecord> {
        if let Some(durable) = &self.durable {
            match durable.get_game(group_id).await {
                Ok(record) => return record,
                Err(err) => {
                    warn!(group_id, %err, "durable store read failed, using memory");
                }
            }
        }

        self.memory.read().await.get(group_id).cloned()
    }

    /// Returns whether the record was durably written. Memory-only saves
    /// return `false` but still keep the state for this process.
    pub async fn save(&self, group_id: &str, record: GameRecord) -> bool {
        self.memory
            .write()
            .await
            .insert(group_id.to_owned(), record.clone());

        let Some(durable) = &self.durable else {
            debug!(group_id, "no durable store configured, game kept in memory only");
            return false;
        };

        match durable.set_game(group_id, &record).await {
            Ok(()) => true,
            Err(err) => {
                warn!(group_id, %err, "durable store write failed, game kept in memory only");
                false
            }
        }
    }

    pub async fn delete(&self, group_id: &str) -> bool {
        self.memory.write().await.remove(group_id);

        let Some(durable) = &self.durable else {
            return true;
        };

        match durable.delete_game(group_id).await {
            Ok(()) => true,
            Err(err) => {
                warn!(group_id, %err, "durable store delete failed");
                false
            }
        }
    }

    /// The group's word-bank selection. Durable only: without a backend this
    /// is always the default.
    pub async fn bank_selection(&self, group_id: &str) -> Bank {
        let Some(durable) = &self.durable else {
            return Bank::default();
        };

        match durable.get_bank(group_id).await {
            Ok(bank) => bank.unwrap_or_default(),
            Err(err) => {
                warn!(group_id, %err, "bank selection read failed, using default");
                Bank::default()
            }
        }
    }

    pub async fn set_bank_selection(&self, group_id: &str, bank: Bank) -> bool {
        let Some(durable) = &self.durable else {
            warn!(group_id, "no durable store configured, bank selection will not persist");
            return false;
        };

        match durable.set_bank(group_id, bank).await {
            Ok(()) => true,
            Err(err) => {
                warn!(group_id, %err, "bank selection write failed");
                false
            }
        }
    }
}
