use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

/// Top-level configuration, loaded from `wordlebot.toml` (optional) with
/// `WORDLEBOT_*` environment overrides. Every section has working defaults so
/// the bot comes up with no config file at all.
#[derive(Deserialize, Debug, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub words: WordsConfig,
    #[serde(default)]
    pub game: GameConfig,
    pub db: Option<DbConfig>,
    #[serde(default)]
    pub translate: TranslateConfig,
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::File::with_name("wordlebot").required(false))
            .add_source(config::Environment::with_prefix("WORDLEBOT").separator("__"))
            .build()?
            .try_deserialize()
    }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct WordsConfig {
    pub main_path: PathBuf,
    pub backup_path: PathBuf,
}

impl Default for WordsConfig {
    fn default() -> Self {
        Self {
            main_path: PathBuf::from("resources/words.txt"),
            backup_path: PathBuf::from("resources/words-all.txt"),
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct GameConfig {
    cooldown_secs: u64,
    cleanup_delay_secs: u64,
    state_ttl_secs: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            cooldown_secs: 10,
            cleanup_delay_secs: 30,
            state_ttl_secs: 24 * 60 * 60,
        }
    }
}

impl GameConfig {
    /// Minimum interval between guesses from one user in one group.
    pub fn cooldown(&self) -> Duration {
        Duration::from_secs(self.cooldown_secs)
    }

    /// How long a finished game lingers before it is deleted.
    pub fn cleanup_delay(&self) -> Duration {
        Duration::from_secs(self.cleanup_delay_secs)
    }

    /// Expiry applied to game records in the durable store.
    pub fn state_ttl(&self) -> Duration {
        Duration::from_secs(self.state_ttl_secs)
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct DbConfig {
    url: String,
    username: Option<String>,
    password: Option<String>,
    #[serde(default = "default_database")]
    database: String,
}

fn default_database() -> String {
    "wordlebot".to_owned()
}

impl DbConfig {
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    pub fn password(&self) -> Option<&str> {
        self.password.as_deref()
    }

    pub fn database(&self) -> &str {
        &self.database
    }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct TranslateConfig {
    pub enable: bool,
    pub endpoint: String,
}

impl Default for TranslateConfig {
    fn default() -> Self {
        Self {
            enable: true,
            endpoint: "https://api.dictionaryapi.dev/api/v2/entries/en".to_owned(),
        }
    }
}
