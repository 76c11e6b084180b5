use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::TranslateConfig;

const LOOKUP_TIMEOUT: Duration = Duration::from_secs(10);
const MAX_FRAGMENTS: usize = 3;

/// Online dictionary lookup used when the local word list has no definition.
/// Strictly best-effort: every failure path, including the hard 10-second
/// timeout, comes back as an empty string.
#[derive(Debug, Clone)]
pub struct Translator {
    enabled: bool,
    endpoint: String,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct Entry {
    meanings: Vec<Meaning>,
}

#[derive(Debug, Deserialize)]
struct Meaning {
    #[serde(rename = "partOfSpeech")]
    part_of_speech: String,
    definitions: Vec<Definition>,
}

#[derive(Debug, Deserialize)]
struct Definition {
    definition: String,
}

impl Translator {
    pub fn new(config: &TranslateConfig) -> Self {
        Self {
            enabled: config.enable,
            endpoint: config.endpoint.trim_end_matches('/').to_owned(),
            client: reqwest::Client::new(),
        }
    }

    pub async fn lookup(&self, word: &str) -> String {
        if !self.enabled {
            return String::new();
        }

        match tokio::time::timeout(LOOKUP_TIMEOUT, self.fetch(word)).await {
            Ok(Ok(definition)) => {
                debug!(word, "online definition found");
                definition
            }
            Ok(Err(err)) => {
                warn!(word, %err, "definition lookup failed");
                String::new()
            }
            Err(_) => {
                warn!(word, "definition lookup timed out");
                String::new()
            }
        }
    }

    async fn fetch(&self, word: &str) -> reqwest::Result<String> {
        let url = format!("{}/{}", self.endpoint, word);

        let entries: Vec<Entry> = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let fragments = entries
            .iter()
            .flat_map(|entry| &entry.meanings)
            .filter_map(|meaning| {
                let first = meaning.definitions.first()?;
                Some(format!("{}: {}", meaning.part_of_speech, first.definition))
            })
            .take(MAX_FRAGMENTS)
            .collect::<Vec<_>>();

        Ok(fragments.join("；"))
    }
}

#[cfg(test)]
mod tests {
    use super::Translator;
    use crate::config::TranslateConfig;

    #[tokio::test]
    async fn disabled_lookup_is_empty() {
        let translator = Translator::new(&TranslateConfig {
            enable: false,
            endpoint: "http://localhost:9".to_owned(),
        });

        assert_eq!(translator.lookup("apple").await, "");
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_empty_not_an_error() {
        let translator = Translator::new(&TranslateConfig {
            enable: true,
            // reserved discard port, nothing listens here
            endpoint: "http://127.0.0.1:9".to_owned(),
        });

        assert_eq!(translator.lookup("apple").await, "");
    }
}
