use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::error::StoreResult;
use crate::store::json_store::JsonStore;

const MAX_WORDS_PER_ROUND: usize = 200;
const MAX_WORD_LEN: usize = 15;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_words_per_round")]
    pub words_per_round: usize,
    #[serde(default = "default_chars_per_round")]
    pub chars_per_round: usize,
    #[serde(default = "default_punctuation_mode")]
    pub punctuation_mode: bool,
    #[serde(default = "default_preview_words")]
    pub preview_words: usize,
    /// Overrides where `stats.json` lives.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub history_dir: Option<PathBuf>,
}

fn default_words_per_round() -> usize {
    30
}
fn default_chars_per_round() -> usize {
    150
}
fn default_punctuation_mode() -> bool {
    false
}
fn default_preview_words() -> usize {
    3
}

impl Default for Config {
    fn default() -> Self {
        Self {
            words_per_round: default_words_per_round(),
            chars_per_round: default_chars_per_round(),
            punctuation_mode: default_punctuation_mode(),
            preview_words: default_preview_words(),
            history_dir: None,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let content = fs::read_to_string(path)?;
            toml::from_str::<Config>(&content)?
        } else {
            Config::default()
        };
        config.validate();
        Ok(config)
    }

    fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("tapwise")
            .join("config.toml")
    }

    /// The history store this config points at: `history_dir` when set, otherwise
    /// the user config directory.
    pub fn history_store(&self) -> StoreResult<JsonStore> {
        match &self.history_dir {
            Some(dir) => JsonStore::with_base_dir(dir.clone()),
            None => JsonStore::new(),
        }
    }

    /// Clamp round sizes into a range every round can actually satisfy.
    pub fn validate(&mut self) {
        self.words_per_round = self.words_per_round.clamp(1, MAX_WORDS_PER_ROUND);
        self.chars_per_round = self
            .chars_per_round
            .clamp(self.words_per_round, self.words_per_round * MAX_WORD_LEN);
    }
}
