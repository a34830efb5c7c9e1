use std::collections::BTreeSet;

use tracing::warn;

const WORDS_EN: &str = include_str!("../../assets/words-en.json");

pub struct Dictionary {
    words: Vec<String>,
}

impl Dictionary {
    pub fn load() -> Self {
        Self::from_json(WORDS_EN)
    }

    /// Parse a JSON array of words. Malformed input yields an empty corpus.
    pub fn from_json(json: &str) -> Self {
        let words: Vec<String> = serde_json::from_str(json)
            .inspect_err(|err| warn!(error = %err, "word list is malformed, corpus is empty"))
            .unwrap_or_default();
        Self::from_words(words)
    }

    /// Build a corpus from arbitrary words, keeping only non-empty lowercase ASCII entries.
    /// Duplicates are dropped so repeated entries don't skew the draw.
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = BTreeSet::new();
        let words = words
            .into_iter()
            .map(|w| w.as_ref().trim().to_lowercase())
            .filter(|w| !w.is_empty() && w.chars().all(|c| c.is_ascii_lowercase()))
            .filter(|w| seen.insert(w.clone()))
            .collect();

        Self { words }
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}
