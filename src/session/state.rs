use std::sync::Arc;

use chrono::{DateTime, Utc};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use tracing::{debug, warn};

use crate::config::Config;
use crate::engine::history::HistoricalAggregator;
use crate::error::{StoreError, StoreResult};
use crate::generator::dictionary::Dictionary;
use crate::generator::punctuate::apply_punctuation;
use crate::generator::selector::WordSelector;
use crate::session::aggregates::RoundAggregates;
use crate::session::result::{RoundState, RoundSummary, Snapshot};
use crate::session::word::Word;
use crate::store::json_store::JsonStore;
use crate::store::schema::HistoricalStats;

/// One typist's practice session: the round in progress plus the history it
/// feeds. Input handling lives in `session::input`.
pub struct SessionEngine {
    pub(crate) config: Config,
    selector: Arc<WordSelector>,
    pub(crate) history: HistoricalAggregator,
    store: Option<JsonStore>,
    rng: SmallRng,

    pub(crate) words: Vec<Word>,
    pub(crate) word_index: usize,
    pub(crate) input: Vec<char>,
    pub(crate) timer_started: bool,
    /// Last correctly typed letter of the current word; bigrams never cross words.
    pub(crate) last_letter: Option<char>,
    pub(crate) round: RoundAggregates,
    pub(crate) state: RoundState,
    finalized: bool,
}

impl SessionEngine {
    pub fn new(
        config: Config,
        selector: Arc<WordSelector>,
        history: HistoricalAggregator,
        store: Option<JsonStore>,
        rng: SmallRng,
    ) -> Self {
        Self {
            config,
            selector,
            history,
            store,
            rng,
            words: Vec::new(),
            word_index: 0,
            input: Vec::new(),
            timer_started: false,
            last_letter: None,
            round: RoundAggregates::new(),
            state: RoundState::Idle,
            finalized: false,
        }
    }

    /// Engine over the embedded dictionary with history loaded from disk.
    /// A missing or unusable history location leaves the engine without a store.
    pub fn open(config: Config) -> Self {
        let selector = Arc::new(WordSelector::new(&Dictionary::load()));
        Self::open_with_selector(config, selector)
    }

    pub fn open_with_selector(config: Config, selector: Arc<WordSelector>) -> Self {
        let store = match config.history_store() {
            Ok(store) => Some(store),
            Err(err) => {
                warn!(error = %err, "history location unavailable, history will not be saved");
                None
            }
        };
        let history = HistoricalAggregator::load(store.as_ref());
        Self::new(config, selector, history, store, SmallRng::from_entropy())
    }

    pub fn state(&self) -> RoundState {
        self.state
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Draw a fresh word list weighted by the historical letter profile and begin a round.
    /// Starting while a round is in progress abandons it.
    pub fn start_round(&mut self) {
        let profile = self.history.letter_profile();
        let picked = self.selector.select(
            self.config.words_per_round,
            self.config.chars_per_round,
            &profile,
            &mut self.rng,
        );
        let mut words: Vec<Word> = picked.into_iter().map(Word::new).collect();
        if self.config.punctuation_mode {
            words = apply_punctuation(words, &mut self.rng);
        }
        self.begin(words);
    }

    /// Begin a round on a caller-supplied list, used as given.
    pub fn start_round_with_words<I>(&mut self, words: I)
    where
        I: IntoIterator,
        I::Item: Into<Word>,
    {
        self.begin(words.into_iter().map(Into::into).collect());
    }

    fn begin(&mut self, words: Vec<Word>) {
        self.round = RoundAggregates::new();
        for word in &words {
            self.round.record_presented(word);
        }
        self.word_index = 0;
        self.input.clear();
        self.timer_started = false;
        self.last_letter = None;
        self.finalized = false;
        self.state = if words.is_empty() {
            RoundState::Idle
        } else {
            RoundState::InProgress
        };
        debug!(
            words = words.len(),
            chars = words.iter().map(Word::score_len).sum::<usize>(),
            "round started"
        );
        self.words = words;
    }

    pub(crate) fn current_word(&self) -> Option<&Word> {
        if self.state != RoundState::InProgress {
            return None;
        }
        self.words.get(self.word_index)
    }

    /// Stamp caller-measured timing on the completed round and fold it into history.
    /// Accepted once per round, and only after the round is complete.
    pub fn finalize_timing(
        &mut self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        duration_ms: u64,
    ) -> Option<RoundSummary> {
        if self.state != RoundState::Complete || self.finalized {
            return None;
        }
        self.round.finalize(start, end, duration_ms);

        let best = self.history.stats();
        let summary = RoundSummary {
            wpm: self.round.wpm,
            accuracy: self.round.accuracy,
            duration_ms,
            new_best_wpm: self.round.wpm > best.best_wpm,
            new_best_accuracy: self.round.accuracy > best.best_accuracy,
            new_best_time: duration_ms > 0
                && best.best_time_ms.is_none_or(|time| duration_ms < time),
        };

        self.history.update_historical(&self.round);
        self.finalized = true;
        Some(summary)
    }

    pub fn snapshot(&self) -> Snapshot {
        let total_words = self.words.len();
        let display = |word: &Word| word.display_text();
        Snapshot {
            state: self.state,
            words: self.words.iter().map(display).collect(),
            current_word_index: self.word_index,
            current_input: self.input.iter().collect(),
            timer_started: self.timer_started,
            punctuation_mode: self.config.punctuation_mode,
            word_number: if total_words == 0 {
                0
            } else {
                (self.word_index + 1).min(total_words)
            },
            total_words,
            current_word: self.words.get(self.word_index).map(display),
            previous_word: self
                .word_index
                .checked_sub(1)
                .and_then(|i| self.words.get(i))
                .map(display),
            next_words: self
                .words
                .iter()
                .skip(self.word_index + 1)
                .take(self.config.preview_words)
                .map(display)
                .collect(),
        }
    }

    pub fn session_stats(&self) -> &RoundAggregates {
        &self.round
    }

    pub fn historical_stats(&self) -> &HistoricalStats {
        self.history.stats()
    }

    pub fn history(&self) -> &HistoricalAggregator {
        &self.history
    }

    pub fn persist(&self) -> StoreResult<()> {
        let store = self
            .store
            .as_ref()
            .ok_or_else(|| StoreError::Unavailable("session has no history store".to_string()))?;
        self.history.persist(store)
    }
}
