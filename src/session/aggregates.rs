use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::engine::rhythm::RhythmStats;
use crate::engine::tables::AggregateTables;
use crate::session::word::Word;

/// Characters per "word" in the words-per-minute convention.
const CHARS_PER_WORD: f64 = 5.0;

/// Counters for the round in progress. Created empty at round start and folded into
/// history once the round is finalized.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoundAggregates {
    pub words_completed: u64,
    pub total_characters: u64,
    pub correct_chars: u64,
    pub incorrect_chars: u64,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub duration_ms: u64,
    pub wpm: f64,
    pub accuracy: f64,
    pub tables: AggregateTables,
    /// Every timed inter-keystroke interval, in order, for rhythm analysis.
    pub seek_times: Vec<u64>,
}

impl RoundAggregates {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_presented(&mut self, word: &Word) {
        for letter in word.score_text().chars().filter(|c| c.is_ascii_lowercase()) {
            self.tables.record_presented(letter);
        }
    }

    pub fn record_correct_char(&mut self) {
        self.total_characters += 1;
        self.correct_chars += 1;
    }

    pub fn record_incorrect_char(&mut self) {
        self.total_characters += 1;
        self.incorrect_chars += 1;
    }

    pub fn record_letter_correct(&mut self, letter: char, time_ms: u64) {
        self.tables.record_correct(letter, time_ms);
    }

    /// A correctly typed letter with a usable seek time; also feeds the rhythm samples.
    pub fn record_letter_seek(&mut self, letter: char, time_ms: u64) {
        self.tables.record_letter_seek(letter, time_ms);
        self.seek_times.push(time_ms);
    }

    pub fn record_bigram_seek(&mut self, first: char, second: char, time_ms: u64) {
        self.tables.record_bigram_seek(first, second, time_ms);
    }

    pub fn record_same_finger_bigram(&mut self, time_ms: u64) {
        self.tables.record_same_finger_bigram(time_ms);
    }

    pub fn record_hand_transition(&mut self, alternated: bool) {
        self.tables.record_hand_transition(alternated);
    }

    pub fn record_error_substitution(&mut self, expected: char, typed: char) {
        self.tables.record_error_substitution(expected, typed);
    }

    pub fn record_word_completed(&mut self) {
        self.words_completed += 1;
    }

    /// Stamp caller-measured timing and derive WPM and accuracy.
    pub fn finalize(&mut self, start: DateTime<Utc>, end: DateTime<Utc>, duration_ms: u64) {
        self.start_time = Some(start);
        self.end_time = Some(end);
        self.duration_ms = duration_ms;
        self.wpm = words_per_minute(self.correct_chars, duration_ms);
        self.accuracy = accuracy_percent(self.correct_chars, self.total_characters);
    }

    pub fn same_finger_bigram_count(&self) -> u64 {
        self.tables.same_finger_bigrams.count
    }

    pub fn rhythm(&self) -> RhythmStats {
        RhythmStats::from_samples(&self.seek_times)
    }

    pub fn rhythm_std_dev(&self) -> f64 {
        self.rhythm().std_dev()
    }

    pub fn duration_secs(&self) -> f64 {
        self.duration_ms as f64 / 1000.0
    }
}

pub fn words_per_minute(correct_chars: u64, duration_ms: u64) -> f64 {
    if duration_ms == 0 {
        return 0.0;
    }
    let minutes = duration_ms as f64 / 60_000.0;
    (correct_chars as f64 / CHARS_PER_WORD) / minutes
}

pub fn accuracy_percent(correct_chars: u64, total_chars: u64) -> f64 {
    if total_chars == 0 {
        return 0.0;
    }
    correct_chars as f64 / total_chars as f64 * 100.0
}
