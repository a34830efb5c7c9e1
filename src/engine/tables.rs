use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::keyboard::finger::{self, Finger, Hand, Row};

/// How often a letter was shown and how often it was typed correctly.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LetterStat {
    pub presented: u64,
    pub correct: u64,
}

impl LetterStat {
    pub fn accuracy(&self) -> f64 {
        if self.presented == 0 {
            return 0.0;
        }
        self.correct as f64 / self.presented as f64 * 100.0
    }

    fn merge(&mut self, other: &LetterStat) {
        self.presented += other.presented;
        self.correct += other.correct;
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeekStat {
    pub total_ms: u64,
    pub count: u64,
}

impl SeekStat {
    pub fn record(&mut self, time_ms: u64) {
        self.total_ms += time_ms;
        self.count += 1;
    }

    pub fn average_ms(&self) -> f64 {
        if self.count == 0 {
            return 0.0;
        }
        self.total_ms as f64 / self.count as f64
    }

    fn merge(&mut self, other: &SeekStat) {
        self.total_ms += other.total_ms;
        self.count += other.count;
    }
}

/// Counters for one finger, hand or row. `count` is the number of timed samples
/// folded into `total_time_ms`; untimed correct strikes only bump `correct`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroupStat {
    pub presented: u64,
    pub correct: u64,
    pub total_time_ms: u64,
    pub count: u64,
}

impl GroupStat {
    fn record_correct(&mut self, time_ms: u64) {
        self.correct += 1;
        if time_ms > 0 {
            self.total_time_ms += time_ms;
            self.count += 1;
        }
    }

    pub fn accuracy(&self) -> f64 {
        if self.presented == 0 {
            return 0.0;
        }
        self.correct as f64 / self.presented as f64 * 100.0
    }

    pub fn average_ms(&self) -> f64 {
        if self.count == 0 {
            return 0.0;
        }
        self.total_time_ms as f64 / self.count as f64
    }

    fn merge(&mut self, other: &GroupStat) {
        self.presented += other.presented;
        self.correct += other.correct;
        self.total_time_ms += other.total_time_ms;
        self.count += other.count;
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ErrorPair {
    pub expected: char,
    pub typed: char,
    pub count: u64,
}

/// The per-dimension tables shared by a single round and the cross-session history.
/// Everything in here merges additively.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregateTables {
    pub letters: BTreeMap<char, LetterStat>,
    pub letter_seek: BTreeMap<char, SeekStat>,
    pub bigram_seek: BTreeMap<String, SeekStat>,
    pub fingers: [GroupStat; Finger::COUNT],
    pub hands: [GroupStat; Hand::COUNT],
    pub rows: [GroupStat; Row::COUNT],
    pub error_substitutions: BTreeMap<char, BTreeMap<char, u64>>,
    pub same_finger_bigrams: SeekStat,
    pub hand_alternations: u64,
    pub same_hand_runs: u64,
}

impl AggregateTables {
    pub fn record_presented(&mut self, letter: char) {
        self.letters.entry(letter).or_default().presented += 1;
        if let Some(assignment) = finger::qwerty_assignment(letter) {
            self.fingers[assignment.finger.index()].presented += 1;
            self.hands[assignment.hand().index()].presented += 1;
            self.rows[assignment.row.index()].presented += 1;
        }
    }

    /// Count a correct strike. `time_ms == 0` means the strike was not eligible for timing.
    pub fn record_correct(&mut self, letter: char, time_ms: u64) {
        self.letters.entry(letter).or_default().correct += 1;
        if let Some(assignment) = finger::qwerty_assignment(letter) {
            self.fingers[assignment.finger.index()].record_correct(time_ms);
            self.hands[assignment.hand().index()].record_correct(time_ms);
            self.rows[assignment.row.index()].record_correct(time_ms);
        }
    }

    pub fn record_letter_seek(&mut self, letter: char, time_ms: u64) {
        self.letter_seek.entry(letter).or_default().record(time_ms);
    }

    pub fn record_bigram_seek(&mut self, first: char, second: char, time_ms: u64) {
        let key: String = [first, second].iter().collect();
        self.bigram_seek.entry(key).or_default().record(time_ms);
    }

    pub fn record_same_finger_bigram(&mut self, time_ms: u64) {
        self.same_finger_bigrams.record(time_ms);
    }

    pub fn record_hand_transition(&mut self, alternated: bool) {
        if alternated {
            self.hand_alternations += 1;
        } else {
            self.same_hand_runs += 1;
        }
    }

    pub fn record_error_substitution(&mut self, expected: char, typed: char) {
        *self
            .error_substitutions
            .entry(expected)
            .or_default()
            .entry(typed)
            .or_default() += 1;
    }

    pub fn merge(&mut self, other: &AggregateTables) {
        for (letter, stat) in &other.letters {
            self.letters.entry(*letter).or_default().merge(stat);
        }
        for (letter, stat) in &other.letter_seek {
            self.letter_seek.entry(*letter).or_default().merge(stat);
        }
        for (bigram, stat) in &other.bigram_seek {
            self.bigram_seek.entry(bigram.clone()).or_default().merge(stat);
        }
        for (mine, theirs) in self.fingers.iter_mut().zip(&other.fingers) {
            mine.merge(theirs);
        }
        for (mine, theirs) in self.hands.iter_mut().zip(&other.hands) {
            mine.merge(theirs);
        }
        for (mine, theirs) in self.rows.iter_mut().zip(&other.rows) {
            mine.merge(theirs);
        }
        for (expected, typed_counts) in &other.error_substitutions {
            let entry = self.error_substitutions.entry(*expected).or_default();
            for (typed, count) in typed_counts {
                *entry.entry(*typed).or_default() += count;
            }
        }
        self.same_finger_bigrams.merge(&other.same_finger_bigrams);
        self.hand_alternations += other.hand_alternations;
        self.same_hand_runs += other.same_hand_runs;
    }

    pub fn finger(&self, finger: Finger) -> &GroupStat {
        &self.fingers[finger.index()]
    }

    pub fn hand(&self, hand: Hand) -> &GroupStat {
        &self.hands[hand.index()]
    }

    pub fn row(&self, row: Row) -> &GroupStat {
        &self.rows[row.index()]
    }

    pub fn letter_accuracy(&self, letter: char) -> f64 {
        self.letters
            .get(&letter)
            .map(LetterStat::accuracy)
            .unwrap_or(0.0)
    }

    pub fn average_letter_seek_ms(&self, letter: char) -> f64 {
        self.letter_seek
            .get(&letter)
            .map(SeekStat::average_ms)
            .unwrap_or(0.0)
    }

    pub fn slowest_letters(&self, limit: usize) -> Vec<(char, f64)> {
        let mut ranked: Vec<(char, f64)> = self
            .letter_seek
            .iter()
            .filter(|(_, s)| s.count > 0)
            .map(|(ch, s)| (*ch, s.average_ms()))
            .collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
        ranked.truncate(limit);
        ranked
    }

    pub fn slowest_bigrams(&self, limit: usize) -> Vec<(String, f64)> {
        let mut ranked: Vec<(String, f64)> = self
            .bigram_seek
            .iter()
            .filter(|(_, s)| s.count > 0)
            .map(|(bigram, s)| (bigram.clone(), s.average_ms()))
            .collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        ranked.truncate(limit);
        ranked
    }

    /// Most frequent (expected, typed) confusions, count descending then key ascending.
    pub fn top_errors(&self, limit: usize) -> Vec<ErrorPair> {
        let mut pairs: Vec<ErrorPair> = self
            .error_substitutions
            .iter()
            .flat_map(|(expected, typed_counts)| {
                typed_counts.iter().map(|(typed, count)| ErrorPair {
                    expected: *expected,
                    typed: *typed,
                    count: *count,
                })
            })
            .collect();
        pairs.sort_by(|a, b| {
            b.count
                .cmp(&a.count)
                .then(a.expected.cmp(&b.expected))
                .then(a.typed.cmp(&b.typed))
        });
        pairs.truncate(limit);
        pairs
    }

    /// Left/right share of correctly typed letters, as percentages.
    pub fn hand_balance(&self) -> Option<(f64, f64)> {
        let left = self.hand(Hand::Left).correct;
        let right = self.hand(Hand::Right).correct;
        let total = left + right;
        if total == 0 {
            return None;
        }
        Some((
            left as f64 / total as f64 * 100.0,
            right as f64 / total as f64 * 100.0,
        ))
    }

    pub fn hand_alternation_rate(&self) -> Option<f64> {
        let total = self.hand_alternations + self.same_hand_runs;
        if total == 0 {
            return None;
        }
        Some(self.hand_alternations as f64 / total as f64 * 100.0)
    }

    pub fn same_finger_bigram_average_ms(&self) -> f64 {
        self.same_finger_bigrams.average_ms()
    }
}
