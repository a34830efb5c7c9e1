use std::collections::BTreeMap;

use rand::Rng;
use rand::seq::SliceRandom;
use tracing::debug;

use crate::engine::profile::LetterProfile;
use crate::engine::scoring;
use crate::generator::dictionary::Dictionary;

const MAX_ATTEMPTS: usize = 100;
/// How far a candidate's length may stray from the ideal per-word length.
const LENGTH_WINDOW: usize = 2;

/// Picks exactly `word_count` words whose lengths sum to exactly `target_chars`,
/// weighting each pick toward letters the typist sees rarely or misses often.
pub struct WordSelector {
    by_length: BTreeMap<usize, Vec<String>>,
    all: Vec<String>,
    max_len: usize,
}

impl WordSelector {
    pub fn new(dictionary: &Dictionary) -> Self {
        let mut by_length: BTreeMap<usize, Vec<String>> = BTreeMap::new();
        for word in dictionary.words() {
            by_length
                .entry(word.chars().count())
                .or_default()
                .push(word.clone());
        }
        let max_len = by_length.keys().next_back().copied().unwrap_or(0);

        Self {
            by_length,
            all: dictionary.words().to_vec(),
            max_len,
        }
    }

    /// Select the round's words. Never fails: when no exact-sum combination is found
    /// within the retry budget, falls back to uniform draws that honour only the count.
    /// An empty corpus yields an empty list.
    pub fn select<R: Rng + ?Sized>(
        &self,
        word_count: usize,
        target_chars: usize,
        profile: &LetterProfile,
        rng: &mut R,
    ) -> Vec<String> {
        if word_count == 0 || self.all.is_empty() {
            return Vec::new();
        }

        if self.is_feasible(word_count, target_chars) {
            for _ in 0..MAX_ATTEMPTS {
                if let Some(words) = self.try_exact(word_count, target_chars, profile, rng) {
                    return words;
                }
            }
        }

        debug!(
            word_count,
            target_chars, "no exact-length word combination found, drawing uniformly"
        );
        self.uniform(word_count, rng)
    }

    fn is_feasible(&self, words: usize, chars: usize) -> bool {
        chars >= words && chars <= words * self.max_len
    }

    fn try_exact<R: Rng + ?Sized>(
        &self,
        word_count: usize,
        target_chars: usize,
        profile: &LetterProfile,
        rng: &mut R,
    ) -> Option<Vec<String>> {
        let mut picked = Vec::with_capacity(word_count);
        let mut used = 0;

        for slot in 0..word_count {
            let slots_left = word_count - slot;
            let chars_left = target_chars - used;
            let (lo, hi) = self.slot_window(slots_left, chars_left)?;

            let mut candidates = self.candidates(lo, hi);
            if candidates.is_empty() && slots_left > 1 {
                let (feasible_lo, feasible_hi) = self.feasible_range(slots_left, chars_left)?;
                candidates = self.candidates(feasible_lo, feasible_hi);
            }

            let word = scoring::weighted_pick(&candidates, profile, rng)?;
            used += word.chars().count();
            picked.push(word.to_string());
        }

        (used == target_chars).then_some(picked)
    }

    /// Lengths this slot may take so the remaining slots can still land on the budget.
    fn feasible_range(&self, slots_left: usize, chars_left: usize) -> Option<(usize, usize)> {
        let others = slots_left - 1;
        let lo = chars_left.saturating_sub(others * self.max_len).max(1);
        let hi = chars_left.checked_sub(others)?.min(self.max_len);
        (lo <= hi).then_some((lo, hi))
    }

    /// The preferred length window: ±2 around the ideal length, clamped to feasibility.
    /// The final slot must match the remaining budget exactly.
    fn slot_window(&self, slots_left: usize, chars_left: usize) -> Option<(usize, usize)> {
        if slots_left == 1 {
            return (chars_left >= 1).then_some((chars_left, chars_left));
        }
        let (feasible_lo, feasible_hi) = self.feasible_range(slots_left, chars_left)?;
        let ideal = chars_left / slots_left;
        let lo = ideal.saturating_sub(LENGTH_WINDOW).max(feasible_lo);
        let hi = (ideal + LENGTH_WINDOW).min(feasible_hi);
        if lo <= hi {
            Some((lo, hi))
        } else {
            Some((feasible_lo, feasible_hi))
        }
    }

    fn candidates(&self, lo: usize, hi: usize) -> Vec<&str> {
        self.by_length
            .range(lo..=hi)
            .flat_map(|(_, words)| words.iter().map(String::as_str))
            .collect()
    }

    fn uniform<R: Rng + ?Sized>(&self, word_count: usize, rng: &mut R) -> Vec<String> {
        (0..word_count)
            .filter_map(|_| self.all.choose(rng).cloned())
            .collect()
    }
}
