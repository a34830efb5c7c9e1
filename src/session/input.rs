use crate::keyboard::finger;
use crate::session::result::{AdvanceOutcome, BackspaceOutcome, KeystrokeOutcome, RoundState};
use crate::session::state::SessionEngine;

/// Seek times outside this open interval (ms) are noise: pauses, or clocks gone wrong.
const MAX_SEEK_MS: u64 = 5000;

fn usable_seek(seek_ms: u64) -> bool {
    seek_ms > 0 && seek_ms < MAX_SEEK_MS
}

impl SessionEngine {
    /// Type one character into the current word. `seek_ms` is the caller-measured time
    /// since the previous keystroke, 0 when unknown.
    pub fn keystroke(&mut self, ch: char, seek_ms: u64) -> KeystrokeOutcome {
        let Some(word) = self.current_word().cloned() else {
            return KeystrokeOutcome::default();
        };
        let position = self.input.len();

        let mut timer_just_started = false;
        if !self.timer_started
            && self.word_index == 0
            && position == 0
            && word.first_char() == Some(ch)
        {
            self.timer_started = true;
            timer_just_started = true;
        }

        self.input.push(ch);
        let expected = word.char_at(position);
        let correct = expected == Some(ch);

        if correct {
            self.round.record_correct_char();
            if let Some(letter) = word.letter_at(position) {
                self.record_correct_letter(letter, position, seek_ms);
            }
        } else {
            self.round.record_incorrect_char();
            if let Some(expected) = expected {
                if expected.is_ascii_lowercase() && ch.is_ascii_lowercase() {
                    self.round.record_error_substitution(expected, ch);
                }
            }
        }

        KeystrokeOutcome {
            correct,
            timer_started: timer_just_started,
            position,
        }
    }

    fn record_correct_letter(&mut self, letter: char, position: usize, seek_ms: u64) {
        let timed = self.timer_started && position > 0 && usable_seek(seek_ms);
        self.round
            .record_letter_correct(letter, if timed { seek_ms } else { 0 });

        if timed {
            self.round.record_letter_seek(letter, seek_ms);
            if let Some(previous) = self.last_letter {
                self.round.record_bigram_seek(previous, letter, seek_ms);
                if finger::is_same_finger_bigram(previous, letter) {
                    self.round.record_same_finger_bigram(seek_ms);
                }
                if let (Some(prev_hand), Some(hand)) =
                    (finger::hand_for(previous), finger::hand_for(letter))
                {
                    self.round.record_hand_transition(prev_hand != hand);
                }
            }
        }
        self.last_letter = Some(letter);
    }

    /// Remove the last typed character. Counters recorded for it are left alone.
    pub fn backspace(&mut self) -> BackspaceOutcome {
        if self.state != RoundState::InProgress {
            return BackspaceOutcome::default();
        }
        BackspaceOutcome {
            removed: self.input.pop().is_some(),
        }
    }

    /// The word-boundary key. Completes the word when enough has been typed, otherwise
    /// counts the key itself as a wrong character once typing is underway.
    pub fn advance(&mut self, _seek_ms: u64) -> AdvanceOutcome {
        let Some(word) = self.current_word() else {
            return AdvanceOutcome::default();
        };

        if self.input.len() >= word.display_len() {
            self.round.record_word_completed();
            self.input.clear();
            self.last_letter = None;
            self.word_index += 1;
            let round_complete = self.word_index >= self.words.len();
            if round_complete {
                self.state = RoundState::Complete;
            }
            return AdvanceOutcome {
                advanced: true,
                round_complete,
                treated_as_error: false,
            };
        }

        if !self.input.is_empty() || self.timer_started {
            self.input.push(' ');
            self.round.record_incorrect_char();
            return AdvanceOutcome {
                treated_as_error: true,
                ..AdvanceOutcome::default()
            };
        }

        AdvanceOutcome::default()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use crate::config::Config;
    use crate::engine::history::HistoricalAggregator;
    use crate::generator::dictionary::Dictionary;
    use crate::generator::selector::WordSelector;
    use crate::keyboard::finger::Hand;
    use crate::session::state::SessionEngine;
    use crate::session::word::Word;

    use super::*;

    fn engine_with(words: &[&str]) -> SessionEngine {
        let selector = Arc::new(WordSelector::new(&Dictionary::from_words(["unused"])));
        let mut engine = SessionEngine::new(
            Config::default(),
            selector,
            HistoricalAggregator::default(),
            None,
            SmallRng::seed_from_u64(1),
        );
        engine.start_round_with_words(words.iter().copied());
        engine
    }

    fn type_word(engine: &mut SessionEngine, word: &str, seek_ms: u64) {
        for ch in word.chars() {
            engine.keystroke(ch, seek_ms);
        }
    }

    #[test]
    fn events_before_start_are_noops() {
        let selector = Arc::new(WordSelector::new(&Dictionary::from_words(["unused"])));
        let mut engine = SessionEngine::new(
            Config::default(),
            selector,
            HistoricalAggregator::default(),
            None,
            SmallRng::seed_from_u64(1),
        );
        assert_eq!(engine.keystroke('a', 100), KeystrokeOutcome::default());
        assert_eq!(engine.backspace(), BackspaceOutcome::default());
        assert_eq!(engine.advance(100), AdvanceOutcome::default());
        assert_eq!(engine.session_stats().total_characters, 0);
    }

    #[test]
    fn timer_latches_on_first_correct_char_only() {
        let mut engine = engine_with(&["ab", "cd"]);
        let first = engine.keystroke('a', 0);
        assert!(first.correct);
        assert!(first.timer_started);
        assert!(!engine.keystroke('b', 150).timer_started);
        engine.advance(100);
        assert!(!engine.keystroke('c', 150).timer_started);
    }

    #[test]
    fn wrong_first_char_does_not_start_timer() {
        let mut engine = engine_with(&["ab"]);
        let outcome = engine.keystroke('x', 0);
        assert!(!outcome.correct);
        assert!(!outcome.timer_started);
        assert!(!engine.snapshot().timer_started);
    }

    #[test]
    fn positions_and_overflow() {
        let mut engine = engine_with(&["ab"]);
        assert_eq!(engine.keystroke('a', 0).position, 0);
        assert_eq!(engine.keystroke('b', 100).position, 1);
        let extra = engine.keystroke('c', 100);
        assert_eq!(extra.position, 2);
        assert!(!extra.correct);
        // past the end of the word: no substitution to attribute
        assert!(engine.session_stats().tables.error_substitutions.is_empty());
    }

    #[test]
    fn error_substitution_and_last_letter_untouched() {
        let mut engine = engine_with(&["ded"]);
        engine.keystroke('d', 0);
        engine.keystroke('r', 120);
        engine.backspace();
        engine.keystroke('e', 120);
        let stats = engine.session_stats();
        assert_eq!(stats.tables.error_substitutions[&'e'][&'r'], 1);
        // "de" is a same-finger bigram and the miss in between did not break it
        assert_eq!(stats.same_finger_bigram_count(), 1);
        assert_eq!(stats.tables.bigram_seek["de"].count, 1);
    }

    #[test]
    fn first_letter_of_word_is_untimed() {
        let mut engine = engine_with(&["ab", "cd"]);
        type_word(&mut engine, "ab", 200);
        engine.advance(200);
        type_word(&mut engine, "cd", 200);
        let stats = engine.session_stats();
        assert_eq!(stats.seek_times, vec![200, 200]);
        assert!(!stats.tables.letter_seek.contains_key(&'a'));
        assert!(!stats.tables.letter_seek.contains_key(&'c'));
        assert!(!stats.tables.bigram_seek.contains_key("bc"));
        assert_eq!(stats.tables.letters[&'c'].correct, 1);
    }

    #[test]
    fn out_of_window_seek_is_not_recorded() {
        let mut engine = engine_with(&["abc"]);
        engine.keystroke('a', 0);
        engine.keystroke('b', 5000);
        engine.keystroke('c', 0);
        let stats = engine.session_stats();
        assert!(stats.seek_times.is_empty());
        assert_eq!(stats.correct_chars, 3);
    }

    #[test]
    fn same_finger_bigram_needs_a_usable_seek() {
        // d and e share the left middle finger
        for (seek_ms, expected) in [(0, 0), (5000, 0), (200, 1)] {
            let mut engine = engine_with(&["de"]);
            engine.keystroke('d', 0);
            assert!(engine.keystroke('e', seek_ms).correct);
            assert_eq!(
                engine.session_stats().same_finger_bigram_count(),
                expected,
                "seek {seek_ms}"
            );
        }

        let mut engine = engine_with(&["jump"]);
        type_word(&mut engine, "jump", 4999);
        assert_eq!(engine.session_stats().same_finger_bigram_count(), 2);
    }

    #[test]
    fn hand_transitions_are_counted() {
        // t-h alternates, h-e alternates, e-r stays left
        let mut engine = engine_with(&["ther"]);
        type_word(&mut engine, "ther", 150);
        let tables = &engine.session_stats().tables;
        assert_eq!(tables.hand_alternations, 2);
        assert_eq!(tables.same_hand_runs, 1);
        assert_eq!(tables.hand(Hand::Left).count, 2);
    }

    #[test]
    fn punctuation_is_typed_but_not_scored() {
        let mut engine = SessionEngine::new(
            Config::default(),
            Arc::new(WordSelector::new(&Dictionary::from_words(["unused"]))),
            HistoricalAggregator::default(),
            None,
            SmallRng::seed_from_u64(1),
        );
        engine.start_round_with_words([Word::new("hi").with_punctuation('!'), Word::new("yo")]);
        type_word(&mut engine, "hi", 100);
        let short = engine.advance(100);
        assert!(short.treated_as_error);
        engine.backspace();
        assert!(engine.keystroke('!', 100).correct);
        assert!(engine.advance(100).advanced);
        let stats = engine.session_stats();
        assert!(!stats.tables.letters.contains_key(&'!'));
        assert_eq!(stats.correct_chars, 3);
        assert_eq!(stats.incorrect_chars, 1);
    }

    #[test]
    fn advance_on_untouched_first_word_is_noop() {
        let mut engine = engine_with(&["ab"]);
        assert_eq!(engine.advance(0), AdvanceOutcome::default());
        assert_eq!(engine.session_stats().total_characters, 0);
    }

    #[test]
    fn advance_short_word_counts_an_error() {
        let mut engine = engine_with(&["abc", "d"]);
        engine.keystroke('a', 0);
        let outcome = engine.advance(100);
        assert!(outcome.treated_as_error);
        assert!(!outcome.advanced);
        assert_eq!(engine.snapshot().current_input, "a ");
        let stats = engine.session_stats();
        assert_eq!(stats.incorrect_chars, 1);
        assert_eq!(stats.correct_chars + stats.incorrect_chars, stats.total_characters);
    }

    #[test]
    fn backspace_keeps_counters() {
        let mut engine = engine_with(&["ab"]);
        engine.keystroke('a', 0);
        assert!(engine.backspace().removed);
        assert!(!engine.backspace().removed);
        engine.keystroke('a', 0);
        assert_eq!(engine.session_stats().total_characters, 2);
        assert_eq!(engine.session_stats().correct_chars, 2);
    }

    #[test]
    fn completes_once_then_goes_quiet() {
        let mut engine = engine_with(&["a", "b"]);
        engine.keystroke('a', 0);
        let first = engine.advance(100);
        assert!(first.advanced && !first.round_complete);
        engine.keystroke('b', 100);
        let last = engine.advance(100);
        assert!(last.advanced && last.round_complete);
        assert_eq!(engine.state(), RoundState::Complete);
        assert_eq!(engine.advance(100), AdvanceOutcome::default());
        assert_eq!(engine.keystroke('b', 100), KeystrokeOutcome::default());
        assert_eq!(engine.session_stats().words_completed, 2);
    }
}
