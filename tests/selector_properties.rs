use std::sync::OnceLock;

use proptest::prelude::*;
use rand::SeedableRng;
use rand::rngs::SmallRng;

use tapwise::engine::LetterProfile;
use tapwise::engine::scoring::{MIN_WORD_SCORE, score_word};
use tapwise::engine::tables::{AggregateTables, LetterStat};
use tapwise::generator::{Dictionary, WordSelector};

fn selector() -> &'static WordSelector {
    static SELECTOR: OnceLock<WordSelector> = OnceLock::new();
    SELECTOR.get_or_init(|| WordSelector::new(&Dictionary::load()))
}

// --- STRATEGIES ---

prop_compose! {
    fn arb_budget()(words in 5usize..=50)(
        words in Just(words),
        chars in words..=words * 15
    ) -> (usize, usize) {
        (words, chars)
    }
}

prop_compose! {
    fn arb_profile()(
        stats in proptest::collection::btree_map(
            proptest::char::range('a', 'z'),
            (0u64..500, 0u64..500),
            0..26,
        )
    ) -> LetterProfile {
        stats
            .into_iter()
            .map(|(ch, (presented, correct))| (ch, LetterStat { presented, correct: correct.min(presented) }))
            .collect()
    }
}

#[derive(Clone, Debug)]
enum Strike {
    Presented(char),
    Correct(char, u64),
    Seek(char, char, u64),
    Miss(char, char),
    Transition(bool),
}

fn arb_strike() -> impl Strategy<Value = Strike> {
    let letter = || proptest::char::range('a', 'z');
    prop_oneof![
        letter().prop_map(Strike::Presented),
        (letter(), 0u64..5000).prop_map(|(ch, t)| Strike::Correct(ch, t)),
        (letter(), letter(), 1u64..5000).prop_map(|(a, b, t)| Strike::Seek(a, b, t)),
        (letter(), letter()).prop_map(|(a, b)| Strike::Miss(a, b)),
        any::<bool>().prop_map(Strike::Transition),
    ]
}

fn tables_from(strikes: &[Strike]) -> AggregateTables {
    let mut tables = AggregateTables::default();
    for strike in strikes {
        match *strike {
            Strike::Presented(ch) => tables.record_presented(ch),
            Strike::Correct(ch, t) => tables.record_correct(ch, t),
            Strike::Seek(a, b, t) => {
                tables.record_letter_seek(b, t);
                tables.record_bigram_seek(a, b, t);
                if tapwise::keyboard::finger::is_same_finger_bigram(a, b) {
                    tables.record_same_finger_bigram(t);
                }
            }
            Strike::Miss(expected, typed) => tables.record_error_substitution(expected, typed),
            Strike::Transition(alternated) => tables.record_hand_transition(alternated),
        }
    }
    tables
}

// --- PROPERTIES ---

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn selection_hits_exact_count_and_length(
        (words, chars) in arb_budget(),
        profile in arb_profile(),
        seed in any::<u64>(),
    ) {
        let mut rng = SmallRng::seed_from_u64(seed);
        let picked = selector().select(words, chars, &profile, &mut rng);
        prop_assert_eq!(picked.len(), words);
        prop_assert_eq!(picked.iter().map(|w| w.chars().count()).sum::<usize>(), chars);
    }

    #[test]
    fn scores_stay_in_range(profile in arb_profile(), index in any::<prop::sample::Index>()) {
        let words = Dictionary::load();
        let word = index.get(words.words());
        prop_assert_eq!(score_word(word, &LetterProfile::default()), 1.0);
        let score = score_word(word, &profile);
        prop_assert!((MIN_WORD_SCORE..=1.0).contains(&score), "score {} for {}", score, word);
    }

    #[test]
    fn table_merge_is_commutative(
        a in proptest::collection::vec(arb_strike(), 0..60),
        b in proptest::collection::vec(arb_strike(), 0..60),
    ) {
        let (ta, tb) = (tables_from(&a), tables_from(&b));

        let mut ab = AggregateTables::default();
        ab.merge(&ta);
        ab.merge(&tb);
        let mut ba = AggregateTables::default();
        ba.merge(&tb);
        ba.merge(&ta);
        prop_assert_eq!(&ab, &ba);

        let mut combined = a.clone();
        combined.extend(b.iter().cloned());
        prop_assert_eq!(&ab, &tables_from(&combined));
    }
}
