use std::collections::BTreeMap;

use crate::engine::tables::LetterStat;

/// Read-only snapshot of per-letter presented/correct counts handed to the word selector.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LetterProfile {
    letters: BTreeMap<char, LetterStat>,
    max_presented: u64,
}

impl LetterProfile {
    pub fn new(letters: BTreeMap<char, LetterStat>) -> Self {
        let letters: BTreeMap<char, LetterStat> = letters
            .into_iter()
            .map(|(ch, mut stat)| {
                stat.correct = stat.correct.min(stat.presented);
                (ch, stat)
            })
            .collect();
        let max_presented = letters.values().map(|s| s.presented).max().unwrap_or(0);
        Self {
            letters,
            max_presented,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.letters.is_empty()
    }

    pub fn get(&self, letter: char) -> LetterStat {
        self.letters.get(&letter).copied().unwrap_or_default()
    }

    pub fn max_presented(&self) -> u64 {
        self.max_presented
    }
}

impl FromIterator<(char, LetterStat)> for LetterProfile {
    fn from_iter<I: IntoIterator<Item = (char, LetterStat)>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
