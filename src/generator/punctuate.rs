use rand::Rng;
use rand::seq::SliceRandom;

use crate::session::word::Word;

pub const PUNCTUATION_MARKS: [char; 6] = [',', '.', ';', ':', '!', '?'];

/// Append one random punctuation mark to every word except the last.
/// Marks never count toward the round's character budget.
pub fn apply_punctuation<R: Rng + ?Sized>(words: Vec<Word>, rng: &mut R) -> Vec<Word> {
    let last = words.len().saturating_sub(1);
    words
        .into_iter()
        .enumerate()
        .map(|(i, word)| {
            if i < last {
                let mark = *PUNCTUATION_MARKS.choose(rng).unwrap_or(&'.');
                word.with_punctuation(mark)
            } else {
                word
            }
        })
        .collect()
}
