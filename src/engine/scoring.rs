use rand::Rng;

use crate::engine::profile::LetterProfile;

/// Floor on a word's weight so every candidate stays reachable.
pub const MIN_WORD_SCORE: f64 = 0.1;

const UNSEEN_ERROR_SCORE: f64 = 0.5;

/// Weight a word by how rare and how error-prone its letters are for this user.
///
/// Each letter contributes the mean of a rarity score (`1 - presented / max presented`)
/// and an error score (`1 - correct / presented`, or 0.5 when never presented). The
/// letter scores are averaged over the word. An empty profile weights every word 1.0.
pub fn score_word(word: &str, profile: &LetterProfile) -> f64 {
    if profile.is_empty() || profile.max_presented() == 0 {
        return 1.0;
    }
    let len = word.chars().count();
    if len == 0 {
        return MIN_WORD_SCORE;
    }

    let max_presented = profile.max_presented() as f64;
    let total: f64 = word
        .chars()
        .map(|ch| {
            let stat = profile.get(ch);
            let rarity = 1.0 - stat.presented as f64 / max_presented;
            let error = if stat.presented > 0 {
                1.0 - stat.correct as f64 / stat.presented as f64
            } else {
                UNSEEN_ERROR_SCORE
            };
            (rarity + error) / 2.0
        })
        .sum();

    (total / len as f64).max(MIN_WORD_SCORE)
}

/// Draw one candidate with probability proportional to its score.
pub fn weighted_pick<'a, R: Rng + ?Sized>(
    candidates: &[&'a str],
    profile: &LetterProfile,
    rng: &mut R,
) -> Option<&'a str> {
    match candidates {
        [] => return None,
        [only] => return Some(*only),
        _ => {}
    }

    let scores: Vec<f64> = candidates.iter().map(|w| score_word(w, profile)).collect();
    let total: f64 = scores.iter().sum();

    let target = rng.gen_range(0.0..total);
    let mut cumulative = 0.0;
    for (word, score) in candidates.iter().zip(&scores) {
        cumulative += score;
        if cumulative >= target {
            return Some(*word);
        }
    }

    candidates.last().copied()
}
