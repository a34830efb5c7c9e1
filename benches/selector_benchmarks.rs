use criterion::{Criterion, black_box, criterion_group, criterion_main};
use rand::SeedableRng;
use rand::rngs::SmallRng;

use tapwise::engine::LetterProfile;
use tapwise::engine::scoring::score_word;
use tapwise::engine::tables::LetterStat;
use tapwise::generator::{Dictionary, WordSelector};

fn skewed_profile() -> LetterProfile {
    ('a'..='z')
        .enumerate()
        .map(|(i, ch)| {
            let presented = 200 + (i as u64 * 37) % 400;
            let correct = presented - (i as u64 * 11) % 60;
            (ch, LetterStat { presented, correct })
        })
        .collect()
}

fn bench_select(c: &mut Criterion) {
    let selector = WordSelector::new(&Dictionary::load());
    let profile = skewed_profile();

    c.bench_function("select 30 words / 150 chars (empty profile)", |b| {
        let mut rng = SmallRng::seed_from_u64(1);
        b.iter(|| selector.select(black_box(30), black_box(150), &LetterProfile::default(), &mut rng))
    });

    c.bench_function("select 30 words / 150 chars (skewed profile)", |b| {
        let mut rng = SmallRng::seed_from_u64(1);
        b.iter(|| selector.select(black_box(30), black_box(150), &profile, &mut rng))
    });

    c.bench_function("select 50 words / 700 chars (skewed profile)", |b| {
        let mut rng = SmallRng::seed_from_u64(1);
        b.iter(|| selector.select(black_box(50), black_box(700), &profile, &mut rng))
    });
}

fn bench_score(c: &mut Criterion) {
    let dictionary = Dictionary::load();
    let profile = skewed_profile();

    c.bench_function("score every dictionary word", |b| {
        b.iter(|| {
            dictionary
                .words()
                .iter()
                .map(|w| score_word(black_box(w), &profile))
                .sum::<f64>()
        })
    });
}

criterion_group!(benches, bench_select, bench_score);
criterion_main!(benches);
