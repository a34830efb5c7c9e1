use anyhow::Result;
use clap::{Parser, Subcommand};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use tapwise::config::Config;
use tapwise::engine::HistoricalAggregator;
use tapwise::generator::dictionary::Dictionary;
use tapwise::generator::punctuate::apply_punctuation;
use tapwise::generator::selector::WordSelector;
use tapwise::keyboard::{Finger, Hand, Row};
use tapwise::session::Word;

#[derive(Parser)]
#[command(name = "tapwise", version, about = "Adaptive typing practice core")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the stored cross-session statistics
    Stats {
        #[arg(short, long, default_value_t = 5, help = "Rows per ranked table")]
        top: usize,
    },
    /// Print a word list weighted by the stored letter profile
    Words {
        #[arg(short, long, help = "Number of words")]
        words: Option<usize>,
        #[arg(short, long, help = "Total letters across all words")]
        chars: Option<usize>,
        #[arg(short, long, help = "Seed for a reproducible list")]
        seed: Option<u64>,
        #[arg(short, long, help = "Append punctuation to every word but the last")]
        punctuation: bool,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::load()?;

    match cli.command {
        Command::Stats { top } => print_stats(&load_history(&config), top),
        Command::Words {
            words,
            chars,
            seed,
            punctuation,
        } => {
            let mut config = config;
            if let Some(words) = words {
                config.words_per_round = words;
            }
            if let Some(chars) = chars {
                config.chars_per_round = chars;
            }
            config.punctuation_mode |= punctuation;
            config.validate();
            print_words(config, seed);
        }
    }
    Ok(())
}

fn load_history(config: &Config) -> HistoricalAggregator {
    let store = config
        .history_store()
        .inspect_err(|err| warn!(error = %err, "history location unavailable"))
        .ok();
    HistoricalAggregator::load(store.as_ref())
}

fn print_words(config: Config, seed: Option<u64>) {
    let profile = load_history(&config).letter_profile();
    let selector = WordSelector::new(&Dictionary::load());
    let mut rng = match seed {
        Some(seed) => SmallRng::seed_from_u64(seed),
        None => SmallRng::from_entropy(),
    };

    let picked = selector.select(
        config.words_per_round,
        config.chars_per_round,
        &profile,
        &mut rng,
    );
    let mut words: Vec<Word> = picked.into_iter().map(Word::new).collect();
    if config.punctuation_mode {
        words = apply_punctuation(words, &mut rng);
    }
    let line: Vec<String> = words.iter().map(Word::display_text).collect();
    println!("{}", line.join(" "));
}

fn print_stats(history: &HistoricalAggregator, top: usize) {
    let stats = history.stats();
    if stats.total_sessions == 0 {
        println!("No rounds recorded yet.");
        return;
    }

    println!("Sessions:        {}", stats.total_sessions);
    if let Some(date) = stats.last_session_date {
        println!("Last session:    {}", date.format("%Y-%m-%d %H:%M"));
    }
    println!(
        "WPM:             {:.1} avg, {:.1} best",
        history.average_wpm(),
        stats.best_wpm
    );
    println!(
        "Accuracy:        {:.1}% avg, {:.1}% best",
        history.average_accuracy(),
        stats.best_accuracy
    );
    let best_time = stats
        .best_time_ms
        .map(|ms| format!("{:.1}s", ms as f64 / 1000.0))
        .unwrap_or_else(|| "-".to_string());
    println!(
        "Round time:      {:.1}s avg, {} best",
        history.average_time_ms() / 1000.0,
        best_time
    );
    println!(
        "Rhythm:          {:.0}ms std dev, {:.0}/100 consistency",
        stats.rhythm.std_dev(),
        stats.rhythm.consistency()
    );

    let tables = &stats.tables;
    if let Some((left, right)) = tables.hand_balance() {
        println!("Hand balance:    {left:.0}% left / {right:.0}% right");
    }
    if let Some(rate) = tables.hand_alternation_rate() {
        println!("Alternation:     {rate:.0}%");
    }
    println!(
        "Same-finger:     {} bigrams, {:.0}ms avg",
        tables.same_finger_bigrams.count,
        tables.same_finger_bigram_average_ms()
    );

    println!("\nSlowest letters:");
    for (letter, ms) in tables.slowest_letters(top) {
        println!("  {letter}  {ms:>6.0}ms  {:>5.1}%", tables.letter_accuracy(letter));
    }
    println!("\nSlowest bigrams:");
    for (bigram, ms) in tables.slowest_bigrams(top) {
        println!("  {bigram}  {ms:>6.0}ms");
    }
    println!("\nMost common errors:");
    for pair in tables.top_errors(top) {
        println!("  {} -> {}  x{}", pair.expected, pair.typed, pair.count);
    }

    println!("\nFingers:");
    for finger in Finger::ALL {
        let stat = tables.finger(finger);
        println!(
            "  {:<13} {:>5.1}%  {:>6.0}ms",
            finger.label(),
            stat.accuracy(),
            stat.average_ms()
        );
    }
    println!("\nHands:");
    for hand in Hand::ALL {
        let stat = tables.hand(hand);
        println!("  {:<13} {:>5.1}%  {:>6.0}ms", hand.label(), stat.accuracy(), stat.average_ms());
    }
    println!("\nRows:");
    for row in Row::ALL {
        let stat = tables.row(row);
        println!("  {:<13} {:>5.1}%  {:>6.0}ms", row.label(), stat.accuracy(), stat.average_ms());
    }
}
