use serde::{Deserialize, Serialize};

const NEWTON_ITERATIONS: usize = 10;
/// Std-dev at which rhythm consistency bottoms out at zero.
const CONSISTENCY_FLOOR_MS: f64 = 200.0;

/// Running moments of inter-keystroke seek times. Integer sums keep merges exact.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RhythmStats {
    pub count: u64,
    pub sum_ms: u64,
    pub sum_squares: u64,
}

impl RhythmStats {
    pub fn from_samples(samples: &[u64]) -> Self {
        let mut stats = Self::default();
        for &sample in samples {
            stats.record(sample);
        }
        stats
    }

    pub fn record(&mut self, time_ms: u64) {
        self.count += 1;
        self.sum_ms += time_ms;
        self.sum_squares += time_ms * time_ms;
    }

    pub fn merge(&mut self, other: &RhythmStats) {
        self.count += other.count;
        self.sum_ms += other.sum_ms;
        self.sum_squares += other.sum_squares;
    }

    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            return 0.0;
        }
        self.sum_ms as f64 / self.count as f64
    }

    pub fn variance(&self) -> f64 {
        if self.count == 0 {
            return 0.0;
        }
        let mean = self.mean();
        (self.sum_squares as f64 / self.count as f64 - mean * mean).max(0.0)
    }

    pub fn std_dev(&self) -> f64 {
        newton_sqrt(self.variance())
    }

    /// 0-100 score, 100 for perfectly even rhythm.
    pub fn consistency(&self) -> f64 {
        (100.0 - self.std_dev() / CONSISTENCY_FLOOR_MS * 100.0).clamp(0.0, 100.0)
    }
}

/// Square root by fixed-iteration Newton refinement.
///
/// The seed halves the binary exponent, which lands within a factor of two of the
/// root, so ten iterations converge to full f64 precision.
pub fn newton_sqrt(value: f64) -> f64 {
    if value <= 0.0 || !value.is_finite() {
        return 0.0;
    }
    let mut x = f64::from_bits((value.to_bits() >> 1) + (1023u64 << 51));
    for _ in 0..NEWTON_ITERATIONS {
        x = 0.5 * (x + value / x);
    }
    x
}
