use chrono::Utc;
use tracing::{info, warn};

use crate::engine::profile::LetterProfile;
use crate::engine::rhythm::RhythmStats;
use crate::error::StoreResult;
use crate::session::aggregates::RoundAggregates;
use crate::store::json_store::JsonStore;
use crate::store::schema::{HistoricalStats, SCHEMA_VERSION};

/// Which running totals the legacy repair backfilled.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RepairReport {
    pub wpm: bool,
    pub accuracy: bool,
    pub time: bool,
}

impl RepairReport {
    pub fn fired(&self) -> bool {
        self.wpm || self.accuracy || self.time
    }
}

/// Owns the cross-session history and folds finished rounds into it.
#[derive(Clone, Debug, Default)]
pub struct HistoricalAggregator {
    stats: HistoricalStats,
}

impl HistoricalAggregator {
    pub fn new(stats: HistoricalStats) -> Self {
        Self { stats }
    }

    /// Load history from `store`, degrading to an empty history on any read failure,
    /// then apply the legacy-totals repair.
    pub fn load(store: Option<&JsonStore>) -> Self {
        let stats = match store.map(JsonStore::load_history) {
            Some(Ok(Some(stats))) => stats,
            Some(Ok(None)) | None => HistoricalStats::default(),
            Some(Err(err)) => {
                warn!(error = %err, "could not read typing history, starting fresh");
                HistoricalStats::default()
            }
        };
        let (aggregator, _) = Self::repaired(stats);
        aggregator
    }

    pub fn repaired(mut stats: HistoricalStats) -> (Self, RepairReport) {
        let report = repair_legacy_totals(&mut stats);
        (Self { stats }, report)
    }

    pub fn stats(&self) -> &HistoricalStats {
        &self.stats
    }

    pub fn letter_profile(&self) -> LetterProfile {
        LetterProfile::new(self.stats.tables.letters.clone())
    }

    pub fn update_historical(&mut self, round: &RoundAggregates) {
        let stats = &mut self.stats;
        stats.schema_version = SCHEMA_VERSION;
        stats.total_sessions += 1;
        stats.last_session_date = Some(round.end_time.unwrap_or_else(Utc::now));

        stats.total_wpm += round.wpm;
        stats.total_accuracy += round.accuracy;
        stats.total_time_ms += round.duration_ms;

        if round.wpm > stats.best_wpm {
            stats.best_wpm = round.wpm;
        }
        if round.accuracy > stats.best_accuracy {
            stats.best_accuracy = round.accuracy;
        }
        if round.duration_ms > 0
            && stats.best_time_ms.is_none_or(|best| round.duration_ms < best)
        {
            stats.best_time_ms = Some(round.duration_ms);
        }

        stats.tables.merge(&round.tables);
        stats.rhythm.merge(&RhythmStats::from_samples(&round.seek_times));

        info!(
            sessions = stats.total_sessions,
            wpm = round.wpm,
            accuracy = round.accuracy,
            "round merged into history"
        );
    }

    pub fn average_wpm(&self) -> f64 {
        self.per_session(self.stats.total_wpm)
    }

    pub fn average_accuracy(&self) -> f64 {
        self.per_session(self.stats.total_accuracy)
    }

    pub fn average_time_ms(&self) -> f64 {
        self.per_session(self.stats.total_time_ms as f64)
    }

    fn per_session(&self, total: f64) -> f64 {
        if self.stats.total_sessions == 0 {
            return 0.0;
        }
        total / self.stats.total_sessions as f64
    }

    pub fn rhythm_std_dev(&self) -> f64 {
        self.stats.rhythm.std_dev()
    }

    pub fn persist(&self, store: &JsonStore) -> StoreResult<()> {
        store.save_history(&self.stats)
    }
}

/// Backfill running totals that older history files never recorded.
///
/// Only files written before the current schema are touched; history written
/// under `SCHEMA_VERSION` is returned unchanged. When sessions exist and a best is set but its running total is zero, or the
/// implied average is under half the best, the total is estimated as
/// `best × sessions`. This is an estimate, not a reconstruction. Idempotent: a
/// backfilled total averages exactly to the best. Never touches session counts
/// or bests.
pub fn repair_legacy_totals(stats: &mut HistoricalStats) -> RepairReport {
    let mut report = RepairReport::default();
    if !stats.is_legacy() {
        return report;
    }
    stats.schema_version = SCHEMA_VERSION;
    if stats.total_sessions == 0 {
        return report;
    }
    let sessions = stats.total_sessions as f64;

    if looks_truncated(stats.total_wpm, stats.best_wpm, sessions) {
        stats.total_wpm = stats.best_wpm * sessions;
        report.wpm = true;
    }
    if looks_truncated(stats.total_accuracy, stats.best_accuracy, sessions) {
        stats.total_accuracy = stats.best_accuracy * sessions;
        report.accuracy = true;
    }
    if let Some(best_time) = stats.best_time_ms {
        if looks_truncated(stats.total_time_ms as f64, best_time as f64, sessions) {
            stats.total_time_ms = best_time * stats.total_sessions;
            report.time = true;
        }
    }

    if report.fired() {
        warn!(
            sessions = stats.total_sessions,
            wpm = report.wpm,
            accuracy = report.accuracy,
            time = report.time,
            "history totals looked truncated, backfilled from bests"
        );
    }
    report
}

fn looks_truncated(total: f64, best: f64, sessions: f64) -> bool {
    if best <= 0.0 {
        return false;
    }
    total == 0.0 || total / sessions < best / 2.0
}
