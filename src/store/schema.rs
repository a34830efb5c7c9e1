use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::engine::rhythm::RhythmStats;
use crate::engine::tables::AggregateTables;

pub const SCHEMA_VERSION: u32 = 2;

/// Durable union of every finished round plus bests and running totals.
///
/// Every field defaults when absent so older or newer files still load. Files
/// written before versioning carry no `schema_version` and read back as 0.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoricalStats {
    #[serde(default)]
    pub schema_version: u32,
    pub total_sessions: u64,
    pub last_session_date: Option<DateTime<Utc>>,
    pub best_wpm: f64,
    pub best_accuracy: f64,
    pub best_time_ms: Option<u64>,
    pub total_wpm: f64,
    pub total_accuracy: f64,
    pub total_time_ms: u64,
    pub tables: AggregateTables,
    pub rhythm: RhythmStats,
}

impl Default for HistoricalStats {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            total_sessions: 0,
            last_session_date: None,
            best_wpm: 0.0,
            best_accuracy: 0.0,
            best_time_ms: None,
            total_wpm: 0.0,
            total_accuracy: 0.0,
            total_time_ms: 0,
            tables: AggregateTables::default(),
            rhythm: RhythmStats::default(),
        }
    }
}

impl HistoricalStats {
    pub fn is_legacy(&self) -> bool {
        self.schema_version < SCHEMA_VERSION
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_history_is_current_schema() {
        let stats = HistoricalStats::default();
        assert_eq!(stats.schema_version, SCHEMA_VERSION);
        assert!(!stats.is_legacy());
    }

    #[test]
    fn missing_fields_default() {
        let stats: HistoricalStats =
            serde_json::from_str(r#"{"best_wpm": 61.5, "total_sessions": 4}"#).unwrap();
        assert_eq!(stats.best_wpm, 61.5);
        assert_eq!(stats.total_sessions, 4);
        assert_eq!(stats.total_wpm, 0.0);
        assert_eq!(stats.schema_version, 0);
        assert!(stats.is_legacy());
        assert!(stats.tables.letters.is_empty());
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let stats: HistoricalStats =
            serde_json::from_str(r#"{"total_sessions": 1, "favourite_colour": "teal"}"#).unwrap();
        assert_eq!(stats.total_sessions, 1);
    }
}
