use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundState {
    #[default]
    Idle,
    InProgress,
    Complete,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct KeystrokeOutcome {
    pub correct: bool,
    /// Set on exactly one keystroke per round: the first correct character.
    pub timer_started: bool,
    /// Index within the current word the keystroke landed on.
    pub position: usize,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct BackspaceOutcome {
    pub removed: bool,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct AdvanceOutcome {
    pub advanced: bool,
    pub round_complete: bool,
    pub treated_as_error: bool,
}

/// Read-only view of the round for a presentation layer.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Snapshot {
    pub state: RoundState,
    pub words: Vec<String>,
    pub current_word_index: usize,
    pub current_input: String,
    pub timer_started: bool,
    pub punctuation_mode: bool,
    /// 1-based, for "word 3 of 30" style display.
    pub word_number: usize,
    pub total_words: usize,
    pub current_word: Option<String>,
    pub previous_word: Option<String>,
    pub next_words: Vec<String>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct RoundSummary {
    pub wpm: f64,
    pub accuracy: f64,
    pub duration_ms: u64,
    pub new_best_wpm: bool,
    pub new_best_accuracy: bool,
    pub new_best_time: bool,
}
