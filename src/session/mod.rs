pub mod aggregates;
pub mod input;
pub mod result;
pub mod state;
pub mod word;

pub use aggregates::RoundAggregates;
pub use result::{AdvanceOutcome, BackspaceOutcome, KeystrokeOutcome, RoundState, RoundSummary, Snapshot};
pub use state::SessionEngine;
pub use word::Word;
