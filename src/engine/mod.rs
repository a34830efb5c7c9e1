pub mod history;
pub mod profile;
pub mod rhythm;
pub mod scoring;
pub mod tables;

pub use history::HistoricalAggregator;
pub use profile::LetterProfile;
