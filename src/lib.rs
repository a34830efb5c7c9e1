//! Adaptive typing-practice core: word selection weighted toward weak letters,
//! a keystroke-level round engine, and merged cross-session statistics.

pub mod config;
pub mod engine;
pub mod error;
pub mod generator;
pub mod keyboard;
pub mod registry;
pub mod session;
pub mod store;

pub use config::Config;
pub use engine::HistoricalAggregator;
pub use error::{StoreError, StoreResult};
pub use registry::SessionRegistry;
pub use session::SessionEngine;
