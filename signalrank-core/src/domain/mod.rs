//! Domain types — predictions, bars, snapshots, score breakdowns.

pub mod bar;
pub mod breakdown;
pub mod prediction;
pub mod snapshot;

pub use bar::Bar;
pub use breakdown::{EntryQuality, Provenance, ReliabilityLabel, ScoreBreakdown};
pub use prediction::{Direction, Prediction, ValidationError};
pub use snapshot::MarketSnapshot;
