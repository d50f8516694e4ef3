//! SignalRank Runner — batch orchestration over the core scoring engines.
//!
//! Loads and validates prediction batches, prefetches market data and
//! fundamentals concurrently, scores every prediction as an independent
//! rayon work unit, then ranks and selects deterministically after the
//! barrier. Exports the full ranked output and the selected subset as CSV
//! and JSON.

pub mod export;
pub mod loader;
pub mod pipeline;
pub mod providers;
pub mod selector;

pub use export::save_outputs;
pub use loader::{load_predictions_json, LoadedPredictions, RejectedPrediction};
pub use pipeline::{score_batch, PipelineError, Providers};
pub use providers::{CsvMarketData, FixedFundamentals};
pub use selector::{rank_and_select, GateFailure, RankedResult, RankedRow, ScoredPrediction};
