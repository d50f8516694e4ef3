//! Provider traits and structured error types.
//!
//! The provider traits abstract over data sources (file import, synthetic,
//! live feeds wired in by callers) so implementations can be swapped without
//! touching the scoring logic, and mocked in tests. Every provider error is
//! degradable: a failed lookup sends the affected prediction down the
//! neutral-score paths, never aborts the batch.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::resolver::AssetInfo;
use crate::domain::{Direction, MarketSnapshot};

/// Structured error types for provider operations.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("data unavailable: {0}")]
    Unavailable(String),

    #[error("provider call exceeded {budget_ms}ms budget")]
    Timeout { budget_ms: u64 },

    #[error("symbol not found on feed: {symbol}")]
    SymbolNotFound { symbol: String },

    #[error("malformed feed data: {0}")]
    Malformed(String),

    #[error("io error: {0}")]
    Io(String),
}

/// How much history a snapshot fetch should carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Lookback {
    pub hourly_bars: usize,
    pub daily_bars: usize,
}

impl Default for Lookback {
    fn default() -> Self {
        // Enough hourly history for the 240h bootstrap window and enough
        // daily history for 80 weekly bars after resampling.
        Self {
            hourly_bars: 1000,
            daily_bars: 400,
        }
    }
}

/// Market-data source: OHLCV history as of a timestamp.
///
/// The snapshot cache sits above this trait — providers don't know about it.
pub trait MarketDataProvider: Send + Sync {
    /// Human-readable name of this provider.
    fn name(&self) -> &str;

    /// Fetch hourly + daily bars for an asset, sliced to `as_of`.
    fn fetch(
        &self,
        asset: &AssetInfo,
        as_of: DateTime<Utc>,
        lookback: Lookback,
    ) -> Result<MarketSnapshot, DataError>;
}

/// Macro/sentiment alignment source.
pub trait FundamentalsProvider: Send + Sync {
    fn name(&self) -> &str;

    /// Alignment score in [0, 1] for the asset/direction as of a timestamp.
    fn score(
        &self,
        asset: &AssetInfo,
        direction: Direction,
        as_of: DateTime<Utc>,
    ) -> Result<f64, DataError>;
}

/// Order-book snapshot near the top of book.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderBookDepth {
    /// (price, quantity) levels, best bid first.
    pub bids: Vec<(f64, f64)>,
    /// (price, quantity) levels, best ask first.
    pub asks: Vec<(f64, f64)>,
    pub spot: f64,
}

/// Order-book depth source; optional collaborator, absence is never fatal.
pub trait DepthProvider: Send + Sync {
    fn name(&self) -> &str;

    fn depth(&self, asset: &AssetInfo) -> Result<OrderBookDepth, DataError>;
}
