//! Bar — the fundamental market data unit.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// OHLCV bar for a single asset at a single timestamp.
///
/// The same type serves the hourly and the daily series; the timeframe is a
/// property of the containing sequence, not of the bar. Volume is `f64`
/// because crypto venues report fractional base-asset volume.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bar {
    pub ts: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Bar {
    /// Returns true if any OHLC field is NaN (void bar).
    pub fn is_void(&self) -> bool {
        self.open.is_nan() || self.high.is_nan() || self.low.is_nan() || self.close.is_nan()
    }

    /// Basic OHLCV sanity check: high >= low, high >= open, high >= close, etc.
    pub fn is_sane(&self) -> bool {
        if self.is_void() {
            return false;
        }
        self.high >= self.low
            && self.high >= self.open
            && self.high >= self.close
            && self.low <= self.open
            && self.low <= self.close
            && self.open > 0.0
            && self.close > 0.0
            && self.volume >= 0.0
    }

    /// Typical price (HLC mean), the VWAP numerator term.
    pub fn typical_price(&self) -> f64 {
        (self.high + self.low + self.close) / 3.0
    }
}
