//! MarketSnapshot — per-asset market history as of a timestamp.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Bar;

/// Immutable market history for one asset, sliced up to `as_of`.
///
/// Fetched once per `(canonical, as_of, lookback)` key and shared read-only
/// across scoring workers; never mutated after creation. Scoring engines
/// derive ATR/VWAP/momentum from the bar series via the indicator kernels.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketSnapshot {
    pub canonical: String,
    pub as_of: DateTime<Utc>,
    /// Hourly bars, ascending by timestamp, last bar at or before `as_of`.
    pub hourly: Vec<Bar>,
    /// Daily bars, ascending by timestamp.
    pub daily: Vec<Bar>,
    /// Last traded price as of the snapshot (last close when no live quote).
    pub spot: f64,
}

impl MarketSnapshot {
    /// Build a snapshot from bar series; spot falls back to the last daily
    /// close, then the last hourly close.
    pub fn from_bars(
        canonical: impl Into<String>,
        as_of: DateTime<Utc>,
        hourly: Vec<Bar>,
        daily: Vec<Bar>,
    ) -> Self {
        let spot = daily
            .last()
            .map(|b| b.close)
            .or_else(|| hourly.last().map(|b| b.close))
            .unwrap_or(f64::NAN);
        Self {
            canonical: canonical.into(),
            as_of,
            hourly,
            daily,
            spot,
        }
    }

    pub fn hourly_closes(&self) -> Vec<f64> {
        self.hourly.iter().map(|b| b.close).collect()
    }

    pub fn daily_closes(&self) -> Vec<f64> {
        self.daily.iter().map(|b| b.close).collect()
    }

    /// Weekly bars resampled from the daily series in 5-bar chunks, aligned
    /// so the last chunk ends on the last daily bar. Partial leading weeks
    /// are dropped.
    pub fn weekly(&self) -> Vec<Bar> {
        let n = self.daily.len();
        if n < 5 {
            return Vec::new();
        }
        let offset = n % 5;
        self.daily[offset..]
            .chunks_exact(5)
            .map(|week| Bar {
                ts: week[4].ts,
                open: week[0].open,
                high: week.iter().map(|b| b.high).fold(f64::MIN, f64::max),
                low: week.iter().map(|b| b.low).fold(f64::MAX, f64::min),
                close: week[4].close,
                volume: week.iter().map(|b| b.volume).sum(),
            })
            .collect()
    }

    /// True when the hourly history is deep enough for entry-quality work
    /// (the bootstrap needs a meaningful return sample behind it).
    pub fn has_usable_hourly(&self) -> bool {
        self.hourly.len() > 50 && self.spot.is_finite() && self.spot > 0.0
    }
}
