//! Synthetic data sources — deterministic, seed-derived, offline.
//!
//! Used by tests and by offline demo runs. Bar series are geometric random
//! walks whose sub-seed is derived from (master seed, canonical, series
//! label) with BLAKE3, so two runs with the same seed produce identical
//! snapshots regardless of fetch order.

use chrono::{DateTime, Duration, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::provider::{
    DataError, DepthProvider, FundamentalsProvider, Lookback, MarketDataProvider, OrderBookDepth,
};
use super::resolver::AssetInfo;
use crate::domain::{Bar, Direction, MarketSnapshot};

/// Deterministic synthetic market-data source.
#[derive(Debug, Clone)]
pub struct SyntheticMarketData {
    seed: u64,
    /// Per-hour drift applied to the walk (0.0 = driftless).
    hourly_drift: f64,
    /// Per-hour return noise amplitude.
    hourly_vol: f64,
}

impl SyntheticMarketData {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            hourly_drift: 0.0,
            hourly_vol: 0.004,
        }
    }

    /// Trending variant for tests that need a directional series.
    pub fn with_drift(mut self, hourly_drift: f64) -> Self {
        self.hourly_drift = hourly_drift;
        self
    }

    pub fn with_vol(mut self, hourly_vol: f64) -> Self {
        self.hourly_vol = hourly_vol;
        self
    }

    fn sub_rng(&self, canonical: &str, label: &str) -> StdRng {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&self.seed.to_le_bytes());
        hasher.update(canonical.as_bytes());
        hasher.update(label.as_bytes());
        let hash = hasher.finalize();
        let seed = u64::from_le_bytes(hash.as_bytes()[..8].try_into().expect("8 bytes"));
        StdRng::seed_from_u64(seed)
    }

    /// Base price varies per asset so multi-asset batches look plausible.
    fn base_price(&self, canonical: &str) -> f64 {
        let hash = blake3::hash(canonical.as_bytes());
        let raw = u64::from_le_bytes(hash.as_bytes()[..8].try_into().expect("8 bytes"));
        50.0 + (raw % 10_000) as f64
    }

    fn walk(
        &self,
        canonical: &str,
        label: &str,
        count: usize,
        step: Duration,
        step_vol: f64,
        step_drift: f64,
        end: DateTime<Utc>,
    ) -> Vec<Bar> {
        let mut rng = self.sub_rng(canonical, label);
        let mut price = self.base_price(canonical);
        let start = end - step * count as i32;

        (0..count)
            .map(|i| {
                let ret = step_drift + step_vol * (rng.gen::<f64>() * 2.0 - 1.0);
                let open = price;
                let close = price * (1.0 + ret);
                let spread = price * step_vol * 0.5;
                let high = open.max(close) + spread * rng.gen::<f64>();
                let low = (open.min(close) - spread * rng.gen::<f64>()).max(price * 0.5);
                price = close;
                Bar {
                    ts: start + step * (i as i32 + 1),
                    open,
                    high,
                    low,
                    close,
                    volume: 500.0 + 1000.0 * rng.gen::<f64>(),
                }
            })
            .collect()
    }
}

impl MarketDataProvider for SyntheticMarketData {
    fn name(&self) -> &str {
        "synthetic"
    }

    fn fetch(
        &self,
        asset: &AssetInfo,
        as_of: DateTime<Utc>,
        lookback: Lookback,
    ) -> Result<MarketSnapshot, DataError> {
        let hourly = self.walk(
            &asset.canonical,
            "hourly",
            lookback.hourly_bars,
            Duration::hours(1),
            self.hourly_vol,
            self.hourly_drift,
            as_of,
        );
        // Daily series scales the hourly parameters by sqrt(24) / 24h
        let daily = self.walk(
            &asset.canonical,
            "daily",
            lookback.daily_bars,
            Duration::days(1),
            self.hourly_vol * (24.0f64).sqrt(),
            self.hourly_drift * 24.0,
            as_of,
        );
        Ok(MarketSnapshot::from_bars(
            asset.canonical.clone(),
            as_of,
            hourly,
            daily,
        ))
    }
}

/// Fixed-score fundamentals source.
#[derive(Debug, Clone)]
pub struct SyntheticFundamentals {
    score: f64,
}

impl SyntheticFundamentals {
    pub fn new(score: f64) -> Self {
        Self {
            score: score.clamp(0.0, 1.0),
        }
    }
}

impl FundamentalsProvider for SyntheticFundamentals {
    fn name(&self) -> &str {
        "synthetic-fundamentals"
    }

    fn score(
        &self,
        _asset: &AssetInfo,
        _direction: Direction,
        _as_of: DateTime<Utc>,
    ) -> Result<f64, DataError> {
        Ok(self.score)
    }
}

/// Symmetric synthetic order book around a mid price.
#[derive(Debug, Clone)]
pub struct SyntheticDepth {
    mid: f64,
    levels: usize,
}

impl SyntheticDepth {
    pub fn new(mid: f64) -> Self {
        Self { mid, levels: 200 }
    }
}

impl DepthProvider for SyntheticDepth {
    fn name(&self) -> &str {
        "synthetic-depth"
    }

    fn depth(&self, asset: &AssetInfo) -> Result<OrderBookDepth, DataError> {
        if asset.depth_symbol.is_none() {
            return Err(DataError::Unavailable(format!(
                "no depth feed for {}",
                asset.canonical
            )));
        }
        let tick = self.mid * 1e-4; // one basis point per level
        let bids = (1..=self.levels)
            .map(|i| (self.mid - tick * i as f64, 10.0 / i as f64))
            .collect();
        let asks = (1..=self.levels)
            .map(|i| (self.mid + tick * i as f64, 10.0 / i as f64))
            .collect();
        Ok(OrderBookDepth {
            bids,
            asks,
            spot: self.mid,
        })
    }
}
