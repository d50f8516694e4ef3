//! File-backed providers — CSV bar import and fixed fundamentals.
//!
//! `CsvMarketData` reads per-asset bar files from a directory:
//! `{CANONICAL}_1h.csv` and `{CANONICAL}_1d.csv`, each with a
//! `ts,open,high,low,close,volume` header and RFC3339 timestamps. Bars after
//! the requested as-of are sliced away, so a stored dataset can serve any
//! historical scoring run.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use signalrank_core::data::{
    AssetInfo, DataError, FundamentalsProvider, Lookback, MarketDataProvider,
};
use signalrank_core::domain::{Bar, Direction, MarketSnapshot};

/// Market-data provider backed by a directory of CSV bar files.
pub struct CsvMarketData {
    dir: PathBuf,
}

impl CsvMarketData {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn series_path(&self, canonical: &str, suffix: &str) -> PathBuf {
        self.dir.join(format!("{canonical}_{suffix}.csv"))
    }

    fn load_series(
        &self,
        canonical: &str,
        suffix: &str,
        as_of: DateTime<Utc>,
        max_bars: usize,
    ) -> Result<Vec<Bar>, DataError> {
        let path = self.series_path(canonical, suffix);
        if !path.exists() {
            return Err(DataError::Unavailable(format!(
                "no {suffix} series for {canonical}"
            )));
        }
        let mut bars = read_bars_csv(&path)?;
        bars.retain(|b| b.ts <= as_of);
        bars.sort_by_key(|b| b.ts);
        if bars.len() > max_bars {
            bars.drain(..bars.len() - max_bars);
        }
        Ok(bars)
    }
}

impl MarketDataProvider for CsvMarketData {
    fn name(&self) -> &str {
        "csv-import"
    }

    fn fetch(
        &self,
        asset: &AssetInfo,
        as_of: DateTime<Utc>,
        lookback: Lookback,
    ) -> Result<MarketSnapshot, DataError> {
        let hourly = self.load_series(&asset.canonical, "1h", as_of, lookback.hourly_bars);
        let daily = self.load_series(&asset.canonical, "1d", as_of, lookback.daily_bars);

        // One missing timeframe degrades; both missing means the asset has
        // no data here at all.
        match (hourly, daily) {
            (Err(_), Err(e)) => Err(e),
            (hourly, daily) => Ok(MarketSnapshot::from_bars(
                asset.canonical.clone(),
                as_of,
                hourly.unwrap_or_default(),
                daily.unwrap_or_default(),
            )),
        }
    }
}

/// Parse a bar CSV file: header `ts,open,high,low,close,volume`.
fn read_bars_csv(path: &Path) -> Result<Vec<Bar>, DataError> {
    let mut reader = csv::Reader::from_path(path)
        .map_err(|e| DataError::Io(format!("{}: {e}", path.display())))?;

    let mut bars = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| DataError::Malformed(format!("{}: {e}", path.display())))?;
        if record.len() < 6 {
            return Err(DataError::Malformed(format!(
                "{}: expected 6 columns, got {}",
                path.display(),
                record.len()
            )));
        }

        let ts = DateTime::parse_from_rfc3339(&record[0])
            .map_err(|e| DataError::Malformed(format!("bad timestamp '{}': {e}", &record[0])))?
            .with_timezone(&Utc);
        let parse = |i: usize, field: &str| -> Result<f64, DataError> {
            record[i]
                .trim()
                .parse::<f64>()
                .map_err(|_| DataError::Malformed(format!("bad {field} '{}'", &record[i])))
        };

        let bar = Bar {
            ts,
            open: parse(1, "open")?,
            high: parse(2, "high")?,
            low: parse(3, "low")?,
            close: parse(4, "close")?,
            volume: parse(5, "volume")?,
        };
        if bar.is_sane() {
            bars.push(bar);
        }
    }

    Ok(bars)
}

/// Fundamentals provider with a flat default and per-asset overrides.
///
/// Stands in for a live macro/sentiment service in offline runs and tests;
/// assets without an override read the default.
pub struct FixedFundamentals {
    default: f64,
    overrides: HashMap<String, f64>,
}

impl FixedFundamentals {
    pub fn new(default: f64) -> Self {
        Self {
            default: default.clamp(0.0, 1.0),
            overrides: HashMap::new(),
        }
    }

    pub fn with_override(mut self, canonical: impl Into<String>, score: f64) -> Self {
        self.overrides.insert(canonical.into(), score.clamp(0.0, 1.0));
        self
    }
}

impl FundamentalsProvider for FixedFundamentals {
    fn name(&self) -> &str {
        "fixed-fundamentals"
    }

    fn score(
        &self,
        asset: &AssetInfo,
        _direction: Direction,
        _as_of: DateTime<Utc>,
    ) -> Result<f64, DataError> {
        Ok(self
            .overrides
            .get(&asset.canonical)
            .copied()
            .unwrap_or(self.default))
    }
}
