//! Asset resolver — raw symbol to canonical asset and data-source mapping.
//!
//! The registry maps canonical keys to asset metadata; the alias table folds
//! venue-specific spellings (BTCUSDT, BTC-USD, EURUSD=X, ^GSPC, GC=F, ...)
//! onto canonical keys. Unknown 1-5 letter alphabetic symbols fall through
//! as stocks so a batch with an unlisted ticker still scores.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Broad asset class; selects which data sources apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetClass {
    Crypto,
    Forex,
    Metal,
    Index,
    Stock,
}

/// Resolved asset metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetInfo {
    pub canonical: String,
    pub class: AssetClass,
    /// Symbol understood by the market-data feed for this asset.
    pub feed_symbol: String,
    /// Order-book depth symbol; only crypto venues expose one.
    pub depth_symbol: Option<String>,
}

#[derive(Debug, Clone, Error)]
pub enum ResolveError {
    #[error("unknown asset symbol '{symbol}'")]
    NotFound { symbol: String },
}

/// Canonical asset registry with alias normalization.
#[derive(Debug, Clone)]
pub struct AssetResolver {
    registry: HashMap<String, AssetInfo>,
    aliases: HashMap<String, String>,
}

impl AssetResolver {
    /// Registry with the built-in asset table.
    pub fn new() -> Self {
        let mut registry = HashMap::new();
        let mut insert = |canonical: &str, class: AssetClass, feed: &str, depth: Option<&str>| {
            registry.insert(
                canonical.to_string(),
                AssetInfo {
                    canonical: canonical.to_string(),
                    class,
                    feed_symbol: feed.to_string(),
                    depth_symbol: depth.map(str::to_string),
                },
            );
        };

        // Crypto
        insert("BTC", AssetClass::Crypto, "BTC-USD", Some("BTCUSDT"));
        insert("ETH", AssetClass::Crypto, "ETH-USD", Some("ETHUSDT"));
        insert("SOL", AssetClass::Crypto, "SOL-USD", Some("SOLUSDT"));

        // Forex
        insert("EURUSD", AssetClass::Forex, "EURUSD=X", None);
        insert("GBPUSD", AssetClass::Forex, "GBPUSD=X", None);
        insert("USDJPY", AssetClass::Forex, "USDJPY=X", None);

        // Metals
        insert("XAUUSD", AssetClass::Metal, "GC=F", None);
        insert("XAGUSD", AssetClass::Metal, "SI=F", None);

        // Indices
        insert("SP500", AssetClass::Index, "^GSPC", None);
        insert("NASDAQ", AssetClass::Index, "^IXIC", None);
        insert("DAX", AssetClass::Index, "^GDAXI", None);
        insert("NIKKEI", AssetClass::Index, "^N225", None);

        // Common stocks
        for sym in ["AAPL", "NVDA", "TSLA", "MSFT", "AMZN"] {
            insert(sym, AssetClass::Stock, sym, None);
        }

        let aliases = [
            // crypto variants
            ("BTCUSDT", "BTC"),
            ("ETHUSDT", "ETH"),
            ("SOLUSDT", "SOL"),
            ("BTC-USD", "BTC"),
            ("ETH-USD", "ETH"),
            ("SOL-USD", "SOL"),
            // forex variants
            ("EURUSD=X", "EURUSD"),
            ("GBPUSD=X", "GBPUSD"),
            ("USDJPY=X", "USDJPY"),
            // index variants
            ("^GSPC", "SP500"),
            ("^SPX", "SP500"),
            ("^IXIC", "NASDAQ"),
            ("^GDAXI", "DAX"),
            ("^N225", "NIKKEI"),
            // metal variants
            ("GC=F", "XAUUSD"),
            ("XAU/USD", "XAUUSD"),
            ("XAU-USD", "XAUUSD"),
            ("SI=F", "XAGUSD"),
            ("XAG/USD", "XAGUSD"),
            ("XAG-USD", "XAGUSD"),
        ]
        .into_iter()
        .map(|(a, c)| (a.to_string(), c.to_string()))
        .collect();

        Self { registry, aliases }
    }

    /// Resolve a raw symbol into asset metadata.
    pub fn resolve(&self, raw: &str) -> Result<AssetInfo, ResolveError> {
        let raw_up = raw.trim().to_ascii_uppercase();
        let cleaned = raw_up.replace([' ', '/', '-'], "");

        let mut key = if let Some(c) = self.aliases.get(&raw_up) {
            c.clone()
        } else if let Some(c) = self.aliases.get(&cleaned) {
            c.clone()
        } else {
            cleaned
        };

        // Crypto pairs like BTCUSDT resolve without an explicit alias
        if key.ends_with("USDT") && !self.registry.contains_key(&key) {
            let base = key.trim_end_matches("USDT").to_string();
            if matches!(self.registry.get(&base), Some(info) if info.class == AssetClass::Crypto) {
                key = base;
            }
        }

        if let Some(info) = self.registry.get(&key) {
            return Ok(info.clone());
        }

        // Unlisted plain ticker: treat as a stock so the batch still scores
        if !key.is_empty()
            && key.len() <= 5
            && key.chars().all(|c| c.is_ascii_alphabetic())
        {
            return Ok(AssetInfo {
                canonical: key.clone(),
                class: AssetClass::Stock,
                feed_symbol: key,
                depth_symbol: None,
            });
        }

        Err(ResolveError::NotFound {
            symbol: raw.to_string(),
        })
    }
}

impl Default for AssetResolver {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_canonical_crypto() {
        let r = AssetResolver::new();
        let info = r.resolve("BTC").unwrap();
        assert_eq!(info.canonical, "BTC");
        assert_eq!(info.class, AssetClass::Crypto);
        assert_eq!(info.depth_symbol.as_deref(), Some("BTCUSDT"));
    }

    #[test]
    fn resolves_usdt_pair_to_base() {
        let r = AssetResolver::new();
        assert_eq!(r.resolve("BTCUSDT").unwrap().canonical, "BTC");
        assert_eq!(r.resolve("btcusdt").unwrap().canonical, "BTC");
    }

    #[test]
    fn resolves_dashed_and_feed_style_aliases() {
        let r = AssetResolver::new();
        assert_eq!(r.resolve("BTC-USD").unwrap().canonical, "BTC");
        assert_eq!(r.resolve("EURUSD=X").unwrap().canonical, "EURUSD");
        assert_eq!(r.resolve("^GSPC").unwrap().canonical, "SP500");
        assert_eq!(r.resolve("GC=F").unwrap().canonical, "XAUUSD");
        assert_eq!(r.resolve("XAU/USD").unwrap().canonical, "XAUUSD");
    }

    #[test]
    fn unknown_short_ticker_falls_back_to_stock() {
        let r = AssetResolver::new();
        let info = r.resolve("SHOP").unwrap();
        assert_eq!(info.canonical, "SHOP");
        assert_eq!(info.class, AssetClass::Stock);
        assert!(info.depth_symbol.is_none());
    }

    #[test]
    fn unknown_long_symbol_is_not_found() {
        let r = AssetResolver::new();
        assert!(r.resolve("TOOLONGSYM").is_err());
        assert!(r.resolve("123ABC").is_err());
        assert!(r.resolve("").is_err());
    }

    #[test]
    fn registered_stock_keeps_class() {
        let r = AssetResolver::new();
        assert_eq!(r.resolve("NVDA").unwrap().class, AssetClass::Stock);
    }
}
