//! Data layer — asset resolution, provider traits, snapshot cache, synthetic sources.

pub mod cache;
pub mod provider;
pub mod resolver;
pub mod synthetic;

pub use cache::{SnapshotCache, SnapshotKey};
pub use provider::{
    DataError, DepthProvider, FundamentalsProvider, Lookback, MarketDataProvider, OrderBookDepth,
};
pub use resolver::{AssetClass, AssetInfo, AssetResolver, ResolveError};
pub use synthetic::{SyntheticDepth, SyntheticFundamentals, SyntheticMarketData};
