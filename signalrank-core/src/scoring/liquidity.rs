//! Liquidity proxy — order-book depth near the entry price.
//!
//! Measures how much of the consumable side's top-of-book quantity sits
//! within a tight band around the entry. Longs consume asks, shorts consume
//! bids. Neutral 0.5 whenever the book can't answer the question: entry too
//! far from spot, empty side, or no depth source at all.

use super::clamp01;
use crate::data::OrderBookDepth;
use crate::domain::Direction;

/// Band half-width around the entry, in basis points.
const BAND_BPS: f64 = 25.0;
/// Levels counted toward the side's total quantity.
const TOP_LEVELS: usize = 200;

/// Depth-based liquidity score in [0, 1].
pub fn liquidity_score(depth: &OrderBookDepth, entry: f64, direction: Direction) -> f64 {
    if !entry.is_finite() || !depth.spot.is_finite() || depth.spot <= 0.0 {
        return 0.5;
    }

    // Entry far from the current market: the book says nothing useful
    let dist_pct = (entry - depth.spot).abs() / depth.spot;
    if dist_pct > 0.01 {
        return 0.5;
    }

    if depth.bids.is_empty() || depth.asks.is_empty() {
        return 0.5;
    }

    let band = entry * (BAND_BPS / 10_000.0);
    let (lo, hi) = (entry - band, entry + band);
    let near_qty = |levels: &[(f64, f64)]| -> f64 {
        levels
            .iter()
            .filter(|(p, _)| (lo..=hi).contains(p))
            .map(|(_, q)| q)
            .sum()
    };

    let top_n = TOP_LEVELS.min(depth.bids.len()).min(depth.asks.len());
    let total_bid: f64 = depth.bids[..top_n].iter().map(|(_, q)| q).sum();
    let total_ask: f64 = depth.asks[..top_n].iter().map(|(_, q)| q).sum();

    let raw_frac = match direction {
        Direction::Long => near_qty(&depth.asks) / total_ask.max(1e-9),
        Direction::Short => near_qty(&depth.bids) / total_bid.max(1e-9),
    };

    clamp01(1.0 - (-raw_frac * 80.0).exp())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn book(spot: f64, levels: usize, qty: f64) -> OrderBookDepth {
        let tick = spot * 1e-4;
        OrderBookDepth {
            bids: (1..=levels).map(|i| (spot - tick * i as f64, qty)).collect(),
            asks: (1..=levels).map(|i| (spot + tick * i as f64, qty)).collect(),
            spot,
        }
    }

    #[test]
    fn deep_near_entry_scores_high() {
        // 200 uniform levels, band covers 25 of them on each side → frac
        // ~12% of the ask side → 1 - exp(-80·0.12) ≈ 1
        let depth = book(100.0, 200, 5.0);
        let s = liquidity_score(&depth, 100.0, Direction::Long);
        assert!(s > 0.99, "got {s}");
    }

    #[test]
    fn entry_far_from_spot_is_neutral() {
        let depth = book(100.0, 200, 5.0);
        assert_eq!(liquidity_score(&depth, 102.0, Direction::Long), 0.5);
    }

    #[test]
    fn empty_side_is_neutral() {
        let mut depth = book(100.0, 200, 5.0);
        depth.asks.clear();
        assert_eq!(liquidity_score(&depth, 100.0, Direction::Long), 0.5);
    }

    #[test]
    fn thin_band_scores_lower_than_thick_band() {
        // Same totals, but all quantity pushed outside the band
        let mut thin = book(100.0, 200, 5.0);
        for (p, _) in thin.asks.iter_mut().take(30) {
            *p += 1.0; // shove the nearest levels out of the 25 bps band
        }
        let thick = book(100.0, 200, 5.0);
        let s_thin = liquidity_score(&thin, 100.0, Direction::Long);
        let s_thick = liquidity_score(&thick, 100.0, Direction::Long);
        assert!(s_thin < s_thick, "thin={s_thin} thick={s_thick}");
    }

    #[test]
    fn short_reads_bid_side() {
        let mut depth = book(100.0, 200, 5.0);
        depth.bids.clear();
        // Short needs bids; empty bids → neutral
        assert_eq!(liquidity_score(&depth, 100.0, Direction::Short), 0.5);
    }
}
