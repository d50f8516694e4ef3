//! Entry-quality engine — how executable the predicted entry and move are.
//!
//! Applicable only when the prediction carries entry details AND the
//! snapshot has a usable hourly history; everything else bypasses the
//! engine entirely (the final multiplier becomes 1.0, not a neutral blend),
//! so predictions without entry details are never penalized for omitting
//! them.

use rand::rngs::StdRng;

use super::bootstrap::BootstrapEngine;
use super::clamp01;
use super::liquidity::liquidity_score;
use super::precision::{entry_precision_score, move_realism_score, target_precision_score};
use crate::config::ScoringConfig;
use crate::data::OrderBookDepth;
use crate::domain::{Direction, EntryQuality, MarketSnapshot, Prediction};
use crate::indicators::{atr, last_finite, rolling_vwap};
use crate::rng::SeedHierarchy;

/// Implied target price from entry and predicted move:
/// long → entry·(1+|move|), short → entry·(1-|move|).
pub fn implied_target_price(entry: f64, move_pct: f64, direction: Direction) -> f64 {
    let mp = move_pct.abs();
    match direction {
        Direction::Long => entry * (1.0 + mp),
        Direction::Short => entry * (1.0 - mp),
    }
}

/// Score the entry/target quality of one prediction.
///
/// Returns None when not applicable (entry details absent or market data
/// unusable). Bootstrap draws are seeded from the prediction identity, one
/// stream per estimate, so re-scoring reproduces the same numbers.
pub fn score_entry(
    prediction: &Prediction,
    snapshot: &MarketSnapshot,
    depth: Option<&OrderBookDepth>,
    config: &ScoringConfig,
    seeds: &SeedHierarchy,
) -> Option<EntryQuality> {
    let entry = prediction.entry_price?;
    let horizon = prediction.horizon_hours?;

    if !snapshot.has_usable_hourly() {
        return None;
    }

    let direction = prediction.direction;
    let spot = snapshot.spot;
    let hourly_closes = snapshot.hourly_closes();

    // Daily ATR anchors the precision/realism scores; thin daily history
    // falls back to 1% of spot.
    let atr_daily = last_finite(&atr(&snapshot.daily, 14))
        .filter(|a| *a > 0.0)
        .unwrap_or(spot.abs() * 0.01);
    let vwap_24h = rolling_vwap(&snapshot.hourly, 24);

    let identity = prediction.identity_hash();
    let engine = BootstrapEngine::new(&hourly_closes, spot, &config.bootstrap);

    let p_touch = match &engine {
        Some(engine) => {
            let mut rng: StdRng = seeds.rng_for(&identity, "p_touch");
            engine.p_touch(entry, horizon, direction, &mut rng)
        }
        None => 0.5,
    };

    let entry_precision = entry_precision_score(spot, entry, atr_daily, vwap_24h, direction);

    let liquidity = depth
        .map(|d| liquidity_score(d, entry, direction))
        .unwrap_or(0.5);

    // Target-dependent sub-scores only exist when a move was predicted.
    let (p_reach_target, target_precision, move_realism, target_price) = match prediction.move_pct {
        Some(move_pct) => {
            let target = implied_target_price(entry, move_pct, direction);

            let p_reach = match &engine {
                Some(engine) => {
                    // Pre-trade but entry-aware: blend reach-from-spot with
                    // reach-from-entry, not conditional on a fill.
                    let mut rng_spot: StdRng = seeds.rng_for(&identity, "p_reach_target_spot");
                    let from_spot = engine.p_reach(target, spot, horizon, direction, &mut rng_spot);
                    let mut rng_entry: StdRng = seeds.rng_for(&identity, "p_reach_target_entry");
                    let from_entry =
                        engine.p_reach(target, entry, horizon, direction, &mut rng_entry);
                    clamp01(0.60 * from_spot + 0.40 * from_entry)
                }
                None => 0.5,
            };

            let t_prec = target_precision_score(entry, target, atr_daily, vwap_24h, direction);
            let realism = move_realism_score(spot, atr_daily, move_pct, horizon);

            (Some(p_reach), Some(t_prec), Some(realism), Some(target))
        }
        None => (None, None, None, None),
    };

    let entry_score = blend(
        config,
        p_touch,
        p_reach_target,
        entry_precision,
        target_precision,
        move_realism,
        liquidity,
    );

    Some(EntryQuality {
        p_touch,
        p_reach_target,
        entry_precision,
        target_precision,
        move_realism,
        liquidity,
        target_price,
        entry_score,
    })
}

/// Weighted blend of the sub-scores. Absent target-dependent terms are
/// excluded and the remaining weights renormalized.
fn blend(
    config: &ScoringConfig,
    p_touch: f64,
    p_reach_target: Option<f64>,
    entry_precision: f64,
    target_precision: Option<f64>,
    move_realism: Option<f64>,
    liquidity: f64,
) -> f64 {
    let w = &config.entry;
    let mut terms = vec![
        (clamp01(p_touch), w.p_touch),
        (clamp01(entry_precision), w.entry_precision),
        (clamp01(liquidity), w.liquidity),
    ];
    if let Some(p) = p_reach_target {
        terms.push((clamp01(p), w.p_reach_target));
    }
    if let Some(t) = target_precision {
        terms.push((clamp01(t), w.target_precision));
    }
    if let Some(r) = move_realism {
        terms.push((clamp01(r), w.move_realism));
    }

    let total_weight: f64 = terms.iter().map(|(_, w)| w).sum();
    if total_weight <= 0.0 {
        return 0.5;
    }
    clamp01(terms.iter().map(|(s, w)| s * w).sum::<f64>() / total_weight)
}
