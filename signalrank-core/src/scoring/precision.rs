//! Precision and realism scores — smooth decay functions of ATR-distance.
//!
//! No hard thresholds: each score is a Gaussian-shaped decay around a sweet
//! spot in ATR units, optionally anchored to VWAP. Non-finite inputs score
//! neutral 0.5 (graceful degradation, never fatal).

use super::clamp01;
use crate::domain::Direction;

/// Entry precision in [0, 1] — best when the entry is realistic and not
/// chasing the market.
///
/// Distance from spot is measured in ATR units with a sweet spot at 0.6 ATR;
/// entries past spot in the trade direction (chasing) are penalized ×0.6;
/// a VWAP anchor blends in when available (0.75 base / 0.25 anchor).
pub fn entry_precision_score(
    spot: f64,
    entry: f64,
    atr: f64,
    vwap: Option<f64>,
    direction: Direction,
) -> f64 {
    if !spot.is_finite() || !entry.is_finite() {
        return 0.5;
    }
    let atr = atr.max(1e-9);

    let z = (entry - spot).abs() / atr;
    let z0 = 0.6;
    let k = 1.8;
    let mut base = (-k * (z - z0) * (z - z0)).exp();

    let chasing = match direction {
        Direction::Long => entry > spot,
        Direction::Short => entry < spot,
    };
    if chasing {
        base *= 0.6;
    }

    if let Some(vwap) = vwap.filter(|v| v.is_finite()) {
        let vw_z = (entry - vwap).abs() / atr;
        let vwap_anchor = (-1.2 * vw_z * vw_z).exp();
        base = 0.75 * base + 0.25 * vwap_anchor;
    }

    clamp01(base)
}

/// Target precision in [0, 1] — realism of the implied target relative to
/// ENTRY (not spot).
///
/// A target behind the trade direction scores 0.05; the sweet spot sits at
/// 0.8 ATR of directional distance; a light VWAP anchor (0.85/0.15) blends
/// in when available.
pub fn target_precision_score(
    entry: f64,
    target: f64,
    atr: f64,
    vwap: Option<f64>,
    direction: Direction,
) -> f64 {
    if !entry.is_finite() || !target.is_finite() {
        return 0.5;
    }
    let atr = atr.max(1e-9);

    let dz = match direction {
        Direction::Long => (target - entry) / atr,
        Direction::Short => (entry - target) / atr,
    };
    if dz < 0.0 {
        return 0.05;
    }

    let z0 = 0.8;
    let k = 1.1;
    let mut base = (-k * (dz - z0) * (dz - z0)).exp();

    if let Some(vwap) = vwap.filter(|v| v.is_finite()) {
        let vw_z = (target - vwap).abs() / atr;
        let vwap_anchor = (-0.6 * vw_z * vw_z).exp();
        base = 0.85 * base + 0.15 * vwap_anchor;
    }

    clamp01(base)
}

/// Move realism in [0, 1] — plausibility of move_pct given realized
/// volatility and horizon.
///
/// The expected move over the horizon scales as daily ATR% · sqrt(h/24);
/// realism decays as exp(-(move/expected)²), so "+5% in one hour" on a
/// quiet asset scores near zero while typical moves score near one.
pub fn move_realism_score(spot: f64, atr_daily: f64, move_pct: f64, horizon_hours: u32) -> f64 {
    let move_pct = move_pct.abs();
    if !spot.is_finite() || !atr_daily.is_finite() || !move_pct.is_finite() || spot <= 0.0 {
        return 0.5;
    }

    let atr_pct = (atr_daily / spot).max(1e-9);
    let expected = atr_pct * (horizon_hours.max(1) as f64 / 24.0).sqrt();
    let ratio = move_pct / expected.max(1e-9);

    clamp01((-(ratio * ratio)).exp())
}
