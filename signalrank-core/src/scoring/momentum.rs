//! Momentum alignment — agreement between prediction direction and
//! multi-horizon measured momentum, plus hourly time consistency.

use serde::{Deserialize, Serialize};

use super::clamp01;
use crate::domain::{Direction, MarketSnapshot};
use crate::indicators::roc::{last_roc, roc};

/// Multi-horizon momentum readings as fractional returns. A horizon whose
/// series is too short reads 0.0, matching a flat market for that horizon.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Momentums {
    pub m5h: f64,
    pub m10h: f64,
    pub m20h: f64,
    pub m5d: f64,
    pub m20d: f64,
    pub m40d: f64,
    pub m60d: f64,
}

/// Momentum readings plus the blended short/long-horizon signal.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MomentumSignal {
    pub momentums: Momentums,
    pub weighted: f64,
}

/// Derive the momentum signal from a snapshot.
///
/// Returns None when neither the hourly nor the daily series can support a
/// single momentum reading — the momentum input is then reported
/// unavailable and enters the structural blend as neutral.
pub fn momentum_signal(snapshot: &MarketSnapshot) -> Option<MomentumSignal> {
    let hourly = snapshot.hourly_closes();
    let daily = snapshot.daily_closes();

    if hourly.len() < 6 && daily.len() < 6 {
        return None;
    }

    let m = |closes: &[f64], period: usize| last_roc(closes, period).unwrap_or(0.0);
    let momentums = Momentums {
        m5h: m(&hourly, 5),
        m10h: m(&hourly, 10),
        m20h: m(&hourly, 20),
        m5d: m(&daily, 5),
        m20d: m(&daily, 20),
        m40d: m(&daily, 40),
        m60d: m(&daily, 60),
    };

    let weighted = 0.30 * momentums.m5h
        + 0.20 * momentums.m10h
        + 0.10 * momentums.m20h
        + 0.20 * momentums.m5d
        + 0.10 * momentums.m20d
        + 0.05 * momentums.m40d
        + 0.05 * momentums.m60d;

    Some(MomentumSignal { momentums, weighted })
}

/// Map weighted momentum and direction into an alignment score:
/// - momentum ~ 0 → 0.5 (neutral)
/// - aligned → 0.5..1, misaligned → 0..0.5, saturating with magnitude
pub fn momentum_alignment(direction: Direction, weighted: f64) -> f64 {
    if weighted.abs() < 1e-6 {
        return 0.5;
    }

    let strength = 1.0 - (-weighted.abs() * 20.0).exp();
    let aligned = weighted.signum() == direction.sign();

    if aligned {
        clamp01(0.5 + 0.5 * strength)
    } else {
        clamp01(0.5 - 0.5 * strength)
    }
}

/// Stability of short-horizon momentum: rolling 5-hour momentum over the
/// last 24 hourly closes, scored by exp(-cv) where cv = std/|mean| of the
/// rolling series. Steady momentum → near 1, choppy → near 0.
///
/// Needs at least 30 hourly closes; otherwise the input is unavailable.
pub fn time_consistency(hourly_closes: &[f64]) -> Option<f64> {
    if hourly_closes.len() < 30 {
        return None;
    }

    let tail = &hourly_closes[hourly_closes.len() - 24..];
    let series: Vec<f64> = roc(tail, 5)
        .into_iter()
        .filter(|v| v.is_finite())
        .collect();
    if series.len() < 2 {
        return None;
    }

    let n = series.len() as f64;
    let mean = series.iter().sum::<f64>() / n;
    let variance = series.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / (n - 1.0);
    let cv = variance.sqrt() / (mean.abs() + 1e-9);

    Some(clamp01((-cv).exp()))
}
