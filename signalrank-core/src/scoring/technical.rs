//! Technical bias — multi-timeframe trend bias and direction alignment.
//!
//! Per-timeframe bias in [-1, 1] blends RSI, MACD histogram, ATR-normalized
//! moving-average structure, price structure, and Donchian breakout
//! confirmation, amplified by ADX trend strength. Timeframes combine
//! daily-weighted (daily 0.60, hourly 0.25, weekly 0.15); unavailable
//! timeframes drop out with weight renormalization. Two daily-timeframe
//! factors damp the combined bias magnitude: volatility regime and
//! support/resistance proximity.

use serde::{Deserialize, Serialize};

use super::clamp01;
use crate::domain::{Bar, Direction, MarketSnapshot};
use crate::indicators::{
    adx, atr, bollinger, last_finite, macd_histogram, rolling_max, rolling_min, rsi, sma,
};
use crate::indicators::ema::ema;

const W_DAILY: f64 = 0.60;
const W_HOURLY: f64 = 0.25;
const W_WEEKLY: f64 = 0.15;

/// Minimum bars per timeframe before its trend bias is trusted.
const MIN_TREND_BARS: usize = 80;

/// Combined technical bias with per-timeframe components.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TechnicalSignal {
    /// Final combined bias in [-1, 1], after damping factors.
    pub bias: f64,
    pub hourly_bias: Option<f64>,
    pub daily_bias: Option<f64>,
    pub weekly_bias: Option<f64>,
    pub regime_factor: f64,
    pub sr_factor: f64,
}

/// Derive the technical signal from a snapshot.
///
/// Returns None when every timeframe lacks enough history — the technical
/// input is then reported unavailable (alignment neutral 0.5).
pub fn technical_signal(snapshot: &MarketSnapshot) -> Option<TechnicalSignal> {
    let weekly_bars = snapshot.weekly();

    let hourly_bias = trend_bias(&snapshot.hourly);
    let daily_bias = trend_bias(&snapshot.daily);
    let weekly_bias = trend_bias(&weekly_bars);

    let components = [
        (daily_bias, W_DAILY),
        (hourly_bias, W_HOURLY),
        (weekly_bias, W_WEEKLY),
    ];
    let total_weight: f64 = components
        .iter()
        .filter(|(b, _)| b.is_some())
        .map(|(_, w)| w)
        .sum();
    if total_weight == 0.0 {
        return None;
    }

    let combined: f64 = components
        .iter()
        .filter_map(|(b, w)| b.map(|bias| bias * w / total_weight))
        .sum();
    let combined = combined.clamp(-1.0, 1.0);

    // Damping factors come from the daily timeframe; with thin daily data
    // they fall back to their conservative defaults.
    let regime_factor = volatility_regime_factor(&snapshot.daily);
    let sr_factor = sr_proximity_factor(&snapshot.daily, combined);

    let bias = combined.signum() * (combined.abs() * regime_factor * sr_factor).min(1.0);

    Some(TechnicalSignal {
        bias: bias.clamp(-1.0, 1.0),
        hourly_bias,
        daily_bias,
        weekly_bias,
        regime_factor,
        sr_factor,
    })
}

/// Map a bias in [-1, 1] and a direction into alignment in [0, 1].
pub fn technical_alignment(direction: Direction, bias: f64) -> f64 {
    let b = bias.clamp(-1.0, 1.0);
    clamp01(0.5 + 0.5 * b * direction.sign())
}

/// Single-timeframe trend bias in [-1, 1]; None below MIN_TREND_BARS.
fn trend_bias(bars: &[Bar]) -> Option<f64> {
    if bars.len() < MIN_TREND_BARS {
        return None;
    }

    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    let highs: Vec<f64> = bars.iter().map(|b| b.high).collect();
    let lows: Vec<f64> = bars.iter().map(|b| b.low).collect();

    let latest_close = *closes.last()?;

    let rsi_last = last_finite(&rsi(&closes, 14))?;
    let macd_last = last_finite(&macd_histogram(&closes, 12, 26, 9))?;
    let sma20 = last_finite(&sma(&closes, 20))?;
    let sma50 = last_finite(&sma(&closes, 50))?;
    let ema20 = last_finite(&ema(&closes, 20))?;
    let ema50 = last_finite(&ema(&closes, 50))?;

    let atr_last = last_finite(&atr(bars, 14)).unwrap_or(0.0);
    let atr_safe = atr_last.max(1e-9);

    let rsi_bias = ((rsi_last - 50.0) / 50.0).clamp(-1.0, 1.0);
    let macd_bias = (macd_last * 5.0).tanh();
    let sma_bias = ((sma20 - sma50) / atr_safe * 0.8).tanh();
    let ema_bias = ((ema20 - ema50) / atr_safe * 0.8).tanh();
    let price_structure = ((latest_close - sma50) / atr_safe * 0.6).tanh();

    // Light breakout confirmation: close beyond the previous bar's
    // 20-bar Donchian channel.
    let mut breakout_bias = 0.0;
    if bars.len() >= 22 {
        let donch_high = rolling_max(&highs, 20);
        let donch_low = rolling_min(&lows, 20);
        let prev = bars.len() - 2;
        if donch_high[prev].is_finite() && latest_close > donch_high[prev] {
            breakout_bias = 1.0;
        } else if donch_low[prev].is_finite() && latest_close < donch_low[prev] {
            breakout_bias = -1.0;
        }
    }

    let raw_bias = (0.10 * rsi_bias
        + 0.30 * macd_bias
        + 0.20 * sma_bias
        + 0.20 * ema_bias
        + 0.10 * price_structure
        + 0.10 * breakout_bias)
        .clamp(-1.0, 1.0);

    // Trend strength amplifier (ADX)
    let adx_last = last_finite(&adx(bars, 14)).unwrap_or(0.0);
    let adx_strength = (adx_last / 40.0).clamp(0.0, 1.0);
    let strength_factor = 0.4 + 0.6 * adx_strength;

    Some((raw_bias * strength_factor).clamp(-1.0, 1.0))
}

/// Volatility regime damping in [0.55, 1.0].
///
/// Lower in quiet/choppy regimes (thin ATR%, narrow Bollinger bands) where
/// trend signals carry less information; defaults to 0.85 with < 60 bars.
fn volatility_regime_factor(daily: &[Bar]) -> f64 {
    if daily.len() < 60 {
        return 0.85;
    }

    let closes: Vec<f64> = daily.iter().map(|b| b.close).collect();
    let latest_close = match closes.last() {
        Some(&c) if c.is_finite() && c != 0.0 => c,
        _ => return 0.85,
    };

    let atr_last = last_finite(&atr(daily, 14)).unwrap_or(0.0);
    let atrp = atr_last / latest_close.abs();

    let bands = bollinger(&closes, 20, 2.0);
    let (bb_high, bb_low) = match (last_finite(&bands.upper), last_finite(&bands.lower)) {
        (Some(h), Some(l)) => (h, l),
        _ => return 0.85,
    };
    let bbw = (bb_high - bb_low) / latest_close.abs();

    let atrp_q = ((atrp - 0.001) / 0.010).clamp(0.0, 1.0);
    let bbw_q = ((bbw - 0.002) / 0.020).clamp(0.0, 1.0);

    let quality = 0.5 * atrp_q + 0.5 * bbw_q;
    (0.55 + 0.45 * quality).clamp(0.55, 1.0)
}

/// Support/resistance proximity damping in [0.60, 1.0].
///
/// Damps bias magnitude when price sits close to the opposing 60-bar
/// extreme: bullish bias near resistance, bearish bias near support.
fn sr_proximity_factor(daily: &[Bar], bias: f64) -> f64 {
    const LOOKBACK: usize = 60;
    if daily.len() < LOOKBACK + 5 || bias == 0.0 {
        return 1.0;
    }

    let atr_last = last_finite(&atr(daily, 14)).unwrap_or(0.0);
    let atr_safe = atr_last.max(1e-9);

    let tail = &daily[daily.len() - LOOKBACK..];
    let recent_high = tail.iter().map(|b| b.high).fold(f64::MIN, f64::max);
    let recent_low = tail.iter().map(|b| b.low).fold(f64::MAX, f64::min);
    let last = match daily.last() {
        Some(b) if b.close.is_finite() => b.close,
        _ => return 1.0,
    };

    let proximity_penalty = |dist_atr: f64| -> f64 {
        if dist_atr <= 0.0 {
            return 0.40;
        }
        (0.40 * (1.0 - dist_atr.min(2.0) / 2.0)).clamp(0.0, 0.40)
    };

    let penalty = if bias > 0.0 {
        proximity_penalty((recent_high - last) / atr_safe)
    } else {
        proximity_penalty((last - recent_low) / atr_safe)
    };

    (1.0 - penalty).clamp(0.60, 1.0)
}
