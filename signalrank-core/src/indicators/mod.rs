//! Indicator kernels.
//!
//! All kernels are pure series functions: NaN-padded `Vec<f64>` in, NaN-padded
//! `Vec<f64>` out, with the same NaN-propagation conventions throughout — a
//! NaN inside a seed window taints the output from that point on. Bar-based
//! kernels (ATR, ADX, VWAP, Donchian) take `&[Bar]` slices directly.

pub mod adx;
pub mod atr;
pub mod bollinger;
pub mod donchian;
pub mod ema;
pub mod macd;
pub mod roc;
pub mod rsi;
pub mod sma;
pub mod vwap;

pub use adx::adx;
pub use atr::{atr, true_range, wilder_smooth};
pub use bollinger::{bollinger, BollingerBands};
pub use donchian::{rolling_max, rolling_min};
pub use ema::ema;
pub use macd::macd_histogram;
pub use roc::roc;
pub use rsi::rsi;
pub use sma::sma;
pub use vwap::rolling_vwap;

/// Last finite value of a series, if any.
pub fn last_finite(values: &[f64]) -> Option<f64> {
    values.iter().rev().copied().find(|v| v.is_finite())
}

/// Create synthetic bars from close prices for testing.
///
/// Generates plausible OHLCV: open = prev close (or close for the first bar),
/// high = max(open, close) + 1.0, low = min(open, close) - 1.0, volume = 1000.
#[cfg(test)]
pub fn make_bars(closes: &[f64]) -> Vec<crate::domain::Bar> {
    use crate::domain::Bar;
    use chrono::TimeZone;
    let base = chrono::Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            let high = open.max(close) + 1.0;
            let low = open.min(close) - 1.0;
            Bar {
                ts: base + chrono::Duration::hours(i as i64),
                open,
                high,
                low,
                close,
                volume: 1000.0,
            }
        })
        .collect()
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_finite_skips_nan_tail() {
        assert_eq!(last_finite(&[1.0, 2.0, f64::NAN]), Some(2.0));
        assert_eq!(last_finite(&[f64::NAN, f64::NAN]), None);
        assert_eq!(last_finite(&[]), None);
    }
}
