//! ADX — Average Directional Index (Wilder).
//!
//! Steps:
//! 1. Compute +DM and -DM from consecutive bars
//! 2. Smooth +DM, -DM, and TR using Wilder smoothing (alpha = 1/period)
//! 3. +DI = 100 * smoothed(+DM) / smoothed(TR), likewise -DI
//! 4. DX = 100 * |+DI - -DI| / (+DI + -DI)
//! 5. ADX = Wilder-smoothed DX
//!
//! Lookback: 2 * period (period for DI smoothing, then period for ADX smoothing).

use crate::domain::Bar;
use crate::indicators::atr::{true_range, wilder_smooth};

/// Rolling ADX over bars, NaN-padded. Values are in [0, 100].
pub fn adx(bars: &[Bar], period: usize) -> Vec<f64> {
    let n = bars.len();
    let result = vec![f64::NAN; n];

    if n < 2 || period == 0 {
        return result;
    }

    let mut plus_dm = vec![f64::NAN; n];
    let mut minus_dm = vec![f64::NAN; n];

    for i in 1..n {
        if bars[i].high.is_nan()
            || bars[i].low.is_nan()
            || bars[i - 1].high.is_nan()
            || bars[i - 1].low.is_nan()
        {
            continue;
        }
        let high_diff = bars[i].high - bars[i - 1].high;
        let low_diff = bars[i - 1].low - bars[i].low;

        plus_dm[i] = if high_diff > low_diff && high_diff > 0.0 {
            high_diff
        } else {
            0.0
        };
        minus_dm[i] = if low_diff > high_diff && low_diff > 0.0 {
            low_diff
        } else {
            0.0
        };
    }

    let tr = true_range(bars);
    let smooth_tr = wilder_smooth(&tr, period);
    let smooth_plus = wilder_smooth(&plus_dm, period);
    let smooth_minus = wilder_smooth(&minus_dm, period);

    let mut dx = vec![f64::NAN; n];
    for i in 0..n {
        if smooth_tr[i].is_nan()
            || smooth_plus[i].is_nan()
            || smooth_minus[i].is_nan()
            || smooth_tr[i] == 0.0
        {
            continue;
        }
        let plus_di = 100.0 * smooth_plus[i] / smooth_tr[i];
        let minus_di = 100.0 * smooth_minus[i] / smooth_tr[i];
        let di_sum = plus_di + minus_di;
        dx[i] = if di_sum == 0.0 {
            0.0
        } else {
            100.0 * (plus_di - minus_di).abs() / di_sum
        };
    }

    wilder_smooth(&dx, period)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn make_ohlc_bars(data: &[(f64, f64, f64, f64)]) -> Vec<Bar> {
        let base = chrono::Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        data.iter()
            .enumerate()
            .map(|(i, &(open, high, low, close))| Bar {
                ts: base + chrono::Duration::days(i as i64),
                open,
                high,
                low,
                close,
                volume: 1000.0,
            })
            .collect()
    }

    #[test]
    fn adx_bounds() {
        let bars = make_ohlc_bars(&[
            (100.0, 105.0, 95.0, 102.0),
            (102.0, 108.0, 100.0, 106.0),
            (106.0, 107.0, 98.0, 99.0),
            (99.0, 103.0, 97.0, 101.0),
            (101.0, 106.0, 100.0, 105.0),
            (105.0, 110.0, 103.0, 108.0),
            (108.0, 112.0, 106.0, 110.0),
            (110.0, 111.0, 104.0, 105.0),
            (105.0, 109.0, 103.0, 107.0),
            (107.0, 113.0, 105.0, 112.0),
        ]);
        let result = adx(&bars, 3);
        for (i, &v) in result.iter().enumerate() {
            if !v.is_nan() {
                assert!((0.0..=100.0).contains(&v), "ADX out of bounds at {i}: {v}");
            }
        }
    }

    #[test]
    fn adx_strong_trend_elevated() {
        let mut data = Vec::new();
        for i in 0..20 {
            let base = 100.0 + i as f64 * 5.0;
            data.push((base - 1.0, base + 3.0, base - 3.0, base + 2.0));
        }
        let bars = make_ohlc_bars(&data);
        let result = adx(&bars, 5);
        let last = result.iter().rev().find(|v| !v.is_nan());
        assert!(last.is_some());
        if let Some(&v) = last {
            assert!(v > 10.0, "ADX should be elevated in a strong trend, got {v}");
        }
    }

    #[test]
    fn adx_too_few_bars() {
        let bars = make_ohlc_bars(&[(100.0, 105.0, 95.0, 102.0)]);
        let result = adx(&bars, 3);
        assert!(result.iter().all(|v| v.is_nan()));
    }
}
