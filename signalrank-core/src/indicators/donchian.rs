//! Donchian channel primitives — rolling extremes.
//!
//! rolling_max/rolling_min over a window ending at the current index.
//! Lookback: period - 1.

/// Rolling maximum, NaN-padded.
pub fn rolling_max(values: &[f64], period: usize) -> Vec<f64> {
    rolling_extreme(values, period, f64::max, f64::MIN)
}

/// Rolling minimum, NaN-padded.
pub fn rolling_min(values: &[f64], period: usize) -> Vec<f64> {
    rolling_extreme(values, period, f64::min, f64::MAX)
}

fn rolling_extreme(
    values: &[f64],
    period: usize,
    pick: fn(f64, f64) -> f64,
    init: f64,
) -> Vec<f64> {
    let n = values.len();
    let mut result = vec![f64::NAN; n];

    if period == 0 || n < period {
        return result;
    }

    for i in (period - 1)..n {
        let window = &values[i + 1 - period..=i];
        if window.iter().any(|v| v.is_nan()) {
            continue;
        }
        result[i] = window.iter().copied().fold(init, pick);
    }

    result
}
