//! MACD histogram.
//!
//! MACD line = EMA(fast) - EMA(slow); signal = EMA(signal_period) of the
//! MACD line; histogram = MACD line - signal. The signal EMA seeds on the
//! first finite stretch of the MACD line (the `ema` kernel skips NaN
//! prefixes), so the histogram forms after slow + signal - 1 bars.

use super::ema::ema;

/// Rolling MACD histogram, NaN-padded.
pub fn macd_histogram(values: &[f64], fast: usize, slow: usize, signal: usize) -> Vec<f64> {
    let n = values.len();
    let mut result = vec![f64::NAN; n];

    if n == 0 || fast == 0 || slow == 0 || signal == 0 || fast >= slow {
        return result;
    }

    let ema_fast = ema(values, fast);
    let ema_slow = ema(values, slow);

    let macd_line: Vec<f64> = ema_fast
        .iter()
        .zip(ema_slow.iter())
        .map(|(&f, &s)| {
            if f.is_nan() || s.is_nan() {
                f64::NAN
            } else {
                f - s
            }
        })
        .collect();

    let signal_line = ema(&macd_line, signal);

    for i in 0..n {
        if !macd_line[i].is_nan() && !signal_line[i].is_nan() {
            result[i] = macd_line[i] - signal_line[i];
        }
    }

    result
}
