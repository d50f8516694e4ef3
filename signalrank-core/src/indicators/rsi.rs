//! Relative Strength Index (RSI).
//!
//! Uses Wilder smoothing of average gains and average losses.
//! RSI = 100 - 100 / (1 + avg_gain / avg_loss)
//! Edge cases: avg_loss == 0 → RSI = 100; avg_gain == 0 → RSI = 0.

/// Rolling RSI over a close series, NaN-padded.
pub fn rsi(values: &[f64], period: usize) -> Vec<f64> {
    let n = values.len();
    let mut result = vec![f64::NAN; n];

    if period == 0 || n < period + 1 {
        return result;
    }

    let mut changes = vec![f64::NAN; n];
    for i in 1..n {
        if values[i].is_nan() || values[i - 1].is_nan() {
            changes[i] = f64::NAN;
        } else {
            changes[i] = values[i] - values[i - 1];
        }
    }

    // Seed: average gain/loss over the first `period` changes
    let mut avg_gain = 0.0;
    let mut avg_loss = 0.0;
    for &ch in &changes[1..=period] {
        if ch.is_nan() {
            return result;
        }
        if ch > 0.0 {
            avg_gain += ch;
        } else {
            avg_loss -= ch;
        }
    }
    avg_gain /= period as f64;
    avg_loss /= period as f64;

    result[period] = rsi_value(avg_gain, avg_loss);

    let alpha = 1.0 / period as f64;
    for i in (period + 1)..n {
        if changes[i].is_nan() {
            for val in result.iter_mut().skip(i) {
                *val = f64::NAN;
            }
            return result;
        }
        let gain = changes[i].max(0.0);
        let loss = (-changes[i]).max(0.0);
        avg_gain = alpha * gain + (1.0 - alpha) * avg_gain;
        avg_loss = alpha * loss + (1.0 - alpha) * avg_loss;
        result[i] = rsi_value(avg_gain, avg_loss);
    }

    result
}

fn rsi_value(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 && avg_gain == 0.0 {
        50.0 // no movement
    } else if avg_loss == 0.0 {
        100.0
    } else if avg_gain == 0.0 {
        0.0
    } else {
        100.0 - 100.0 / (1.0 + avg_gain / avg_loss)
    }
}
