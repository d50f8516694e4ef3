//! Bollinger Bands — moving average +/- standard deviation multiplier.
//!
//! Uses population stddev (divide by N). Lookback: period - 1.

/// Upper/middle/lower band series, each NaN-padded.
#[derive(Debug, Clone)]
pub struct BollingerBands {
    pub upper: Vec<f64>,
    pub middle: Vec<f64>,
    pub lower: Vec<f64>,
}

/// Rolling Bollinger Bands over a close series.
pub fn bollinger(values: &[f64], period: usize, multiplier: f64) -> BollingerBands {
    let n = values.len();
    let mut upper = vec![f64::NAN; n];
    let mut middle = vec![f64::NAN; n];
    let mut lower = vec![f64::NAN; n];

    if period == 0 || n < period {
        return BollingerBands { upper, middle, lower };
    }

    for i in (period - 1)..n {
        let window = &values[i + 1 - period..=i];
        if window.iter().any(|v| v.is_nan()) {
            continue;
        }
        let mean = window.iter().sum::<f64>() / period as f64;
        let variance =
            window.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / period as f64;
        let stddev = variance.sqrt();

        middle[i] = mean;
        upper[i] = mean + multiplier * stddev;
        lower[i] = mean - multiplier * stddev;
    }

    BollingerBands { upper, middle, lower }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, DEFAULT_EPSILON};

    #[test]
    fn bollinger_middle_is_sma() {
        let bands = bollinger(&[10.0, 11.0, 12.0, 13.0, 14.0], 3, 2.0);
        assert!(bands.middle[1].is_nan());
        assert_approx(bands.middle[2], 11.0, DEFAULT_EPSILON);
        assert_approx(bands.middle[3], 12.0, DEFAULT_EPSILON);
    }

    #[test]
    fn bollinger_bands_symmetric() {
        let bands = bollinger(&[10.0, 11.0, 12.0, 13.0, 14.0], 3, 2.0);
        for i in 2..5 {
            let half_width = bands.upper[i] - bands.middle[i];
            assert_approx(bands.middle[i] - bands.lower[i], half_width, DEFAULT_EPSILON);
        }
    }

    #[test]
    fn bollinger_constant_price_zero_width() {
        let bands = bollinger(&[100.0, 100.0, 100.0, 100.0], 3, 2.0);
        assert_approx(bands.upper[2], 100.0, DEFAULT_EPSILON);
        assert_approx(bands.lower[2], 100.0, DEFAULT_EPSILON);
    }

    #[test]
    fn bollinger_nan_window_skipped() {
        let bands = bollinger(&[10.0, 11.0, f64::NAN, 13.0], 3, 2.0);
        assert!(bands.upper[2].is_nan());
        assert!(bands.upper[3].is_nan());
    }
}
