//! Rolling VWAP over the trailing window of bars.
//!
//! VWAP = sum(typical_price * volume) / sum(volume) over the last `window`
//! bars; falls back to the mean typical price when total volume is zero
//! (indices and forex feeds often carry no volume).

use crate::domain::Bar;

/// VWAP of the last `window` bars, or None when fewer bars are available.
pub fn rolling_vwap(bars: &[Bar], window: usize) -> Option<f64> {
    if window == 0 || bars.len() < window {
        return None;
    }
    let tail = &bars[bars.len() - window..];
    if tail.iter().any(|b| b.is_void()) {
        return None;
    }

    let total_volume: f64 = tail.iter().map(|b| b.volume).sum();
    if total_volume <= 0.0 {
        let mean_tp = tail.iter().map(|b| b.typical_price()).sum::<f64>() / window as f64;
        return Some(mean_tp);
    }

    let weighted: f64 = tail.iter().map(|b| b.typical_price() * b.volume).sum();
    Some(weighted / total_volume)
}
