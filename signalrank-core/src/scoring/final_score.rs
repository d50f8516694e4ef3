//! Final reliability score — entry quality soft-adjusts the confidence
//! reliability without ever dominating it.

use super::clamp01;

/// `confidence_reliability · (0.7 + 0.3·entry_score)` when entry quality is
/// applicable; plain `confidence_reliability` otherwise.
///
/// The unavailability path deliberately bypasses the blend instead of
/// substituting a neutral entry score — predictions that omit entry details
/// keep their full confidence reliability. The multiplier never exceeds
/// 1.0, so `final <= confidence_reliability` always holds.
pub fn final_reliability(confidence_reliability: f64, entry_score: Option<f64>) -> f64 {
    match entry_score {
        Some(entry_score) => {
            clamp01(confidence_reliability * (0.7 + 0.3 * clamp01(entry_score)))
        }
        None => clamp01(confidence_reliability),
    }
}
