//! Structural reliability — fixed-weight fusion of the independent
//! alignment signals.

use super::clamp01;
use crate::config::StructuralWeights;

/// Blend the four structural inputs into one score in [0, 1].
///
/// Callers substitute neutral 0.5 for inputs whose provider reported
/// unavailable (recorded in the breakdown's provenance flags) — a missing
/// input never enters as zero.
pub fn structural_reliability(
    weights: &StructuralWeights,
    momentum_alignment: f64,
    technical_alignment: f64,
    fundamental_score: f64,
    time_consistency: f64,
) -> f64 {
    clamp01(
        weights.momentum * momentum_alignment
            + weights.technical * technical_alignment
            + weights.fundamentals * fundamental_score
            + weights.time_consistency * time_consistency,
    )
}
