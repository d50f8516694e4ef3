//! Confidence reliability — user-stated confidence weighted by structural
//! evidence.

use super::clamp01;
use crate::domain::ValidationError;

/// `confidence · structural_reliability`, clamped to [0, 1].
///
/// Confidence outside [0, 1] is a record-level validation failure: the
/// prediction is excluded from ranking with the reason recorded, never
/// silently scored.
pub fn confidence_reliability(
    confidence: f64,
    structural_reliability: f64,
) -> Result<f64, ValidationError> {
    if !confidence.is_finite() {
        return Err(ValidationError::NonFiniteField { field: "confidence" });
    }
    if !(0.0..=1.0).contains(&confidence) {
        return Err(ValidationError::ConfidenceOutOfRange { value: confidence });
    }
    Ok(clamp01(confidence * structural_reliability))
}
