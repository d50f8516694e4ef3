//! Prediction — a directional call with stated confidence.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Direction of a prediction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Long,
    Short,
}

impl Direction {
    /// Parse loose user input: BUY/LONG → Long, SELL/SHORT → Short.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "BUY" | "LONG" => Some(Direction::Long),
            "SELL" | "SHORT" => Some(Direction::Short),
            _ => None,
        }
    }

    /// +1.0 for long, -1.0 for short.
    pub fn sign(&self) -> f64 {
        match self {
            Direction::Long => 1.0,
            Direction::Short => -1.0,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Long => write!(f, "long"),
            Direction::Short => write!(f, "short"),
        }
    }
}

/// Record-level validation failures.
///
/// A failed record is excluded from ranking with the reason recorded; the
/// batch continues; a bad record is never batch-fatal.
#[derive(Debug, Clone, Error)]
pub enum ValidationError {
    #[error("missing asset symbol")]
    MissingAsset,

    #[error("confidence {value} outside [0, 1]")]
    ConfidenceOutOfRange { value: f64 },

    #[error("horizon must be positive, got {value}")]
    NonPositiveHorizon { value: i64 },

    #[error("{field} is not a finite number")]
    NonFiniteField { field: &'static str },

    #[error("unrecognized direction '{raw}'")]
    UnknownDirection { raw: String },

    #[error("missing issued_at timestamp")]
    MissingTimestamp,
}

/// A market prediction as loaded from the input batch.
///
/// Immutable once constructed. Identity = (asset, issued_at, source); the
/// identity hash seeds the bootstrap resampler so re-scoring the same
/// prediction is bit-for-bit reproducible.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prediction {
    /// Submitter identifier.
    pub source: String,
    /// Per-submission identifier (stable fallback is derived by the loader).
    pub submission_id: String,
    /// Raw asset symbol as submitted; resolved by `AssetResolver`.
    pub asset: String,
    pub direction: Direction,
    /// User-stated confidence in [0, 1].
    pub confidence: f64,
    pub issued_at: DateTime<Utc>,
    pub entry_price: Option<f64>,
    /// Predicted move as a fraction (0.004 = 0.4%).
    pub move_pct: Option<f64>,
    /// Horizon in hours, clamped to 1..=24 by the loader.
    pub horizon_hours: Option<u32>,
}

impl Prediction {
    /// Deterministic identity hash over (asset, issued_at, source).
    ///
    /// BLAKE3 over a canonical byte encoding; independent of optional fields
    /// so re-submitting the same call with different entry details scores
    /// under a different submission but the same market context.
    pub fn identity_hash(&self) -> String {
        let mut hasher = blake3::Hasher::new();
        hasher.update(self.asset.as_bytes());
        hasher.update(&self.issued_at.timestamp_millis().to_le_bytes());
        hasher.update(self.source.as_bytes());
        hasher.finalize().to_hex().to_string()
    }

    /// Structural field validation: out-of-range confidence and
    /// non-finite optional fields are record-level errors.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.asset.trim().is_empty() {
            return Err(ValidationError::MissingAsset);
        }
        if !self.confidence.is_finite() {
            return Err(ValidationError::NonFiniteField { field: "confidence" });
        }
        if !(0.0..=1.0).contains(&self.confidence) {
            return Err(ValidationError::ConfidenceOutOfRange {
                value: self.confidence,
            });
        }
        if let Some(p) = self.entry_price {
            if !p.is_finite() || p <= 0.0 {
                return Err(ValidationError::NonFiniteField { field: "entry_price" });
            }
        }
        if let Some(m) = self.move_pct {
            if !m.is_finite() {
                return Err(ValidationError::NonFiniteField { field: "move_pct" });
            }
        }
        if let Some(h) = self.horizon_hours {
            if h == 0 {
                return Err(ValidationError::NonPositiveHorizon { value: 0 });
            }
        }
        Ok(())
    }

    /// True when both entry details required by the entry-quality engine are present.
    pub fn has_entry_details(&self) -> bool {
        self.entry_price.is_some() && self.horizon_hours.is_some()
    }
}
