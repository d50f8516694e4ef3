//! ScoreBreakdown — every intermediate score for one prediction.

use serde::{Deserialize, Serialize};

/// Which structural inputs were backed by real data.
///
/// `false` means the provider reported unavailable (or timed out) and the
/// component entered the structural blend as neutral 0.5. The ranking output
/// carries these flags so the reliability of the ranking itself is auditable.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Provenance {
    pub technical: bool,
    pub momentum: bool,
    pub fundamentals: bool,
    pub time_consistency: bool,
}

impl Provenance {
    /// True when no structural input had real data behind it.
    pub fn all_unavailable(&self) -> bool {
        !self.technical && !self.momentum && !self.fundamentals && !self.time_consistency
    }
}

/// Entry/target quality sub-scores, present only when the engine was applicable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntryQuality {
    /// Probability price touches the entry within the horizon.
    pub p_touch: f64,
    /// Blended probability the implied target is reached (move_pct only).
    pub p_reach_target: Option<f64>,
    pub entry_precision: f64,
    pub target_precision: Option<f64>,
    pub move_realism: Option<f64>,
    pub liquidity: f64,
    /// Implied target price `entry · (1 ± |move_pct|)`.
    pub target_price: Option<f64>,
    /// Weighted blend of the sub-scores, in [0, 1].
    pub entry_score: f64,
}

/// Coarse reliability label derived from the final score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReliabilityLabel {
    Low,
    Moderate,
    High,
}

impl ReliabilityLabel {
    pub fn from_score(final_score: f64) -> Self {
        if final_score < 0.4 {
            ReliabilityLabel::Low
        } else if final_score < 0.7 {
            ReliabilityLabel::Moderate
        } else {
            ReliabilityLabel::High
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ReliabilityLabel::Low => "low",
            ReliabilityLabel::Moderate => "moderate",
            ReliabilityLabel::High => "high",
        }
    }
}

/// Full per-prediction scoring record.
///
/// Created once when the prediction's pipeline unit finishes; never mutated
/// afterwards. This is the unit written to the ranked output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    /// Combined multi-timeframe trend bias in [-1, 1].
    pub technical_bias: f64,
    pub technical_alignment: f64,
    pub weighted_momentum: f64,
    pub momentum_alignment: f64,
    pub fundamental_score: f64,
    pub time_consistency: f64,
    pub structural_reliability: f64,
    pub confidence_reliability: f64,
    /// None when entry details were absent or market data unusable; the
    /// final multiplier is then 1.0 (bypass, not a neutral blend).
    pub entry: Option<EntryQuality>,
    pub final_score: f64,
    pub label: ReliabilityLabel,
    pub provenance: Provenance,
}

impl ScoreBreakdown {
    pub fn entry_score(&self) -> Option<f64> {
        self.entry.as_ref().map(|e| e.entry_score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_thresholds() {
        assert_eq!(ReliabilityLabel::from_score(0.0), ReliabilityLabel::Low);
        assert_eq!(ReliabilityLabel::from_score(0.39), ReliabilityLabel::Low);
        assert_eq!(ReliabilityLabel::from_score(0.4), ReliabilityLabel::Moderate);
        assert_eq!(ReliabilityLabel::from_score(0.69), ReliabilityLabel::Moderate);
        assert_eq!(ReliabilityLabel::from_score(0.7), ReliabilityLabel::High);
        assert_eq!(ReliabilityLabel::from_score(1.0), ReliabilityLabel::High);
    }

    #[test]
    fn provenance_all_unavailable() {
        assert!(Provenance::default().all_unavailable());
        let partial = Provenance {
            momentum: true,
            ..Default::default()
        };
        assert!(!partial.all_unavailable());
    }
}
