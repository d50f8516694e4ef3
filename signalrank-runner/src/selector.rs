//! Ranking and selection — deterministic sort, gates, top-percentage cutoff.
//!
//! Gated-out predictions stay in the full ranked output with
//! `selected = false` and the first failing gate recorded; nothing is
//! silently dropped.

use std::cmp::Ordering;

use serde::{Serialize, Serializer};

use signalrank_core::config::GateConfig;
use signalrank_core::domain::{Prediction, ScoreBreakdown};

use crate::loader::RejectedPrediction;

/// One prediction with its finished breakdown — the ranking unit.
#[derive(Debug, Clone, Serialize)]
pub struct ScoredPrediction {
    pub prediction: Prediction,
    pub breakdown: ScoreBreakdown,
}

/// Why a prediction was not eligible for selection.
#[derive(Debug, Clone, PartialEq)]
pub enum GateFailure {
    /// Every structural input was unavailable.
    IncompleteData,
    BelowMinConfidence { min: f64 },
    BelowMinStructural { min: f64 },
    BelowMinFinalScore { min: f64 },
    /// Passed every gate but fell outside the top percentage.
    BelowTopCutoff,
}

impl GateFailure {
    pub fn reason(&self) -> String {
        match self {
            GateFailure::IncompleteData => "no structural input available".into(),
            GateFailure::BelowMinConfidence { min } => {
                format!("user confidence below minimum {min}")
            }
            GateFailure::BelowMinStructural { min } => {
                format!("structural reliability below minimum {min}")
            }
            GateFailure::BelowMinFinalScore { min } => {
                format!("final score below minimum {min}")
            }
            GateFailure::BelowTopCutoff => "outside top percentage cutoff".into(),
        }
    }
}

impl Serialize for GateFailure {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.reason())
    }
}

/// One row of the full ranked output.
#[derive(Debug, Clone, Serialize)]
pub struct RankedRow {
    pub prediction: Prediction,
    pub breakdown: ScoreBreakdown,
    pub selected: bool,
    pub gate: Option<GateFailure>,
}

/// Complete batch outcome: ranked rows plus the records that never scored.
#[derive(Debug, Default, Serialize)]
pub struct RankedResult {
    pub rows: Vec<RankedRow>,
    pub rejected: Vec<RejectedPrediction>,
}

impl RankedResult {
    pub fn selected(&self) -> impl Iterator<Item = &RankedRow> {
        self.rows.iter().filter(|r| r.selected)
    }

    pub fn selected_count(&self) -> usize {
        self.rows.iter().filter(|r| r.selected).count()
    }
}

/// Sort, gate, and select.
///
/// Ordering is fully deterministic: final score descending, ties broken by
/// confidence reliability descending, then issued_at ascending (earlier
/// predictions preferred). Gates run in a fixed order and the first failure
/// is recorded; survivors are cut to the top `top_pct` fraction (at least
/// one when any survive).
pub fn rank_and_select(
    mut scored: Vec<ScoredPrediction>,
    rejected: Vec<RejectedPrediction>,
    gates: &GateConfig,
) -> RankedResult {
    scored.sort_by(compare);

    let mut gate_flags: Vec<Option<GateFailure>> = scored
        .iter()
        .map(|s| first_gate_failure(s, gates))
        .collect();

    let passing: Vec<usize> = (0..scored.len())
        .filter(|&i| gate_flags[i].is_none())
        .collect();
    let n_select = if passing.is_empty() {
        0
    } else {
        ((passing.len() as f64 * gates.top_pct).round() as usize).max(1)
    };

    let mut selected_flags = vec![false; gate_flags.len()];
    for &i in passing.iter().take(n_select) {
        selected_flags[i] = true;
    }
    for &i in passing.iter().skip(n_select) {
        gate_flags[i] = Some(GateFailure::BelowTopCutoff);
    }

    let rows = scored
        .into_iter()
        .zip(gate_flags)
        .zip(selected_flags)
        .map(|((s, gate), selected)| RankedRow {
            prediction: s.prediction,
            breakdown: s.breakdown,
            selected,
            gate,
        })
        .collect();

    RankedResult { rows, rejected }
}

fn compare(a: &ScoredPrediction, b: &ScoredPrediction) -> Ordering {
    b.breakdown
        .final_score
        .total_cmp(&a.breakdown.final_score)
        .then_with(|| {
            b.breakdown
                .confidence_reliability
                .total_cmp(&a.breakdown.confidence_reliability)
        })
        .then_with(|| a.prediction.issued_at.cmp(&b.prediction.issued_at))
}

fn first_gate_failure(s: &ScoredPrediction, gates: &GateConfig) -> Option<GateFailure> {
    if s.breakdown.provenance.all_unavailable() {
        return Some(GateFailure::IncompleteData);
    }
    if let Some(min) = gates.min_user_confidence {
        if s.prediction.confidence < min {
            return Some(GateFailure::BelowMinConfidence { min });
        }
    }
    if let Some(min) = gates.min_structural {
        if s.breakdown.structural_reliability < min {
            return Some(GateFailure::BelowMinStructural { min });
        }
    }
    if let Some(min) = gates.min_final_score {
        if s.breakdown.final_score < min {
            return Some(GateFailure::BelowMinFinalScore { min });
        }
    }
    None
}
