//! Scoring engines.
//!
//! Pipeline order: technical bias + momentum alignment + fundamentals →
//! structural reliability → confidence reliability → entry quality →
//! final score. Every engine is a pure function of its inputs; the only
//! randomness is the seeded bootstrap inside entry quality.

pub mod bootstrap;
pub mod confidence;
pub mod entry;
pub mod final_score;
pub mod liquidity;
pub mod momentum;
pub mod precision;
pub mod structural;
pub mod technical;

pub use bootstrap::BootstrapEngine;
pub use confidence::confidence_reliability;
pub use entry::{implied_target_price, score_entry};
pub use final_score::final_reliability;
pub use liquidity::liquidity_score;
pub use momentum::{momentum_alignment, momentum_signal, time_consistency, MomentumSignal};
pub use precision::{entry_precision_score, move_realism_score, target_precision_score};
pub use structural::structural_reliability;
pub use technical::{technical_alignment, technical_signal, TechnicalSignal};

/// Clamp a score into [0, 1].
pub(crate) fn clamp01(x: f64) -> f64 {
    x.clamp(0.0, 1.0)
}
