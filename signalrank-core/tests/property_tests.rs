//! Property tests for scoring invariants.
//!
//! Uses proptest to verify:
//! 1. Every bounded score lies in [0, 1] for all valid inputs
//! 2. Structural reliability reproduces the fixed-weight formula
//! 3. Confidence reliability is strictly monotone in confidence
//! 4. The final score never exceeds confidence reliability
//! 5. Precision/realism decays stay bounded under arbitrary geometry

use proptest::prelude::*;

use signalrank_core::config::{ScoringConfig, StructuralWeights};
use signalrank_core::domain::Direction;
use signalrank_core::scoring::{
    confidence_reliability, entry_precision_score, final_reliability, momentum_alignment,
    move_realism_score, structural_reliability, target_precision_score, technical_alignment,
};

// ── Strategies (proptest) ────────────────────────────────────────────

fn arb_unit() -> impl Strategy<Value = f64> {
    0.0..=1.0_f64
}

fn arb_direction() -> impl Strategy<Value = Direction> {
    prop_oneof![Just(Direction::Long), Just(Direction::Short)]
}

fn arb_price() -> impl Strategy<Value = f64> {
    1.0..100_000.0_f64
}

// ── 1. Bounds ────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn structural_reliability_bounded(
        m in arb_unit(), t in arb_unit(), f in arb_unit(), c in arb_unit(),
    ) {
        let s = structural_reliability(&StructuralWeights::default(), m, t, f, c);
        prop_assert!((0.0..=1.0).contains(&s));
    }

    #[test]
    fn momentum_alignment_bounded(
        direction in arb_direction(),
        weighted in -10.0..10.0_f64,
    ) {
        let a = momentum_alignment(direction, weighted);
        prop_assert!((0.0..=1.0).contains(&a));
    }

    #[test]
    fn technical_alignment_bounded(
        direction in arb_direction(),
        bias in -5.0..5.0_f64,
    ) {
        let a = technical_alignment(direction, bias);
        prop_assert!((0.0..=1.0).contains(&a));
    }

    #[test]
    fn precision_scores_bounded(
        spot in arb_price(),
        entry in arb_price(),
        atr in 0.0..1_000.0_f64,
        direction in arb_direction(),
    ) {
        let e = entry_precision_score(spot, entry, atr, Some(spot), direction);
        prop_assert!((0.0..=1.0).contains(&e));
        let t = target_precision_score(entry, spot, atr, None, direction);
        prop_assert!((0.0..=1.0).contains(&t));
    }

    #[test]
    fn realism_bounded(
        spot in arb_price(),
        atr in 0.0..1_000.0_f64,
        move_pct in -0.5..0.5_f64,
        horizon in 1u32..=24,
    ) {
        let r = move_realism_score(spot, atr, move_pct, horizon);
        prop_assert!((0.0..=1.0).contains(&r));
    }
}

// ── 2. Formula reproducibility ───────────────────────────────────────

proptest! {
    /// Recomputing structural reliability from its four inputs via the fixed
    /// weights reproduces the stored value within floating tolerance.
    #[test]
    fn structural_formula_reproducible(
        m in arb_unit(), t in arb_unit(), f in arb_unit(), c in arb_unit(),
    ) {
        let config = ScoringConfig::default();
        let stored = structural_reliability(&config.structural, m, t, f, c);
        let recomputed = 0.45 * m + 0.35 * t + 0.15 * f + 0.05 * c;
        prop_assert!((stored - recomputed.clamp(0.0, 1.0)).abs() < 1e-12);
    }
}

// ── 3. Monotonicity ──────────────────────────────────────────────────

proptest! {
    /// Increasing confidence with structural reliability held fixed strictly
    /// increases confidence reliability (unless clamped at 1.0, which the
    /// product of unit-interval inputs never reaches here).
    #[test]
    fn confidence_reliability_monotone(
        structural in 0.01..=1.0_f64,
        lo in arb_unit(),
        delta in 0.001..=0.5_f64,
    ) {
        let hi = (lo + delta).min(1.0);
        prop_assume!(hi > lo);
        let a = confidence_reliability(lo, structural).unwrap();
        let b = confidence_reliability(hi, structural).unwrap();
        prop_assert!(b > a);
    }
}

// ── 4. Final score dominance ─────────────────────────────────────────

proptest! {
    /// The entry multiplier never exceeds 1: final <= confidence reliability,
    /// with or without an entry score.
    #[test]
    fn final_score_never_exceeds_crs(
        crs in arb_unit(),
        entry in proptest::option::of(arb_unit()),
    ) {
        let f = final_reliability(crs, entry);
        prop_assert!(f <= crs + 1e-12);
        prop_assert!((0.0..=1.0).contains(&f));
    }

    /// With an entry score present the multiplier floor is 0.7.
    #[test]
    fn final_score_floor_with_entry(crs in arb_unit(), entry in arb_unit()) {
        let f = final_reliability(crs, Some(entry));
        prop_assert!(f >= crs * 0.7 - 1e-12);
    }
}
