//! End-to-end scoring scenarios over the core engines.

use chrono::Utc;

use signalrank_core::config::ScoringConfig;
use signalrank_core::data::{Lookback, MarketDataProvider, SyntheticMarketData};
use signalrank_core::data::resolver::AssetResolver;
use signalrank_core::domain::{Direction, Prediction, ReliabilityLabel};
use signalrank_core::rng::SeedHierarchy;
use signalrank_core::scoring::{
    confidence_reliability, final_reliability, momentum_alignment, score_entry,
    structural_reliability, technical_alignment, technical_signal,
};

fn approx(a: f64, b: f64) {
    assert!((a - b).abs() < 1e-12, "expected {b}, got {a}");
}

/// Perfect structural inputs, confidence 0.8, entry score
/// 0.5 → final 0.68.
#[test]
fn perfect_structure_with_median_entry() {
    let config = ScoringConfig::default();
    let structural = structural_reliability(&config.structural, 1.0, 1.0, 1.0, 1.0);
    approx(structural, 1.0);

    let crs = confidence_reliability(0.8, structural).unwrap();
    approx(crs, 0.8);

    let final_score = final_reliability(crs, Some(0.5));
    approx(final_score, 0.8 * (0.7 + 0.15));
    approx(final_score, 0.68);
    assert_eq!(ReliabilityLabel::from_score(final_score), ReliabilityLabel::Moderate);
}

/// Same inputs but no entry details → unavailability bypass,
/// final equals confidence reliability.
#[test]
fn perfect_structure_without_entry_details() {
    let config = ScoringConfig::default();
    let structural = structural_reliability(&config.structural, 1.0, 1.0, 1.0, 1.0);
    let crs = confidence_reliability(0.8, structural).unwrap();
    let final_score = final_reliability(crs, None);
    approx(final_score, 0.8);
    assert_eq!(ReliabilityLabel::from_score(final_score), ReliabilityLabel::High);
}

/// Out-of-range confidence is a validation error, not a score.
#[test]
fn invalid_confidence_is_rejected() {
    assert!(confidence_reliability(1.2, 0.9).is_err());
}

/// A long prediction against an uptrend scores above neutral on both
/// technical and momentum alignment; a short against it scores below.
#[test]
fn alignment_tracks_trend_direction() {
    let asset = AssetResolver::new().resolve("BTC").unwrap();
    let snapshot = SyntheticMarketData::new(9)
        .with_drift(0.001)
        .fetch(&asset, Utc::now(), Lookback::default())
        .unwrap();

    let tech = technical_signal(&snapshot).unwrap();
    assert!(tech.bias > 0.0, "uptrend bias should be positive: {}", tech.bias);

    let long_align = technical_alignment(Direction::Long, tech.bias);
    let short_align = technical_alignment(Direction::Short, tech.bias);
    assert!(long_align > 0.5);
    assert!(short_align < 0.5);

    let momentum_sig = signalrank_core::scoring::momentum_signal(&snapshot).unwrap();
    assert!(momentum_alignment(Direction::Long, momentum_sig.weighted) > 0.5);
    assert!(momentum_alignment(Direction::Short, momentum_sig.weighted) < 0.5);
}

/// Re-scoring the same prediction with the same snapshot and master seed
/// reproduces the entry block bit-for-bit.
#[test]
fn rescoring_is_idempotent() {
    let asset = AssetResolver::new().resolve("ETH").unwrap();
    let as_of = Utc::now();
    let snapshot = SyntheticMarketData::new(11)
        .fetch(&asset, as_of, Lookback::default())
        .unwrap();

    let prediction = Prediction {
        source: "U7".into(),
        submission_id: "S7".into(),
        asset: "ETH".into(),
        direction: Direction::Short,
        confidence: 0.9,
        issued_at: as_of,
        entry_price: Some(snapshot.spot * 1.002),
        move_pct: Some(0.003),
        horizon_hours: Some(6),
    };

    let config = ScoringConfig::default();
    let seeds = SeedHierarchy::new(config.master_seed);

    let a = score_entry(&prediction, &snapshot, None, &config, &seeds).unwrap();
    let b = score_entry(&prediction, &snapshot, None, &config, &seeds).unwrap();

    assert_eq!(a.p_touch, b.p_touch);
    assert_eq!(a.p_reach_target, b.p_reach_target);
    assert_eq!(a.entry_precision, b.entry_precision);
    assert_eq!(a.entry_score, b.entry_score);
}

/// A different master seed redraws the bootstrap paths; estimates stay in
/// the same neighborhood but need not match exactly.
#[test]
fn master_seed_controls_resampling() {
    let asset = AssetResolver::new().resolve("ETH").unwrap();
    let as_of = Utc::now();
    let snapshot = SyntheticMarketData::new(11)
        .fetch(&asset, as_of, Lookback::default())
        .unwrap();

    let prediction = Prediction {
        source: "U7".into(),
        submission_id: "S7".into(),
        asset: "ETH".into(),
        direction: Direction::Long,
        confidence: 0.9,
        issued_at: as_of,
        entry_price: Some(snapshot.spot * 0.997),
        move_pct: None,
        horizon_hours: Some(4),
    };

    let config = ScoringConfig::default();
    let a = score_entry(
        &prediction,
        &snapshot,
        None,
        &config,
        &SeedHierarchy::new(1),
    )
    .unwrap();
    let b = score_entry(
        &prediction,
        &snapshot,
        None,
        &config,
        &SeedHierarchy::new(2),
    )
    .unwrap();

    assert!((a.p_touch - b.p_touch).abs() < 0.1);
    // Deterministic sub-scores are seed-independent
    assert_eq!(a.entry_precision, b.entry_precision);
}
