//! Batch scoring pipeline.
//!
//! Each prediction's full scoring run (technical + momentum + fundamentals
//! fusion, entry quality, final score) is an independent rayon work unit.
//! Market-data and fundamentals lookups are prefetched concurrently across
//! the batch's distinct keys and cached for the run, so predictions sharing
//! an (asset, timestamp) reuse one fetch. Completion order is irrelevant:
//! ranking happens in a single deterministic pass after all units finish.
//!
//! Error policy (per the taxonomy): provider failures — timeouts included —
//! degrade the affected prediction to its neutral paths; validation
//! failures exclude the record with a reason; only configuration errors
//! abort the run, before any scoring starts.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use rayon::prelude::*;
use thiserror::Error;

use signalrank_core::config::{ConfigError, ScoringConfig};
use signalrank_core::data::{
    AssetInfo, AssetResolver, DepthProvider, FundamentalsProvider, Lookback, MarketDataProvider,
    OrderBookDepth, SnapshotCache, SnapshotKey,
};
use signalrank_core::domain::{
    MarketSnapshot, Prediction, Provenance, ReliabilityLabel, ScoreBreakdown,
};
use signalrank_core::rng::SeedHierarchy;
use signalrank_core::scoring::{
    confidence_reliability, final_reliability, momentum_alignment, momentum_signal, score_entry,
    structural_reliability, technical_alignment, technical_signal, time_consistency,
};

use crate::loader::RejectedPrediction;
use crate::selector::{rank_and_select, RankedResult, ScoredPrediction};

/// External collaborators for a batch run. Fundamentals and depth are
/// optional; their absence routes through the neutral paths.
pub struct Providers<'a> {
    pub market: &'a dyn MarketDataProvider,
    pub fundamentals: Option<&'a dyn FundamentalsProvider>,
    pub depth: Option<&'a dyn DepthProvider>,
}

/// Errors that abort a batch run.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Score a batch of predictions and return the ranked result.
pub fn score_batch(
    predictions: Vec<Prediction>,
    providers: &Providers<'_>,
    config: &ScoringConfig,
) -> Result<RankedResult, PipelineError> {
    // Bad configuration is the only fatal error, caught before any scoring.
    config.validate()?;

    let resolver = AssetResolver::new();
    let seeds = SeedHierarchy::new(config.master_seed);
    let lookback = Lookback::default();

    // Structural validation + asset resolution; failures are per-record.
    let mut rejected: Vec<RejectedPrediction> = Vec::new();
    let mut resolved: Vec<(Prediction, AssetInfo)> = Vec::new();
    for prediction in predictions {
        if let Err(e) = prediction.validate() {
            rejected.push(reject(&prediction, e.to_string()));
            continue;
        }
        match resolver.resolve(&prediction.asset) {
            Ok(info) => resolved.push((prediction, info)),
            Err(e) => rejected.push(reject(&prediction, e.to_string())),
        }
    }

    // Prefetch snapshots concurrently across distinct (asset, as_of) keys.
    let cache = SnapshotCache::new();
    let mut snapshot_keys: HashMap<SnapshotKey, AssetInfo> = HashMap::new();
    for (prediction, asset) in &resolved {
        snapshot_keys
            .entry(SnapshotKey::new(asset, prediction.issued_at, lookback))
            .or_insert_with(|| asset.clone());
    }
    snapshot_keys.par_iter().for_each(|(key, asset)| {
        cache.get_or_fetch(providers.market, asset, key.as_of, lookback);
    });

    // Fundamentals, same idea: one fetch per distinct key for the run.
    let fundamentals = prefetch_fundamentals(&resolved, providers);

    // Depth books are keyed per asset; a missing/failing source is neutral.
    let depth_books = prefetch_depth(&resolved, providers);

    // Independent per-prediction scoring units; no unit depends on another.
    let outcomes: Vec<Result<ScoredPrediction, RejectedPrediction>> = resolved
        .into_par_iter()
        .map(|(prediction, asset)| {
            let snapshot =
                cache.get_or_fetch(providers.market, &asset, prediction.issued_at, lookback);
            let snapshot_ref = match &*snapshot {
                Ok(s) => Some(s),
                Err(_) => None,
            };
            let fundamental = fundamentals
                .get(&fundamentals_key(&asset, &prediction))
                .copied()
                .flatten();
            let depth = depth_books.get(&asset.canonical).and_then(|d| d.as_deref());
            score_one(prediction, snapshot_ref, fundamental, depth, config, &seeds)
        })
        .collect();

    let mut scored = Vec::new();
    for outcome in outcomes {
        match outcome {
            Ok(s) => scored.push(s),
            Err(r) => rejected.push(r),
        }
    }

    // Synchronization barrier passed: one deterministic sort + selection.
    Ok(rank_and_select(scored, rejected, &config.gates))
}

type FundamentalsKey = (String, signalrank_core::domain::Direction, DateTime<Utc>);

fn fundamentals_key(asset: &AssetInfo, prediction: &Prediction) -> FundamentalsKey {
    (
        asset.canonical.clone(),
        prediction.direction,
        prediction.issued_at,
    )
}

fn prefetch_fundamentals(
    resolved: &[(Prediction, AssetInfo)],
    providers: &Providers<'_>,
) -> HashMap<FundamentalsKey, Option<f64>> {
    let provider = match providers.fundamentals {
        Some(p) => p,
        None => return HashMap::new(),
    };

    let mut keys: HashMap<FundamentalsKey, AssetInfo> = HashMap::new();
    for (prediction, asset) in resolved {
        keys.entry(fundamentals_key(asset, prediction))
            .or_insert_with(|| asset.clone());
    }

    keys.into_par_iter()
        .map(|(key, asset)| {
            let score = provider
                .score(&asset, key.1, key.2)
                .ok()
                .map(|s| s.clamp(0.0, 1.0));
            (key, score)
        })
        .collect()
}

fn prefetch_depth(
    resolved: &[(Prediction, AssetInfo)],
    providers: &Providers<'_>,
) -> HashMap<String, Option<Arc<OrderBookDepth>>> {
    let provider = match providers.depth {
        Some(p) => p,
        None => return HashMap::new(),
    };

    let mut assets: HashMap<String, AssetInfo> = HashMap::new();
    for (_, asset) in resolved {
        if asset.depth_symbol.is_some() {
            assets
                .entry(asset.canonical.clone())
                .or_insert_with(|| asset.clone());
        }
    }

    assets
        .into_par_iter()
        .map(|(canonical, asset)| {
            let book = provider.depth(&asset).ok().map(Arc::new);
            (canonical, book)
        })
        .collect()
}

/// Score a single prediction against its (possibly unavailable) inputs.
fn score_one(
    prediction: Prediction,
    snapshot: Option<&MarketSnapshot>,
    fundamental: Option<f64>,
    depth: Option<&OrderBookDepth>,
    config: &ScoringConfig,
    seeds: &SeedHierarchy,
) -> Result<ScoredPrediction, RejectedPrediction> {
    let mut provenance = Provenance::default();

    // Unavailable inputs enter the blend as neutral 0.5, never zero.
    let mut technical_bias = 0.0;
    let mut tech_align = 0.5;
    let mut weighted_momentum = 0.0;
    let mut mom_align = 0.5;
    let mut consistency = 0.5;

    if let Some(snapshot) = snapshot {
        if let Some(signal) = technical_signal(snapshot) {
            technical_bias = signal.bias;
            tech_align = technical_alignment(prediction.direction, signal.bias);
            provenance.technical = true;
        }
        if let Some(signal) = momentum_signal(snapshot) {
            weighted_momentum = signal.weighted;
            mom_align = momentum_alignment(prediction.direction, signal.weighted);
            provenance.momentum = true;
        }
        if let Some(c) = time_consistency(&snapshot.hourly_closes()) {
            consistency = c;
            provenance.time_consistency = true;
        }
    }

    let fundamental_score = match fundamental {
        Some(f) => {
            provenance.fundamentals = true;
            f
        }
        None => 0.5,
    };

    let structural = structural_reliability(
        &config.structural,
        mom_align,
        tech_align,
        fundamental_score,
        consistency,
    );

    let crs = match confidence_reliability(prediction.confidence, structural) {
        Ok(crs) => crs,
        Err(e) => return Err(reject(&prediction, e.to_string())),
    };

    let entry = snapshot.and_then(|s| score_entry(&prediction, s, depth, config, seeds));
    let final_score = final_reliability(crs, entry.as_ref().map(|e| e.entry_score));

    let breakdown = ScoreBreakdown {
        technical_bias,
        technical_alignment: tech_align,
        weighted_momentum,
        momentum_alignment: mom_align,
        fundamental_score,
        time_consistency: consistency,
        structural_reliability: structural,
        confidence_reliability: crs,
        entry,
        final_score,
        label: ReliabilityLabel::from_score(final_score),
        provenance,
    };

    Ok(ScoredPrediction { prediction, breakdown })
}

fn reject(prediction: &Prediction, reason: String) -> RejectedPrediction {
    RejectedPrediction {
        source: Some(prediction.source.clone()),
        submission_id: Some(prediction.submission_id.clone()),
        asset: Some(prediction.asset.clone()),
        reason,
    }
}
