//! Scoring configuration — explicit, immutable, validated before any scoring.
//!
//! All weights and gate thresholds live here instead of scattered constants,
//! so reproducible tests can run varied weight sets and a bad configuration
//! aborts the run up front (ConfigError is the only fatal error class).

use serde::{Deserialize, Serialize};
use thiserror::Error;

const WEIGHT_SUM_EPSILON: f64 = 1e-9;

/// Invalid weight/threshold configuration. Fatal: aborts before any scoring.
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    #[error("{which} weights must be non-negative")]
    NegativeWeight { which: &'static str },

    #[error("{which} weights sum to {sum}, expected 1.0")]
    WeightsDoNotSumToOne { which: &'static str, sum: f64 },

    #[error("top_pct {value} outside (0, 1]")]
    InvalidTopPct { value: f64 },

    #[error("gate threshold {which}={value} outside [0, 1]")]
    InvalidGateThreshold { which: &'static str, value: f64 },

    #[error("bootstrap n_paths {n} below minimum 1000")]
    TooFewPaths { n: usize },

    #[error("bootstrap min_returns {n} must be at least 2")]
    TooFewReturns { n: usize },

    #[error("failed to parse config: {0}")]
    Parse(String),
}

/// Structural-reliability blend weights (default 0.45/0.35/0.15/0.05).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct StructuralWeights {
    pub momentum: f64,
    pub technical: f64,
    pub fundamentals: f64,
    pub time_consistency: f64,
}

impl Default for StructuralWeights {
    fn default() -> Self {
        Self {
            momentum: 0.45,
            technical: 0.35,
            fundamentals: 0.15,
            time_consistency: 0.05,
        }
    }
}

impl StructuralWeights {
    fn validate(&self) -> Result<(), ConfigError> {
        let all = [
            self.momentum,
            self.technical,
            self.fundamentals,
            self.time_consistency,
        ];
        if all.iter().any(|w| *w < 0.0 || !w.is_finite()) {
            return Err(ConfigError::NegativeWeight { which: "structural" });
        }
        let sum: f64 = all.iter().sum();
        if (sum - 1.0).abs() > WEIGHT_SUM_EPSILON {
            return Err(ConfigError::WeightsDoNotSumToOne {
                which: "structural",
                sum,
            });
        }
        Ok(())
    }
}

/// Entry-quality blend weights. When move_pct is absent the target-dependent
/// terms are excluded and the remainder renormalized at scoring time.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct EntryWeights {
    pub p_touch: f64,
    pub p_reach_target: f64,
    pub entry_precision: f64,
    pub target_precision: f64,
    pub move_realism: f64,
    pub liquidity: f64,
}

impl Default for EntryWeights {
    fn default() -> Self {
        Self {
            p_touch: 0.35,
            p_reach_target: 0.30,
            entry_precision: 0.12,
            target_precision: 0.06,
            move_realism: 0.12,
            liquidity: 0.05,
        }
    }
}

impl EntryWeights {
    fn validate(&self) -> Result<(), ConfigError> {
        let all = [
            self.p_touch,
            self.p_reach_target,
            self.entry_precision,
            self.target_precision,
            self.move_realism,
            self.liquidity,
        ];
        if all.iter().any(|w| *w < 0.0 || !w.is_finite()) {
            return Err(ConfigError::NegativeWeight { which: "entry" });
        }
        let sum: f64 = all.iter().sum();
        if (sum - 1.0).abs() > WEIGHT_SUM_EPSILON {
            return Err(ConfigError::WeightsDoNotSumToOne { which: "entry", sum });
        }
        Ok(())
    }
}

/// Bootstrap resampling parameters.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct BootstrapConfig {
    /// Number of resampled price paths per probability estimate.
    pub n_paths: usize,
    /// How many trailing hourly returns feed the empirical distribution.
    pub lookback_hours: usize,
    /// Minimum return observations required before estimating.
    pub min_returns: usize,
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            n_paths: 2000,
            lookback_hours: 240,
            min_returns: 50,
        }
    }
}

impl BootstrapConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.n_paths < 1000 {
            return Err(ConfigError::TooFewPaths { n: self.n_paths });
        }
        if self.min_returns < 2 {
            return Err(ConfigError::TooFewReturns { n: self.min_returns });
        }
        Ok(())
    }
}

/// Selection gates. `None` disables a gate.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct GateConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_user_confidence: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_structural: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_final_score: Option<f64>,
    /// Fraction of gate-passing predictions to select, in (0, 1].
    pub top_pct: f64,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            min_user_confidence: Some(0.70),
            min_structural: Some(0.55),
            min_final_score: None,
            top_pct: 0.30,
        }
    }
}

impl GateConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if !(self.top_pct > 0.0 && self.top_pct <= 1.0) {
            return Err(ConfigError::InvalidTopPct { value: self.top_pct });
        }
        for (which, gate) in [
            ("min_user_confidence", self.min_user_confidence),
            ("min_structural", self.min_structural),
            ("min_final_score", self.min_final_score),
        ] {
            if let Some(v) = gate {
                if !(0.0..=1.0).contains(&v) {
                    return Err(ConfigError::InvalidGateThreshold { which, value: v });
                }
            }
        }
        Ok(())
    }
}

/// Complete immutable scoring configuration, passed into the pipeline at
/// construction.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub structural: StructuralWeights,
    pub entry: EntryWeights,
    pub bootstrap: BootstrapConfig,
    pub gates: GateConfig,
    pub master_seed: u64,
}

impl ScoringConfig {
    /// Validate every section; any failure is fatal for the run.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.structural.validate()?;
        self.entry.validate()?;
        self.bootstrap.validate()?;
        self.gates.validate()?;
        Ok(())
    }

    /// Parse from TOML; missing sections take defaults.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: ScoringConfig =
            toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }
}
