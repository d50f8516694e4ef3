//! Bootstrap path resampler — empirical reachability probabilities.
//!
//! Price paths are simulated by IID resampling of recent hourly returns
//! (with replacement), which keeps the empirical fat tails a closed-form
//! diffusion assumption would flatten. Each probability estimate draws a
//! fixed number of paths from a caller-supplied seeded RNG, so estimates
//! are reproducible per prediction.

use rand::rngs::StdRng;
use rand::Rng;

use crate::config::BootstrapConfig;
use crate::domain::Direction;

/// Resampling engine over one asset's recent hourly return distribution.
#[derive(Debug, Clone)]
pub struct BootstrapEngine {
    returns: Vec<f64>,
    spot: f64,
    n_paths: usize,
}

impl BootstrapEngine {
    /// Build from hourly closes; takes the trailing `lookback_hours` returns.
    ///
    /// Returns None when fewer than `min_returns` finite returns are
    /// available — callers then fall back to neutral probabilities.
    pub fn new(hourly_closes: &[f64], spot: f64, config: &BootstrapConfig) -> Option<Self> {
        if !spot.is_finite() || spot <= 0.0 {
            return None;
        }

        let mut returns: Vec<f64> = hourly_closes
            .windows(2)
            .filter_map(|w| {
                if w[0].is_finite() && w[1].is_finite() && w[0] != 0.0 {
                    Some((w[1] - w[0]) / w[0])
                } else {
                    None
                }
            })
            .collect();
        if returns.len() > config.lookback_hours {
            returns.drain(..returns.len() - config.lookback_hours);
        }
        if returns.len() < config.min_returns {
            return None;
        }

        Some(Self {
            returns,
            spot,
            n_paths: config.n_paths,
        })
    }

    pub fn spot(&self) -> f64 {
        self.spot
    }

    pub fn sample_size(&self) -> usize {
        self.returns.len()
    }

    /// Probability that price touches `entry` within `horizon_hours`,
    /// starting from spot.
    ///
    /// Touch rules depend on which side of spot the entry sits:
    /// - long:  entry <= spot → touch when path_min <= entry,
    ///          else touch when path_max >= entry
    /// - short: entry >= spot → touch when path_max >= entry,
    ///          else touch when path_min <= entry
    pub fn p_touch(
        &self,
        entry: f64,
        horizon_hours: u32,
        direction: Direction,
        rng: &mut StdRng,
    ) -> f64 {
        if !entry.is_finite() {
            return 0.5;
        }

        let towards_min = match direction {
            Direction::Long => entry <= self.spot,
            Direction::Short => entry < self.spot,
        };

        let mut touched = 0usize;
        for _ in 0..self.n_paths {
            let (path_min, path_max) = self.path_extremes(self.spot, horizon_hours, rng);
            let hit = if towards_min {
                path_min <= entry
            } else {
                path_max >= entry
            };
            if hit {
                touched += 1;
            }
        }
        touched as f64 / self.n_paths as f64
    }

    /// Probability that price reaches `target` within `horizon_hours`,
    /// starting from `start` (spot or entry): long → path_max >= target,
    /// short → path_min <= target.
    pub fn p_reach(
        &self,
        target: f64,
        start: f64,
        horizon_hours: u32,
        direction: Direction,
        rng: &mut StdRng,
    ) -> f64 {
        if !target.is_finite() || !start.is_finite() || start <= 0.0 {
            return 0.5;
        }

        let mut reached = 0usize;
        for _ in 0..self.n_paths {
            let (path_min, path_max) = self.path_extremes(start, horizon_hours, rng);
            let hit = match direction {
                Direction::Long => path_max >= target,
                Direction::Short => path_min <= target,
            };
            if hit {
                reached += 1;
            }
        }
        reached as f64 / self.n_paths as f64
    }

    /// One simulated path's (min, max); the path itself is never stored.
    fn path_extremes(&self, start: f64, horizon_hours: u32, rng: &mut StdRng) -> (f64, f64) {
        let n = self.returns.len();
        let mut price = start;
        let mut path_min = start;
        let mut path_max = start;
        for _ in 0..horizon_hours.max(1) {
            let draw = self.returns[rng.gen_range(0..n)];
            price *= 1.0 + draw;
            path_min = path_min.min(price);
            path_max = path_max.max(price);
        }
        (path_min, path_max)
    }
}
