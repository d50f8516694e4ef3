//! Deterministic RNG hierarchy.
//!
//! A master seed generates deterministic sub-seeds for each
//! `(prediction identity, stream)` pair. Sub-seeds are derived via BLAKE3
//! hashing, independently of worker scheduling order, so batch results are
//! identical regardless of thread count or completion order.

use rand::rngs::StdRng;
use rand::SeedableRng;

/// Deterministic RNG hierarchy.
///
/// The master seed is expanded into per-(identity, stream) sub-seeds using
/// BLAKE3. Because derivation is hash-based (not order-dependent), the same
/// master seed produces identical sub-seeds regardless of the order in which
/// predictions are scored. `stream` separates the resampling draws inside
/// one prediction (entry touch vs. target reach) so they stay independent.
#[derive(Debug, Clone)]
pub struct SeedHierarchy {
    master_seed: u64,
}

impl SeedHierarchy {
    pub fn new(master_seed: u64) -> Self {
        Self { master_seed }
    }

    pub fn master_seed(&self) -> u64 {
        self.master_seed
    }

    /// Derive a deterministic sub-seed for a (prediction identity, stream) pair.
    pub fn sub_seed(&self, identity_hash: &str, stream: &str) -> u64 {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&self.master_seed.to_le_bytes());
        hasher.update(identity_hash.as_bytes());
        hasher.update(stream.as_bytes());
        let hash = hasher.finalize();
        u64::from_le_bytes(hash.as_bytes()[..8].try_into().expect("8 bytes"))
    }

    /// Create a seeded StdRng for a (prediction identity, stream) pair.
    pub fn rng_for(&self, identity_hash: &str, stream: &str) -> StdRng {
        StdRng::seed_from_u64(self.sub_seed(identity_hash, stream))
    }
}
