//! Deterministic seed derivation
//!
//! Every stochastic driver draws from its own RNG, seeded from the master
//! seed string plus a driver label. Adding or removing one driver never
//! perturbs the draws of another, and the same master seed always reproduces
//! the same ensemble.

use rand::SeedableRng;
use rand::rngs::SmallRng;
use sha2::{Digest, Sha256};

/// Derive a 64-bit seed from the master seed and a driver label.
///
/// The derivation hashes `"{master_seed}_{label}"` with SHA-256 and takes the
/// first eight bytes little-endian. Labels should be unique per driver and
/// per path, e.g. `"path3_equity"`.
pub fn driver_seed(master_seed: &str, label: &str) -> u64 {
    let mut hasher = Sha256::new();
    hasher.update(master_seed.as_bytes());
    hasher.update(b"_");
    hasher.update(label.as_bytes());
    let digest = hasher.finalize();

    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&digest[..8]);
    u64::from_le_bytes(bytes)
}

/// A small, fast RNG seeded for one driver.
pub fn driver_rng(master_seed: &str, label: &str) -> SmallRng {
    SmallRng::seed_from_u64(driver_seed(master_seed, label))
}
