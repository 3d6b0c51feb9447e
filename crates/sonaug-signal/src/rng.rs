//! Deterministic RNG using PCG32 with BLAKE3 seed derivation.
//!
//! All randomness in the augmentation pipeline flows through this module.
//! Every `instantiate` call builds its own generator from a derived seed, so
//! transforms never share a random stream and repeated calls with the same
//! seed always replay the same draws.

use rand::SeedableRng;
use rand_pcg::Pcg32;

/// Creates a PCG32 RNG from a 32-bit seed.
///
/// The 32-bit seed is expanded to 64 bits by duplicating the value in both
/// halves, as required by PCG32's state initialization.
pub fn create_rng(seed: u32) -> Pcg32 {
    // Expand 32-bit seed to 64-bit for PCG32 state
    let seed64 = (seed as u64) | ((seed as u64) << 32);
    Pcg32::seed_from_u64(seed64)
}

/// Derives a seed for the child at `index` of a composite transform.
///
/// ```text
/// child_seed = truncate_u32(BLAKE3(base_seed_le || index_le))
/// ```
///
/// The derived seed depends only on `(base_seed, index)`, never on how many
/// draws sibling children perform, so inserting a child into a chain does
/// not perturb the streams of the others.
pub fn derive_child_seed(base_seed: u32, index: u32) -> u32 {
    let mut input = Vec::with_capacity(8);
    input.extend_from_slice(&base_seed.to_le_bytes());
    input.extend_from_slice(&index.to_le_bytes());

    let hash = blake3::hash(&input);

    // Truncate to u32 (first 4 bytes, little-endian)
    let bytes: [u8; 4] = hash.as_bytes()[0..4].try_into().unwrap();
    u32::from_le_bytes(bytes)
}

/// Derives a seed for a named component from the base seed.
///
/// Used by transforms to scope their random stream to their own name, so
/// two different transforms handed the same seed draw from unrelated
/// streams.
pub fn derive_component_seed(base_seed: u32, key: &str) -> u32 {
    let mut input = Vec::with_capacity(4 + key.len());
    input.extend_from_slice(&base_seed.to_le_bytes());
    input.extend_from_slice(key.as_bytes());

    let hash = blake3::hash(&input);

    let bytes: [u8; 4] = hash.as_bytes()[0..4].try_into().unwrap();
    u32::from_le_bytes(bytes)
}

/// Creates an RNG for the child at `index`.
pub fn create_child_rng(base_seed: u32, index: u32) -> Pcg32 {
    create_rng(derive_child_seed(base_seed, index))
}
