//! Seeded, repeatable shuffling.
//!
//! Identical seeds always produce identical orderings, on every platform.
//! Not suitable for anything security related.

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// Seed for [`shuffle`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Seed(pub u64);

impl Seed {
    /// Derive a seed from the character codes of `key` (FNV-1a).
    pub fn from_key(key: &str) -> Self {
        let hash = key
            .bytes()
            .fold(FNV_OFFSET, |acc, b| (acc ^ b as u64).wrapping_mul(FNV_PRIME));
        Seed(if hash == 0 { 1 } else { hash })
    }
}

/// Permute `items` deterministically from `seed`
pub fn shuffle<T>(mut items: Vec<T>, seed: Seed) -> Vec<T> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed.0);
    items.shuffle(&mut rng);
    items
}
