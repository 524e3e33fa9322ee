//! Seeded shuffle for playlist and album sources
//!
//! Shuffle orders must be reproducible from the seed alone, so the
//! generator and the permutation algorithm are both fixed here instead of
//! relying on `rand`'s default RNG or its `SliceRandom` internals:
//!
//! - Generator: SplitMix64 (Steele, Lea, Flood 2014). State advances by
//!   `0x9E3779B97F4A7C15`; output is the state mixed with
//!   `(z ^ z >> 30) * 0xBF58476D1CE4E5B9`, `(z ^ z >> 27) * 0x94D049BB133111EB`,
//!   `z ^ z >> 31`. The seed is the initial state.
//! - Permutation: Fisher-Yates from the back, `j = next_u64() % (i + 1)`.

use rand::{RngCore, SeedableRng};

const GOLDEN_GAMMA: u64 = 0x9E37_79B9_7F4A_7C15;

/// SplitMix64 pseudo-random generator
#[derive(Debug, Clone)]
pub struct SplitMix64 {
    state: u64,
}

impl SplitMix64 {
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }
}

impl RngCore for SplitMix64 {
    fn next_u32(&mut self) -> u32 {
        (self.next_u64() >> 32) as u32
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(GOLDEN_GAMMA);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(8) {
            let bytes = self.next_u64().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl SeedableRng for SplitMix64 {
    type Seed = [u8; 8];

    fn from_seed(seed: Self::Seed) -> Self {
        Self::new(u64::from_le_bytes(seed))
    }

    fn seed_from_u64(state: u64) -> Self {
        Self::new(state)
    }
}

/// Fisher-Yates shuffle driven by `rng`
pub fn shuffle_in_place<T, R: RngCore>(items: &mut [T], rng: &mut R) {
    for i in (1..items.len()).rev() {
        let j = (rng.next_u64() % (i as u64 + 1)) as usize;
        items.swap(i, j);
    }
}

/// Build a shuffled play order over `0..len`
///
/// The original index `pinned` is placed at `position` so the track that is
/// currently playing keeps its place under the cursor; every other index is
/// permuted by [`shuffle_in_place`] seeded with `seed`.
///
/// Returns the identity order when `pinned` or `position` is out of range.
pub fn shuffled_order(len: usize, pinned: usize, position: usize, seed: u64) -> Vec<usize> {
    if pinned >= len || position >= len {
        return (0..len).collect();
    }

    let mut rest: Vec<usize> = (0..len).filter(|&index| index != pinned).collect();
    let mut rng = SplitMix64::seed_from_u64(seed);
    shuffle_in_place(&mut rest, &mut rng);

    rest.insert(position, pinned);
    rest
}
