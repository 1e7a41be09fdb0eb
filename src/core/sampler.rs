use rand::{Rng, SeedableRng, rngs::StdRng};
use tracing::debug;

use crate::core::speed::{SPEED_MAX, SPEED_MIN, SpeedPair, to_shifted};
use crate::error::{LanesplitError, Result};

/// Frozen set of speed pairs in the shifted frame.
///
/// Every threshold is evaluated against the same pairs, so differences
/// between `E(a)` values are not drowned by resampling noise.
#[derive(Clone, Debug)]
pub struct SpeedSample {
    pairs: Vec<SpeedPair>,
    seed: u64,
}

impl SpeedSample {
    /// Draw `n` pairs of independent uniform speeds on [SPEED_MIN, SPEED_MAX).
    pub fn draw(n: usize, seed: u64) -> Result<Self> {
        if n == 0 {
            return Err(LanesplitError::EmptySample);
        }
        let mut rng = StdRng::seed_from_u64(seed);
        let pairs = draw_pairs(&mut rng, n);
        debug!(n, seed, "drew speed sample");
        Ok(Self { pairs, seed })
    }

    /// Wrap pairs that were produced elsewhere (fixtures, replays).
    pub fn from_pairs(pairs: Vec<SpeedPair>) -> Result<Self> {
        if pairs.is_empty() {
            return Err(LanesplitError::EmptySample);
        }
        Ok(Self { pairs, seed: 0 })
    }

    #[inline]
    pub fn pairs(&self) -> &[SpeedPair] {
        &self.pairs
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

fn draw_pairs<R: Rng + ?Sized>(rng: &mut R, n: usize) -> Vec<SpeedPair> {
    (0..n)
        .map(|_| {
            let v1 = rng.random_range(SPEED_MIN..SPEED_MAX);
            let v2 = rng.random_range(SPEED_MIN..SPEED_MAX);
            SpeedPair::new(to_shifted(v1), to_shifted(v2))
        })
        .collect()
}
