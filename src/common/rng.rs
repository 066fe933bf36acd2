//! Injectable randomness for decision points (waypoint choice, attack roll).

use bevy::prelude::*;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Random source consumed by the enemy brain.
pub trait RandomSource {
    /// Uniform index in `0..len`. Callers guarantee `len > 0`.
    fn pick_index(&mut self, len: usize) -> usize;

    /// Uniform percentage roll in `0..100`.
    fn roll_percent(&mut self) -> u32;
}

/// Seeded game RNG (ChaCha8, deterministic for a given seed).
#[derive(Resource)]
pub struct GameRng {
    rng: ChaCha8Rng,
    seed: u64,
}

impl GameRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl RandomSource for GameRng {
    fn pick_index(&mut self, len: usize) -> usize {
        self.rng.gen_range(0..len)
    }

    fn roll_percent(&mut self) -> u32 {
        self.rng.gen_range(0..100)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_sequence() {
        let mut a = GameRng::new(7);
        let mut b = GameRng::new(7);
        for _ in 0..64 {
            assert_eq!(a.roll_percent(), b.roll_percent());
            assert_eq!(a.pick_index(5), b.pick_index(5));
        }
    }

    #[test]
    fn rolls_stay_in_range() {
        let mut rng = GameRng::new(0xC0FFEE);
        for _ in 0..10_000 {
            assert!(rng.roll_percent() < 100);
            assert!(rng.pick_index(3) < 3);
        }
    }
}
