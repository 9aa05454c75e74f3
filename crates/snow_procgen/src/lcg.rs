//! Park-Miller minimal standard generator.
//!
//! Tiny and fully reproducible: the same seed always yields the same particle
//! field, so field contents can be asserted exactly.

use rand::{RngCore, SeedableRng};

/// 2^31 - 1.
pub const MODULUS: u64 = 2_147_483_647;
/// 7^5.
pub const MULTIPLIER: u64 = 16_807;
/// Seed used for every particle field.
pub const DEFAULT_SEED: u32 = 15;

/// Linear congruential generator `state' = state * 16807 mod (2^31 - 1)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParkMiller {
    state: u32,
}

impl Default for ParkMiller {
    fn default() -> Self {
        Self::new(DEFAULT_SEED)
    }
}

impl ParkMiller {
    /// Seeds are reduced modulo 2^31 - 1; zero would lock the generator and becomes one.
    pub fn new(seed: u32) -> Self {
        let state = (u64::from(seed) % MODULUS) as u32;
        Self {
            state: state.max(1),
        }
    }

    /// Advance and return the raw state in `[1, 2^31 - 2]`.
    fn step(&mut self) -> u32 {
        self.state = (u64::from(self.state) * MULTIPLIER % MODULUS) as u32;
        self.state
    }

    /// Next value in `[0, 1)`.
    pub fn next_unit(&mut self) -> f64 {
        f64::from(self.step() - 1) / (MODULUS - 1) as f64
    }

    /// `min + (max - min) * next_unit()`, rounded half up to an integer.
    pub fn between(&mut self, min: f64, max: f64) -> f64 {
        (min + (max - min) * self.next_unit() + 0.5).floor()
    }
}

impl RngCore for ParkMiller {
    fn next_u32(&mut self) -> u32 {
        (self.next_unit() * 4_294_967_296.0) as u32
    }

    fn next_u64(&mut self) -> u64 {
        (u64::from(self.next_u32()) << 32) | u64::from(self.next_u32())
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(4) {
            let bytes = self.next_u32().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl SeedableRng for ParkMiller {
    type Seed = [u8; 4];

    fn from_seed(seed: Self::Seed) -> Self {
        Self::new(u32::from_le_bytes(seed))
    }
}
