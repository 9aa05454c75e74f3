//! Particle field generation for the snow cube.

use crate::lcg::{ParkMiller, DEFAULT_SEED};
use bytemuck::{Pod, Zeroable};
use rand::SeedableRng;

/// One flake as stored on the GPU: rest position and oscillation vector.
///
/// `velocity` doubles as the phase seed (`velocity.x`) so no separate
/// phase attribute is needed.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Particle {
    pub position: [f32; 3],
    pub velocity: [f32; 3],
}

impl Particle {
    /// Floats per particle in the packed buffer.
    pub const FLOATS: usize = 6;
}

/// Fixed-capacity set of flakes filling a cube around the origin.
#[derive(Debug, Clone, PartialEq)]
pub struct ParticleField {
    particles: Vec<Particle>,
    dispersion: f64,
}

impl ParticleField {
    /// Generate `capacity` flakes from the default seed.
    pub fn generate(capacity: usize, half_extent: f64, dispersion: f64) -> Self {
        let mut rng = ParkMiller::from_seed(DEFAULT_SEED.to_le_bytes());
        Self::generate_with(&mut rng, capacity, half_extent, dispersion)
    }

    /// Generate `capacity` flakes drawing from `rng`.
    ///
    /// Positions are integers in `[-half_extent, half_extent]` on X and Y and
    /// `[-half_extent, 0]` on Z, so the cube is twice as deep below the
    /// horizon as it is wide. Velocities are integers in
    /// `[-dispersion, dispersion]` per axis.
    pub fn generate_with(
        rng: &mut ParkMiller,
        capacity: usize,
        half_extent: f64,
        dispersion: f64,
    ) -> Self {
        let mut particles = Vec::with_capacity(capacity);
        for _ in 0..capacity {
            let position = [
                rng.between(-half_extent, half_extent) as f32,
                rng.between(-half_extent, half_extent) as f32,
                rng.between(-half_extent, 0.0) as f32,
            ];
            let velocity = [
                rng.between(-dispersion, dispersion) as f32,
                rng.between(-dispersion, dispersion) as f32,
                rng.between(-dispersion, dispersion) as f32,
            ];
            particles.push(Particle { position, velocity });
        }

        log::debug!(
            "Generated {} snow particles (half extent {:.1}, dispersion {})",
            capacity,
            half_extent,
            dispersion
        );

        Self {
            particles,
            dispersion,
        }
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Raw bytes for GPU upload.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.particles)
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn dispersion(&self) -> f64 {
        self.dispersion
    }
}
