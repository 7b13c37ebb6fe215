//! Background starfield: a deterministic cloud of white points scattered
//! uniformly through a cube centred on the sun.

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// White point cloud surrounding the scene.
#[derive(Clone, Debug)]
pub struct Starfield {
    /// Star positions in scene units.
    pub positions: Vec<glam::Vec3>,
    /// Rendered point size.
    pub point_size: f32,
    /// Point color (linear RGB).
    pub color: [f32; 3],
}

/// Generates a starfield from a seed.
pub struct StarfieldGenerator {
    seed: u64,
    star_count: u32,
    extent: f32,
}

impl StarfieldGenerator {
    /// `extent` is the edge length of the cube the stars fill.
    pub fn new(seed: u64, star_count: u32, extent: f32) -> Self {
        Self {
            seed,
            star_count,
            extent,
        }
    }

    /// Generate the starfield. Deterministic for a given seed.
    pub fn generate(&self, point_size: f32) -> Starfield {
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        let mut positions = Vec::with_capacity(self.star_count as usize);

        for _ in 0..self.star_count {
            let x = (rng.random::<f32>() - 0.5) * self.extent;
            let y = (rng.random::<f32>() - 0.5) * self.extent;
            let z = (rng.random::<f32>() - 0.5) * self.extent;
            positions.push(glam::Vec3::new(x, y, z));
        }

        Starfield {
            positions,
            point_size,
            color: [1.0, 1.0, 1.0],
        }
    }
}
