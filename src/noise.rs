use fastnoise_lite::{FastNoiseLite, NoiseType};
use tessel_mesh_cpu::NoiseProvider;

use crate::config::NoiseSection;

/// OpenSimplex2 noise, shared by terrain generation and vertex jitter.
pub struct SimplexNoise {
    noise: FastNoiseLite,
}

impl SimplexNoise {
    pub fn new(cfg: &NoiseSection) -> Self {
        let mut noise = FastNoiseLite::with_seed(cfg.seed);
        noise.set_noise_type(Some(NoiseType::OpenSimplex2));
        noise.set_frequency(Some(cfg.frequency));
        Self { noise }
    }

    #[inline]
    pub fn height(&self, x: f32, z: f32) -> f32 {
        self.noise.get_noise_2d(x, z)
    }
}

impl NoiseProvider for SimplexNoise {
    #[inline]
    fn sample(&self, x: f32, y: f32, z: f32) -> f32 {
        self.noise.get_noise_3d(x, y, z)
    }
}
