use glam::Vec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Seeded sampler for uniformly scattered points
pub struct SpreadSampler {
    rng: StdRng,
}

impl SpreadSampler {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Random float in `[-range / 2, range / 2)`
    pub fn spread(&mut self, range: f32) -> f32 {
        if !range.is_finite() || range <= 0.0 {
            return 0.0;
        }
        let half = range * 0.5;
        self.rng.random_range(-half..half)
    }

    /// Random point inside an axis-aligned cube of side `range` centred on the origin
    pub fn point(&mut self, range: f32) -> Vec3 {
        Vec3::new(self.spread(range), self.spread(range), self.spread(range))
    }
}
