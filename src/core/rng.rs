// Copyright @yucwang 2026

use crate::math::constants::Float;

/// Small deterministic generator for sweeps and randomized checks. Not meant
/// for sampling in a renderer.
pub struct LcgRng {
    state: u64,
}

impl LcgRng {
    pub fn new(seed: u64) -> Self {
        let mut rng = Self { state: seed ^ 0x9e37_79b9_7f4a_7c15 };
        rng.next_u32();
        rng
    }

    pub fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        (self.state >> 33) as u32 ^ (self.state >> 11) as u32
    }

    /// Uniform in `[0, 1)`.
    pub fn next_f32(&mut self) -> Float {
        (self.next_u32() >> 8) as Float * (1.0 / (1u32 << 24) as Float)
    }

    pub fn next_in(&mut self, lo: Float, hi: Float) -> Float {
        lo + (hi - lo) * self.next_f32()
    }
}
