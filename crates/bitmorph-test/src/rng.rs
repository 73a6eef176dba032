//! Deterministic pseudo-random test images

use bitmorph_core::{BitImage, BitSnk};

/// Simple linear congruential generator for reproducible test patterns.
///
/// Uses the 64-bit multiplier and increment from Knuth's MMIX and takes the
/// high bits of the state, which are the well-mixed ones.
#[derive(Debug, Clone)]
pub struct TestRng {
    state: u64,
}

impl TestRng {
    /// Generator seeded with `seed`; equal seeds give equal sequences.
    pub fn new(seed: u64) -> Self {
        Self {
            state: seed ^ 0x5DEE_CE66_D1CE_4E5B,
        }
    }

    /// Advance the state and return it.
    pub fn next_u64(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);
        self.state
    }

    /// Upper 32 bits of the next state.
    pub fn next_u32(&mut self) -> u32 {
        (self.next_u64() >> 32) as u32
    }

    /// Uniform value in `0..n` (`n > 0`).
    pub fn below(&mut self, n: usize) -> usize {
        (self.next_u32() as u64 * n as u64 >> 32) as usize
    }

    /// Uniform value in `[0, 1)` with 53 bits of precision.
    pub fn unit(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// `true` with probability `p`.
    pub fn chance(&mut self, p: f64) -> bool {
        self.unit() < p
    }
}

/// Random image where each pixel is set with probability `density`.
pub fn random_bits(width: usize, height: usize, density: f64, seed: u64) -> BitImage {
    let mut rng = TestRng::new(seed);
    let mut img = BitImage::with_size(width, height);
    for i in 0..width {
        let mut snk = BitSnk::new(img.line_mut(i), height, 0);
        for _ in 0..height {
            snk.put_bit(rng.chance(density));
        }
    }
    img
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_bits_is_reproducible() {
        let a = random_bits(17, 45, 0.5, 9);
        let b = random_bits(17, 45, 0.5, 9);
        assert_eq!(a, b);
        assert_ne!(a, random_bits(17, 45, 0.5, 10));
    }

    #[test]
    fn test_density_extremes() {
        assert_eq!(random_bits(8, 40, 0.0, 1).count(), 0);
        assert_eq!(random_bits(8, 40, 1.0, 1).count(), 320);
        let half = random_bits(100, 100, 0.5, 3).count();
        assert!((4000..6000).contains(&half), "count {half}");
    }

    #[test]
    fn test_below_range() {
        let mut rng = TestRng::new(4);
        let mut seen = [false; 7];
        for _ in 0..1000 {
            let v = rng.below(7);
            assert!(v < 7);
            seen[v] = true;
        }
        // every value turns up, including the upper half of the range
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn test_unit_covers_range() {
        let mut rng = TestRng::new(5);
        let values: Vec<f64> = (0..1000).map(|_| rng.unit()).collect();
        assert!(values.iter().all(|v| (0.0..1.0).contains(v)));
        assert!(values.iter().any(|&v| v > 0.9));
        assert!(values.iter().any(|&v| v < 0.1));
    }
}
