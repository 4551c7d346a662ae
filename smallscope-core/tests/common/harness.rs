//! Deterministic test support
//!
//! Reproducible noise for captures that should not depend on a clock or
//! platform RNG.

/// Linear congruential generator, reproducible across platforms
pub struct TestRng {
    state: u32,
}

impl TestRng {
    /// Generator with a fixed seed
    pub fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    /// Next byte
    pub fn next_u8(&mut self) -> u8 {
        self.state = self.state.wrapping_mul(1_103_515_245).wrapping_add(12_345);
        (self.state >> 16) as u8
    }

    /// `len` bytes of noise around `level`
    pub fn noise_around(&mut self, level: u8, spread: u8, len: usize) -> Vec<u8> {
        (0..len)
            .map(|_| {
                let jitter = self.next_u8() % spread.max(1);
                level.saturating_sub(spread / 2).saturating_add(jitter)
            })
            .collect()
    }
}
