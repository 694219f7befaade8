//! RNG module - deterministic deck shuffling
//!
//! A simple LCG drives the Fisher-Yates shuffle of the card pool and the
//! background dither palette, so a seed reproduces a whole game.

/// 32-bit linear congruential generator (Numerical Recipes constants).
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    pub fn new(seed: u32) -> Self {
        // Zero is remapped so every seed yields a usable stream.
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    pub fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Value in `[0, max)`.
    pub fn next_range(&mut self, max: u32) -> u32 {
        // The low bits of an LCG are weak; use the high half.
        (self.next_u32() >> 16) % max
    }

    /// In-place Fisher-Yates shuffle.
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        for i in (1..slice.len()).rev() {
            let j = self.next_range((i + 1) as u32) as usize;
            slice.swap(i, j);
        }
    }

    /// Current state (reseeding with it continues the same sequence)
    pub fn state(&self) -> u32 {
        self.state
    }
}

impl Default for SimpleRng {
    fn default() -> Self {
        Self::new(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_deck() {
        let mut a: [u8; 52] = core::array::from_fn(|i| i as u8);
        let mut b = a;
        SimpleRng::new(2024).shuffle(&mut a);
        SimpleRng::new(2024).shuffle(&mut b);
        assert_eq!(a, b);

        let mut c: [u8; 52] = core::array::from_fn(|i| i as u8);
        SimpleRng::new(2025).shuffle(&mut c);
        assert_ne!(a, c);
    }

    #[test]
    fn test_zero_seed_is_usable() {
        let mut rng = SimpleRng::new(0);
        assert_eq!(rng.state(), 1);
        assert_ne!(rng.next_u32(), rng.next_u32());
    }

    #[test]
    fn test_state_resumes_sequence() {
        let mut rng = SimpleRng::new(5);
        rng.next_u32();
        let mut resumed = SimpleRng::new(rng.state());
        assert_eq!(rng.next_u32(), resumed.next_u32());
    }

    #[test]
    fn test_next_range_stays_in_bounds() {
        let mut rng = SimpleRng::new(7);
        for max in 1..60 {
            assert!(rng.next_range(max) < max);
        }
    }

    #[test]
    fn test_shuffle_is_a_permutation() {
        let mut rng = SimpleRng::new(99);
        let mut values: [u8; 52] = core::array::from_fn(|i| i as u8);
        rng.shuffle(&mut values);

        let mut seen = [false; 52];
        for v in values {
            assert!(!seen[v as usize], "duplicate {}", v);
            seen[v as usize] = true;
        }
        assert_ne!(values, core::array::from_fn(|i| i as u8));
    }
}
