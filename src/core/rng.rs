//! A small, seedable PCG random number generator. Every worker thread
//! owns an independent instance; nothing here is shared.

use std::hash::{BuildHasher, Hasher};

use crate::core::precision::Float;

#[cfg(not(feature = "float_as_double"))]
pub const FLOAT_ONE_MINUS_EPSILON: Float = hexf::hexf32!("0x1.fffffep-1");
#[cfg(feature = "float_as_double")]
pub const FLOAT_ONE_MINUS_EPSILON: Float = hexf::hexf64!("0x1.fffffffffffffp-1");

const PCG32_DEFAULT_STATE: u64 = 0x853c_49e6_748f_ea9b;
const PCG32_DEFAULT_STREAM: u64 = 0xda3e_39cb_94b9_5bdb;
const PCG32_MULT: u64 = 0x5851_f42d_4c95_7f2d;

#[derive(Debug, Clone)]
pub struct Rng {
    state: u64,
    inc: u64,
}

impl Default for Rng {
    fn default() -> Self {
        Rng {
            state: PCG32_DEFAULT_STATE,
            inc: PCG32_DEFAULT_STREAM,
        }
    }
}

impl Rng {
    pub fn new() -> Self {
        Rng::default()
    }
    /// Restart the generator on the stream selected by *initseq*.
    pub fn set_sequence(&mut self, initseq: u64) {
        self.state = 0_u64;
        self.inc = (initseq << 1) | 1;
        self.uniform_uint32();
        self.state = self.state.wrapping_add(PCG32_DEFAULT_STATE);
        self.uniform_uint32();
    }
    /// Reseed from the operating system's entropy source (via the
    /// randomly keyed std hasher).
    pub fn set_random_sequence(&mut self) {
        let mut hasher = std::collections::hash_map::RandomState::new().build_hasher();
        hasher.write_u64(self.state);
        self.set_sequence(hasher.finish());
    }
    pub fn uniform_uint32(&mut self) -> u32 {
        let oldstate: u64 = self.state;
        self.state = oldstate.wrapping_mul(PCG32_MULT).wrapping_add(self.inc);
        let xorshifted: u32 = (((oldstate >> 18) ^ oldstate) >> 27) as u32;
        let rot: u32 = (oldstate >> 59) as u32;
        (xorshifted >> rot) | (xorshifted << ((!rot).wrapping_add(1) & 31))
    }
    /// Uniform integer in [0, b), free of modulo bias.
    pub fn uniform_uint32_bounded(&mut self, b: u32) -> u32 {
        let threshold: u32 = (!b).wrapping_add(1) % b;
        loop {
            let r: u32 = self.uniform_uint32();
            if r >= threshold {
                return r % b;
            }
        }
    }
    /// Uniform float in [0, 1).
    pub fn uniform_float(&mut self) -> Float {
        (self.uniform_uint32() as Float * hexf::hexf32!("0x1.0p-32") as Float)
            .min(FLOAT_ONE_MINUS_EPSILON)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_stream() {
        let mut a: Rng = Rng::new();
        let mut b: Rng = Rng::new();
        a.set_sequence(7);
        b.set_sequence(7);
        for _ in 0..64 {
            assert_eq!(a.uniform_uint32(), b.uniform_uint32());
        }
    }

    #[test]
    fn different_seeds_diverge() {
        let mut a: Rng = Rng::new();
        let mut b: Rng = Rng::new();
        a.set_sequence(1);
        b.set_sequence(2);
        let same: usize = (0..64)
            .filter(|_| a.uniform_uint32() == b.uniform_uint32())
            .count();
        assert!(same < 4);
    }

    #[test]
    fn uniform_float_stays_in_unit_interval() {
        let mut rng: Rng = Rng::new();
        rng.set_sequence(3);
        for _ in 0..10_000 {
            let u: Float = rng.uniform_float();
            assert!(u >= 0.0 && u < 1.0);
        }
    }

    #[test]
    fn bounded_draws_cover_range() {
        let mut rng: Rng = Rng::new();
        rng.set_sequence(11);
        let mut seen: [bool; 7] = [false; 7];
        for _ in 0..1000 {
            seen[rng.uniform_uint32_bounded(7) as usize] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }
}
