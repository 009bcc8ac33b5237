//! The random pixel sampler: every component value is an independent
//! uniform draw. The baseline everything else is measured against.

// crate
use crate::core::geometry::{Point2f, Point2i};
use crate::core::precision::Float;
use crate::core::sampler::{PixelSamplerCore, SamplerCore};

#[derive(Debug, Clone)]
pub struct RandomSampler {
    pub core: SamplerCore,
    pub pixel: PixelSamplerCore,
}

impl RandomSampler {
    pub fn new(samples_per_pixel: usize, n_sampled_dimensions: usize) -> Self {
        RandomSampler {
            core: SamplerCore::new(samples_per_pixel),
            pixel: PixelSamplerCore::new(samples_per_pixel, n_sampled_dimensions),
        }
    }
    pub fn set_pixel(&mut self, p: Point2i) {
        self.core.set_pixel(p);
        self.pixel.reset_dimensions();
        let spp: usize = self.core.samples_per_pixel;
        for dim in 0..self.pixel.samples_1d.len() {
            for i in 0..spp {
                self.pixel.samples_1d[dim][i] = self.pixel.rng.uniform_float();
            }
        }
        for dim in 0..self.pixel.samples_2d.len() {
            for i in 0..spp {
                self.pixel.samples_2d[dim][i] = Point2f {
                    x: self.pixel.rng.uniform_float(),
                    y: self.pixel.rng.uniform_float(),
                };
            }
        }
        for k in 0..self.core.samples_1d_array_sizes.len() {
            for v in self.core.sample_array_1d[k].iter_mut() {
                *v = self.pixel.rng.uniform_float();
            }
        }
        for k in 0..self.core.samples_2d_array_sizes.len() {
            for v in self.core.sample_array_2d[k].iter_mut() {
                v.x = self.pixel.rng.uniform_float();
                v.y = self.pixel.rng.uniform_float();
            }
        }
    }
    pub fn begin_next_sample(&mut self) -> bool {
        self.pixel.reset_dimensions();
        self.core.begin_next_sample()
    }
    pub fn begin_sample_index(&mut self, sample_index: usize) -> bool {
        self.pixel.reset_dimensions();
        self.core.begin_sample_index(sample_index)
    }
    pub fn next_1d(&mut self) -> Float {
        self.pixel.next_1d(self.core.current_pixel_sample_index)
    }
    pub fn next_2d(&mut self) -> Point2f {
        self.pixel.next_2d(self.core.current_pixel_sample_index)
    }
    pub fn clone_with_seed(&self, seed: u64) -> RandomSampler {
        let mut sampler: RandomSampler = self.clone();
        sampler.pixel.rng.set_sequence(seed);
        sampler
    }
    pub fn clone_random(&self) -> RandomSampler {
        let mut sampler: RandomSampler = self.clone();
        sampler.pixel.rng.set_random_sequence();
        sampler
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_clones_agree_independent_clones_do_not() {
        let base: RandomSampler = RandomSampler::new(8, 2);
        let mut a: RandomSampler = base.clone_with_seed(9);
        let mut b: RandomSampler = base.clone_with_seed(9);
        let mut c: RandomSampler = base.clone_with_seed(10);
        a.set_pixel(Point2i { x: 1, y: 1 });
        b.set_pixel(Point2i { x: 1, y: 1 });
        c.set_pixel(Point2i { x: 1, y: 1 });
        let mut all_equal_c: bool = true;
        for _ in 0..16 {
            let va: Float = a.next_1d();
            assert_eq!(va, b.next_1d());
            if va != c.next_1d() {
                all_equal_c = false;
            }
        }
        assert!(!all_equal_c);
    }
}
