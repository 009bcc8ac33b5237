//! The stratified pixel sampler: a pixel is treated as an n x m grid
//! with one jittered sample per cell, component streams are shuffled
//! to decorrelate dimensions, and registered 2D arrays use the Latin
//! hypercube construction.

// crate
use crate::core::geometry::{Point2f, Point2i};
use crate::core::precision::Float;
use crate::core::sampler::{PixelSamplerCore, SamplerCore};
use crate::core::sampling::{
    latin_hypercube, shuffle, stratified_sample_1d, stratified_sample_2d,
};

#[derive(Debug, Clone)]
pub struct StratifiedSampler {
    pub core: SamplerCore,
    pub pixel: PixelSamplerCore,
    x_pixel_samples: usize,
    y_pixel_samples: usize,
    jitter_samples: bool,
}

impl StratifiedSampler {
    pub fn new(
        x_pixel_samples: usize,
        y_pixel_samples: usize,
        jitter_samples: bool,
        n_sampled_dimensions: usize,
    ) -> Self {
        let samples_per_pixel: usize = x_pixel_samples * y_pixel_samples;
        StratifiedSampler {
            core: SamplerCore::new(samples_per_pixel),
            pixel: PixelSamplerCore::new(samples_per_pixel, n_sampled_dimensions),
            x_pixel_samples,
            y_pixel_samples,
            jitter_samples,
        }
    }
    pub fn set_pixel(&mut self, p: Point2i) {
        self.core.set_pixel(p);
        self.pixel.reset_dimensions();
        let spp: usize = self.core.samples_per_pixel;
        // stratify each precomputed component stream, then shuffle it
        // so stream order does not correlate with stratum order
        for i in 0..self.pixel.samples_1d.len() {
            stratified_sample_1d(
                &mut self.pixel.samples_1d[i],
                spp as i32,
                &mut self.pixel.rng,
                self.jitter_samples,
            );
            shuffle(
                &mut self.pixel.samples_1d[i],
                spp as i32,
                1,
                &mut self.pixel.rng,
            );
        }
        for i in 0..self.pixel.samples_2d.len() {
            stratified_sample_2d(
                &mut self.pixel.samples_2d[i],
                self.x_pixel_samples as i32,
                self.y_pixel_samples as i32,
                &mut self.pixel.rng,
                self.jitter_samples,
            );
            shuffle(
                &mut self.pixel.samples_2d[i],
                spp as i32,
                1,
                &mut self.pixel.rng,
            );
        }
        // registered arrays: fresh strata per sample, Latin hypercube
        // in 2D to decorrelate the two array dimensions
        for i in 0..self.core.samples_1d_array_sizes.len() {
            let n: usize = self.core.samples_1d_array_sizes[i];
            for j in 0..spp {
                let slice: &mut [Float] =
                    &mut self.core.sample_array_1d[i][j * n..(j + 1) * n];
                stratified_sample_1d(slice, n as i32, &mut self.pixel.rng, self.jitter_samples);
                shuffle(slice, n as i32, 1, &mut self.pixel.rng);
            }
        }
        for i in 0..self.core.samples_2d_array_sizes.len() {
            let n: usize = self.core.samples_2d_array_sizes[i];
            for j in 0..spp {
                let slice: &mut [Point2f] =
                    &mut self.core.sample_array_2d[i][j * n..(j + 1) * n];
                latin_hypercube(slice, n as u32, &mut self.pixel.rng);
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
    pub fn clone_with_seed(&self, seed: u64) -> StratifiedSampler {
        let mut sampler: StratifiedSampler = self.clone();
        sampler.pixel.rng.set_sequence(seed);
        sampler
    }
    pub fn clone_random(&self) -> StratifiedSampler {
        let mut sampler: StratifiedSampler = self.clone();
        sampler.pixel.rng.set_random_sequence();
        sampler
    }
}
