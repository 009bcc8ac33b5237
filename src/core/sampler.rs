//! The sampler contract: for every pixel a sampler delivers a fixed
//! number of samples, each an unbounded stream of 1D and 2D values in
//! [0,1), plus optional pre-registered arrays whose sizes are fixed at
//! setup time. Concrete samplers either precompute everything for one
//! pixel (pixel samplers) or index into a global low-discrepancy
//! sequence (global samplers).

// crate
use crate::core::geometry::{Point2f, Point2i};
use crate::core::precision::Float;
use crate::core::rng::Rng;
use crate::samplers::halton::HaltonSampler;
use crate::samplers::random::RandomSampler;
use crate::samplers::stratified::StratifiedSampler;
use crate::samplers::uniform::UniformSampler;

/// Everything the camera needs to generate one primary ray.
#[derive(Debug, Default, Copy, Clone)]
pub struct CameraSample {
    pub sensor_point: Point2f,
    pub lens_point: Point2f,
    pub time: Float,
}

/// State shared by all sampler kinds: the bound pixel, the index of
/// the sample in flight, and the registered component arrays.
#[derive(Debug, Clone)]
pub struct SamplerCore {
    pub samples_per_pixel: usize,
    pub current_pixel: Point2i,
    pub current_pixel_sample_index: usize,
    pub samples_1d_array_sizes: Vec<usize>,
    pub samples_2d_array_sizes: Vec<usize>,
    pub sample_array_1d: Vec<Vec<Float>>,
    pub sample_array_2d: Vec<Vec<Point2f>>,
    array_1d_offset: usize,
    array_2d_offset: usize,
}

impl SamplerCore {
    pub fn new(samples_per_pixel: usize) -> Self {
        SamplerCore {
            samples_per_pixel,
            current_pixel: Point2i::default(),
            current_pixel_sample_index: 0,
            samples_1d_array_sizes: Vec::new(),
            samples_2d_array_sizes: Vec::new(),
            sample_array_1d: Vec::new(),
            sample_array_2d: Vec::new(),
            array_1d_offset: 0,
            array_2d_offset: 0,
        }
    }
    pub fn set_pixel(&mut self, p: Point2i) {
        self.current_pixel = p;
        self.current_pixel_sample_index = 0;
        self.array_1d_offset = 0;
        self.array_2d_offset = 0;
    }
    pub fn begin_next_sample(&mut self) -> bool {
        self.array_1d_offset = 0;
        self.array_2d_offset = 0;
        self.current_pixel_sample_index += 1;
        self.current_pixel_sample_index < self.samples_per_pixel
    }
    pub fn begin_sample_index(&mut self, sample_index: usize) -> bool {
        self.array_1d_offset = 0;
        self.array_2d_offset = 0;
        self.current_pixel_sample_index = sample_index;
        self.current_pixel_sample_index < self.samples_per_pixel
    }
    pub fn request_1d_array(&mut self, n: usize) {
        self.samples_1d_array_sizes.push(n);
        self.sample_array_1d
            .push(vec![0.0 as Float; n * self.samples_per_pixel]);
    }
    pub fn request_2d_array(&mut self, n: usize) {
        self.samples_2d_array_sizes.push(n);
        self.sample_array_2d
            .push(vec![Point2f::default(); n * self.samples_per_pixel]);
    }
    pub fn get_1d_array(&mut self, n: usize) -> Option<&[Float]> {
        if self.array_1d_offset == self.sample_array_1d.len() {
            return None;
        }
        assert_eq!(self.samples_1d_array_sizes[self.array_1d_offset], n);
        assert!(self.current_pixel_sample_index < self.samples_per_pixel);
        let start: usize = self.current_pixel_sample_index * n;
        let slice: &[Float] = &self.sample_array_1d[self.array_1d_offset][start..start + n];
        self.array_1d_offset += 1;
        Some(slice)
    }
    pub fn get_2d_array(&mut self, n: usize) -> Option<&[Point2f]> {
        if self.array_2d_offset == self.sample_array_2d.len() {
            return None;
        }
        assert_eq!(self.samples_2d_array_sizes[self.array_2d_offset], n);
        assert!(self.current_pixel_sample_index < self.samples_per_pixel);
        let start: usize = self.current_pixel_sample_index * n;
        let slice: &[Point2f] = &self.sample_array_2d[self.array_2d_offset][start..start + n];
        self.array_2d_offset += 1;
        Some(slice)
    }
}

/// State shared by the pixel samplers: per-dimension precomputed
/// streams and the fallback RNG for dimensions past the precomputed
/// ones.
#[derive(Debug, Clone)]
pub struct PixelSamplerCore {
    pub samples_1d: Vec<Vec<Float>>,
    pub samples_2d: Vec<Vec<Point2f>>,
    pub current_1d_dimension: usize,
    pub current_2d_dimension: usize,
    pub rng: Rng,
}

impl PixelSamplerCore {
    pub fn new(samples_per_pixel: usize, n_sampled_dimensions: usize) -> Self {
        let mut samples_1d: Vec<Vec<Float>> = Vec::with_capacity(n_sampled_dimensions);
        let mut samples_2d: Vec<Vec<Point2f>> = Vec::with_capacity(n_sampled_dimensions);
        for _ in 0..n_sampled_dimensions {
            samples_1d.push(vec![0.0 as Float; samples_per_pixel]);
            samples_2d.push(vec![Point2f::default(); samples_per_pixel]);
        }
        PixelSamplerCore {
            samples_1d,
            samples_2d,
            current_1d_dimension: 0,
            current_2d_dimension: 0,
            rng: Rng::new(),
        }
    }
    pub fn reset_dimensions(&mut self) {
        self.current_1d_dimension = 0;
        self.current_2d_dimension = 0;
    }
    pub fn next_1d(&mut self, sample_index: usize) -> Float {
        if self.current_1d_dimension < self.samples_1d.len() {
            let v: Float = self.samples_1d[self.current_1d_dimension][sample_index];
            self.current_1d_dimension += 1;
            v
        } else {
            self.rng.uniform_float()
        }
    }
    pub fn next_2d(&mut self, sample_index: usize) -> Point2f {
        if self.current_2d_dimension < self.samples_2d.len() {
            let v: Point2f = self.samples_2d[self.current_2d_dimension][sample_index];
            self.current_2d_dimension += 1;
            v
        } else {
            Point2f {
                x: self.rng.uniform_float(),
                y: self.rng.uniform_float(),
            }
        }
    }
}

pub enum Sampler {
    Stratified(StratifiedSampler),
    Uniform(UniformSampler),
    Random(RandomSampler),
    Halton(HaltonSampler),
}

impl Sampler {
    pub fn set_pixel(&mut self, p: Point2i) {
        match self {
            Sampler::Stratified(sampler) => sampler.set_pixel(p),
            Sampler::Uniform(sampler) => sampler.set_pixel(p),
            Sampler::Random(sampler) => sampler.set_pixel(p),
            Sampler::Halton(sampler) => sampler.set_pixel(p),
        }
    }
    pub fn begin_next_sample(&mut self) -> bool {
        match self {
            Sampler::Stratified(sampler) => sampler.begin_next_sample(),
            Sampler::Uniform(sampler) => sampler.begin_next_sample(),
            Sampler::Random(sampler) => sampler.begin_next_sample(),
            Sampler::Halton(sampler) => sampler.begin_next_sample(),
        }
    }
    pub fn begin_sample_index(&mut self, sample_index: usize) -> bool {
        match self {
            Sampler::Stratified(sampler) => sampler.begin_sample_index(sample_index),
            Sampler::Uniform(sampler) => sampler.begin_sample_index(sample_index),
            Sampler::Random(sampler) => sampler.begin_sample_index(sample_index),
            Sampler::Halton(sampler) => sampler.begin_sample_index(sample_index),
        }
    }
    pub fn next_1d(&mut self) -> Float {
        match self {
            Sampler::Stratified(sampler) => sampler.next_1d(),
            Sampler::Uniform(sampler) => sampler.next_1d(),
            Sampler::Random(sampler) => sampler.next_1d(),
            Sampler::Halton(sampler) => sampler.next_1d(),
        }
    }
    pub fn next_2d(&mut self) -> Point2f {
        match self {
            Sampler::Stratified(sampler) => sampler.next_2d(),
            Sampler::Uniform(sampler) => sampler.next_2d(),
            Sampler::Random(sampler) => sampler.next_2d(),
            Sampler::Halton(sampler) => sampler.next_2d(),
        }
    }
    pub fn request_1d_array(&mut self, n: usize) {
        self.core_mut().request_1d_array(n);
    }
    pub fn request_2d_array(&mut self, n: usize) {
        self.core_mut().request_2d_array(n);
    }
    pub fn get_1d_array(&mut self, n: usize) -> Option<&[Float]> {
        self.core_mut().get_1d_array(n)
    }
    pub fn get_2d_array(&mut self, n: usize) -> Option<&[Point2f]> {
        self.core_mut().get_2d_array(n)
    }
    pub fn samples_per_pixel(&self) -> usize {
        self.core().samples_per_pixel
    }
    pub fn current_sample_index(&self) -> usize {
        self.core().current_pixel_sample_index
    }
    /// Independent instance for another worker thread, deterministic
    /// for the given seed.
    pub fn clone_with_seed(&self, seed: u64) -> Sampler {
        match self {
            Sampler::Stratified(sampler) => Sampler::Stratified(sampler.clone_with_seed(seed)),
            Sampler::Uniform(sampler) => Sampler::Uniform(sampler.clone_with_seed(seed)),
            Sampler::Random(sampler) => Sampler::Random(sampler.clone_with_seed(seed)),
            Sampler::Halton(sampler) => Sampler::Halton(sampler.clone_with_seed(seed)),
        }
    }
    /// Independent instance reseeded from the OS entropy source.
    pub fn clone_random(&self) -> Sampler {
        match self {
            Sampler::Stratified(sampler) => Sampler::Stratified(sampler.clone_random()),
            Sampler::Uniform(sampler) => Sampler::Uniform(sampler.clone_random()),
            Sampler::Random(sampler) => Sampler::Random(sampler.clone_random()),
            Sampler::Halton(sampler) => Sampler::Halton(sampler.clone_with_seed(0)),
        }
    }
    pub fn generate_camera_sample(&mut self, pixel: Point2i) -> CameraSample {
        let sensor_point: Point2f = Point2f::from(pixel) + self.next_2d();
        let time: Float = self.next_1d();
        let lens_point: Point2f = self.next_2d();
        CameraSample {
            sensor_point,
            lens_point,
            time,
        }
    }
    fn core(&self) -> &SamplerCore {
        match self {
            Sampler::Stratified(sampler) => &sampler.core,
            Sampler::Uniform(sampler) => &sampler.core,
            Sampler::Random(sampler) => &sampler.core,
            Sampler::Halton(sampler) => &sampler.core,
        }
    }
    fn core_mut(&mut self) -> &mut SamplerCore {
        match self {
            Sampler::Stratified(sampler) => &mut sampler.core,
            Sampler::Uniform(sampler) => &mut sampler.core,
            Sampler::Random(sampler) => &mut sampler.core,
            Sampler::Halton(sampler) => &mut sampler.core,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geometry::Bounds2i;

    fn all_samplers() -> Vec<Sampler> {
        let bounds: Bounds2i = Bounds2i::new(Point2i { x: 0, y: 0 }, Point2i { x: 8, y: 8 });
        vec![
            Sampler::Stratified(StratifiedSampler::new(2, 2, true, 4)),
            Sampler::Uniform(UniformSampler::new(2, 2, 4)),
            Sampler::Random(RandomSampler::new(4, 4)),
            Sampler::Halton(HaltonSampler::new(4, &bounds)),
        ]
    }

    #[test]
    fn begin_next_sample_returns_true_exactly_n_minus_1_times() {
        for mut sampler in all_samplers() {
            let n: usize = sampler.samples_per_pixel();
            assert_eq!(n, 4);
            sampler.set_pixel(Point2i { x: 3, y: 5 });
            let mut advances: usize = 0;
            while sampler.begin_next_sample() {
                advances += 1;
            }
            assert_eq!(advances, n - 1);
        }
    }

    #[test]
    fn streams_stay_in_unit_interval() {
        for mut sampler in all_samplers() {
            sampler.set_pixel(Point2i { x: 0, y: 0 });
            loop {
                for _ in 0..16 {
                    let u: Float = sampler.next_1d();
                    assert!((0.0..1.0).contains(&u));
                    let p: Point2f = sampler.next_2d();
                    assert!((0.0..1.0).contains(&p.x));
                    assert!((0.0..1.0).contains(&p.y));
                }
                if !sampler.begin_next_sample() {
                    break;
                }
            }
        }
    }

    #[test]
    fn registered_arrays_are_filled_and_consumed_in_order() {
        for mut sampler in all_samplers() {
            sampler.request_1d_array(3);
            sampler.request_2d_array(5);
            sampler.set_pixel(Point2i { x: 1, y: 2 });
            loop {
                let a1 = sampler.get_1d_array(3).map(<[Float]>::to_vec);
                assert_eq!(a1.map(|a| a.len()), Some(3));
                {
                    let a2 = sampler.get_2d_array(5);
                    assert!(a2.is_some());
                    assert!(a2
                        .unwrap()
                        .iter()
                        .all(|p| (0.0..1.0).contains(&p.x) && (0.0..1.0).contains(&p.y)));
                }
                assert!(sampler.get_2d_array(5).is_none());
                if !sampler.begin_next_sample() {
                    break;
                }
            }
        }
    }

    #[test]
    fn seeded_clones_reproduce_the_stream() {
        let base: Sampler = Sampler::Stratified(StratifiedSampler::new(2, 2, true, 4));
        let mut a: Sampler = base.clone_with_seed(42);
        let mut b: Sampler = base.clone_with_seed(42);
        a.set_pixel(Point2i { x: 7, y: 7 });
        b.set_pixel(Point2i { x: 7, y: 7 });
        for _ in 0..32 {
            assert_eq!(a.next_1d(), b.next_1d());
            let pa: Point2f = a.next_2d();
            let pb: Point2f = b.next_2d();
            assert_eq!(pa, pb);
        }
    }

    #[test]
    fn camera_sample_lands_inside_the_pixel() {
        for mut sampler in all_samplers() {
            let pixel: Point2i = Point2i { x: 2, y: 6 };
            sampler.set_pixel(pixel);
            let cs: CameraSample = sampler.generate_camera_sample(pixel);
            assert!(cs.sensor_point.x >= 2.0 && cs.sensor_point.x < 3.0);
            assert!(cs.sensor_point.y >= 6.0 && cs.sensor_point.y < 7.0);
            assert!((0.0..1.0).contains(&cs.time));
        }
    }
}
