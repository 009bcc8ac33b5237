//! The sample-driven render loop. The sensor sampling bounds are cut
//! into 16x16 pixel tiles; tiles run in parallel, each with its own
//! seeded sampler clone, region allocator and sensor region. Within a
//! tile, pixels iterate in scan order and the allocator is reset
//! after every sample, so scattering functions never outlive the
//! sample that built them.

// crate
use crate::core::camera::Camera;
use crate::core::film::Sensor;
use crate::core::geometry::{Bounds2i, Point2i, Ray, Vector2i};
use crate::core::memory::RegionAllocator;
use crate::core::parallel::parallel_for_2d;
use crate::core::precision::Float;
use crate::core::sampler::{CameraSample, Sampler};
use crate::core::scene::Scene;
use crate::core::spectrum::Spectrum;
use crate::integrators::whitted::WhittedIntegrator;

const TILE_SIZE: i32 = 16;

pub enum SamplerIntegrator {
    Whitted(WhittedIntegrator),
}

impl SamplerIntegrator {
    /// Incident radiance along the ray.
    pub fn li(
        &self,
        ray: &Ray,
        scene: &Scene,
        sampler: &mut Sampler,
        arena: &RegionAllocator,
        depth: u32,
    ) -> Spectrum {
        match self {
            SamplerIntegrator::Whitted(integrator) => {
                integrator.li(ray, scene, sampler, arena, depth)
            }
        }
    }
}

/// Options controlling one render invocation.
pub struct RenderOptions {
    pub n_threads: usize,
    pub verbosity: u32,
}

impl Default for RenderOptions {
    fn default() -> Self {
        RenderOptions {
            n_threads: crate::core::parallel::num_system_cores(),
            verbosity: 0,
        }
    }
}

/// Render the scene into the camera's sensor. The image is complete
/// (all tiles merged) when this returns; writing it out is the
/// caller's decision.
pub fn render(
    scene: &Scene,
    camera: &Camera,
    sampler: &Sampler,
    integrator: &SamplerIntegrator,
    options: &RenderOptions,
) {
    let sensor: std::sync::Arc<Sensor> = camera.get_sensor();
    let sample_bounds: Bounds2i = sensor.get_sample_bounds();
    let sample_extent: Vector2i = sample_bounds.diagonal();
    let n_tiles: Point2i = Point2i {
        x: (sample_extent.x + TILE_SIZE - 1) / TILE_SIZE,
        y: (sample_extent.y + TILE_SIZE - 1) / TILE_SIZE,
    };
    if options.verbosity >= 1 {
        eprintln!(
            "rendering {} x {} tiles with {} threads, {} samples per pixel",
            n_tiles.x,
            n_tiles.y,
            options.n_threads,
            sampler.samples_per_pixel()
        );
    }
    let spp_inv_sqrt: Float = 1.0 as Float / (sampler.samples_per_pixel() as Float).sqrt();
    parallel_for_2d(
        |tile_x, tile_y| {
            // thread-private state for this tile
            let mut arena: RegionAllocator = RegionAllocator::new();
            let seed: u64 = tile_y as u64 * n_tiles.x as u64 + tile_x as u64;
            let mut tile_sampler: Sampler = sampler.clone_with_seed(seed);
            let x0: i32 = sample_bounds.p_min.x + tile_x as i32 * TILE_SIZE;
            let x1: i32 = (x0 + TILE_SIZE).min(sample_bounds.p_max.x);
            let y0: i32 = sample_bounds.p_min.y + tile_y as i32 * TILE_SIZE;
            let y1: i32 = (y0 + TILE_SIZE).min(sample_bounds.p_max.y);
            let tile_bounds: Bounds2i = Bounds2i {
                p_min: Point2i { x: x0, y: y0 },
                p_max: Point2i { x: x1, y: y1 },
            };
            let mut sensor_region = sensor.get_sensor_region(tile_bounds);
            for pixel in &tile_bounds {
                tile_sampler.set_pixel(pixel);
                loop {
                    let camera_sample: CameraSample =
                        tile_sampler.generate_camera_sample(pixel);
                    let mut ray: Ray = Ray::default();
                    let ray_weight: Float =
                        camera.generate_ray_differential(&camera_sample, &mut ray);
                    ray.scale_differentials(spp_inv_sqrt);
                    let mut radiance: Spectrum = Spectrum::default();
                    if ray_weight > 0.0 as Float {
                        radiance =
                            integrator.li(&ray, scene, &mut tile_sampler, &arena, 0_u32);
                    }
                    sensor_region.add_sample(camera_sample.sensor_point, &radiance, ray_weight);
                    // everything this sample allocated dies here
                    arena.release();
                    if !tile_sampler.begin_next_sample() {
                        break;
                    }
                }
            }
            sensor.merge_sensor_region(sensor_region);
        },
        n_tiles.x as u32,
        n_tiles.y as u32,
        options.n_threads,
    );
    if options.verbosity >= 2 {
        eprintln!("all tiles merged");
    }
}
