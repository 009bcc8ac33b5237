//! Whitted-style integration: direct illumination from every light at
//! each hit, recursion only along perfectly specular reflection and
//! transmission, cut off at a fixed scattering count.

// crate
use crate::core::geometry::{vec3_abs_dot_nrmf, Normal3f, Point2f, Ray, Vector3f};
use crate::core::interaction::SurfaceInteraction;
use crate::core::light::VisibilityTester;
use crate::core::material::{Material, TransportMode};
use crate::core::memory::RegionAllocator;
use crate::core::model::Model;
use crate::core::precision::Float;
use crate::core::reflection::{Bsdf, BxdfType};
use crate::core::sampler::Sampler;
use crate::core::scene::Scene;
use crate::core::spectrum::Spectrum;

pub struct WhittedIntegrator {
    /// recursion stops once a path has scattered this many times
    pub max_depth: u32,
}

impl WhittedIntegrator {
    pub fn new(max_depth: u32) -> Self {
        WhittedIntegrator { max_depth }
    }
    pub fn li(
        &self,
        ray: &Ray,
        scene: &Scene,
        sampler: &mut Sampler,
        arena: &RegionAllocator,
        depth: u32,
    ) -> Spectrum {
        let mut radiance: Spectrum = Spectrum::default();
        let mut isect: SurfaceInteraction = SurfaceInteraction::default();
        if !scene.intersect(ray, &mut isect) {
            // the ray escaped; infinite lights still contribute
            for light in scene.lights.iter() {
                radiance += light.le(ray);
            }
            return radiance;
        }
        let n: Normal3f = isect.shading.n;
        let wo: Vector3f = isect.common.wo;
        let material: Option<std::sync::Arc<Material>> = isect
            .model
            .map(|model_ptr| unsafe { &*model_ptr })
            .and_then(Model::get_material);
        let material: std::sync::Arc<Material> = match material {
            Some(material) => material,
            None => {
                // boundary-only models carry no material; the ray
                // passes through unchanged
                let continued: Ray = isect.common.spawn_ray(&ray.d);
                return self.li(&continued, scene, sampler, arena, depth);
            }
        };
        isect.compute_differentials(ray);
        let bsdf: &mut Bsdf = material.compute_scattering_functions(
            &mut isect,
            arena,
            TransportMode::Radiance,
            false,
            None,
        );
        // radiance the surface itself emits (area lights)
        radiance += isect.emitted_radiance(&wo);
        // one sample from every light
        for light in scene.lights.iter() {
            let mut wi: Vector3f = Vector3f::default();
            let mut pdf: Float = 0.0 as Float;
            let mut visibility: VisibilityTester = VisibilityTester::default();
            let u_light: Point2f = sampler.next_2d();
            let li: Spectrum =
                light.sample_li(&isect.common, u_light, &mut wi, &mut pdf, &mut visibility);
            if li.is_black() || pdf == 0.0 as Float {
                continue;
            }
            let f: Spectrum = bsdf.f(&wo, &wi, BxdfType::BsdfAll as u8);
            if !f.is_black() && visibility.unoccluded(scene) {
                radiance += f * li * (vec3_abs_dot_nrmf(&wi, &n) / pdf);
            }
        }
        if depth + 1 < self.max_depth {
            // trace rays for specular reflection and refraction
            radiance += self.specular_scatter(
                &isect,
                bsdf,
                scene,
                sampler,
                arena,
                depth,
                BxdfType::BsdfReflection as u8 | BxdfType::BsdfSpecular as u8,
            );
            radiance += self.specular_scatter(
                &isect,
                bsdf,
                scene,
                sampler,
                arena,
                depth,
                BxdfType::BsdfTransmission as u8 | BxdfType::BsdfSpecular as u8,
            );
        }
        if radiance.has_nans() {
            eprintln!("WARNING: NaN radiance in Whitted recursion; clamped to black");
            return Spectrum::default();
        }
        radiance
    }
    #[allow(clippy::too_many_arguments)]
    fn specular_scatter(
        &self,
        isect: &SurfaceInteraction,
        bsdf: &Bsdf,
        scene: &Scene,
        sampler: &mut Sampler,
        arena: &RegionAllocator,
        depth: u32,
        flags: u8,
    ) -> Spectrum {
        let wo: Vector3f = isect.common.wo;
        let mut wi: Vector3f = Vector3f::default();
        let mut pdf: Float = 0.0 as Float;
        let mut sampled_type: u8 = BxdfType::BsdfAll as u8;
        let u_scatter: Point2f = sampler.next_2d();
        let f: Spectrum = bsdf.sample_f(&wo, &mut wi, &u_scatter, &mut pdf, flags, &mut sampled_type);
        let ns: Normal3f = isect.shading.n;
        if pdf > 0.0 as Float && !f.is_black() && vec3_abs_dot_nrmf(&wi, &ns) != 0.0 as Float {
            let scattered: Ray = isect.common.spawn_ray(&wi);
            let li: Spectrum = self.li(&scattered, scene, sampler, arena, depth + 1);
            f * li * (vec3_abs_dot_nrmf(&wi, &ns) / pdf)
        } else {
            Spectrum::default()
        }
    }
}
